use num_traits::PrimInt;

// Value with only bit `shift` set
pub fn bit<T: PrimInt>(shift: u32) -> T {
    T::one() << shift as usize
}

pub fn is_set<T: PrimInt>(value: T, mask: T) -> bool {
    value & mask != T::zero()
}

pub fn set_bits<T: PrimInt>(value: T, mask: T) -> T {
    value | mask
}

pub fn clear_bits<T: PrimInt>(value: T, mask: T) -> T {
    value & !mask
}

// Index of the lowest set bit, None if value is zero.
// Same contract as ffs() minus one.
pub fn first_set_bit<T: PrimInt>(value: T) -> Option<u32> {
    if value == T::zero() {
        return None;
    }

    Some(value.trailing_zeros())
}

use core::cell::UnsafeCell;
use core::hint::spin_loop;
use core::marker::PhantomData;
use core::ops::{Deref, DerefMut};
use core::sync::atomic::{AtomicBool, Ordering};

pub struct SpinlockGuard<'a, T> {
    lock: &'a Spinlock<T>
}

impl<T> Deref for SpinlockGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        unsafe { &*self.lock.data.get() }
    }
}

impl<T> DerefMut for SpinlockGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        unsafe { &mut *self.lock.data.get() }
    }
}

impl<T> Drop for SpinlockGuard<'_, T> {
    fn drop(&mut self) {
        self.lock.locked.store(false, Ordering::Release);
    }
}

pub struct Spinlock<T> {
    locked: AtomicBool,
    data: UnsafeCell<T>
}

// Access to data only ever happens through a guard
unsafe impl<T: Send> Sync for Spinlock<T> {}

impl<T> Spinlock<T> {
    pub const fn new(data: T) -> Self {
        Spinlock {
            locked: AtomicBool::new(false),
            data: UnsafeCell::new(data)
        }
    }

    pub fn lock(&self) -> SpinlockGuard<'_, T> {
        while self.locked
            .compare_exchange_weak(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err() {
            while self.locked.load(Ordering::Relaxed) {
                spin_loop();
            }
        }

        SpinlockGuard { lock: self }
    }

    pub fn try_lock(&self) -> Option<SpinlockGuard<'_, T>> {
        self.locked
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| SpinlockGuard { lock: self })
    }

    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::Relaxed)
    }

    pub fn into_inner(self) -> T {
        self.data.into_inner()
    }
}

/// Hook into the scheduler for locks that may be held across sleeps
pub trait Yield {
    fn yield_cpu();
}

pub struct MutexGuard<'a, T, Y> {
    lock: &'a Mutex<T, Y>
}

impl<T, Y> Deref for MutexGuard<'_, T, Y> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        unsafe { &*self.lock.data.get() }
    }
}

impl<T, Y> DerefMut for MutexGuard<'_, T, Y> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        unsafe { &mut *self.lock.data.get() }
    }
}

impl<T, Y> Drop for MutexGuard<'_, T, Y> {
    fn drop(&mut self) {
        self.lock.locked.store(false, Ordering::Release);
    }
}

/// Lock for sections that sleep. Contenders give up the cpu through `Y`
/// instead of spinning on the flag.
pub struct Mutex<T, Y> {
    locked: AtomicBool,
    data: UnsafeCell<T>,
    _yield: PhantomData<fn() -> Y>
}

unsafe impl<T: Send, Y> Sync for Mutex<T, Y> {}

impl<T, Y> Mutex<T, Y> {
    pub const fn new(data: T) -> Self {
        Mutex {
            locked: AtomicBool::new(false),
            data: UnsafeCell::new(data),
            _yield: PhantomData
        }
    }

    pub fn try_lock(&self) -> Option<MutexGuard<'_, T, Y>> {
        self.locked
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| MutexGuard { lock: self })
    }

    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::Relaxed)
    }

    pub fn into_inner(self) -> T {
        self.data.into_inner()
    }
}

impl<T, Y: Yield> Mutex<T, Y> {
    pub fn lock(&self) -> MutexGuard<'_, T, Y> {
        loop {
            if let Some(guard) = self.try_lock() {
                return guard;
            }
            Y::yield_cpu();
        }
    }
}

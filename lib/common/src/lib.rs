#![cfg_attr(not(test), no_std)]

mod utils;
pub use utils::*;

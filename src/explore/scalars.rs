use std::{
    sync::atomic::{
        AtomicBool, AtomicI8, AtomicI16, AtomicI32, AtomicI64, AtomicIsize, AtomicU8, AtomicU16,
        AtomicU32, AtomicU64, AtomicUsize, Ordering,
    },
    time::Duration,
};

use super::{Explore, Kind};

macro_rules! display_scalar {
    ($($t:ty),* $(,)?) => {$(
        impl Explore for $t {
            fn kind(&self) -> Kind {
                Kind::Scalar
            }

            fn type_name(&self) -> &'static str {
                std::any::type_name::<$t>()
            }

            fn render(&self) -> String {
                self.to_string()
            }
        }
    )*};
}

macro_rules! debug_scalar {
    ($($t:ty),* $(,)?) => {$(
        impl Explore for $t {
            fn kind(&self) -> Kind {
                Kind::Scalar
            }

            fn type_name(&self) -> &'static str {
                std::any::type_name::<$t>()
            }

            fn render(&self) -> String {
                format!("{:?}", self)
            }
        }
    )*};
}

// Atomics are read on every render, so counters shared with the host program
// show their current value.
macro_rules! atomic_scalar {
    ($($t:ty),* $(,)?) => {$(
        impl Explore for $t {
            fn kind(&self) -> Kind {
                Kind::Scalar
            }

            fn type_name(&self) -> &'static str {
                std::any::type_name::<$t>()
            }

            fn render(&self) -> String {
                self.load(Ordering::Relaxed).to_string()
            }
        }
    )*};
}

display_scalar!(
    u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64, bool,
);

debug_scalar!(char, String, str, (), Duration);

atomic_scalar!(
    AtomicBool,
    AtomicU8,
    AtomicU16,
    AtomicU32,
    AtomicU64,
    AtomicUsize,
    AtomicI8,
    AtomicI16,
    AtomicI32,
    AtomicI64,
    AtomicIsize,
);

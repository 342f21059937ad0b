//! Totally-ordered float wrappers.
//!
//! `f32`/`f64` are not `Eq` or `Hash`, which keeps them out of map keys and
//! sorted collections. `TotalF32`/`TotalF64` wrap them with IEEE-754
//! `total_cmp` ordering and bit-pattern equality. The wrappers are
//! immutable: there is no way to mutate the inner value in place.
//!
//! Note that bit-pattern equality distinguishes `0.0` from `-0.0` and makes
//! NaN equal to an identically-encoded NaN; that is what makes `Hash`
//! consistent with `Eq`.

use std::fmt;
use std::hash::{Hash, Hasher};

macro_rules! total_float {
    ($name:ident, $inner:ty) => {
        /// Immutable, totally-ordered, hashable float wrapper.
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name($inner);

        impl $name {
            /// Wrap a raw float.
            #[must_use]
            pub const fn new(value: $inner) -> Self {
                Self(value)
            }

            /// The wrapped value.
            #[must_use]
            pub const fn get(self) -> $inner {
                self.0
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.0.to_bits() == other.0.to_bits()
            }
        }

        impl Eq for $name {}

        impl PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $name {
            fn cmp(&self, other: &Self) -> std::cmp::Ordering {
                self.0.total_cmp(&other.0)
            }
        }

        impl Hash for $name {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.0.to_bits().hash(state);
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<$inner> for $name {
            fn from(value: $inner) -> Self {
                Self(value)
            }
        }

        impl From<$name> for $inner {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

total_float!(TotalF32, f32);
total_float!(TotalF64, f64);

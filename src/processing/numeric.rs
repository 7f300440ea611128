// Numeric capability for aggregating actions
// Author: Gabriel Demetrios Lafis

/// Element types that `sum` and `mean` can accumulate
pub trait Numeric: Copy {
    fn zero() -> Self;

    /// `None` when the total no longer fits in `Self`
    fn checked_add(self, other: Self) -> Option<Self>;

    fn to_f64(self) -> f64;
}

macro_rules! impl_numeric {
    (int => $($t:ty),*) => {
        $(
            impl Numeric for $t {
                fn zero() -> Self {
                    0
                }

                fn checked_add(self, other: Self) -> Option<Self> {
                    <$t>::checked_add(self, other)
                }

                fn to_f64(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
    (float => $($t:ty),*) => {
        $(
            impl Numeric for $t {
                fn zero() -> Self {
                    0.0
                }

                // float addition overflows to infinity and never fails
                fn checked_add(self, other: Self) -> Option<Self> {
                    Some(self + other)
                }

                fn to_f64(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

impl_numeric!(int => i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
impl_numeric!(float => f32, f64);

//! Length units used throughout the crate.
//!
//! Layout happens in millimetres ([Mm]) measured from the top-left corner of
//! the page, the way letters are usually specified. PDF output happens in
//! points ([Pt], 1/72 of an inch) measured from the bottom-left corner. [In]
//! is provided for convenience when specifying margins.

use derive_more::{Add, AddAssign, Deref, DerefMut, Display, From, Into, Sub, SubAssign, Sum};
use std::ops::{Div, Mul, Neg};

const MM_PER_INCH: f32 = 25.4;
const PT_PER_INCH: f32 = 72.0;

/// Millimetres, the unit of the layout engine
#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    PartialOrd,
    Add,
    Sub,
    AddAssign,
    SubAssign,
    Sum,
    Deref,
    DerefMut,
    From,
    Into,
    Display,
)]
#[display("{_0}mm")]
pub struct Mm(pub f32);

/// Points, the unit of PDF user space
#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    PartialOrd,
    Add,
    Sub,
    AddAssign,
    SubAssign,
    Sum,
    Deref,
    DerefMut,
    From,
    Into,
    Display,
)]
#[display("{_0}pt")]
pub struct Pt(pub f32);

/// Inches
#[derive(Debug, Default, Copy, Clone, PartialEq, PartialOrd, Add, Sub, From, Into, Display)]
#[display("{_0}in")]
pub struct In(pub f32);

macro_rules! scalar_ops {
    ($unit:ident) => {
        impl Mul<f32> for $unit {
            type Output = $unit;

            fn mul(self, rhs: f32) -> $unit {
                $unit(self.0 * rhs)
            }
        }

        impl Div<f32> for $unit {
            type Output = $unit;

            fn div(self, rhs: f32) -> $unit {
                $unit(self.0 / rhs)
            }
        }

        /// Dividing two lengths yields a unitless ratio
        impl Div<$unit> for $unit {
            type Output = f32;

            fn div(self, rhs: $unit) -> f32 {
                self.0 / rhs.0
            }
        }

        impl Neg for $unit {
            type Output = $unit;

            fn neg(self) -> $unit {
                $unit(-self.0)
            }
        }

        impl $unit {
            /// The larger of two lengths
            pub fn max(self, other: $unit) -> $unit {
                $unit(self.0.max(other.0))
            }

            /// The smaller of two lengths
            pub fn min(self, other: $unit) -> $unit {
                $unit(self.0.min(other.0))
            }
        }
    };
}

scalar_ops!(Mm);
scalar_ops!(Pt);

impl From<Mm> for Pt {
    fn from(mm: Mm) -> Pt {
        Pt(mm.0 * PT_PER_INCH / MM_PER_INCH)
    }
}

impl From<Pt> for Mm {
    fn from(pt: Pt) -> Mm {
        Mm(pt.0 * MM_PER_INCH / PT_PER_INCH)
    }
}

impl From<In> for Pt {
    fn from(inches: In) -> Pt {
        Pt(inches.0 * PT_PER_INCH)
    }
}

impl From<In> for Mm {
    fn from(inches: In) -> Mm {
        Mm(inches.0 * MM_PER_INCH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_between_units() {
        assert_eq!(Pt::from(In(1.0)), Pt(72.0));
        assert_eq!(Mm::from(In(2.0)), Mm(50.8));
        let back: Mm = Pt::from(Mm(210.0)).into();
        assert!((back.0 - 210.0).abs() < 1e-3);
    }

    #[test]
    fn arithmetic_stays_in_unit() {
        let mut y = Mm(10.0);
        y += Mm(40.0);
        assert_eq!(y, Mm(50.0));
        assert_eq!(y * 2.0, Mm(100.0));
        assert_eq!(Mm(30.0) / Mm(10.0), 3.0);
        assert_eq!(vec![Mm(1.0), Mm(2.0)].into_iter().sum::<Mm>(), Mm(3.0));
        assert_eq!(Mm(5.0).max(Mm(7.0)), Mm(7.0));
    }
}

pub mod cost;
pub mod energy;
pub mod rate;

/// Floating-point quantity tagged with its energy and cost dimensions.
#[derive(Clone, Copy, PartialEq, derive_more::Add, derive_more::Sum)]
pub struct Quantity<const ENERGY: isize, const COST: isize>(pub f64);

impl<const ENERGY: isize, const COST: isize> Quantity<ENERGY, COST> {
    pub const ZERO: Self = Self(0.0);
}

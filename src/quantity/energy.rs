use std::fmt::{Debug, Formatter};

use crate::quantity::Quantity;

pub type KilowattHours = Quantity<1, 0>;

impl Debug for KilowattHours {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}kWh", self.0)
    }
}

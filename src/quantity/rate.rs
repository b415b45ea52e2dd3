use std::fmt::{Debug, Formatter};

use crate::quantity::Quantity;

/// Kronor per kilowatt-hour.
pub type KilowattHourRate = Quantity<-1, 1>;

impl Debug for KilowattHourRate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}SEK/kWh", self.0)
    }
}

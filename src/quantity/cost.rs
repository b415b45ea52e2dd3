use std::fmt::{Debug, Formatter};

use crate::quantity::Quantity;

/// Swedish kronor.
pub type Kronor = Quantity<0, 1>;

impl Debug for Kronor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}SEK", self.0)
    }
}

//! Simulation time model.
//!
//! The simulation advances in whole years.  `Year` is the unit of scheduling:
//! every gate in the control loop is a membership test of a `Year` against a
//! configured `YearSet`.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A calendar year of simulated time.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Year(pub u32);

impl Year {
    /// The following year.
    #[inline]
    pub fn next(self) -> Year {
        Year(self.0 + 1)
    }

    /// Years elapsed from `earlier` to `self`, saturating at zero.
    #[inline]
    pub fn since(self, earlier: Year) -> u32 {
        self.0.saturating_sub(earlier.0)
    }

    /// Iterator over `[start, end)`.
    pub fn range(start: Year, end: Year) -> impl Iterator<Item = Year> {
        (start.0..end.0).map(Year)
    }
}

impl std::ops::Add<u32> for Year {
    type Output = Year;
    #[inline]
    fn add(self, rhs: u32) -> Year {
        Year(self.0 + rhs)
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An ordered set of years.  Ordered so iteration and serialization are
/// deterministic.
pub type YearSet = BTreeSet<Year>;

//! Strongly typed, zero-cost identifier wrappers.
//!
//! Entities reference each other by id, never by pointer, so the population
//! graph (household ↔ person ↔ job ↔ dwelling) has no ownership cycles.  All
//! ids are `Copy + Ord + Hash` and serialize as the bare integer.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
        #[serde(transparent)]
        $vis struct $name(pub $inner);

        impl $name {
            /// The raw integer value.
            #[inline(always)]
            pub fn get(self) -> $inner {
                self.0
            }

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$inner> for $name {
            #[inline(always)]
            fn from(raw: $inner) -> $name {
                $name(raw)
            }
        }

        impl From<$name> for $inner {
            #[inline(always)]
            fn from(id: $name) -> $inner {
                id.0
            }
        }
    };
}

typed_id! {
    /// Identity of a household.
    pub struct HouseholdId(u32);
}

typed_id! {
    /// Identity of a person.
    pub struct PersonId(u32);
}

typed_id! {
    /// Identity of a dwelling unit.
    pub struct DwellingId(u32);
}

typed_id! {
    /// Identity of a job (one position, filled by at most one worker).
    pub struct JobId(u32);
}

typed_id! {
    /// Identity of a school.
    pub struct SchoolId(u32);
}

typed_id! {
    /// Identity of a traffic analysis zone.
    pub struct ZoneId(u32);
}

typed_id! {
    /// Identity of a region (an aggregate of zones).
    pub struct RegionId(u32);
}

typed_id! {
    /// Index of a road-network node.
    pub struct NodeId(u32);
}

typed_id! {
    /// Index of a directed road-network edge.
    pub struct EdgeId(u32);
}

impl NodeId {
    /// Sentinel meaning "no node".
    pub const INVALID: NodeId = NodeId(u32::MAX);
}

impl EdgeId {
    /// Sentinel meaning "no edge", used by shortest-path predecessor arrays.
    pub const INVALID: EdgeId = EdgeId(u32::MAX);
}

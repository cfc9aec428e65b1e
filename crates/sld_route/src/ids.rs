//! Opaque ID newtypes for engine-owned entities.
//!
//! [`ObstacleId`] indexes into an [`ObstacleModel`](crate::ObstacleModel) and
//! [`HistoryEntryId`] identifies a row in the routing history. Both are thin
//! `u32` wrappers that are `Copy`, `Hash`, and `Serialize`/`Deserialize`.

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Creates an ID from a raw `u32` index.
            pub fn from_raw(index: u32) -> Self {
                Self(index)
            }

            /// Returns the raw `u32` index.
            pub fn as_raw(self) -> u32 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(
    /// Index of an obstacle within one batch's obstacle model.
    ObstacleId
);

define_id!(
    /// Sequence number of a routing history entry.
    HistoryEntryId
);

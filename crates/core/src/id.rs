// SPDX-License-Identifier: MIT

//! Newtype identifiers for the expedition domain.

use std::fmt;
use uuid::Uuid;

/// Define a newtype ID wrapper around [`Uuid`].
///
/// Generates `new()` (random v4), `as_uuid()`, `Display`, `From<Uuid>`, and
/// serde (de)serialization via the inner `Uuid`.
macro_rules! define_id {
    ($(#[$meta:meta])* pub struct $name:ident;) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a fresh random id.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }
    };
}

define_id! {
    /// Identifies a [`crate::Route`] (and, transitively, a baked route).
    pub struct RouteId;
}

define_id! {
    /// Identifies an [`crate::Expedition`].
    pub struct ExpeditionId;
}

define_id! {
    /// Identifies a [`crate::Link`] between two route positions.
    pub struct LinkId;
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;

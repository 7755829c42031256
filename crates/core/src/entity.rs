//! Entity traits: identity plus the audit timestamps every catalog record carries.

use chrono::{DateTime, Utc};

/// A record with a stable identity.
///
/// Two entities with the same id are the same record, even if their other
/// fields differ (e.g. before and after an edit).
pub trait Entity {
    /// Strongly-typed, copyable identifier.
    type Id: Copy + Eq + Ord + core::hash::Hash + core::fmt::Debug + core::fmt::Display;

    fn id(&self) -> Self::Id;
}

/// System-assigned creation/modification timestamps.
pub trait Audited {
    fn created_at(&self) -> DateTime<Utc>;

    fn modified_at(&self) -> DateTime<Utc>;
}

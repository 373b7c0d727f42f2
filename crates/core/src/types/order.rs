//! Persisted order history records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::id::ProductId;
use crate::types::price::Price;
use crate::types::profile::UserProfile;

/// A persisted snapshot of one submitted purchase line.
///
/// The history is append-only: every submission appends one record per line
/// item, all stamped with the same submission timestamp. Records embed the
/// buyer's contact details as they were at submission time, so later profile
/// edits do not rewrite history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    /// Buyer name at submission time.
    pub name: String,
    /// Buyer email at submission time; used to scope history reads.
    #[serde(default)]
    pub email: String,
    /// Buyer phone number.
    pub phone: String,
    /// Shipping wilaya.
    #[serde(default)]
    pub wilaya: String,
    /// Street address.
    #[serde(default)]
    pub address: String,
    /// Product name.
    pub productname: String,
    /// Product ID.
    pub id: ProductId,
    /// Unit price; stored as a formatted string, read back numeric.
    pub price: Price,
    /// Ordered quantity.
    pub quantity: u32,
    /// Shared submission timestamp.
    pub date: DateTime<Utc>,
    /// Product image URL.
    #[serde(default)]
    pub image: String,
}

impl OrderRecord {
    /// Whether this record belongs to the given profile.
    #[must_use]
    pub fn belongs_to(&self, profile: &UserProfile) -> bool {
        !self.email.is_empty() && self.email == profile.email
    }
}

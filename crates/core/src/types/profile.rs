//! Stored user profile.

use serde::{Deserialize, Serialize};

/// Contact and shipping details for the current user.
///
/// A single record, created or overwritten on signup or on the first order;
/// it is not versioned. The email is kept as a plain string because the
/// record may be created from an order form where the email is optional and
/// left empty.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserProfile {
    /// Full name.
    pub name: String,
    /// Email address, possibly empty.
    #[serde(default)]
    pub email: String,
    /// Phone number.
    pub phone: String,
    /// Shipping wilaya (Algerian administrative region).
    #[serde(default)]
    pub wilaya: String,
    /// Street address.
    #[serde(default)]
    pub address: String,
}

impl UserProfile {
    /// Whether the mandatory contact fields are filled in.
    ///
    /// Name and phone are required before an order can be submitted; the
    /// other fields fall back to placeholders.
    #[must_use]
    pub fn has_contact_details(&self) -> bool {
        !self.name.trim().is_empty() && !self.phone.trim().is_empty()
    }
}

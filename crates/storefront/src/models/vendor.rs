//! Vendor application domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use teknokalakal_core::{Address, UserId, VendorId, VendorStatus};

use super::product::ImageRef;

/// Business details submitted with a vendor application.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BusinessInfo {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub address: Address,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
}

/// A request by a user to gain product-listing privileges.
#[derive(Debug, Clone, Serialize)]
pub struct VendorApplication {
    pub id: VendorId,
    /// The applying user.
    pub user_id: UserId,
    pub business: BusinessInfo,
    /// Uploaded certification documents (e.g. BFAR registration).
    pub certifications: Vec<ImageRef>,
    pub status: VendorStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

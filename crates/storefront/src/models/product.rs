//! Product domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use teknokalakal_core::{CategoryId, Money, ProductId, ReviewId, UserId};

/// A reference to an image held at the media host.
///
/// `public_id` is needed to destroy the image remotely; listings created
/// before direct uploads only carry a link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    #[serde(default)]
    pub public_id: Option<String>,
    pub link: String,
}

/// A marketplace listing owned by a vendor.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// The vendor who listed this product.
    pub vendor_id: UserId,
    pub title: String,
    pub description: Option<String>,
    /// Unit price in centavos.
    pub price: Money,
    /// Units available.
    pub stock: i32,
    /// Units sold across paid orders.
    pub sold: i32,
    /// Media-host images, first one is the cover.
    pub images: Vec<ImageRef>,
    pub category_id: Option<CategoryId>,
    /// Free-form attributes (e.g. horsepower, mesh size).
    pub properties: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// The cover image link, if any image exists.
    #[must_use]
    pub fn cover_image(&self) -> Option<&str> {
        self.images.first().map(|img| img.link.as_str())
    }
}

/// A buyer review attached to a product.
#[derive(Debug, Clone, Serialize)]
pub struct Review {
    pub id: ReviewId,
    pub product_id: ProductId,
    pub user_id: UserId,
    /// 1-5 stars.
    pub rating: i16,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

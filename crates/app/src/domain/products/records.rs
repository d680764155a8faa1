//! Product Records

use jiff::Timestamp;

use crate::uuids::TypedUuid;

/// Product UUID
pub type ProductUuid = TypedUuid<ProductRecord>;

/// Product Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRecord {
    pub uuid: ProductUuid,
    pub name: String,
    /// Current price in minor units.
    pub price: u64,
    pub description: String,
    pub image_url: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

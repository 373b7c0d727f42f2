//! Cache value types for the catalog client.

use super::types::{Category, Product};

/// Values stored in the catalog cache.
///
/// A single cache holds all catalog read results; the enum keeps them
/// type-safe without one cache instance per endpoint.
#[derive(Clone)]
pub enum CacheValue {
    /// A single category.
    Category(Box<Category>),
    /// The category listing.
    Categories(Vec<Category>),
    /// A single product.
    Product(Box<Product>),
    /// A product listing (full or per-category).
    Products(Vec<Product>),
}

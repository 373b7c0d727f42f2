//! Catalog API response types.
//!
//! Shapes mirror the remote catalog service's JSON. Prices arrive as
//! formatted strings and are normalized into [`Price`] at this boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use souk_core::{CategoryId, Price, ProductId};

/// A product category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Category ID.
    pub id: CategoryId,
    /// Category name.
    pub name: String,
    /// Free-form description, possibly empty.
    #[serde(default)]
    pub description: String,
    /// Category image URL.
    #[serde(default)]
    pub image: Option<String>,
}

/// A secondary product image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductImage {
    /// Image record ID.
    pub id: i64,
    /// Image URL.
    pub image: String,
    /// Display order within the gallery.
    #[serde(default)]
    pub order: i64,
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Product ID.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// Free-form description, possibly empty.
    #[serde(default)]
    pub description: String,
    /// Unit price.
    pub price: Price,
    /// Whether the product can currently be ordered.
    #[serde(default = "default_available")]
    pub is_available: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Main image URL (fallback when the gallery is empty).
    #[serde(default)]
    pub image: Option<String>,
    /// Gallery images.
    #[serde(default)]
    pub images: Vec<ProductImage>,
    /// Owning category.
    pub category: Category,
}

const fn default_available() -> bool {
    true
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_deserializes_api_shape() {
        let json = r#"{
            "id": 12,
            "name": "Huile d'argan",
            "description": "Pressée à froid",
            "price": "1200,00",
            "is_available": true,
            "created_at": "2025-11-02T10:30:00Z",
            "image": "/media/products/argan.jpg",
            "images": [
                {"id": 1, "image": "/media/products/argan-1.jpg", "order": 0}
            ],
            "category": {"id": 3, "name": "Cosmétique"}
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, ProductId::new(12));
        assert_eq!(product.price, Price::parse("1200,00").unwrap());
        assert_eq!(product.category.id, CategoryId::new(3));
        assert_eq!(product.images.len(), 1);
    }

    #[test]
    fn test_product_defaults() {
        // Sparse rows: no description, gallery or availability flag.
        let json = r#"{
            "id": 1,
            "name": "Savon noir",
            "price": "350",
            "created_at": "2025-11-02T10:30:00+01:00",
            "category": {"id": 3, "name": "Cosmétique"}
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert!(product.is_available);
        assert!(product.images.is_empty());
        assert_eq!(product.image, None);
    }
}

//! Product snapshots as served by the catalog API.

use serde::{Deserialize, Deserializer, Serialize};

use super::{Category, Price, ProductId};

/// A read-only product snapshot.
///
/// The API is the owner of product records; the client only ever holds
/// snapshots of them (in listings, on detail pages, and inside cart lines).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Opaque unique identifier.
    #[serde(rename = "_id")]
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Long-form description.
    #[serde(default)]
    pub description: String,
    /// Price in whole rupees.
    pub price: Price,
    /// One of the five fixed categories.
    pub category: Category,
    /// Available sizes, normalized to a sequence.
    ///
    /// The API stores this loosely: absent, a single string, or a list.
    /// Deserialization always normalizes to a (possibly empty) sequence.
    #[serde(default, deserialize_with = "deserialize_sizes")]
    pub size: Vec<String>,
    /// Ordered image URLs; the first entry is the default display image.
    #[serde(default)]
    pub images: Vec<String>,
}

impl Product {
    /// The default display image, if the product has any images at all.
    ///
    /// Listings and cart lines render the first image; a product with no
    /// images gets a placeholder at the view layer.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Whether a size line should be rendered for this product.
    #[must_use]
    pub fn shows_sizes(&self) -> bool {
        self.category.shows_sizes() && !self.size.is_empty()
    }
}

/// Accept `null`, a bare string, or a sequence of strings for `size`.
fn deserialize_sizes<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum SizeField {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<SizeField>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(SizeField::One(s)) if s.trim().is_empty() => Vec::new(),
        Some(SizeField::One(s)) => vec![s],
        Some(SizeField::Many(sizes)) => sizes,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product_json(size: &str) -> String {
        format!(
            r#"{{
                "_id": "p1",
                "name": "Red Saree",
                "description": "Handwoven",
                "price": 3000,
                "category": "Sarees",
                {size}
                "images": ["/uploads/red-1.jpg", "/uploads/red-2.jpg"]
            }}"#
        )
    }

    #[test]
    fn test_size_absent_normalizes_to_empty() {
        let product: Product = serde_json::from_str(&product_json("")).unwrap();
        assert!(product.size.is_empty());
    }

    #[test]
    fn test_size_null_normalizes_to_empty() {
        let product: Product = serde_json::from_str(&product_json(r#""size": null,"#)).unwrap();
        assert!(product.size.is_empty());
    }

    #[test]
    fn test_size_single_string_becomes_one_entry() {
        let product: Product = serde_json::from_str(&product_json(r#""size": "XL","#)).unwrap();
        assert_eq!(product.size, vec!["XL"]);
    }

    #[test]
    fn test_size_blank_string_becomes_empty() {
        let product: Product = serde_json::from_str(&product_json(r#""size": "  ","#)).unwrap();
        assert!(product.size.is_empty());
    }

    #[test]
    fn test_size_sequence_passes_through() {
        let product: Product =
            serde_json::from_str(&product_json(r#""size": ["S", "M", "L"],"#)).unwrap();
        assert_eq!(product.size, vec!["S", "M", "L"]);
    }

    #[test]
    fn test_primary_image_is_first() {
        let product: Product = serde_json::from_str(&product_json("")).unwrap();
        assert_eq!(product.primary_image(), Some("/uploads/red-1.jpg"));
    }

    #[test]
    fn test_sarees_hide_sizes_even_when_present() {
        let product: Product = serde_json::from_str(&product_json(r#""size": "Free","#)).unwrap();
        assert!(!product.shows_sizes());
    }
}

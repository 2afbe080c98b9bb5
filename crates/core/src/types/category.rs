//! Product categories.
//!
//! The catalog has a fixed set of five categories. They double as navigation
//! entries and as the admin table's pre-filter, so parsing is strict: an
//! unknown name is an error, not a sixth category.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The fixed set of product categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Sarees,
    #[serde(rename = "Salwar Kurti")]
    SalwarKurti,
    Nighty,
    Pickle,
    Masalas,
}

/// Error parsing a category name.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown category: {0}")]
pub struct CategoryParseError(pub String);

impl Category {
    /// All categories in storefront display order.
    pub const ALL: [Self; 5] = [
        Self::Sarees,
        Self::SalwarKurti,
        Self::Nighty,
        Self::Pickle,
        Self::Masalas,
    ];

    /// The category name as the API and the UI spell it.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sarees => "Sarees",
            Self::SalwarKurti => "Salwar Kurti",
            Self::Nighty => "Nighty",
            Self::Pickle => "Pickle",
            Self::Masalas => "Masalas",
        }
    }

    /// Whether product sizes are shown for this category.
    ///
    /// Sarees are one-size by convention and never display a size line.
    #[must_use]
    pub const fn shows_sizes(&self) -> bool {
        !matches!(self, Self::Sarees)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = CategoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| CategoryParseError(s.to_owned()))
    }
}

/// Category pre-filter for the admin product table.
///
/// `All` passes every product through; `Only` keeps an exact category match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    /// Parse a filter value as submitted by the category select.
    ///
    /// Empty input and the literal `All` select everything; anything else
    /// must be a known category name.
    ///
    /// # Errors
    ///
    /// Returns [`CategoryParseError`] for unknown category names.
    pub fn parse(s: &str) -> Result<Self, CategoryParseError> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("All") {
            return Ok(Self::All);
        }
        s.parse().map(Self::Only)
    }

    /// Whether a category passes this filter.
    #[must_use]
    pub fn matches(&self, category: Category) -> bool {
        match self {
            Self::All => true,
            Self::Only(only) => *only == category,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips_every_category() {
        for category in Category::ALL {
            let parsed: Category = category.as_str().parse().unwrap();
            assert_eq!(parsed, category);
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("sarees".parse::<Category>().unwrap(), Category::Sarees);
        assert_eq!(
            "salwar kurti".parse::<Category>().unwrap(),
            Category::SalwarKurti
        );
    }

    #[test]
    fn test_parse_rejects_unknown_names() {
        let err = "Shoes".parse::<Category>().unwrap_err();
        assert_eq!(err, CategoryParseError("Shoes".to_owned()));
    }

    #[test]
    fn test_serde_uses_display_names() {
        let json = serde_json::to_string(&Category::SalwarKurti).unwrap();
        assert_eq!(json, "\"Salwar Kurti\"");
        let back: Category = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Category::SalwarKurti);
    }

    #[test]
    fn test_sarees_never_show_sizes() {
        assert!(!Category::Sarees.shows_sizes());
        assert!(Category::Nighty.shows_sizes());
    }

    #[test]
    fn test_filter_all_matches_everything() {
        for category in Category::ALL {
            assert!(CategoryFilter::All.matches(category));
        }
    }

    #[test]
    fn test_filter_only_matches_exactly() {
        let filter = CategoryFilter::Only(Category::Pickle);
        assert!(filter.matches(Category::Pickle));
        assert!(!filter.matches(Category::Masalas));
    }

    #[test]
    fn test_filter_parse_defaults_to_all() {
        assert_eq!(CategoryFilter::parse("").unwrap(), CategoryFilter::All);
        assert_eq!(CategoryFilter::parse("All").unwrap(), CategoryFilter::All);
        assert_eq!(
            CategoryFilter::parse("Nighty").unwrap(),
            CategoryFilter::Only(Category::Nighty)
        );
    }
}

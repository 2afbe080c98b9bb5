//! Free-text listing filter.
//!
//! Shoppers type queries like `silk saree under 4000` into the category page
//! and the admin product table. The query is split into a name part and an
//! optional price ceiling, then applied to an in-memory product list while
//! preserving the input order.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::{CategoryFilter, Product};

/// Matches an "under N" / "below N" price constraint inside a lowered query.
static PRICE_CEILING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:under|below)\s*(\d+)").expect("valid price ceiling pattern")
});

/// A parsed listing query.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListingQuery {
    /// Lower-cased name substring to match; empty matches everything.
    pub name_query: String,
    /// Inclusive price ceiling in rupees, if the query asked for one.
    pub price_ceiling: Option<u32>,
}

impl ListingQuery {
    /// Parse a raw query string.
    ///
    /// The query is lower-cased, then scanned for the first `under`/`below`
    /// constraint. The matched substring is stripped and the remainder
    /// trimmed to form the name query. A ceiling of zero disables the price
    /// constraint entirely instead of filtering everything out; that is the
    /// filter's longstanding behavior and is kept as-is.
    ///
    /// A query that is only digits has no keyword and therefore stays a name
    /// search: numbers in product names are searchable text.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let lowered = raw.to_lowercase();
        match PRICE_CEILING.captures(&lowered) {
            Some(caps) => {
                let matched = caps.get(0).map_or("", |m| m.as_str());
                let ceiling = caps
                    .get(1)
                    .and_then(|digits| digits.as_str().parse::<u32>().ok())
                    .unwrap_or(0);
                let name_query = lowered.replacen(matched, "", 1).trim().to_owned();
                Self {
                    name_query,
                    price_ceiling: (ceiling > 0).then_some(ceiling),
                }
            }
            None => Self {
                name_query: lowered.trim().to_owned(),
                price_ceiling: None,
            },
        }
    }

    /// Whether a product passes this query.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        if !product.name.to_lowercase().contains(&self.name_query) {
            return false;
        }
        self.price_ceiling
            .is_none_or(|ceiling| product.price.rupees() <= ceiling)
    }
}

/// Filter `products` by a raw query, preserving relative order.
#[must_use]
pub fn filter_products<'a>(products: &'a [Product], raw_query: &str) -> Vec<&'a Product> {
    let query = ListingQuery::parse(raw_query);
    products.iter().filter(|p| query.matches(p)).collect()
}

/// Filter with an additional category pre-filter, as the admin table does.
#[must_use]
pub fn filter_listing<'a>(
    products: &'a [Product],
    category: CategoryFilter,
    raw_query: &str,
) -> Vec<&'a Product> {
    let query = ListingQuery::parse(raw_query);
    products
        .iter()
        .filter(|p| category.matches(p.category) && query.matches(p))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{Category, Price, ProductId};

    fn product(name: &str, price: u32, category: Category) -> Product {
        Product {
            id: ProductId::new(name.to_lowercase().replace(' ', "-")),
            name: name.to_owned(),
            description: String::new(),
            price: Price::new(price),
            category,
            size: Vec::new(),
            images: vec!["/uploads/x.jpg".to_owned()],
        }
    }

    fn sample() -> Vec<Product> {
        vec![
            product("Red Saree", 3000, Category::Sarees),
            product("Kurti", 1200, Category::SalwarKurti),
        ]
    }

    fn names(filtered: &[&Product]) -> Vec<String> {
        filtered.iter().map(|p| p.name.clone()).collect()
    }

    #[test]
    fn test_empty_query_returns_input_unchanged() {
        let products = sample();
        let filtered = filter_products(&products, "");
        assert_eq!(names(&filtered), vec!["Red Saree", "Kurti"]);
    }

    #[test]
    fn test_name_substring_match_is_case_insensitive() {
        let products = sample();
        let filtered = filter_products(&products, "saree");
        assert_eq!(names(&filtered), vec!["Red Saree"]);

        let filtered = filter_products(&products, "SAREE");
        assert_eq!(names(&filtered), vec!["Red Saree"]);
    }

    #[test]
    fn test_under_ceiling_keeps_cheaper_products() {
        let products = sample();
        let filtered = filter_products(&products, "under 2000");
        assert_eq!(names(&filtered), vec!["Kurti"]);
    }

    #[test]
    fn test_below_is_a_synonym_for_under() {
        let products = sample();
        let filtered = filter_products(&products, "below 2000");
        assert_eq!(names(&filtered), vec!["Kurti"]);
    }

    #[test]
    fn test_name_and_ceiling_combine() {
        let products = sample();
        let filtered = filter_products(&products, "saree under 2000");
        assert!(filtered.is_empty());

        let filtered = filter_products(&products, "saree under 3000");
        assert_eq!(names(&filtered), vec!["Red Saree"]);
    }

    #[test]
    fn test_ceiling_is_inclusive() {
        let products = sample();
        let filtered = filter_products(&products, "under 1200");
        assert_eq!(names(&filtered), vec!["Kurti"]);
    }

    #[test]
    fn test_digits_without_keyword_search_the_name() {
        let products = vec![
            product("Kurti 501", 1500, Category::SalwarKurti),
            product("Plain Kurti", 400, Category::SalwarKurti),
        ];
        let filtered = filter_products(&products, "501");
        assert_eq!(names(&filtered), vec!["Kurti 501"]);
    }

    // "under 0" disables the ceiling instead of filtering everything out.
    // Possibly unintended originally, but it is the contract; kept as-is.
    #[test]
    fn test_zero_ceiling_disables_the_price_filter() {
        let products = sample();
        let filtered = filter_products(&products, "under 0");
        assert_eq!(names(&filtered), vec!["Red Saree", "Kurti"]);
    }

    #[test]
    fn test_keyword_without_digits_is_a_name_search() {
        let products = vec![product("Under Skirt", 800, Category::SalwarKurti)];
        let filtered = filter_products(&products, "under ");
        assert_eq!(names(&filtered), vec!["Under Skirt"]);
    }

    #[test]
    fn test_optional_whitespace_between_keyword_and_digits() {
        let products = sample();
        assert_eq!(names(&filter_products(&products, "under2000")), vec!["Kurti"]);
        assert_eq!(
            names(&filter_products(&products, "under   2000")),
            vec!["Kurti"]
        );
    }

    #[test]
    fn test_parse_strips_only_the_first_constraint() {
        let query = ListingQuery::parse("silk under 500 below 900");
        assert_eq!(query.price_ceiling, Some(500));
        assert_eq!(query.name_query, "silk  below 900");
    }

    #[test]
    fn test_parse_produces_structured_query() {
        let query = ListingQuery::parse("Silk Saree UNDER 4000");
        assert_eq!(query.name_query, "silk saree");
        assert_eq!(query.price_ceiling, Some(4000));
    }

    #[test]
    fn test_category_prefilter_applies_before_query() {
        let products = vec![
            product("Mango Pickle", 250, Category::Pickle),
            product("Mango Nighty", 900, Category::Nighty),
        ];
        let filtered = filter_listing(&products, CategoryFilter::Only(Category::Pickle), "mango");
        assert_eq!(names(&filtered), vec!["Mango Pickle"]);

        let filtered = filter_listing(&products, CategoryFilter::All, "mango");
        assert_eq!(names(&filtered), vec!["Mango Pickle", "Mango Nighty"]);
    }

    #[test]
    fn test_order_is_preserved() {
        let products = vec![
            product("Saree A", 100, Category::Sarees),
            product("Saree B", 200, Category::Sarees),
            product("Saree C", 300, Category::Sarees),
        ];
        let filtered = filter_products(&products, "saree");
        assert_eq!(names(&filtered), vec!["Saree A", "Saree B", "Saree C"]);
    }
}

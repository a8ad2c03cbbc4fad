use serde::{Deserialize, Serialize};

/// A single product record parsed from a catalog response.
///
/// Only constructed from a fully-parsed item: the parser drops any item that
/// is missing a title or detail-page URL rather than emitting a partial
/// record. `rating` and `price` default to 0.0 when absent upstream; `price`
/// is in major currency units (the catalog reports minor units).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub affiliate_link: String,
    pub image_url: String,
    pub rating: f64,
    pub price: f64,
}

/// Outcome of the two-phase media publish protocol.
///
/// `staging_id` is present whenever the stage phase succeeded, even if the
/// publish phase then failed, so callers can distinguish "never staged" from
/// "staged but not published" for manual remediation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishResult {
    pub succeeded: bool,
    pub staging_id: Option<String>,
}

impl PublishResult {
    pub fn failed() -> Self {
        Self {
            succeeded: false,
            staging_id: None,
        }
    }
}

/// Sorts products by descending rating, ties broken by descending price.
///
/// Higher-value items are promoted first; the tie-break direction is a
/// business rule and must not change.
pub fn rank_products(products: &mut [Product]) {
    products.sort_by(|a, b| {
        b.rating
            .total_cmp(&a.rating)
            .then(b.price.total_cmp(&a.price))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(name: &str, rating: f64, price: f64) -> Product {
        Product {
            name: name.to_string(),
            affiliate_link: format!("https://example.com/{name}"),
            image_url: format!("https://example.com/{name}.jpg"),
            rating,
            price,
        }
    }

    #[test]
    fn ranking_prefers_rating_then_price() {
        let mut products = vec![
            product("a", 4.0, 10.0),
            product("b", 4.0, 5.0),
            product("c", 5.0, 1.0),
        ];
        rank_products(&mut products);

        let order: Vec<&str> = products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(order, vec!["c", "a", "b"]);
    }

    #[test]
    fn equal_ratings_tie_break_on_higher_price() {
        let mut products = vec![product("cheap", 3.0, 2.0), product("dear", 3.0, 9.0)];
        rank_products(&mut products);

        assert_eq!(products[0].name, "dear");
        assert_eq!(products[1].name, "cheap");
    }

    #[test]
    fn ranking_is_stable_for_identical_keys() {
        let mut products = vec![product("x", 0.0, 0.0), product("y", 0.0, 0.0)];
        rank_products(&mut products);

        assert_eq!(products[0].name, "x");
    }
}

//! Routes
//!
//! Mapping between browser paths and the page to render.

/// Page selected by the current URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Catalog, with the raw query string carrying the applied filters
    Catalog { query: String },
    Product { slug: String },
    Cart,
    Checkout,
    OrderPlaced { order_id: String },
    Login,
    Register,
    Verify { email: String },
    Account,
    Orders,
    Sell,
    NotFound,
}

impl Route {
    pub fn catalog() -> Self {
        Route::Catalog { query: String::new() }
    }

    /// Parse `pathname` and `search` (leading `?` optional)
    pub fn from_location(path: &str, search: &str) -> Self {
        let search = search.strip_prefix('?').unwrap_or(search);
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] | ["products"] => Route::Catalog {
                query: search.to_string(),
            },
            ["products", slug] => Route::Product {
                slug: (*slug).to_string(),
            },
            ["cart"] => Route::Cart,
            ["checkout"] => Route::Checkout,
            ["orders", id, "confirmation"] => Route::OrderPlaced {
                order_id: (*id).to_string(),
            },
            ["login"] => Route::Login,
            ["register"] => Route::Register,
            ["verify"] => Route::Verify {
                email: query_value(search, "email").unwrap_or_default(),
            },
            ["account"] => Route::Account,
            ["orders"] => Route::Orders,
            ["sell"] => Route::Sell,
            _ => Route::NotFound,
        }
    }

    /// Path plus query for `history.pushState`
    pub fn to_url(&self) -> String {
        match self {
            Route::Catalog { query } if query.is_empty() => "/".to_string(),
            Route::Catalog { query } => format!("/products?{}", query),
            Route::Product { slug } => format!("/products/{}", slug),
            Route::Cart => "/cart".to_string(),
            Route::Checkout => "/checkout".to_string(),
            Route::OrderPlaced { order_id } => format!("/orders/{}/confirmation", order_id),
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::Verify { email } => format!(
                "/verify?email={}",
                percent_encoding::utf8_percent_encode(email, percent_encoding::NON_ALPHANUMERIC)
            ),
            Route::Account => "/account".to_string(),
            Route::Orders => "/orders".to_string(),
            Route::Sell => "/sell".to_string(),
            Route::NotFound => "/not-found".to_string(),
        }
    }

    /// Pages that need a signed-in user
    pub fn requires_auth(&self) -> bool {
        matches!(
            self,
            Route::Checkout | Route::Account | Route::Orders | Route::Sell | Route::OrderPlaced { .. }
        )
    }
}

fn query_value(search: &str, key: &str) -> Option<String> {
    search.split('&').find_map(|pair| {
        let (k, v) = pair.split_once('=')?;
        (k == key).then(|| {
            percent_encoding::percent_decode_str(v)
                .decode_utf8_lossy()
                .into_owned()
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_paths() {
        assert_eq!(Route::from_location("/", ""), Route::catalog());
        assert_eq!(
            Route::from_location("/products", "?categoryIds=1%2C2&pageNumber=1"),
            Route::Catalog {
                query: "categoryIds=1%2C2&pageNumber=1".to_string()
            }
        );
        assert_eq!(
            Route::from_location("/products/wool-scarf", ""),
            Route::Product {
                slug: "wool-scarf".to_string()
            }
        );
        assert_eq!(Route::from_location("/cart/", ""), Route::Cart);
        assert_eq!(Route::from_location("/nope/deeper", ""), Route::NotFound);
    }

    #[test]
    fn test_urls_parse_back() {
        let routes = [
            Route::catalog(),
            Route::Catalog {
                query: "search=hat&pageNumber=2&pageSize=12".to_string(),
            },
            Route::Product {
                slug: "hat".to_string(),
            },
            Route::OrderPlaced {
                order_id: "ord-9".to_string(),
            },
            Route::Verify {
                email: "jane+shop@example.com".to_string(),
            },
            Route::Sell,
        ];
        for route in routes {
            let url = route.to_url();
            let (path, search) = url.split_once('?').unwrap_or((url.as_str(), ""));
            assert_eq!(Route::from_location(path, search), route, "{}", url);
        }
    }

    #[test]
    fn test_requires_auth() {
        assert!(Route::Checkout.requires_auth());
        assert!(Route::Sell.requires_auth());
        assert!(!Route::Cart.requires_auth());
        assert!(!Route::catalog().requires_auth());
    }
}

//! Storefront Models
//!
//! Data structures matching backend entities. Field names follow the
//! backend's camelCase JSON.

use serde::{Deserialize, Serialize};

/// Product identifier (opaque, assigned by the backend)
pub type ProductId = String;

/// Cart item identifier (opaque, assigned by the backend)
pub type CartItemId = String;

/// Category taxonomy node.
///
/// `checked`, `expanded` and `is_active` are client-side view flags; the
/// backend only sends the taxonomy fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: u32,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub parent_id: Option<u32>,
    #[serde(default)]
    pub sub_categories: Vec<Category>,
    #[serde(default)]
    pub checked: bool,
    #[serde(default)]
    pub expanded: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Category {
    pub fn is_top_level(&self) -> bool {
        self.parent_id.is_none()
    }
}

fn default_true() -> bool {
    true
}

/// Short category reference embedded in products
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub id: u32,
    pub name: String,
    pub slug: String,
}

/// Product data structure (matches backend)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    /// Price in cents
    pub price: i64,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub category: Option<CategorySummary>,
    #[serde(default)]
    pub seller_id: Option<u32>,
    #[serde(default)]
    pub average_rating: Option<f32>,
    #[serde(default)]
    pub review_count: u32,
}

impl Product {
    pub fn thumbnail(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// One line of the cart mirror
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: CartItemId,
    pub quantity: u32,
    pub product: Product,
    #[serde(default)]
    pub seen: bool,
}

/// Client-held copy of the server's cart resource.
///
/// Totals are mirrored from the server payload and never recomputed here.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    #[serde(default)]
    pub items: Vec<CartItem>,
    #[serde(default)]
    pub total_items: u32,
    #[serde(default)]
    pub total_items_fetched: u32,
    /// Total price in cents
    #[serde(default)]
    pub total_price: i64,
    #[serde(default)]
    pub not_seen_count: u32,
}

impl Cart {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn item(&self, id: &str) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn item_for_product(&self, product_id: &str) -> Option<&CartItem> {
        self.items.iter().find(|item| item.product.id == product_id)
    }

    pub fn contains_product(&self, product_id: &str) -> bool {
        self.item_for_product(product_id).is_some()
    }
}

/// Product review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: u32,
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
    pub author_name: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    #[default]
    Customer,
    Seller,
}

/// Postal address used for profiles and shipping
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default)]
    pub line1: String,
    #[serde(default)]
    pub line2: Option<String>,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub country: String,
}

/// Signed-in account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u32,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub role: UserRole,
}

impl User {
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.email.clone()
        } else {
            full.to_string()
        }
    }

    pub fn is_seller(&self) -> bool {
        self.role == UserRole::Seller
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
    /// Unit price in cents
    pub unit_price: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    #[serde(default)]
    pub items: Vec<OrderLine>,
    pub total_price: i64,
    pub status: String,
    pub created_at: String,
    #[serde(default)]
    pub shipping_address: Option<Address>,
}

/// One page of a paginated listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page_number: u32,
    pub page_size: u32,
    pub total_items: u32,
    pub total_pages: u32,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            page_number: 1,
            page_size: 0,
            total_items: 0,
            total_pages: 0,
        }
    }
}

/// Format a price in cents as a display string, e.g. `12.50`
pub fn format_price(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

/// Parse a user-entered amount such as `12`, `12.5` or `12.50` into cents.
/// Negative amounts and more than two decimals are rejected.
pub fn parse_price(input: &str) -> Option<i64> {
    let input = input.trim();
    let (whole, fraction) = input.split_once('.').unwrap_or((input, ""));
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    if fraction.len() > 2 {
        return None;
    }
    let whole: i64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let fraction: i64 = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<i64>().ok()? * 10,
        _ => fraction.parse().ok()?,
    };
    whole.checked_mul(100)?.checked_add(fraction)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_defaults_from_backend_json() {
        let json = r#"{"id":1,"name":"Shoes","slug":"shoes","parentId":null,
            "subCategories":[{"id":2,"name":"Boots","slug":"boots","parentId":1}]}"#;
        let cat: Category = serde_json::from_str(json).unwrap();
        assert!(cat.is_top_level());
        assert!(!cat.checked);
        assert!(cat.is_active);
        assert_eq!(cat.sub_categories.len(), 1);
        assert_eq!(cat.sub_categories[0].parent_id, Some(1));
        assert!(cat.sub_categories[0].is_active);
    }

    #[test]
    fn test_cart_mirrors_server_totals() {
        let json = r#"{"items":[],"totalItems":7,"totalItemsFetched":0,"totalPrice":1500,"notSeenCount":2}"#;
        let cart: Cart = serde_json::from_str(json).unwrap();
        assert_eq!(cart.total_items, 7);
        assert_eq!(cart.total_price, 1500);
        assert_eq!(cart.not_seen_count, 2);
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(0), "0.00");
        assert_eq!(format_price(1250), "12.50");
        assert_eq!(format_price(5), "0.05");
        assert_eq!(format_price(-199), "-1.99");
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("12"), Some(1200));
        assert_eq!(parse_price("12.5"), Some(1250));
        assert_eq!(parse_price(" 0.05 "), Some(5));
        assert_eq!(parse_price(".99"), Some(99));
        assert_eq!(parse_price("1.999"), None);
        assert_eq!(parse_price("-3"), None);
        assert_eq!(parse_price("abc"), None);
        assert_eq!(parse_price(""), None);
        assert_eq!(parse_price("."), None);
    }

    #[test]
    fn test_display_name_falls_back_to_email() {
        let user = User {
            id: 1,
            email: "a@b.c".to_string(),
            first_name: String::new(),
            last_name: String::new(),
            phone: None,
            address: None,
            verified: true,
            role: UserRole::Customer,
        };
        assert_eq!(user.display_name(), "a@b.c");
    }
}

//! UI Components
//!
//! Pages and the reusable pieces they are built from.

mod account_page;
mod auth_forms;
mod cart_page;
mod catalog_page;
mod category_filter;
mod checkout_page;
mod delete_confirm_button;
mod field_error;
mod header;
mod listing_wizard;
mod not_found;
mod pagination;
mod product_grid;
mod product_page;
mod toast;

pub use account_page::{AccountPage, OrdersPage};
pub use auth_forms::{LoginPage, RegisterPage, VerifyPage};
pub use cart_page::CartPage;
pub use catalog_page::CatalogPage;
pub use category_filter::CategoryFilter;
pub use checkout_page::{AddressFields, CheckoutPage, OrderPlacedPage};
pub use delete_confirm_button::DeleteConfirmButton;
pub use field_error::{ErrorBanner, FieldError};
pub use header::Header;
pub use listing_wizard::ListingWizardPage;
pub use not_found::NotFoundPage;
pub use pagination::Pager;
pub use product_grid::{AddToCartButton, ProductGrid};
pub use product_page::ProductPage;
pub use toast::ToastHost;

pub mod cart;
pub mod menu;
pub mod order;
pub mod route;

pub use cart::{Cart, CartLine};
pub use menu::{MenuCategory, MenuData, MenuError, MenuItem, format_price};
pub use order::{CheckoutError, CheckoutSummary, OrderState, PaymentMethod};
pub use route::{Page, RouteError, TableRoute};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::cart::{self, Cart, CartLine};
use super::menu::MenuData;
use super::route::TableRoute;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckoutError {
    #[error("cannot check out an empty cart")]
    EmptyCart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Card,
    Cash,
    Account,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 3] = [Self::Card, Self::Account, Self::Cash];

    pub fn label(self) -> &'static str {
        match self {
            Self::Card => "신용카드",
            Self::Cash => "현금",
            Self::Account => "계좌이체",
        }
    }
}

/// Everything the checkout page shows before payment is handed off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSummary {
    pub table: TableRoute,
    pub lines: Vec<CartLine>,
    pub item_count: u64,
    /// Table-side orders never carry a delivery fee; kept for display parity
    /// with the cart page.
    pub delivery_fee: u64,
    pub total: u64,
    pub payment_method: PaymentMethod,
}

/// Session state for one table: what is on the menu and what has been picked.
///
/// Updates consume `&self` and return the next state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderState {
    pub table: TableRoute,
    pub menu: MenuData,
    pub cart: Cart,
    pub payment_method: PaymentMethod,
}

impl OrderState {
    pub fn new(table: TableRoute, menu: MenuData) -> Self {
        Self {
            table,
            menu,
            cart: Cart::new(),
            payment_method: PaymentMethod::default(),
        }
    }

    fn with_cart(&self, cart: Cart) -> Self {
        Self {
            cart,
            ..self.clone()
        }
    }

    pub fn set_quantity(&self, item_id: &str, quantity: u32) -> Self {
        self.with_cart(cart::set_quantity(&self.cart, item_id, quantity))
    }

    pub fn increment(&self, item_id: &str) -> Self {
        self.with_cart(cart::increment(&self.cart, item_id))
    }

    pub fn decrement(&self, item_id: &str) -> Self {
        self.with_cart(cart::decrement(&self.cart, item_id))
    }

    pub fn clear_cart(&self) -> Self {
        self.with_cart(cart::clear(&self.cart))
    }

    pub fn with_payment_method(&self, payment_method: PaymentMethod) -> Self {
        Self {
            payment_method,
            ..self.clone()
        }
    }

    pub fn total_amount(&self) -> u64 {
        self.cart.total_amount(&self.menu)
    }

    pub fn total_item_count(&self) -> u64 {
        self.cart.total_item_count()
    }

    /// Summarise the cart for the checkout page.
    pub fn checkout(&self) -> Result<CheckoutSummary, CheckoutError> {
        let lines = self.cart.lines(&self.menu);
        if lines.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        let item_count = lines
            .iter()
            .fold(0u64, |acc, l| acc.saturating_add(u64::from(l.quantity)));
        let delivery_fee: u64 = 0;
        let total = lines
            .iter()
            .fold(delivery_fee, |acc, l| acc.saturating_add(l.subtotal));
        Ok(CheckoutSummary {
            table: self.table.clone(),
            lines,
            item_count,
            delivery_fee,
            total,
            payment_method: self.payment_method,
        })
    }
}

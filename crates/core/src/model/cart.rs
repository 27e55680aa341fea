use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::menu::MenuData;

/// Item quantities chosen at a table.
///
/// Entries with quantity zero are never stored. The update functions below
/// take the current cart by reference and return the next one, so the page
/// owns exactly one value and every transition is observable in tests.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cart {
    quantities: BTreeMap<String, u32>,
}

/// One cart row as shown on the cart and checkout pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub item_id: String,
    pub name: String,
    pub unit_price: u64,
    pub quantity: u32,
    pub subtotal: u64,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from `(item id, quantity)` pairs; zero quantities are dropped.
    pub fn from_quantities<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        let quantities = entries
            .into_iter()
            .filter(|(_, qty)| *qty > 0)
            .map(|(id, qty)| (id.into(), qty))
            .collect();
        Self { quantities }
    }

    pub fn quantity(&self, item_id: &str) -> u32 {
        self.quantities.get(item_id).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.quantities.is_empty()
    }

    /// Sum of all quantities, including ids the menu no longer lists.
    pub fn total_item_count(&self) -> u64 {
        self.quantities
            .values()
            .fold(0u64, |acc, &q| acc.saturating_add(u64::from(q)))
    }

    /// Σ price × quantity over the menu's items. Ids not on the menu carry
    /// no price and are ignored. Saturates at `u64::MAX`.
    pub fn total_amount(&self, menu: &MenuData) -> u64 {
        menu.items()
            .map(|item| subtotal(item.price, self.quantity(&item.id)))
            .fold(0, u64::saturating_add)
    }

    /// Cart rows in menu order, skipping ids the menu does not know.
    pub fn lines(&self, menu: &MenuData) -> Vec<CartLine> {
        menu.items()
            .filter_map(|item| {
                let quantity = self.quantity(&item.id);
                (quantity > 0).then(|| CartLine {
                    item_id: item.id.clone(),
                    name: item.name.clone(),
                    unit_price: item.price,
                    quantity,
                    subtotal: subtotal(item.price, quantity),
                })
            })
            .collect()
    }
}

fn subtotal(price: u64, quantity: u32) -> u64 {
    price.saturating_mul(u64::from(quantity))
}

/// Set an item's quantity. Zero removes the entry.
pub fn set_quantity(cart: &Cart, item_id: &str, quantity: u32) -> Cart {
    let mut next = cart.clone();
    if quantity == 0 {
        next.quantities.remove(item_id);
    } else {
        next.quantities.insert(item_id.to_owned(), quantity);
    }
    next
}

pub fn increment(cart: &Cart, item_id: &str) -> Cart {
    set_quantity(cart, item_id, cart.quantity(item_id).saturating_add(1))
}

/// Decrease by one; already-zero items stay absent.
pub fn decrement(cart: &Cart, item_id: &str) -> Cart {
    set_quantity(cart, item_id, cart.quantity(item_id).saturating_sub(1))
}

pub fn clear(_cart: &Cart) -> Cart {
    Cart::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn menu() -> MenuData {
        MenuData::bundled().unwrap()
    }

    #[test]
    fn updates_return_new_state() {
        let empty = Cart::new();
        let one = increment(&empty, "chamisul");
        assert!(empty.is_empty());
        assert_eq!(one.quantity("chamisul"), 1);

        let three = set_quantity(&one, "chamisul", 3);
        assert_eq!(one.quantity("chamisul"), 1);
        assert_eq!(three.quantity("chamisul"), 3);
    }

    #[test]
    fn zero_removes_entry() {
        let cart = Cart::from_quantities([("cass-draft", 1)]);
        let cart = decrement(&cart, "cass-draft");
        assert!(cart.is_empty());

        // Decrementing an absent item is a no-op.
        let cart = decrement(&cart, "cass-draft");
        assert!(cart.is_empty());
    }

    #[test]
    fn from_quantities_drops_zeroes() {
        let cart = Cart::from_quantities([("a", 0), ("b", 2)]);
        assert_eq!(cart.quantity("a"), 0);
        assert_eq!(cart.total_item_count(), 2);
    }

    #[test]
    fn totals_follow_menu_prices() {
        let cart = Cart::from_quantities([("cass-draft", 1), ("chamisul", 2)]);
        assert_eq!(cart.total_item_count(), 3);
        assert_eq!(cart.total_amount(&menu()), 5000 + 2 * 4000);
    }

    #[test]
    fn unknown_items_count_but_cost_nothing() {
        let cart = Cart::from_quantities([("ghost", 4), ("jinro", 1)]);
        assert_eq!(cart.total_item_count(), 5);
        assert_eq!(cart.total_amount(&menu()), 4000);
        assert_eq!(cart.lines(&menu()).len(), 1);
    }

    #[test]
    fn lines_follow_menu_order() {
        let cart = Cart::from_quantities([("chicken", 1), ("cass-draft", 2)]);
        let lines = cart.lines(&menu());
        let ids: Vec<_> = lines.iter().map(|l| l.item_id.as_str()).collect();
        assert_eq!(ids, ["cass-draft", "chicken"]);
        assert_eq!(lines[0].subtotal, 10_000);
        assert_eq!(lines[1].name, "치킨");
    }

    #[test]
    fn huge_prices_saturate() {
        let json = br#"{"categories":[{"id":"vault","name":"Vault","emoji":"","items":[
            {"id":"gold","name":"Gold","description":"","price":18446744073709551615,
             "icon":"","category":"vault"},
            {"id":"silver","name":"Silver","description":"","price":1000,
             "icon":"","category":"vault"}
        ]}]}"#;
        let menu = MenuData::from_json(json).unwrap();
        let cart = Cart::from_quantities([("gold", 2), ("silver", 1)]);

        assert_eq!(cart.total_amount(&menu), u64::MAX);
        let lines = cart.lines(&menu);
        assert_eq!(lines[0].subtotal, u64::MAX);
        assert_eq!(lines[1].subtotal, 1000);
    }

    #[test]
    fn clear_empties() {
        let cart = Cart::from_quantities([("a", 1), ("b", 2)]);
        assert!(clear(&cart).is_empty());
    }
}

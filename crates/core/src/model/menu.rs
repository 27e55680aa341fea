use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_MENU: &str = include_str!("../../assets/default_menu.json");

#[derive(Debug, Error)]
pub enum MenuError {
    #[error("invalid menu JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("duplicate category id: {0}")]
    DuplicateCategory(String),
    #[error("duplicate item id: {0}")]
    DuplicateItem(String),
}

/// A single orderable menu entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Unit price in won.
    pub price: u64,
    #[serde(default)]
    pub icon: String,
    /// Id of the category this item is listed under.
    pub category: String,
    #[serde(default = "default_available")]
    pub available: bool,
}

fn default_available() -> bool {
    true
}

/// A named group of items rendered as one contiguous vertical section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuCategory {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub emoji: String,
    pub items: Vec<MenuItem>,
}

impl MenuCategory {
    /// Heading text as shown above the section, e.g. "🍺 맥주".
    pub fn title(&self) -> String {
        if self.emoji.is_empty() {
            self.name.clone()
        } else {
            format!("{} {}", self.emoji, self.name)
        }
    }
}

/// A store's menu: categories in display order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MenuData {
    pub categories: Vec<MenuCategory>,
}

impl MenuData {
    /// Parse a menu from JSON and check that category and item ids are
    /// unique. Item ids must be unique across the whole menu since cart
    /// quantities are keyed by item id alone.
    pub fn from_json(data: &[u8]) -> Result<Self, MenuError> {
        let menu: MenuData = serde_json::from_slice(data)?;
        menu.validate()?;
        Ok(menu)
    }

    /// The menu bundled with the crate (the demo pub's drinks and food).
    pub fn bundled() -> Result<Self, MenuError> {
        Self::from_json(DEFAULT_MENU.as_bytes())
    }

    fn validate(&self) -> Result<(), MenuError> {
        let mut categories = HashSet::new();
        let mut items = HashSet::new();
        for category in &self.categories {
            if !categories.insert(category.id.as_str()) {
                return Err(MenuError::DuplicateCategory(category.id.clone()));
            }
            for item in &category.items {
                if !items.insert(item.id.as_str()) {
                    return Err(MenuError::DuplicateItem(item.id.clone()));
                }
            }
        }
        Ok(())
    }

    pub fn category(&self, id: &str) -> Option<&MenuCategory> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Look up an item by id across all categories.
    pub fn item(&self, id: &str) -> Option<&MenuItem> {
        self.items().find(|item| item.id == id)
    }

    /// All items in display order.
    pub fn items(&self) -> impl Iterator<Item = &MenuItem> {
        self.categories.iter().flat_map(|c| c.items.iter())
    }

    pub fn category_ids(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.id.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// Format a won amount with thousands separators, e.g. `12,500원`.
pub fn format_price(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out.push('원');
    out
}

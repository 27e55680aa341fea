use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("path must look like /{{store}}/table/{{table}}: {0}")]
    Malformed(String),
    #[error("empty {0} id")]
    EmptySegment(&'static str),
    #[error("unknown page: {0}")]
    UnknownPage(String),
}

/// The store and table a QR code points at.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableRoute {
    pub store_id: String,
    pub table_id: String,
}

/// Which page of the ordering flow a path selects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Page {
    Menu,
    MenuItem(String),
    Cart,
    Checkout,
}

impl TableRoute {
    pub fn new(store_id: impl Into<String>, table_id: impl Into<String>) -> Self {
        Self {
            store_id: store_id.into(),
            table_id: table_id.into(),
        }
    }

    /// Parse `/{store}/table/{table}` with an optional trailing
    /// `/cart`, `/checkout` or `/menu/{item}`. A trailing slash is accepted.
    pub fn parse(path: &str) -> Result<(Self, Page), RouteError> {
        let trimmed = path.trim_end_matches('/');
        let Some(rest) = trimmed.strip_prefix('/') else {
            return Err(RouteError::Malformed(path.to_owned()));
        };
        let segments: Vec<&str> = rest.split('/').collect();

        let (store, table, tail) = match segments.as_slice() {
            [store, "table", table, tail @ ..] => (*store, *table, tail),
            _ => return Err(RouteError::Malformed(path.to_owned())),
        };
        if store.is_empty() {
            return Err(RouteError::EmptySegment("store"));
        }
        if table.is_empty() {
            return Err(RouteError::EmptySegment("table"));
        }

        let page = match tail {
            [] => Page::Menu,
            ["cart"] => Page::Cart,
            ["checkout"] => Page::Checkout,
            ["menu", item] if !item.is_empty() => Page::MenuItem((*item).to_owned()),
            _ => return Err(RouteError::UnknownPage(tail.join("/"))),
        };

        Ok((Self::new(store, table), page))
    }

    /// Path of `page` for this table, the inverse of [`TableRoute::parse`].
    pub fn path(&self, page: &Page) -> String {
        let base = format!("/{}/table/{}", self.store_id, self.table_id);
        match page {
            Page::Menu => base,
            Page::MenuItem(item) => format!("{base}/menu/{item}"),
            Page::Cart => format!("{base}/cart"),
            Page::Checkout => format!("{base}/checkout"),
        }
    }
}

use serde::{Deserialize, Serialize};

/// Semantic color tokens resolved by the renderer's active theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemeToken {
    Background,
    Surface,
    Border,

    TextPrimary,
    TextSecondary,
    TextMuted,

    // Category tabs
    TabBar,
    TabActive,
    TabInactive,

    // Menu sections
    CategoryHeader,
    ItemRow,
    ItemPrice,
    QuantityBadge,
    SoldOut,

    // Cart summary bar
    CartBar,
    CartBarText,
    CartButton,
}

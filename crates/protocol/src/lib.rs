pub mod commands;
pub mod scroll;
pub mod theme;
pub mod types;

pub use commands::{HitTarget, RenderCommand, TextAlign};
pub use scroll::{ScrollBehavior, ScrollRequest};
pub use theme::ThemeToken;
pub use types::{Point, Rect, Viewport};

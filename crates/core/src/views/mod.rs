pub mod cart_summary;
pub mod menu_page;
pub mod tabs;

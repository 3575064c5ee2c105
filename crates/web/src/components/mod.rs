//! Shared view pieces.

pub mod admin_sidebar;
pub mod cart;
pub mod dish_card;
pub mod header;
pub mod toasts;

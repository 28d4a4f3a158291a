//! Reusable rendering helpers shared by the screens and the app shell.

pub mod banners;
pub mod popup;
pub mod status_badge;

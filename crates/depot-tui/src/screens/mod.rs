//! Screen implementations. Each screen is a top-level Component.

pub mod files;
pub mod network;

use crate::component::Component;
use crate::screen::ScreenId;

/// Create screen components for the tab bar.
pub fn create_screens() -> Vec<(ScreenId, Box<dyn Component>)> {
    vec![
        (ScreenId::Files, Box::new(files::FilesScreen::new())),
        (ScreenId::Network, Box::new(network::NetworkScreen::new())),
    ]
}

//! Screen rendering.

mod panel;

pub use panel::PanelScreen;

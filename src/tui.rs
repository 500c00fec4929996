//! Terminal rendering of the panel.

mod app;
mod screens;

pub use app::run;

//! Interactive two-pane interface.

pub mod app;
pub mod editor;
pub mod keymap;
pub mod render;

pub use app::run;

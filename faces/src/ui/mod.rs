//! UI module for the FacesOfAI TUI

pub mod render;
pub mod theme;
pub mod widgets;

pub use render::Overlay;

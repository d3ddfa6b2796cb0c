//! TUI widgets for the persona studio

pub mod input;
pub mod roster;
pub mod transcript;

pub use input::InputWidget;
pub use roster::RosterWidget;
pub use transcript::TranscriptWidget;

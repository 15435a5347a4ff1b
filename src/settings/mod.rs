//! JSON settings editors for VS Code and Windows Terminal.
pub mod json_file;
pub mod keybindings;
pub mod terminal;
pub mod vscode;

pub use json_file::{EditOutcome, WhenMissing, edit};

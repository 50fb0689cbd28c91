//! Key bindings

mod keybindings;

pub use keybindings::{KeyBinding, KeyBindings, KeyContext};

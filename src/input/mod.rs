//! Host event handling

pub mod controller;

pub use controller::{InputController, MenuCommand, MenuState};

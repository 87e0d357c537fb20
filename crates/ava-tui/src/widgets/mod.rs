//! UI widgets for the chat window.
//!
//! This module provides:
//! - [`ChatBox`] - Scrollable message history with bubbles per sender
//! - [`InputBar`] - Bottom input bar for composing messages
//! - [`Header`] - Greeting banner at the top of the window
//! - [`Footer`] - Context display, key hints, and notification banner
//! - [`Menu`] - Centered overlay menu (message actions, context picker)

mod chat_box;
mod footer;
mod header;
mod input_bar;
mod menu;
mod text_input;

pub use chat_box::ChatBox;
pub use footer::{Footer, KeyHint};
pub use header::Header;
pub use input_bar::InputBar;
pub use menu::Menu;
pub use text_input::TextInputState;

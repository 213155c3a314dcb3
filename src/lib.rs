//! g2c: Game to Console.
//!
//! Helpers for console games (clearing, boxed text, validated prompts,
//! a checkpointing state store) and a two-stage seq2seq wrapper.

pub mod console;
pub mod demo;
pub mod error;
pub mod game;
pub mod input;
pub mod seq2seq;
pub mod state;

pub use console::{clear_screen, print_box, print_header};
pub use error::Error;
pub use input::{Prompter, get_yes_no};
pub use state::GameState;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

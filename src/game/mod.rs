//! Number guessing games built on the console framework.
//!
//! Organized along FP/Unix boundaries:
//! - `state`: pure data types (Screen, Action, Transition, Round)
//! - `update`: pure transitions
//! - `view`: pure text rendering
//! - `run`: effects (prompts, clearing, store bookkeeping)
//! - `classic`: `ConsoleGame` and the single-round game without a menu

pub mod classic;
pub mod run;
pub mod state;
pub mod theme;
pub mod update;
pub mod view;

pub use classic::{ClassicGame, ConsoleGame};
pub use run::Game;
pub use state::Difficulty;

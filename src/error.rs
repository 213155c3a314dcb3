//! Crate-level error, wrapping each module's error type.

use std::io;

use thiserror::Error;

use crate::input::InputError;
use crate::seq2seq::ModelError;
use crate::state::StateError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    State(#[from] StateError),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

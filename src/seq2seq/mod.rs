//! Two-stage sequence-to-sequence wrapper.
//!
//! A base model produces a first answer; an optional correction model
//! reads the original input, a separator and that answer, and produces
//! the final output. Tokenization, forward passes and decoding belong to
//! whatever backend implements [`Tokenizer`] and [`Seq2SeqModel`]; this
//! module only orchestrates.
//!
//! Structure:
//! - `mod.rs`: backend traits, batch/config types, errors
//! - `model`: [`TwoStageModel`] (forward, weighted loss, two-stage generate)
//! - `loss`: masked, sample-weighted cross entropy
//! - `freeze`: layer-freezing plan and its application

pub mod freeze;
pub mod loss;
pub mod model;

#[cfg(test)]
pub(crate) mod testing;

use ndarray::{Array2, Array3, ArrayView2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use freeze::{FreezeConfig, FreezePlan, LayerFreeze, freeze_model_parameters};
pub use loss::{IGNORE_INDEX, sample_losses, weighted_cross_entropy};
pub use model::TwoStageModel;

/// Separator between the original text and the first-stage output.
pub const SENTSEP: &str = "[SENTSEP]";

/// Logits shaped `[batch, position, vocab]`.
pub type Logits = Array3<f32>;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("tokenizer error: {0}")]
    Tokenizer(String),
    /// Failure reported by a [`Seq2SeqModel`] implementation.
    #[error("model backend error: {0}")]
    Backend(String),
    #[error("shape mismatch in {what}: expected {expected}, got {actual}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("label {label} outside vocabulary of {vocab}")]
    LabelOutOfRange { label: i64, vocab: usize },
    #[error("batch has no labels")]
    MissingLabels,
    #[error("empty batch")]
    EmptyBatch,
}

// ============================================================================
// BACKEND TRAITS
// ============================================================================

/// Text ↔ token id conversion supplied by the backend.
pub trait Tokenizer {
    /// Whether `token` is already in the vocabulary.
    fn contains_token(&self, token: &str) -> bool;

    /// Register special tokens. Returns how many were new.
    fn add_special_tokens(&mut self, tokens: &[&str]) -> usize;

    /// Vocabulary size including added tokens.
    fn vocab_size(&self) -> usize;

    fn encode(&self, text: &str) -> Result<Vec<u32>, ModelError>;

    fn decode(&self, ids: &[u32], skip_special_tokens: bool) -> Result<String, ModelError>;

    /// Id used to pad rows to a common length.
    fn pad_id(&self) -> u32;
}

/// An encoder-decoder model supplied by the backend.
pub trait Seq2SeqModel {
    /// Logits for every label position of every sample.
    fn forward(&self, batch: &Batch) -> Result<Logits, ModelError>;

    /// Output ids for each input row, `[batch, generated]`. Rows shorter
    /// than the longest are filled with the tokenizer's pad id.
    fn generate(
        &self,
        input_ids: ArrayView2<u32>,
        attention_mask: Option<ArrayView2<u8>>,
        options: &GenerateOptions,
    ) -> Result<Array2<u32>, ModelError>;

    /// Grow (or shrink) the embedding table to `vocab_size` rows.
    fn resize_token_embeddings(&mut self, vocab_size: usize);
}

// ============================================================================
// BATCH AND CONFIG
// ============================================================================

/// One forward-pass batch, each field shaped `[batch, position]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Batch {
    pub input_ids: Array2<u32>,
    pub attention_mask: Option<Array2<u8>>,
    pub decoder_input_ids: Option<Array2<u32>>,
    pub decoder_attention_mask: Option<Array2<u8>>,
    /// Target ids; [`IGNORE_INDEX`] marks positions excluded from loss.
    pub labels: Option<Array2<i64>>,
}

/// Decoding parameters passed through to both stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateOptions {
    pub max_length: usize,
    pub num_beams: usize,
    pub early_stopping: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            max_length: 128,
            num_beams: 1,
            early_stopping: false,
        }
    }
}

/// Hyperparameters carried alongside the models.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Text inserted between the original input and the separator.
    pub correction_prompt: Option<String>,
    pub generate: GenerateOptions,
    pub freeze: FreezeConfig,
}

impl ModelConfig {
    /// Parse a JSON hyperparameter document. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

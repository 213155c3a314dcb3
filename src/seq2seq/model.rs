//! Base model + optional correction model behind one interface.

use ndarray::{Array2, ArrayView1, ArrayView2};

use super::loss::weighted_cross_entropy;
use super::{
    Batch, GenerateOptions, Logits, ModelConfig, ModelError, SENTSEP, Seq2SeqModel, Tokenizer,
};

/// Two-stage encoder-decoder: predict, then correct.
pub struct TwoStageModel<M, T> {
    config: ModelConfig,
    model: M,
    tokenizer: T,
    correction_model: Option<M>,
}

impl<M: Seq2SeqModel, T: Tokenizer> TwoStageModel<M, T> {
    /// Wrap the models, registering [`SENTSEP`] with the tokenizer if it
    /// is missing and resizing both embedding tables to match.
    pub fn new(
        config: ModelConfig,
        mut model: M,
        mut tokenizer: T,
        mut correction_model: Option<M>,
    ) -> Self {
        if !tokenizer.contains_token(SENTSEP) {
            tokenizer.add_special_tokens(&[SENTSEP]);
            let vocab_size = tokenizer.vocab_size();
            model.resize_token_embeddings(vocab_size);
            if let Some(correction) = correction_model.as_mut() {
                correction.resize_token_embeddings(vocab_size);
            }
            tracing::debug!(vocab_size, "registered separator token");
        }

        TwoStageModel {
            config,
            model,
            tokenizer,
            correction_model,
        }
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn tokenizer(&self) -> &T {
        &self.tokenizer
    }

    pub fn base_model(&self) -> &M {
        &self.model
    }

    pub fn base_model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    pub fn correction_model(&self) -> Option<&M> {
        self.correction_model.as_ref()
    }

    pub fn correction_model_mut(&mut self) -> Option<&mut M> {
        self.correction_model.as_mut()
    }

    /// The correction model when asked for and present, else the base model.
    fn select(&self, correction_mode: bool) -> &M {
        match (&self.correction_model, correction_mode) {
            (Some(correction), true) => correction,
            _ => &self.model,
        }
    }

    /// Forward pass through the selected model.
    pub fn forward(&self, batch: &Batch, correction_mode: bool) -> Result<Logits, ModelError> {
        self.select(correction_mode).forward(batch)
    }

    /// Masked cross entropy with one weight per sample.
    pub fn compute_weighted_loss(
        &self,
        batch: &Batch,
        sample_weights: ArrayView1<f32>,
        correction_mode: bool,
    ) -> Result<f32, ModelError> {
        let labels = batch.labels.as_ref().ok_or(ModelError::MissingLabels)?;
        let logits = self.forward(batch, correction_mode)?;
        weighted_cross_entropy(logits.view(), labels.view(), sample_weights)
    }

    /// Generate with the base model, then re-generate with the correction
    /// model from `"{original} {prompt} [SENTSEP] {first answer}"`.
    ///
    /// Without a correction model the first-stage output is returned.
    /// When `original_texts` is None the inputs are decoded to recover
    /// them. Correction inputs are padded or truncated to the width of
    /// `input_ids`.
    pub fn generate_with_correction(
        &self,
        input_ids: ArrayView2<u32>,
        attention_mask: Option<ArrayView2<u8>>,
        original_texts: Option<&[String]>,
        options: &GenerateOptions,
    ) -> Result<Array2<u32>, ModelError> {
        let initial = self.model.generate(input_ids, attention_mask, options)?;
        tracing::debug!(rows = initial.nrows(), "first stage generated");

        let Some(correction_model) = &self.correction_model else {
            return Ok(initial);
        };

        let decoded = self.decode_rows(initial.view())?;
        let originals = match original_texts {
            Some(texts) => texts.to_vec(),
            None => self.decode_rows(input_ids)?,
        };
        if originals.len() != decoded.len() {
            return Err(ModelError::ShapeMismatch {
                what: "original texts",
                expected: decoded.len(),
                actual: originals.len(),
            });
        }

        let mut encoded = Vec::with_capacity(decoded.len());
        for (original, first) in originals.iter().zip(&decoded) {
            let text = correction_input(original, self.config.correction_prompt.as_deref(), first);
            encoded.push(self.tokenizer.encode(&text)?);
        }
        let (ids, mask) = pad_batch(&encoded, input_ids.ncols(), self.tokenizer.pad_id());

        let corrected = correction_model.generate(ids.view(), Some(mask.view()), options)?;
        tracing::debug!(rows = corrected.nrows(), "correction stage generated");
        Ok(corrected)
    }

    fn decode_rows(&self, rows: ArrayView2<u32>) -> Result<Vec<String>, ModelError> {
        rows.outer_iter()
            .map(|row| self.tokenizer.decode(&row.to_vec(), true))
            .collect()
    }
}

/// Text fed to the correction model.
pub fn correction_input(original: &str, prompt: Option<&str>, first_answer: &str) -> String {
    match prompt.filter(|p| !p.is_empty()) {
        Some(prompt) => format!("{} {} {} {}", original, prompt, SENTSEP, first_answer),
        None => format!("{} {} {}", original, SENTSEP, first_answer),
    }
}

/// Stack token rows into a `[rows, width]` batch, truncating or filling
/// with `pad_id`. The mask is 1 for real tokens and 0 for padding.
pub fn pad_batch(rows: &[Vec<u32>], width: usize, pad_id: u32) -> (Array2<u32>, Array2<u8>) {
    let mut ids = Array2::from_elem((rows.len(), width), pad_id);
    let mut mask = Array2::zeros((rows.len(), width));
    for (i, row) in rows.iter().enumerate() {
        for (j, &id) in row.iter().take(width).enumerate() {
            ids[[i, j]] = id;
            mask[[i, j]] = 1;
        }
    }
    (ids, mask)
}

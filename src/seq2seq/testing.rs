//! In-memory backend doubles for the seq2seq tests.

use std::cell::RefCell;
use std::collections::HashSet;

use ndarray::{Array2, Array3, ArrayView2, Axis};

use super::model::pad_batch;
use super::{Batch, GenerateOptions, LayerFreeze, Logits, ModelError, Seq2SeqModel, Tokenizer};

pub const PAD: &str = "<pad>";
pub const UNK: &str = "<unk>";

/// Whitespace tokenizer over a fixed word list. Id 0 is padding.
pub struct MockTokenizer {
    vocab: Vec<String>,
    special: HashSet<String>,
}

impl MockTokenizer {
    pub fn new(words: &[&str]) -> Self {
        let mut vocab = vec![PAD.to_string(), UNK.to_string()];
        vocab.extend(words.iter().map(|w| w.to_string()));
        let special = [PAD, UNK].iter().map(|s| s.to_string()).collect();
        MockTokenizer { vocab, special }
    }

    pub fn id_of(&self, token: &str) -> u32 {
        self.vocab.iter().position(|t| t == token).unwrap_or(1) as u32
    }
}

impl Tokenizer for MockTokenizer {
    fn contains_token(&self, token: &str) -> bool {
        self.vocab.iter().any(|t| t == token)
    }

    fn add_special_tokens(&mut self, tokens: &[&str]) -> usize {
        let mut added = 0;
        for token in tokens {
            if !self.contains_token(token) {
                self.vocab.push(token.to_string());
                added += 1;
            }
            self.special.insert(token.to_string());
        }
        added
    }

    fn vocab_size(&self) -> usize {
        self.vocab.len()
    }

    fn encode(&self, text: &str) -> Result<Vec<u32>, ModelError> {
        Ok(text.split_whitespace().map(|w| self.id_of(w)).collect())
    }

    fn decode(&self, ids: &[u32], skip_special_tokens: bool) -> Result<String, ModelError> {
        let mut words = Vec::with_capacity(ids.len());
        for &id in ids {
            let token = self
                .vocab
                .get(id as usize)
                .ok_or_else(|| ModelError::Tokenizer(format!("unknown id {}", id)))?;
            if skip_special_tokens && self.special.contains(token) {
                continue;
            }
            words.push(token.as_str());
        }
        Ok(words.join(" "))
    }

    fn pad_id(&self) -> u32 {
        0
    }
}

/// Which parts of a [`MockModel`] were frozen.
#[derive(Debug, Default)]
pub struct Frozen {
    pub encoder: bool,
    pub encoder_layers: Vec<usize>,
    pub decoder_layers: Vec<usize>,
    pub embeddings: bool,
}

/// A generate call as the model saw it.
pub type GenerateCall = (Array2<u32>, Option<Array2<u8>>);

/// Model that echoes its unpadded input (plus a suffix) on generate and
/// returns flat logits on forward. `fail_generate` makes generate fail.
pub struct MockModel {
    pub vocab_size: usize,
    pub encoder_layers: usize,
    pub decoder_layers: usize,
    /// Written to logit 0 of every position.
    pub tag: f32,
    pub suffix: Vec<u32>,
    pub fail_generate: bool,
    pub frozen: Frozen,
    pub calls: RefCell<Vec<GenerateCall>>,
}

impl MockModel {
    pub fn new(vocab_size: usize) -> Self {
        MockModel {
            vocab_size,
            encoder_layers: 6,
            decoder_layers: 4,
            tag: 0.0,
            suffix: Vec::new(),
            fail_generate: false,
            frozen: Frozen::default(),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn with_tag(mut self, tag: f32) -> Self {
        self.tag = tag;
        self
    }

    pub fn with_suffix(mut self, suffix: Vec<u32>) -> Self {
        self.suffix = suffix;
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail_generate = true;
        self
    }
}

impl Seq2SeqModel for MockModel {
    fn forward(&self, batch: &Batch) -> Result<Logits, ModelError> {
        let (rows, positions) = match &batch.labels {
            Some(labels) => labels.dim(),
            None => batch.input_ids.dim(),
        };
        let mut logits = Array3::zeros((rows, positions, self.vocab_size));
        if self.vocab_size > 0 {
            logits.index_axis_mut(Axis(2), 0).fill(self.tag);
        }
        Ok(logits)
    }

    fn generate(
        &self,
        input_ids: ArrayView2<u32>,
        attention_mask: Option<ArrayView2<u8>>,
        _options: &GenerateOptions,
    ) -> Result<Array2<u32>, ModelError> {
        self.calls
            .borrow_mut()
            .push((input_ids.to_owned(), attention_mask.map(|m| m.to_owned())));

        if self.fail_generate {
            return Err(ModelError::Backend("generate failed".to_string()));
        }

        let rows: Vec<Vec<u32>> = input_ids
            .outer_iter()
            .map(|row| {
                let mut out: Vec<u32> = row.iter().copied().filter(|&id| id != 0).collect();
                out.extend(&self.suffix);
                out
            })
            .collect();
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        Ok(pad_batch(&rows, width, 0).0)
    }

    fn resize_token_embeddings(&mut self, vocab_size: usize) {
        self.vocab_size = vocab_size;
    }
}

impl LayerFreeze for MockModel {
    fn encoder_layer_count(&self) -> usize {
        self.encoder_layers
    }

    fn decoder_layer_count(&self) -> usize {
        self.decoder_layers
    }

    fn freeze_encoder(&mut self) {
        self.frozen.encoder = true;
    }

    fn freeze_encoder_layer(&mut self, index: usize) {
        self.frozen.encoder_layers.push(index);
    }

    fn freeze_decoder_layer(&mut self, index: usize) {
        self.frozen.decoder_layers.push(index);
    }

    fn freeze_embeddings(&mut self) {
        self.frozen.embeddings = true;
    }
}

//! Layer freezing for encoder-decoder models.
//!
//! The plan is computed purely from the config and the model's layer
//! counts, then applied through [`LayerFreeze`].

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Which parts of the model stop receiving gradient updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FreezeConfig {
    /// Freeze the whole encoder. Takes precedence over `freeze_encoder_layers`.
    pub freeze_encoder: bool,
    /// Encoder layers to freeze, counted from the bottom.
    pub freeze_encoder_layers: usize,
    /// Decoder layers to freeze.
    pub freeze_decoder_layers: usize,
    /// Freeze the shared token embedding table.
    pub freeze_embeddings: bool,
    /// Count decoder layers from the bottom (true) or the top (false).
    pub freeze_from_bottom: bool,
}

impl Default for FreezeConfig {
    fn default() -> Self {
        Self {
            freeze_encoder: false,
            freeze_encoder_layers: 0,
            freeze_decoder_layers: 0,
            freeze_embeddings: false,
            freeze_from_bottom: true,
        }
    }
}

/// Trainability switches a backend model exposes.
pub trait LayerFreeze {
    fn encoder_layer_count(&self) -> usize;
    fn decoder_layer_count(&self) -> usize;
    /// Every encoder parameter, including anything outside the layer stack.
    fn freeze_encoder(&mut self);
    fn freeze_encoder_layer(&mut self, index: usize);
    fn freeze_decoder_layer(&mut self, index: usize);
    fn freeze_embeddings(&mut self);
}

/// Encoder part of a [`FreezePlan`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncoderFreeze {
    Untouched,
    Whole,
    Layers(Range<usize>),
}

/// Resolved freezing decisions for one model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreezePlan {
    pub encoder: EncoderFreeze,
    /// Empty when no decoder layer is frozen.
    pub decoder: Range<usize>,
    pub embeddings: bool,
}

impl FreezePlan {
    /// Resolve `config` against a model with the given layer counts.
    /// Requested counts are clamped to what exists.
    pub fn new(config: &FreezeConfig, encoder_layers: usize, decoder_layers: usize) -> Self {
        let encoder = if config.freeze_encoder {
            EncoderFreeze::Whole
        } else if config.freeze_encoder_layers > 0 {
            EncoderFreeze::Layers(0..config.freeze_encoder_layers.min(encoder_layers))
        } else {
            EncoderFreeze::Untouched
        };

        let decoder = layer_range(
            decoder_layers,
            config.freeze_decoder_layers,
            config.freeze_from_bottom,
        );

        FreezePlan {
            encoder,
            decoder,
            embeddings: config.freeze_embeddings,
        }
    }
}

/// The `count` layers to freeze out of `total`, from the bottom or the top.
pub fn layer_range(total: usize, count: usize, from_bottom: bool) -> Range<usize> {
    let count = count.min(total);
    if from_bottom {
        0..count
    } else {
        total - count..total
    }
}

/// Freeze the parts of `model` selected by `config`. Returns the plan applied.
pub fn freeze_model_parameters<M: LayerFreeze + ?Sized>(
    model: &mut M,
    config: &FreezeConfig,
) -> FreezePlan {
    let plan = FreezePlan::new(
        config,
        model.encoder_layer_count(),
        model.decoder_layer_count(),
    );

    match &plan.encoder {
        EncoderFreeze::Untouched => {}
        EncoderFreeze::Whole => model.freeze_encoder(),
        EncoderFreeze::Layers(range) => {
            for i in range.clone() {
                model.freeze_encoder_layer(i);
            }
        }
    }
    for i in plan.decoder.clone() {
        model.freeze_decoder_layer(i);
    }
    if plan.embeddings {
        model.freeze_embeddings();
    }

    tracing::debug!(?plan, "froze model parameters");
    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seq2seq::testing::MockModel;

    #[test]
    fn default_config_freezes_nothing() {
        let plan = FreezePlan::new(&FreezeConfig::default(), 6, 6);
        assert_eq!(plan.encoder, EncoderFreeze::Untouched);
        assert!(plan.decoder.is_empty());
        assert!(!plan.embeddings);
    }

    #[test]
    fn whole_encoder_wins_over_layer_count() {
        let config = FreezeConfig {
            freeze_encoder: true,
            freeze_encoder_layers: 2,
            ..Default::default()
        };
        assert_eq!(FreezePlan::new(&config, 6, 6).encoder, EncoderFreeze::Whole);
    }

    #[test]
    fn encoder_layer_count_is_clamped() {
        let config = FreezeConfig {
            freeze_encoder_layers: 10,
            ..Default::default()
        };
        assert_eq!(
            FreezePlan::new(&config, 4, 4).encoder,
            EncoderFreeze::Layers(0..4)
        );
    }

    #[test]
    fn decoder_layers_from_top_or_bottom() {
        assert_eq!(layer_range(6, 2, true), 0..2);
        assert_eq!(layer_range(6, 2, false), 4..6);
        assert_eq!(layer_range(3, 8, false), 0..3);
        assert!(layer_range(6, 0, false).is_empty());
    }

    #[test]
    fn apply_freezes_selected_parts() {
        let mut model = MockModel::new(10);
        let config = FreezeConfig {
            freeze_encoder_layers: 2,
            freeze_decoder_layers: 1,
            freeze_from_bottom: false,
            freeze_embeddings: true,
            ..Default::default()
        };

        freeze_model_parameters(&mut model, &config);

        assert_eq!(model.frozen.encoder_layers, vec![0, 1]);
        assert_eq!(model.frozen.decoder_layers, vec![model.decoder_layers - 1]);
        assert!(model.frozen.embeddings);
        assert!(!model.frozen.encoder);
    }

    #[test]
    fn apply_whole_encoder() {
        let mut model = MockModel::new(10);
        let config = FreezeConfig {
            freeze_encoder: true,
            ..Default::default()
        };
        freeze_model_parameters(&mut model, &config);
        assert!(model.frozen.encoder);
        assert!(model.frozen.encoder_layers.is_empty());
    }
}

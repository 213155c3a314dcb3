//! Masked, sample-weighted cross entropy.
//!
//! Per position: `logsumexp(logits) - logits[label]`. Positions whose
//! label is [`IGNORE_INDEX`] are dropped. Each sample's loss is the mean
//! over its kept positions; the batch loss is the mean of
//! `sample_loss * weight`.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, ArrayView3, Axis, Zip};

use super::ModelError;

/// Label value excluded from the loss.
pub const IGNORE_INDEX: i64 = -100;

/// Weighted batch loss over `[batch, position, vocab]` logits.
///
/// A sample with no kept positions contributes zero.
pub fn weighted_cross_entropy(
    logits: ArrayView3<f32>,
    labels: ArrayView2<i64>,
    sample_weights: ArrayView1<f32>,
) -> Result<f32, ModelError> {
    let (batch, positions, _) = logits.dim();
    if labels.nrows() == 0 {
        return Err(ModelError::EmptyBatch);
    }
    check_len("logits batch", labels.nrows(), batch)?;
    check_len("sequence length", labels.ncols(), positions)?;
    check_len("sample weights", labels.nrows(), sample_weights.len())?;

    let weighted = &sample_losses(logits, labels)? * &sample_weights;
    Ok(weighted.mean().unwrap_or(0.0))
}

/// Mean cross entropy over each sample's kept positions.
///
/// `logits` and `labels` must agree on batch and position axes.
pub fn sample_losses(
    logits: ArrayView3<f32>,
    labels: ArrayView2<i64>,
) -> Result<Array1<f32>, ModelError> {
    let vocab = logits.len_of(Axis(2));
    let lse = logits.map_axis(Axis(2), log_sum_exp);

    let mut losses = Array2::<f32>::zeros(labels.raw_dim());
    let mut kept = Array2::<f32>::zeros(labels.raw_dim());
    for ((i, j), &label) in labels.indexed_iter() {
        if label == IGNORE_INDEX {
            continue;
        }
        let target = target_index(label, vocab)?;
        losses[[i, j]] = lse[[i, j]] - logits[[i, j, target]];
        kept[[i, j]] = 1.0;
    }

    let sums = losses.sum_axis(Axis(1));
    let counts = kept.sum_axis(Axis(1));
    Ok(Zip::from(&sums)
        .and(&counts)
        .map_collect(|&sum, &count| if count > 0.0 { sum / count } else { 0.0 }))
}

fn target_index(label: i64, vocab: usize) -> Result<usize, ModelError> {
    usize::try_from(label)
        .ok()
        .filter(|&t| t < vocab)
        .ok_or(ModelError::LabelOutOfRange { label, vocab })
}

/// Numerically stable `ln(sum(exp(x)))`.
fn log_sum_exp(row: ArrayView1<f32>) -> f32 {
    let max = row.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    if !max.is_finite() {
        return max;
    }
    let sum: f32 = row.iter().map(|&x| (x - max).exp()).sum();
    max + sum.ln()
}

fn check_len(what: &'static str, expected: usize, actual: usize) -> Result<(), ModelError> {
    if expected == actual {
        Ok(())
    } else {
        Err(ModelError::ShapeMismatch {
            what,
            expected,
            actual,
        })
    }
}

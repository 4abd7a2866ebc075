//! Weighting and scoring formulas for full-text relevance.
//!
//! The [`Scoring`] trait bundles every formula used to rank a node against a
//! full-text query. Each method has a default, so an alternative model only
//! overrides what it changes; [`DefaultScoring`] uses all defaults with a
//! configurable mixing constant, [`ConstantScoring`] ignores term frequencies.
//!
//! # Examples
//!
//! ```
//! use xmlft::scoring::{DefaultScoring, Scoring};
//!
//! let scoring = DefaultScoring::new();
//! assert_eq!(scoring.normalize(0.0), 0.0);
//! assert_eq!(scoring.score_any(&[3.0, 1.0], 2), 3.5);
//! ```

use std::fmt::Debug;

use crate::tree::DocId;

pub mod relevance;

pub use relevance::{RelevanceModel, ScorePlan};

/// Default mixing constant between sum and maximum for disjunctions.
pub const DEFAULT_ALPHA: f64 = 0.5;

/// Offset used by the default score normalization.
const NORMALIZE_OFFSET: f64 = 0.8;

/// The capability set of a scoring model.
///
/// All methods are pure functions of their inputs. Passing an empty slice to
/// the `weight_of_*` methods is a contract violation; the result is then not
/// meaningful (infinite or NaN) and is not checked.
pub trait Scoring: Send + Sync + Debug {
    /// Mixing constant between sum and maximum used for disjunctions.
    fn alpha(&self) -> f64 {
        DEFAULT_ALPHA
    }

    /// Weight of a single word with the given inverse document frequency.
    fn weight_of_word(&self, inverse_doc_frequency: f64) -> f64 {
        1.0 + inverse_doc_frequency.ln()
    }

    /// Weight norm of a conjunction of the given sub-weights.
    fn weight_of_all(&self, sub_weights: &[f64]) -> f64 {
        1.0 / sub_weights.iter().map(|w| w * w).sum::<f64>().sqrt()
    }

    /// Weight norm of a disjunction of the given sub-weights.
    fn weight_of_any(&self, sub_weights: &[f64]) -> f64 {
        let alpha = self.alpha();
        1.0 / (alpha * sum(sub_weights) + (1.0 - alpha) * max(sub_weights))
    }

    /// Score of a word occurring `term_frequency` times.
    fn score_word(&self, norm: f64, term_frequency: f64) -> f64 {
        norm * term_frequency
    }

    /// Score of a conjunction.
    fn score_all(&self, sub_scores: &[f64]) -> f64 {
        sum(sub_scores)
    }

    /// Score of a disjunction over the first `count` sub-scores.
    fn score_any(&self, sub_scores: &[f64], count: usize) -> f64 {
        let scores = &sub_scores[..count.min(sub_scores.len())];
        let alpha = self.alpha();
        alpha * sum(scores) + (1.0 - alpha) * max(scores)
    }

    /// Static weight of a document; override to boost documents.
    fn document_weight(&self, _doc: DocId) -> f64 {
        1.0
    }

    /// Map a raw score onto `[0, 1)`.
    ///
    /// The default is `x / (0.8 + x)`. In `f64` it stays below 1 for raw
    /// scores up to about 1e15; larger scores saturate at exactly 1.0.
    fn normalize(&self, raw_score: f64) -> f64 {
        raw_score / (NORMALIZE_OFFSET + raw_score)
    }

    /// Get the name of this scoring model.
    fn name(&self) -> &'static str;
}

fn sum(values: &[f64]) -> f64 {
    values.iter().sum()
}

fn max(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

/// The default scoring model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DefaultScoring {
    alpha: f64,
}

impl DefaultScoring {
    /// Create the default model with `alpha = 0.5`.
    pub fn new() -> Self {
        DefaultScoring {
            alpha: DEFAULT_ALPHA,
        }
    }

    /// Create the default model with a custom mixing constant.
    pub fn with_alpha(alpha: f64) -> Self {
        DefaultScoring { alpha }
    }
}

impl Default for DefaultScoring {
    fn default() -> Self {
        Self::new()
    }
}

impl Scoring for DefaultScoring {
    fn alpha(&self) -> f64 {
        self.alpha
    }

    fn name(&self) -> &'static str {
        "default"
    }
}

/// A boolean model: a matched word scores its norm, however often it occurs.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConstantScoring;

impl ConstantScoring {
    pub fn new() -> Self {
        ConstantScoring
    }
}

impl Scoring for ConstantScoring {
    fn weight_of_word(&self, _inverse_doc_frequency: f64) -> f64 {
        1.0
    }

    fn score_word(&self, norm: f64, term_frequency: f64) -> f64 {
        if term_frequency > 0.0 { norm } else { 0.0 }
    }

    fn name(&self) -> &'static str {
        "constant"
    }
}

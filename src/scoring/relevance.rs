//! Evaluation of a query's score plan against term frequencies.

use std::sync::Arc;

use crate::error::{FtError, Result};
use crate::query::flatten::QueryTermSet;
use crate::scoring::Scoring;
use crate::tree::DocId;

/// The scoring shape of a selection tree.
///
/// Leaves refer to term ranks of the [`QueryTermSet`] the plan was built with.
#[derive(Debug, Clone, PartialEq)]
pub enum ScorePlan {
    /// A basic term.
    Term(usize),
    /// A conjunction.
    All(Vec<ScorePlan>),
    /// A disjunction.
    Any(Vec<ScorePlan>),
}

/// Scores nodes against one query with one scoring model.
///
/// Per-term norms (`weight · weight_of_word(idf)`) are precomputed at
/// construction with `idf = 1`; [`score`](Self::score) recomputes them when
/// inverse document frequencies are supplied.
#[derive(Debug, Clone)]
pub struct RelevanceModel {
    scoring: Arc<dyn Scoring>,
    plan: Option<ScorePlan>,
    weights: Vec<f64>,
    norms: Vec<f64>,
}

impl RelevanceModel {
    /// Create a model for a flattened query.
    pub fn new(terms: &QueryTermSet, scoring: Arc<dyn Scoring>) -> Self {
        let weights = terms.weights();
        let unit = scoring.weight_of_word(1.0);
        let norms = weights.iter().map(|w| w * unit).collect();
        RelevanceModel {
            plan: terms.plan().cloned(),
            scoring,
            weights,
            norms,
        }
    }

    /// The scoring model.
    pub fn scoring(&self) -> &Arc<dyn Scoring> {
        &self.scoring
    }

    /// Precomputed per-term norms, in rank order.
    pub fn norms(&self) -> &[f64] {
        &self.norms
    }

    /// Score a document node from its per-term frequencies.
    ///
    /// `term_frequencies` and, when given, `inverse_doc_frequencies` are
    /// indexed by term rank. The result lies in `[0, 1)`.
    pub fn score(
        &self,
        doc: DocId,
        term_frequencies: &[f64],
        inverse_doc_frequencies: Option<&[f64]>,
    ) -> Result<f64> {
        if term_frequencies.len() != self.weights.len() {
            return Err(FtError::contract(format!(
                "expected {} term frequencies, got {}",
                self.weights.len(),
                term_frequencies.len()
            )));
        }
        if let Some(idf) = inverse_doc_frequencies {
            if idf.len() != self.weights.len() {
                return Err(FtError::contract(format!(
                    "expected {} inverse document frequencies, got {}",
                    self.weights.len(),
                    idf.len()
                )));
            }
        }

        let Some(plan) = &self.plan else {
            return Ok(0.0);
        };
        let (raw, _) = self.evaluate(plan, term_frequencies, inverse_doc_frequencies);
        Ok(self.scoring.normalize(self.scoring.document_weight(doc) * raw))
    }

    /// Returns the score and the norm of a plan node.
    fn evaluate(&self, plan: &ScorePlan, tf: &[f64], idf: Option<&[f64]>) -> (f64, f64) {
        match plan {
            ScorePlan::Term(rank) => {
                let norm = match idf {
                    Some(idf) => self.weights[*rank] * self.scoring.weight_of_word(idf[*rank]),
                    None => self.norms[*rank],
                };
                (self.scoring.score_word(norm, tf[*rank]), norm)
            }
            ScorePlan::All(children) => {
                let (scores, norms) = self.evaluate_children(children, tf, idf);
                let weight = self.scoring.weight_of_all(&norms);
                (self.scoring.score_all(&scores) * weight, 1.0 / weight)
            }
            ScorePlan::Any(children) => {
                let (scores, norms) = self.evaluate_children(children, tf, idf);
                let weight = self.scoring.weight_of_any(&norms);
                (
                    self.scoring.score_any(&scores, scores.len()) * weight,
                    1.0 / weight,
                )
            }
        }
    }

    fn evaluate_children(
        &self,
        children: &[ScorePlan],
        tf: &[f64],
        idf: Option<&[f64]>,
    ) -> (Vec<f64>, Vec<f64>) {
        children
            .iter()
            .map(|child| self.evaluate(child, tf, idf))
            .unzip()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::flatten::flatten;
    use crate::query::selection::Selection;
    use crate::scoring::{ConstantScoring, DefaultScoring};

    const EPSILON: f64 = 1e-12;

    fn model(selection: &Selection) -> RelevanceModel {
        RelevanceModel::new(&flatten(selection).unwrap(), Arc::new(DefaultScoring::new()))
    }

    #[test]
    fn test_single_word() {
        let model = model(&Selection::word("fox"));
        assert_eq!(model.norms(), &[1.0]);

        let score = model.score(DocId::new(0), &[2.0], None).unwrap();
        assert!((score - 2.0 / 2.8).abs() < EPSILON);
        assert_eq!(model.score(DocId::new(0), &[0.0], None).unwrap(), 0.0);
    }

    #[test]
    fn test_conjunction_is_normalized() {
        let model = model(&Selection::all(vec![Selection::word("a"), Selection::word("b")]));

        // (1 + 1) * 1/sqrt(2) = sqrt(2)
        let raw = 2.0_f64.sqrt();
        let score = model.score(DocId::new(0), &[1.0, 1.0], None).unwrap();
        assert!((score - raw / (0.8 + raw)).abs() < EPSILON);
    }

    #[test]
    fn test_disjunction_uses_decayed_weights() {
        let model = model(&Selection::any(vec![Selection::word("a"), Selection::word("b")]));
        assert_eq!(model.norms(), &[0.5, 0.5]);

        // scores [0.5, 0]: any = 0.25 + 0.25; norms [0.5, 0.5]: weight = 1 / (0.5 + 0.25)
        let raw = 0.5 / 0.75;
        let score = model.score(DocId::new(0), &[1.0, 0.0], None).unwrap();
        assert!((score - raw / (0.8 + raw)).abs() < EPSILON);
    }

    #[test]
    fn test_inverse_document_frequency_raises_rare_terms() {
        let model = model(&Selection::word("rare"));
        let common = model.score(DocId::new(0), &[1.0], Some(&[1.0])).unwrap();
        let rare = model.score(DocId::new(0), &[1.0], Some(&[8.0])).unwrap();
        assert!(rare > common);
    }

    #[test]
    fn test_no_terms_scores_zero() {
        let model = model(&Selection::not(Selection::word("x")));
        assert_eq!(model.score(DocId::new(0), &[], None).unwrap(), 0.0);
    }

    #[test]
    fn test_frequency_count_mismatch() {
        let model = model(&Selection::word("x"));
        assert!(matches!(
            model.score(DocId::new(0), &[], None),
            Err(FtError::Contract(_))
        ));
    }

    #[test]
    fn test_constant_scoring_ignores_frequency() {
        let terms = flatten(&Selection::word("fox")).unwrap();
        let model = RelevanceModel::new(&terms, Arc::new(ConstantScoring::new()));
        let once = model.score(DocId::new(0), &[1.0], None).unwrap();
        let often = model.score(DocId::new(0), &[9.0], None).unwrap();
        assert_eq!(once, often);
    }
}

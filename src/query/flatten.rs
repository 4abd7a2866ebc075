//! Reduction of a selection tree to a flat set of weighted terms.
//!
//! Weights decay through disjunctions: every `Any` level hands half of the
//! weight it received to each of its children, so a term under `n` nested
//! disjunctions carries `0.5ⁿ`. Conjunctions and the included operand of a
//! mild negation pass their weight through unchanged. The excluded operand of
//! a mild negation and strict negations contribute no terms.
//!
//! # Examples
//!
//! ```
//! use xmlft::query::{Selection, flatten};
//!
//! let selection = Selection::any(vec![
//!     Selection::any(vec![Selection::word("a")]),
//!     Selection::word("b"),
//! ]);
//! let terms = flatten(&selection).unwrap();
//! assert_eq!(terms.get(0).unwrap().weight, 0.25);
//! assert_eq!(terms.get(1).unwrap().weight, 0.5);
//! ```

use std::fmt;

use crate::error::Result;
use crate::query::selection::Selection;
use crate::scoring::relevance::ScorePlan;

/// Weight handed to the root of the selection tree.
const ROOT_WEIGHT: f64 = 1.0;

/// Factor applied by every disjunction to the weight of its children.
const DISJUNCTION_DECAY: f64 = 0.5;

/// A basic selection that can occur in text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BasicTerm {
    /// A literal word, possibly spanning several tokens.
    Word(String),
    /// A single-token wildcard pattern.
    Wildcard(String),
}

impl BasicTerm {
    /// The word or pattern text.
    pub fn text(&self) -> &str {
        match self {
            BasicTerm::Word(text) | BasicTerm::Wildcard(text) => text,
        }
    }
}

impl fmt::Display for BasicTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text())
    }
}

/// A basic term with the weight it inherited from the selection tree.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedTerm {
    pub term: BasicTerm,
    /// Weight in `(0, 1]`.
    pub weight: f64,
}

/// The flattened terms of a query, in selection order.
///
/// The index of a term in this set is its rank. The set also carries the
/// score plan: the shape of the selection tree reduced to the nodes that
/// contribute terms, with leaves referring to term ranks.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryTermSet {
    terms: Vec<WeightedTerm>,
    plan: Option<ScorePlan>,
}

impl QueryTermSet {
    /// Number of terms.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Whether the query contributed no terms at all.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// The term of the given rank.
    pub fn get(&self, rank: usize) -> Option<&WeightedTerm> {
        self.terms.get(rank)
    }

    /// Iterate over terms in rank order.
    pub fn iter(&self) -> impl Iterator<Item = &WeightedTerm> {
        self.terms.iter()
    }

    /// Term weights in rank order.
    pub fn weights(&self) -> Vec<f64> {
        self.terms.iter().map(|t| t.weight).collect()
    }

    /// Word and pattern texts in rank order.
    pub fn texts(&self) -> Vec<String> {
        self.terms.iter().map(|t| t.term.text().to_string()).collect()
    }

    /// The score plan, or `None` if no term was contributed.
    pub fn plan(&self) -> Option<&ScorePlan> {
        self.plan.as_ref()
    }
}

/// Flatten a selection tree into its weighted terms.
///
/// The tree is validated first; malformed trees are a contract violation.
pub fn flatten(selection: &Selection) -> Result<QueryTermSet> {
    selection.validate()?;

    let mut terms = Vec::new();
    let plan = collect(selection, ROOT_WEIGHT, &mut terms);
    Ok(QueryTermSet { terms, plan })
}

fn collect(selection: &Selection, weight: f64, terms: &mut Vec<WeightedTerm>) -> Option<ScorePlan> {
    match selection {
        Selection::Word(word) => Some(push(terms, BasicTerm::Word(word.clone()), weight)),
        Selection::Wildcard(pattern) => {
            Some(push(terms, BasicTerm::Wildcard(pattern.clone()), weight))
        }
        Selection::All(children) => {
            let plans = collect_list(children, weight, terms);
            (!plans.is_empty()).then_some(ScorePlan::All(plans))
        }
        Selection::Any(children) => {
            let plans = collect_list(children, weight * DISJUNCTION_DECAY, terms);
            (!plans.is_empty()).then_some(ScorePlan::Any(plans))
        }
        Selection::MildNot(include, _) => collect(include, weight, terms),
        Selection::Not(_) => None,
    }
}

fn collect_list(children: &[Selection], weight: f64, terms: &mut Vec<WeightedTerm>) -> Vec<ScorePlan> {
    children
        .iter()
        .filter_map(|child| collect(child, weight, terms))
        .collect()
}

fn push(terms: &mut Vec<WeightedTerm>, term: BasicTerm, weight: f64) -> ScorePlan {
    terms.push(WeightedTerm { term, weight });
    ScorePlan::Term(terms.len() - 1)
}

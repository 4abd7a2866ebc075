//! Full-text selection trees.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{FtError, Result};

/// A full-text selection as produced by the query compiler.
///
/// The tree is read-only once built; children are owned.
///
/// # Examples
///
/// ```
/// use xmlft::query::Selection;
///
/// let selection = Selection::any(vec![
///     Selection::word("quick"),
///     Selection::mild_not(Selection::word("fox"), Selection::word("hound")),
/// ]);
/// assert!(selection.validate().is_ok());
/// assert_eq!(selection.to_string(), "any(\"quick\", not-in(\"fox\", \"hound\"))");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selection {
    /// A literal word; may contain several tokens, which then match as a sequence.
    Word(String),
    /// A single-token wildcard pattern.
    Wildcard(String),
    /// Conjunction ("ftand").
    All(Vec<Selection>),
    /// Disjunction ("ftor").
    Any(Vec<Selection>),
    /// Left operand, not in the presence of the right operand ("not in").
    MildNot(Box<Selection>, Box<Selection>),
    /// Strict negation ("ftnot").
    Not(Box<Selection>),
}

impl Selection {
    /// A literal word.
    pub fn word<S: Into<String>>(word: S) -> Self {
        Selection::Word(word.into())
    }

    /// A wildcard pattern.
    pub fn wildcard<S: Into<String>>(pattern: S) -> Self {
        Selection::Wildcard(pattern.into())
    }

    /// A conjunction.
    pub fn all(children: Vec<Selection>) -> Self {
        Selection::All(children)
    }

    /// A disjunction.
    pub fn any(children: Vec<Selection>) -> Self {
        Selection::Any(children)
    }

    /// `include` not in the presence of `exclude`.
    pub fn mild_not(include: Selection, exclude: Selection) -> Self {
        Selection::MildNot(Box::new(include), Box::new(exclude))
    }

    /// A strict negation.
    pub fn not(operand: Selection) -> Self {
        Selection::Not(Box::new(operand))
    }

    /// Check the tree for malformed nodes: empty lists, words or patterns.
    pub fn validate(&self) -> Result<()> {
        match self {
            Selection::Word(word) if word.trim().is_empty() => {
                Err(FtError::contract("empty word in selection"))
            }
            Selection::Wildcard(pattern) if pattern.is_empty() => {
                Err(FtError::contract("empty wildcard pattern in selection"))
            }
            Selection::Word(_) | Selection::Wildcard(_) => Ok(()),
            Selection::All(children) | Selection::Any(children) => {
                if children.is_empty() {
                    return Err(FtError::contract(format!("empty list in selection: {self}")));
                }
                children.iter().try_for_each(Selection::validate)
            }
            Selection::MildNot(include, exclude) => {
                include.validate()?;
                exclude.validate()
            }
            Selection::Not(operand) => operand.validate(),
        }
    }

    /// Apply rewrites that keep every term's flattened weight.
    ///
    /// A single-child conjunction is replaced by its child, and conjunctions
    /// nested in a conjunction are spliced into it. Disjunctions are left as
    /// they are because every disjunction level halves its children's weight.
    pub fn simplify(self) -> Selection {
        match self {
            Selection::All(children) => {
                let mut flat = Vec::with_capacity(children.len());
                for child in children {
                    match child.simplify() {
                        Selection::All(grandchildren) => flat.extend(grandchildren),
                        other => flat.push(other),
                    }
                }
                if flat.len() == 1 {
                    flat.remove(0)
                } else {
                    Selection::All(flat)
                }
            }
            Selection::Any(children) => {
                Selection::Any(children.into_iter().map(Selection::simplify).collect())
            }
            Selection::MildNot(include, exclude) => {
                Selection::mild_not(include.simplify(), exclude.simplify())
            }
            Selection::Not(operand) => Selection::not(operand.simplify()),
            basic => basic,
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn list(f: &mut fmt::Formatter<'_>, name: &str, children: &[Selection]) -> fmt::Result {
            write!(f, "{name}(")?;
            for (i, child) in children.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{child}")?;
            }
            write!(f, ")")
        }

        match self {
            Selection::Word(word) => write!(f, "{word:?}"),
            Selection::Wildcard(pattern) => write!(f, "wildcard({pattern:?})"),
            Selection::All(children) => list(f, "all", children),
            Selection::Any(children) => list(f, "any", children),
            Selection::MildNot(include, exclude) => write!(f, "not-in({include}, {exclude})"),
            Selection::Not(operand) => write!(f, "not({operand})"),
        }
    }
}

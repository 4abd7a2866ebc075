//! Text analysis for xmlft.
//!
//! This module provides the tokenizers that split text node values into words,
//! the normalization applied before query terms are compared with tokens
//! (case and diacritics folding), and the stemmers selected by match options.

pub mod normalize;
pub mod stemmer;
pub mod token;
pub mod tokenizer;

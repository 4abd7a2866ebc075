//! Splitting a text buffer into plain and term spans.
//!
//! The [`Segmenter`] consumes hits ordered by start offset and yields a
//! gap-free, non-overlapping partition of the buffer: a plain span before
//! every hit that does not start where the previous one ended, the hit's term
//! span, and a trailing plain span if text remains.
//!
//! Word counts of plain gaps between hits come from the hits' word positions.
//! Gaps without a bounding position (the tail, or a buffer without hits) are
//! left uncounted so that callers only pay for tokenizing them on demand.

use crate::error::{FtError, Result};
use crate::highlight::span::{TermHit, TextSpan};

/// Lazily segments one text buffer.
#[derive(Debug)]
pub struct Segmenter<I> {
    hits: I,
    text_len: usize,
    last_end: usize,
    /// Word position just past the last hit.
    last_word: Option<usize>,
    pending: Option<TermHit>,
    emitted: bool,
    done: bool,
}

impl<I: Iterator<Item = TermHit>> Segmenter<I> {
    /// Segment a buffer of `text_len` bytes.
    pub fn new(text_len: usize, hits: I) -> Self {
        Segmenter {
            hits,
            text_len,
            last_end: 0,
            last_word: Some(0),
            pending: None,
            emitted: false,
            done: false,
        }
    }

    fn emit(&mut self, span: TextSpan) -> Option<Result<TextSpan>> {
        self.emitted = true;
        Some(Ok(span))
    }

    fn term(&mut self, hit: TermHit) -> Option<Result<TextSpan>> {
        self.last_end = hit.end();
        self.last_word = hit.position.map(|p| p + hit.words);
        self.emit(TextSpan::term(&hit))
    }

    fn fail(&mut self, message: String) -> Option<Result<TextSpan>> {
        self.done = true;
        Some(Err(FtError::contract(message)))
    }
}

impl<I: Iterator<Item = TermHit>> Iterator for Segmenter<I> {
    type Item = Result<TextSpan>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if let Some(hit) = self.pending.take() {
            return self.term(hit);
        }

        match self.hits.next() {
            Some(hit) => {
                if hit.len == 0 || hit.start < self.last_end {
                    return self.fail(format!(
                        "hit at {}..{} does not follow the previous hit ending at {}",
                        hit.start,
                        hit.end(),
                        self.last_end
                    ));
                }
                if hit.end() > self.text_len {
                    return self.fail(format!(
                        "hit at {}..{} exceeds the text length {}",
                        hit.start,
                        hit.end(),
                        self.text_len
                    ));
                }
                if hit.start == self.last_end {
                    return self.term(hit);
                }
                let words = match (self.last_word, hit.position) {
                    (Some(last), Some(position)) => Some(position.saturating_sub(last)),
                    _ => None,
                };
                let gap = TextSpan::plain(self.last_end, hit.start - self.last_end, words);
                self.pending = Some(hit);
                self.emit(gap)
            }
            None => {
                self.done = true;
                if self.last_end < self.text_len {
                    let tail = TextSpan::plain(self.last_end, self.text_len - self.last_end, None);
                    self.emit(tail)
                } else if !self.emitted {
                    self.emit(TextSpan::plain(0, 0, Some(0)))
                } else {
                    None
                }
            }
        }
    }
}

/// Segment a buffer at once.
pub fn segment<H>(text_len: usize, hits: H) -> Result<Vec<TextSpan>>
where
    H: IntoIterator<Item = TermHit>,
{
    Segmenter::new(text_len, hits.into_iter()).collect()
}

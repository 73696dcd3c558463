use std::collections::VecDeque;
use std::ops::Range;
use thiserror::Error;

/// Split points in priority order. The empty separator means a plain
/// character split.
pub const SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChunkError {
    #[error("chunk size must be greater than zero")]
    ZeroSize,
    #[error("chunk overlap ({overlap}) must be smaller than chunk size ({size})")]
    OverlapTooLarge { size: usize, overlap: usize },
}

/// A contiguous slice of the document. `start` and `end` are byte offsets
/// into the text that was chunked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub index: usize,
    pub start: usize,
    pub end: usize,
    pub text: String,
}

impl Chunk {
    fn from_range(index: usize, text: &str, range: Range<usize>) -> Self {
        Self {
            index,
            start: range.start,
            end: range.end,
            text: text[range].to_string(),
        }
    }

    /// Length in characters
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Recursive separator-aware splitter.
///
/// Text is cut on the coarsest separator present in it. Pieces that fit are
/// merged greedily up to `size` characters, and each emitted chunk hands its
/// trailing pieces (at most `overlap` characters) to the next one. Pieces that
/// are still too large are split again with the next finer separator, down to
/// fixed character windows advancing by `size - overlap`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunker {
    size: usize,
    overlap: usize,
}

impl Chunker {
    pub const fn new(size: usize, overlap: usize) -> Result<Self, ChunkError> {
        if size == 0 {
            return Err(ChunkError::ZeroSize);
        }
        if overlap >= size {
            return Err(ChunkError::OverlapTooLarge { size, overlap });
        }
        Ok(Self { size, overlap })
    }

    pub const fn size(&self) -> usize {
        self.size
    }

    pub const fn overlap(&self) -> usize {
        self.overlap
    }

    pub fn split(&self, text: &str) -> Vec<Chunk> {
        if text.is_empty() {
            return Vec::new();
        }

        let mut ranges = Vec::new();
        if char_len(text, &(0..text.len())) <= self.size {
            ranges.push(0..text.len());
        } else {
            self.split_range(text, 0..text.len(), &SEPARATORS, &mut ranges);
        }

        ranges
            .into_iter()
            .enumerate()
            .map(|(index, range)| Chunk::from_range(index, text, range))
            .collect()
    }

    fn split_range(
        &self,
        text: &str,
        range: Range<usize>,
        separators: &[&str],
        out: &mut Vec<Range<usize>>,
    ) {
        let segment = &text[range.clone()];
        let position = separators
            .iter()
            .position(|sep| sep.is_empty() || segment.contains(sep));

        let Some(position) = position.filter(|&p| !separators[p].is_empty()) else {
            self.split_chars(text, range, out);
            return;
        };

        let finer = &separators[position + 1..];
        let mut fitting: Vec<Range<usize>> = Vec::new();

        for piece in split_keeping_separator(text, range, separators[position]) {
            if char_len(text, &piece) <= self.size {
                fitting.push(piece);
                continue;
            }

            if !fitting.is_empty() {
                self.merge(text, &fitting, out);
                fitting.clear();
            }
            self.split_range(text, piece, finer, out);
        }

        if !fitting.is_empty() {
            self.merge(text, &fitting, out);
        }
    }

    fn merge(&self, text: &str, pieces: &[Range<usize>], out: &mut Vec<Range<usize>>) {
        let mut window: VecDeque<(Range<usize>, usize)> = VecDeque::new();
        let mut total = 0;

        for piece in pieces {
            let len = char_len(text, piece);

            if total + len > self.size && !window.is_empty() {
                out.push(span(&window));

                while total > self.overlap || (total > 0 && total + len > self.size) {
                    let Some((_, dropped)) = window.pop_front() else {
                        break;
                    };
                    total -= dropped;
                }
            }

            window.push_back((piece.clone(), len));
            total += len;
        }

        if !window.is_empty() {
            out.push(span(&window));
        }
    }

    fn split_chars(&self, text: &str, range: Range<usize>, out: &mut Vec<Range<usize>>) {
        let offsets: Vec<usize> = text[range.clone()]
            .char_indices()
            .map(|(i, _)| range.start + i)
            .chain(std::iter::once(range.end))
            .collect();
        let count = offsets.len() - 1;

        for start in (0..count).step_by(self.size - self.overlap) {
            let end = (start + self.size).min(count);
            out.push(offsets[start]..offsets[end]);
        }
    }
}

/// Splits `range` before every occurrence of `separator`, so each separator
/// stays attached to the text that follows it.
fn split_keeping_separator(text: &str, range: Range<usize>, separator: &str) -> Vec<Range<usize>> {
    let segment = &text[range.clone()];
    let mut pieces = Vec::new();
    let mut start = 0;

    for (idx, _) in segment.match_indices(separator) {
        if idx > start {
            pieces.push(range.start + start..range.start + idx);
        }
        start = idx;
    }
    if start < segment.len() {
        pieces.push(range.start + start..range.end);
    }

    pieces
}

fn span(window: &VecDeque<(Range<usize>, usize)>) -> Range<usize> {
    let start = window.front().map_or(0, |(r, _)| r.start);
    let end = window.back().map_or(start, |(r, _)| r.end);
    start..end
}

fn char_len(text: &str, range: &Range<usize>) -> usize {
    text[range.clone()].chars().count()
}

//! Incremental whitespace tokenizer for streamed request bodies.

use std::borrow::Cow;

/// Splits a byte stream into whitespace-delimited words.
///
/// Chunks may end in the middle of a word (or a multi-byte character); the
/// unfinished tail is held back until the next chunk or `finish`.
#[derive(Debug, Default)]
pub struct WordSplitter {
    pending: Vec<u8>,
}

impl WordSplitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk and emit every word it completes. Returns how many were emitted.
    pub fn push<F>(&mut self, chunk: &[u8], mut emit: F) -> usize
    where
        F: FnMut(&str),
    {
        // The held-back tail never contains whitespace, so only the new
        // bytes can hold a boundary.
        let start = self.pending.len();
        self.pending.extend_from_slice(chunk);

        // ASCII whitespace never occurs inside a UTF-8 sequence, so cutting
        // after it leaves only whole characters and whole words behind.
        let Some(offset) = chunk.iter().rposition(|b| b.is_ascii_whitespace()) else {
            return 0;
        };

        let complete: Vec<u8> = self.pending.drain(..=start + offset).collect();
        emit_words(&complete, &mut emit)
    }

    /// Emit whatever is left once the stream has ended.
    pub fn finish<F>(self, mut emit: F) -> usize
    where
        F: FnMut(&str),
    {
        emit_words(&self.pending, &mut emit)
    }
}

fn emit_words<F>(bytes: &[u8], emit: &mut F) -> usize
where
    F: FnMut(&str),
{
    let text: Cow<'_, str> = String::from_utf8_lossy(bytes);
    let mut emitted = 0;

    for word in text.split_whitespace() {
        emit(word);
        emitted += 1;
    }

    emitted
}

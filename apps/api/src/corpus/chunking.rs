//! Recursive character splitter.
//!
//! Splits on paragraph, line, sentence and word separators in turn, merging
//! pieces back up to `chunk_size` characters and carrying up to
//! `chunk_overlap` characters of the previous chunk into the next one.
//! Sizes are counted in chars, so slicing never lands inside a code point.

const SEPARATORS: [&str; 4] = ["\n\n", "\n", ". ", " "];

#[derive(Debug, Clone)]
pub struct RecursiveChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl RecursiveChunker {
    /// `chunk_overlap` is clamped below `chunk_size`; `chunk_size` is at least 1.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            chunk_size,
            chunk_overlap: chunk_overlap.min(chunk_size - 1),
        }
    }

    pub fn split(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }
        let pieces = self.split_pieces(text, &SEPARATORS);
        self.merge(pieces)
    }

    /// Breaks text into pieces no longer than `chunk_size`, keeping each
    /// separator attached to the piece before it.
    fn split_pieces(&self, text: &str, separators: &[&str]) -> Vec<String> {
        if char_len(text) <= self.chunk_size {
            return vec![text.to_string()];
        }
        let Some((separator, rest)) = separators.split_first() else {
            return hard_split(text, self.chunk_size);
        };

        let mut out = Vec::new();
        for piece in text.split_inclusive(separator) {
            if char_len(piece) <= self.chunk_size {
                out.push(piece.to_string());
            } else {
                out.extend(self.split_pieces(piece, rest));
            }
        }
        out
    }

    fn merge(&self, pieces: Vec<String>) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut current = String::new();
        let mut current_len = 0;

        for piece in pieces {
            let piece_len = char_len(&piece);
            if current_len + piece_len > self.chunk_size && !current.trim().is_empty() {
                let overlap = tail_chars(&current, self.chunk_overlap);
                chunks.push(current.trim().to_string());
                current = overlap;
                current_len = char_len(&current);
                // The overlap must leave room for the next piece.
                if current_len + piece_len > self.chunk_size {
                    current.clear();
                    current_len = 0;
                }
            }
            current.push_str(&piece);
            current_len += piece_len;
        }

        if !current.trim().is_empty() {
            chunks.push(current.trim().to_string());
        }
        chunks
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn hard_split(text: &str, size: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars.chunks(size).map(|c| c.iter().collect()).collect()
}

/// Last `n` chars of `s`, advanced to the next word start when one exists
/// so the overlap does not begin mid-word.
fn tail_chars(s: &str, n: usize) -> String {
    if n == 0 {
        return String::new();
    }
    let total = char_len(s);
    let start = total.saturating_sub(n);
    let tail: String = s.chars().skip(start).collect();
    if start == 0 {
        return tail;
    }
    match tail.find(char::is_whitespace) {
        Some(pos) => tail[pos..].trim_start().to_string(),
        None => tail,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_produces_no_chunks() {
        let chunker = RecursiveChunker::new(1000, 200);
        assert!(chunker.split("").is_empty());
        assert!(chunker.split("   \n\n  ").is_empty());
    }

    #[test]
    fn test_short_text_is_single_chunk() {
        let chunker = RecursiveChunker::new(1000, 200);
        let chunks = chunker.split("Senior Rust engineer. Ten years of systems work.");
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0], "Senior Rust engineer. Ten years of systems work.");
    }

    #[test]
    fn test_chunks_respect_size_limit() {
        let chunker = RecursiveChunker::new(100, 20);
        let text = "word ".repeat(500);
        let chunks = chunker.split(&text);
        assert!(chunks.len() > 1);
        for c in &chunks {
            assert!(char_len(c) <= 100, "chunk of {} chars", char_len(c));
        }
    }

    #[test]
    fn test_consecutive_chunks_overlap() {
        let chunker = RecursiveChunker::new(50, 15);
        let text: String = (0..60).map(|i| format!("w{i} ")).collect();
        let chunks = chunker.split(&text);
        assert!(chunks.len() > 1);
        let last_word = chunks[0].split_whitespace().last().unwrap();
        assert!(
            chunks[1].contains(last_word),
            "{:?} does not carry {last_word}",
            chunks[1]
        );
    }

    #[test]
    fn test_prefers_paragraph_boundaries() {
        let chunker = RecursiveChunker::new(40, 0);
        let text = "Experience at Acme Corp.\n\nEducation at State University.";
        let chunks = chunker.split(text);
        assert_eq!(
            chunks,
            vec!["Experience at Acme Corp.", "Education at State University."]
        );
    }

    #[test]
    fn test_unbroken_text_is_hard_split() {
        let chunker = RecursiveChunker::new(10, 0);
        let chunks = chunker.split(&"x".repeat(25));
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[2], "xxxxx");
    }

    #[test]
    fn test_multibyte_text_never_panics() {
        let chunker = RecursiveChunker::new(7, 3);
        let chunks = chunker.split("éèêë ñößü 日本語のテキスト emoji 🦀🦀🦀");
        assert!(!chunks.is_empty());
        for c in &chunks {
            assert!(char_len(c) <= 7);
        }
    }
}

//! Terminator-terminated texts
//!
//! A suffix tree is built over a sequence whose last character occurs
//! nowhere else, so every suffix ends at a leaf. This module provides:
//!
//! - [`TerminatorText`]: one document plus its sentinel character
//! - [`TextSet`]: several terminator texts concatenated into the "full
//!   text" of a generalized tree, with a per-index segment lookup used to
//!   trim edges at document boundaries
//!
//! ## Layout
//!
//! For documents `xyz` (terminator `$`) and `abc` (terminator `%`):
//!
//! ```text
//! index:  0 1 2 3 4 5 6 7
//! char:   x y z $ a b c %
//! ends:         3       7
//! ```

use rustc_hash::{FxHashMap, FxHashSet};
use std::fmt;
use std::sync::Arc;

/// Index of a document inside a [`TextSet`]
pub type DocId = u32;

/// First terminator handed out automatically (start of the private use area)
pub const TERMINATOR_BASE: u32 = 0xE000;

/// Last code point usable as an automatic terminator
pub const TERMINATOR_LIMIT: u32 = 0x10_FFFD;

/// Errors raised while assembling texts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextError {
    /// The content already contains its own terminator
    TerminatorInContent { terminator: char, position: usize },
    /// Two texts use the same terminator
    DuplicateTerminator { terminator: char, doc: DocId },
    /// A text contains the terminator of another text
    ForeignTerminator {
        terminator: char,
        doc: DocId,
        position: usize,
    },
    /// No unused terminator character is left
    TerminatorsExhausted,
}

impl fmt::Display for TextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextError::TerminatorInContent {
                terminator,
                position,
            } => write!(
                f,
                "terminator {:?} occurs inside the content at position {}",
                terminator, position
            ),
            TextError::DuplicateTerminator { terminator, doc } => write!(
                f,
                "terminator {:?} of document {} is already used by another document",
                terminator, doc
            ),
            TextError::ForeignTerminator {
                terminator,
                doc,
                position,
            } => write!(
                f,
                "document {} contains foreign terminator {:?} at position {}",
                doc, terminator, position
            ),
            TextError::TerminatorsExhausted => write!(f, "no unused terminator character left"),
        }
    }
}

impl std::error::Error for TextError {}

/// First code point at or above `from` that is not in `used`
pub fn free_terminator(used: &FxHashSet<char>, from: u32) -> Result<char, TextError> {
    (from..=TERMINATOR_LIMIT)
        .filter_map(char::from_u32)
        .find(|t| !used.contains(t))
        .ok_or(TextError::TerminatorsExhausted)
}

/// A character sequence ending in a sentinel that occurs nowhere else in it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminatorText {
    /// Content followed by the terminator
    chars: Vec<char>,
}

#[allow(clippy::len_without_is_empty)]
impl TerminatorText {
    /// Create a text from string content and an explicit terminator
    pub fn new(content: &str, terminator: char) -> Result<Self, TextError> {
        Self::from_chars(content.chars(), terminator)
    }

    /// Create a text from a character sequence and an explicit terminator
    pub fn from_chars<I>(content: I, terminator: char) -> Result<Self, TextError>
    where
        I: IntoIterator<Item = char>,
    {
        let mut chars: Vec<char> = content.into_iter().collect();
        if let Some(position) = chars.iter().position(|&c| c == terminator) {
            return Err(TextError::TerminatorInContent {
                terminator,
                position,
            });
        }
        chars.push(terminator);
        Ok(Self { chars })
    }

    /// Length including the terminator
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// The sentinel character
    pub fn terminator(&self) -> char {
        self.chars[self.chars.len() - 1]
    }

    /// Content without the terminator
    pub fn content(&self) -> &[char] {
        &self.chars[..self.chars.len() - 1]
    }

    /// Content followed by the terminator
    pub fn as_chars(&self) -> &[char] {
        &self.chars
    }
}

/// Concatenation of terminator texts with segment lookup
#[derive(Debug, Clone)]
pub struct TextSet {
    chars: Arc<[char]>,
    /// Position of each segment's terminator, ascending
    ends: Vec<usize>,
    terminators: Vec<char>,
}

impl TextSet {
    /// Concatenate `texts`, checking that every terminator is unique to its text
    pub fn new(texts: &[TerminatorText]) -> Result<Self, TextError> {
        let mut owners: FxHashMap<char, DocId> = FxHashMap::default();
        for (doc, text) in texts.iter().enumerate() {
            let doc = doc as DocId;
            if owners.insert(text.terminator(), doc).is_some() {
                return Err(TextError::DuplicateTerminator {
                    terminator: text.terminator(),
                    doc,
                });
            }
        }

        let total: usize = texts.iter().map(TerminatorText::len).sum();
        let mut chars = Vec::with_capacity(total);
        let mut ends = Vec::with_capacity(texts.len());
        for (doc, text) in texts.iter().enumerate() {
            for (position, &c) in text.content().iter().enumerate() {
                if owners.contains_key(&c) {
                    return Err(TextError::ForeignTerminator {
                        terminator: c,
                        doc: doc as DocId,
                        position,
                    });
                }
            }
            chars.extend_from_slice(text.as_chars());
            ends.push(chars.len() - 1);
        }

        Ok(Self {
            chars: chars.into(),
            ends,
            terminators: texts.iter().map(TerminatorText::terminator).collect(),
        })
    }

    /// The full concatenated text
    pub fn chars(&self) -> &[char] {
        &self.chars
    }


    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Number of concatenated texts
    pub fn segment_count(&self) -> usize {
        self.ends.len()
    }

    /// All terminators, in segment order
    pub fn terminators(&self) -> &[char] {
        &self.terminators
    }

    pub fn is_terminator(&self, c: char) -> bool {
        self.terminators.contains(&c)
    }

    /// Segment containing `index`
    pub fn segment_of(&self, index: usize) -> DocId {
        self.ends.partition_point(|&end| end < index) as DocId
    }

    /// Position of the terminator closing the segment that contains `index`
    pub fn segment_end(&self, index: usize) -> usize {
        self.ends[self.segment_of(index) as usize]
    }

    /// Position where segment `doc` starts
    pub fn segment_start(&self, doc: DocId) -> usize {
        match doc {
            0 => 0,
            d => self.ends[d as usize - 1] + 1,
        }
    }

    /// Characters of segment `doc`, terminator included
    pub fn segment(&self, doc: DocId) -> &[char] {
        &self.chars[self.segment_start(doc)..=self.ends[doc as usize]]
    }

    /// Map a position in the full text to (document, offset within document)
    pub fn locate(&self, index: usize) -> (DocId, usize) {
        let doc = self.segment_of(index);
        (doc, index - self.segment_start(doc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(parts: &[(&str, char)]) -> TextSet {
        let texts: Vec<_> = parts
            .iter()
            .map(|(content, t)| TerminatorText::new(content, *t).unwrap())
            .collect();
        TextSet::new(&texts).unwrap()
    }

    #[test]
    fn test_terminator_appended() {
        let text = TerminatorText::new("banana", '$').unwrap();
        assert_eq!(text.len(), 7);
        assert_eq!(text.terminator(), '$');
        assert_eq!(text.content().iter().collect::<String>(), "banana");
    }

    #[test]
    fn test_terminator_inside_content_rejected() {
        let err = TerminatorText::new("a$b", '$').unwrap_err();
        assert_eq!(
            err,
            TextError::TerminatorInContent {
                terminator: '$',
                position: 1
            }
        );
    }

    #[test]
    fn test_free_terminator_skips_used_chars() {
        let used: FxHashSet<char> = ['x', '\u{E000}', '\u{E001}'].into_iter().collect();
        assert_eq!(free_terminator(&used, TERMINATOR_BASE), Ok('\u{E002}'));
        assert_eq!(free_terminator(&used, 0xE001), Ok('\u{E002}'));
        assert_eq!(free_terminator(&used, 0xE003), Ok('\u{E003}'));
    }

    #[test]
    fn test_free_terminator_exhausted() {
        let used: FxHashSet<char> = ['\u{10FFFD}'].into_iter().collect();
        assert_eq!(
            free_terminator(&used, TERMINATOR_LIMIT),
            Err(TextError::TerminatorsExhausted)
        );
    }

    #[test]
    fn test_segments() {
        let texts = set(&[("xyz", '$'), ("abc", '%'), ("", '#')]);
        assert_eq!(texts.len(), 9);
        assert_eq!(texts.segment_count(), 3);
        assert_eq!(texts.segment_of(0), 0);
        assert_eq!(texts.segment_of(3), 0);
        assert_eq!(texts.segment_of(4), 1);
        assert_eq!(texts.segment_of(8), 2);
        assert_eq!(texts.segment_end(5), 7);
        assert_eq!(texts.locate(6), (1, 2));
        assert_eq!(texts.segment(1), &['a', 'b', 'c', '%']);
        assert_eq!(texts.segment(2), &['#']);
        assert!(texts.is_terminator('%'));
        assert!(!texts.is_terminator('a'));
    }

    #[test]
    fn test_duplicate_terminator_rejected() {
        let texts = vec![
            TerminatorText::new("ab", '$').unwrap(),
            TerminatorText::new("cd", '$').unwrap(),
        ];
        assert!(matches!(
            TextSet::new(&texts),
            Err(TextError::DuplicateTerminator { doc: 1, .. })
        ));
    }

    #[test]
    fn test_foreign_terminator_rejected() {
        let texts = vec![
            TerminatorText::new("a%b", '$').unwrap(),
            TerminatorText::new("cd", '%').unwrap(),
        ];
        assert_eq!(
            TextSet::new(&texts).unwrap_err(),
            TextError::ForeignTerminator {
                terminator: '%',
                doc: 0,
                position: 1
            }
        );
    }

    #[test]
    fn test_empty_set() {
        let texts = TextSet::new(&[]).unwrap();
        assert!(texts.is_empty());
        assert_eq!(texts.segment_count(), 0);
    }
}

/*!
 * Sign units, sign sequences and the cursor model used by playback.
 */

use serde::{Deserialize, Serialize};

use crate::errors::SequenceError;

/// Kind of a sign unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    /// A dictionary sign for a whole word
    #[default]
    LexicalSign,
    /// A word spelled letter by letter
    FingerspellLetter,
}

impl UnitKind {
    /// Short label used by presentation layers
    pub fn label(&self) -> &'static str {
        match self {
            Self::LexicalSign => "sign",
            Self::FingerspellLetter => "fingerspell",
        }
    }
}

/// One element of a translated sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignUnit {
    index: usize,
    word: String,
    kind: UnitKind,
    media_ref: Option<String>,
}

impl SignUnit {
    /// Position of the unit in its sequence
    pub fn index(&self) -> usize {
        self.index
    }

    /// Display label (source word or letter)
    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn kind(&self) -> UnitKind {
        self.kind
    }

    /// Locator of the clip, if one exists
    pub fn media_ref(&self) -> Option<&str> {
        self.media_ref.as_deref()
    }

    /// A unit is playable when it carries a media locator
    pub fn is_playable(&self) -> bool {
        self.media_ref.is_some()
    }
}

/// Unit description before it is placed in a sequence
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UnitSpec {
    pub word: String,
    #[serde(default)]
    pub kind: UnitKind,
    #[serde(default)]
    pub media_ref: Option<String>,
}

impl UnitSpec {
    /// A lexical sign with an optional clip
    pub fn sign(word: impl Into<String>, media_ref: Option<&str>) -> Self {
        Self {
            word: word.into(),
            kind: UnitKind::LexicalSign,
            media_ref: media_ref.map(str::to_string),
        }
    }

    /// A fingerspelled unit with an optional clip
    pub fn fingerspell(word: impl Into<String>, media_ref: Option<&str>) -> Self {
        Self {
            word: word.into(),
            kind: UnitKind::FingerspellLetter,
            media_ref: media_ref.map(str::to_string),
        }
    }
}

/// Ordered, immutable list of sign units
///
/// Indices are assigned here, so they are always contiguous from 0. Empty
/// locators are normalized to "no media" and blank words are dropped.
/// Decoding goes through [`SignSequence::new`] as well; stored indices are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "EncodedSequence")]
pub struct SignSequence {
    units: Vec<SignUnit>,
}

#[derive(Deserialize)]
struct EncodedSequence {
    #[serde(default)]
    units: Vec<UnitSpec>,
}

impl From<EncodedSequence> for SignSequence {
    fn from(encoded: EncodedSequence) -> Self {
        Self::new(encoded.units)
    }
}

impl SignSequence {
    /// Build a sequence from unit descriptions
    pub fn new<I>(specs: I) -> Self
    where
        I: IntoIterator<Item = UnitSpec>,
    {
        let units = specs
            .into_iter()
            .filter(|spec| !spec.word.trim().is_empty())
            .enumerate()
            .map(|(index, spec)| SignUnit {
                index,
                word: spec.word,
                kind: spec.kind,
                media_ref: spec
                    .media_ref
                    .map(|m| m.trim().to_string())
                    .filter(|m| !m.is_empty()),
            })
            .collect();

        Self { units }
    }

    /// A sequence with nothing in it
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SignUnit> {
        self.units.get(index)
    }

    pub fn units(&self) -> &[SignUnit] {
        &self.units
    }

    /// Number of units that have a clip
    pub fn playable_count(&self) -> usize {
        self.units.iter().filter(|u| u.is_playable()).count()
    }
}

/// A sign sequence plus a playback cursor
///
/// The cursor lives in `[0, len]`; `len` means the sequence is exhausted.
#[derive(Debug, Clone, Default)]
pub struct SequenceModel {
    sequence: SignSequence,
    position: usize,
}

impl SequenceModel {
    pub fn new(sequence: SignSequence) -> Self {
        Self {
            sequence,
            position: 0,
        }
    }

    /// Replace the contents and rewind the cursor
    pub fn load(&mut self, sequence: SignSequence) {
        self.sequence = sequence;
        self.position = 0;
    }

    pub fn sequence(&self) -> &SignSequence {
        &self.sequence
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_exhausted(&self) -> bool {
        self.position >= self.sequence.len()
    }

    /// Unit under the cursor, `None` when exhausted
    pub fn current_unit(&self) -> Option<&SignUnit> {
        self.sequence.get(self.position)
    }

    /// Move one unit forward, saturating at the end
    pub fn advance(&mut self) {
        if self.position < self.sequence.len() {
            self.position += 1;
        }
    }

    /// Place the cursor on `target`, which may equal `len`
    pub fn seek(&mut self, target: usize) -> Result<(), SequenceError> {
        if target > self.sequence.len() {
            return Err(SequenceError::OutOfRange {
                index: i64::try_from(target).unwrap_or(i64::MAX),
                len: self.sequence.len(),
            });
        }
        self.position = target;
        Ok(())
    }

    /// Signed variant of [`SequenceModel::seek`] for callers holding user input
    pub fn seek_signed(&mut self, target: i64) -> Result<(), SequenceError> {
        let index = usize::try_from(target).map_err(|_| SequenceError::OutOfRange {
            index: target,
            len: self.sequence.len(),
        })?;
        self.seek(index)
    }

    /// First index at or after `from` whose unit has media
    pub fn find_next_playable(&self, from: usize) -> Option<usize> {
        self.sequence
            .units()
            .iter()
            .skip(from)
            .find(|unit| unit.is_playable())
            .map(SignUnit::index)
    }
}

//! Entity kinds managed by the suite.

use std::fmt;

/// The entity kinds the vocabulary suite manages.
///
/// Each kind owns exactly one collection file; kinds never share a backing
/// resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// A vocabulary word with definitions and category references.
    Word,
    /// A phrase referencing its constituent words.
    Phrase,
    /// An example sentence.
    Sentence,
    /// A grammatical or usage pattern.
    Pattern,
    /// A study topic grouping content.
    Topic,
    /// A part of speech (noun, verb, ...).
    PartOfSpeech,
    /// A reusable content component.
    Component,
    /// A category for organizing words.
    Category,
}

impl EntityKind {
    /// Returns all entity kinds.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Word,
            Self::Phrase,
            Self::Sentence,
            Self::Pattern,
            Self::Topic,
            Self::PartOfSpeech,
            Self::Component,
            Self::Category,
        ]
    }

    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Word => "word",
            Self::Phrase => "phrase",
            Self::Sentence => "sentence",
            Self::Pattern => "pattern",
            Self::Topic => "topic",
            Self::PartOfSpeech => "part-of-speech",
            Self::Component => "component",
            Self::Category => "category",
        }
    }

    /// Returns the collection file name for this kind.
    #[must_use]
    pub const fn file_name(&self) -> &'static str {
        match self {
            Self::Word => "words.json",
            Self::Phrase => "phrases.json",
            Self::Sentence => "sentences.json",
            Self::Pattern => "patterns.json",
            Self::Topic => "topics.json",
            Self::PartOfSpeech => "parts-of-speech.json",
            Self::Component => "components.json",
            Self::Category => "categories.json",
        }
    }

    /// Returns the file stem used in export file names.
    #[must_use]
    pub const fn file_stem(&self) -> &'static str {
        match self {
            Self::Word => "words",
            Self::Phrase => "phrases",
            Self::Sentence => "sentences",
            Self::Pattern => "patterns",
            Self::Topic => "topics",
            Self::PartOfSpeech => "parts-of-speech",
            Self::Component => "components",
            Self::Category => "categories",
        }
    }

    /// Parses an entity kind string.
    ///
    /// Returns `None` if the kind is not recognized.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "word" | "words" => Some(Self::Word),
            "phrase" | "phrases" => Some(Self::Phrase),
            "sentence" | "sentences" => Some(Self::Sentence),
            "pattern" | "patterns" => Some(Self::Pattern),
            "topic" | "topics" => Some(Self::Topic),
            "part-of-speech" | "parts-of-speech" | "pos" => Some(Self::PartOfSpeech),
            "component" | "components" => Some(Self::Component),
            "category" | "categories" => Some(Self::Category),
            _ => None,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

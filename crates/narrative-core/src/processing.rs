//! Analysis backend interfaces.
//!
//! Suggestions and enhanced text come from an external analysis service. This module defines
//! the engine-side shape of its results and the [`AnalysisBackend`] trait the
//! [`EditorSurface`](crate::EditorSurface) drives. `narrative-analysis` implements it over HTTP.

use crate::span::Span;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Result of an analyze call, already converted into spans.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisReport {
    /// Overall quality score, 0-100.
    pub overall_score: u8,
    /// Suggestion batch in service order.
    pub spans: Vec<Span>,
    /// `Some(true)` if tense is consistent throughout, when the service reports it.
    pub tense_consistent: Option<bool>,
    /// Readability score, 0-100, when the service reports it.
    pub readability_score: Option<f32>,
}

/// One entry of the enhancement edit log. Displayed verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditLogEntry {
    /// Operation tag (`REPLACE`, `INSERT`, `DELETE`, `RESTRUCTURE`, ...).
    pub operation: String,
    /// Original fragment (empty for inserts).
    pub original: String,
    /// Modified fragment (empty for deletes).
    pub modified: String,
    /// Why the edit was made.
    pub reason: String,
}

/// Result of an enhance call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnhancementReport {
    /// The fully revised document.
    pub revised_text: String,
    /// Ordered edit log.
    pub edit_log: Vec<EditLogEntry>,
    /// Score of the revised text, if computed.
    pub overall_score: Option<u8>,
}

/// Error returned when parsing a style or intensity name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} `{value}` (expected one of: {expected})")]
pub struct ParseOptionError {
    kind: &'static str,
    value: String,
    expected: &'static str,
}

/// Target voice for enhancement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WritingStyle {
    /// Keep the current voice.
    #[default]
    Neutral,
    /// Formal register.
    Formal,
    /// Casual register.
    Casual,
    /// Academic register.
    Academic,
    /// Narrative storytelling.
    Storytelling,
    /// Persuasive writing.
    Persuasive,
}

impl WritingStyle {
    /// All styles, in menu order.
    pub const ALL: [Self; 6] = [
        Self::Neutral,
        Self::Formal,
        Self::Casual,
        Self::Academic,
        Self::Storytelling,
        Self::Persuasive,
    ];

    /// Name used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::Formal => "formal",
            Self::Casual => "casual",
            Self::Academic => "academic",
            Self::Storytelling => "storytelling",
            Self::Persuasive => "persuasive",
        }
    }

    /// The next style in menu order, wrapping around.
    pub fn next(self) -> Self {
        let pos = Self::ALL.iter().position(|s| *s == self).unwrap_or(0);
        Self::ALL[(pos + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for WritingStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WritingStyle {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|style| style.as_str() == wanted)
            .ok_or_else(|| ParseOptionError {
                kind: "writing style",
                value: s.to_string(),
                expected: "neutral, formal, casual, academic, storytelling, persuasive",
            })
    }
}

/// How aggressively the service may rewrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EnhancementIntensity {
    /// Minimal edits (`light`).
    Conservative,
    /// Balanced edits (`moderate`).
    #[default]
    Moderate,
    /// Heavy rewriting (`heavy`).
    Aggressive,
}

impl EnhancementIntensity {
    /// All levels, mildest first.
    pub const ALL: [Self; 3] = [Self::Conservative, Self::Moderate, Self::Aggressive];

    /// User-facing name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Conservative => "conservative",
            Self::Moderate => "moderate",
            Self::Aggressive => "aggressive",
        }
    }

    /// The service's vocabulary for this level.
    pub fn external_level(self) -> &'static str {
        match self {
            Self::Conservative => "light",
            Self::Moderate => "moderate",
            Self::Aggressive => "heavy",
        }
    }

    /// The next level, wrapping around.
    pub fn next(self) -> Self {
        match self {
            Self::Conservative => Self::Moderate,
            Self::Moderate => Self::Aggressive,
            Self::Aggressive => Self::Conservative,
        }
    }
}

impl fmt::Display for EnhancementIntensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnhancementIntensity {
    type Err = ParseOptionError;

    /// Accepts both the user-facing names and the service vocabulary.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "conservative" | "light" => Ok(Self::Conservative),
            "moderate" => Ok(Self::Moderate),
            "aggressive" | "heavy" => Ok(Self::Aggressive),
            _ => Err(ParseOptionError {
                kind: "enhancement intensity",
                value: s.to_string(),
                expected: "conservative, moderate, aggressive",
            }),
        }
    }
}

/// Parameters of an enhance call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnhanceOptions {
    /// Target voice.
    pub style: WritingStyle,
    /// Rewrite intensity.
    pub intensity: EnhancementIntensity,
}

/// An external analysis collaborator.
///
/// Calls are synchronous. Implementations must not touch editor state; the surface applies a
/// successful result atomically and discards nothing on failure.
pub trait AnalysisBackend {
    /// The error type returned by both calls. Its `Display` is shown to the user.
    type Error;

    /// Analyze `text` and return a suggestion batch.
    fn analyze(&mut self, text: &str) -> Result<AnalysisReport, Self::Error>;

    /// Produce a revised version of `text`.
    fn enhance(
        &mut self,
        text: &str,
        options: EnhanceOptions,
    ) -> Result<EnhancementReport, Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intensity_vocabulary() {
        assert_eq!(EnhancementIntensity::Conservative.external_level(), "light");
        assert_eq!(EnhancementIntensity::Moderate.external_level(), "moderate");
        assert_eq!(EnhancementIntensity::Aggressive.external_level(), "heavy");
        assert_eq!(
            "heavy".parse::<EnhancementIntensity>(),
            Ok(EnhancementIntensity::Aggressive)
        );
        assert!("extreme".parse::<EnhancementIntensity>().is_err());
    }

    #[test]
    fn test_style_parse_and_cycle() {
        assert_eq!("Formal".parse::<WritingStyle>(), Ok(WritingStyle::Formal));
        assert_eq!(WritingStyle::Persuasive.next(), WritingStyle::Neutral);
        let err = "poetic".parse::<WritingStyle>().unwrap_err();
        assert!(err.to_string().contains("poetic"));
    }
}

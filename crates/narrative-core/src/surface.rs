//! Editor surface
//!
//! [`EditorSurface`] composes the buffer, the [`SpanSet`], the [`ViewState`] and the diff
//! renderer, and is the single place user intents are routed through.
//!
//! # Overview
//!
//! - **Buffer ownership**: the surface owns the document text and replaces it on every accept.
//! - **Version Tracking**: every state change bumps a version number; no-ops do not.
//! - **Change Notifications**: subscribers are called with a [`SurfaceChange`] after each
//!   change, including a [`TextDelta`] when an accept rewrote the buffer.
//! - **Backend calls**: [`run_analysis`](EditorSurface::run_analysis) and
//!   [`run_enhancement`](EditorSurface::run_enhancement) apply a result only if the backend
//!   call succeeded; failures leave every piece of state as it was.
//!
//! # Example
//!
//! ```rust
//! use narrative_core::{EditorSurface, Span, SpanCategory, SpanRange};
//!
//! let mut surface = EditorSurface::new("The cat sat.");
//! surface.load_spans(vec![Span::new(
//!     SpanRange::new(4, 7),
//!     SpanCategory::Style,
//!     "cat",
//!     "tabby",
//!     "More specific noun",
//! )]);
//!
//! assert!(surface.accept_span(0));
//! assert_eq!(surface.text(), "The tabby sat.");
//! assert_eq!(surface.active_spans().count(), 0);
//! ```

use crate::delta::TextDelta;
use crate::diff::{self, DiffView};
use crate::mutator;
use crate::processing::{
    AnalysisBackend, AnalysisReport, EditLogEntry, EnhanceOptions, EnhancementReport,
};
use crate::span::Span;
use crate::span_set::{CategoryCounts, OverlayMark, SpanSet};
use crate::stats::DocumentStats;
use crate::view::{ViewMode, ViewState};
use std::sync::Arc;

/// What kind of change a [`SurfaceChange`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceChangeKind {
    /// The buffer was replaced by a direct user edit.
    TextEdited,
    /// A new suggestion batch was loaded (or the batch was cleared).
    SuggestionsLoaded,
    /// A suggestion was accepted. The buffer may or may not have changed.
    SuggestionAccepted,
    /// A suggestion was rejected.
    SuggestionRejected,
    /// The open suggestion changed.
    SelectionChanged,
    /// The preferred view or the diff override changed.
    ViewChanged,
    /// An enhancement result was applied.
    EnhancementApplied,
    /// The document was reset.
    Reset,
}

/// Change record passed to subscribers.
#[derive(Debug, Clone)]
pub struct SurfaceChange {
    /// Change kind.
    pub kind: SurfaceChangeKind,
    /// Version before the change.
    pub old_version: u64,
    /// Version after the change.
    pub new_version: u64,
    /// Index of the suggestion involved, if any.
    pub span_index: Option<usize>,
    /// Structured buffer delta, present when an accept rewrote the buffer.
    pub text_delta: Option<Arc<TextDelta>>,
}

/// Subscriber callback type.
pub type SurfaceChangeCallback = Box<dyn FnMut(&SurfaceChange) + Send>;

/// The latest enhancement result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enhancement {
    /// The revised document (right-hand side of the diff).
    pub revised_text: String,
    /// Edit log, displayed verbatim.
    pub edit_log: Vec<EditLogEntry>,
}

/// Buffer + suggestions + view state.
pub struct EditorSurface {
    text: String,
    spans: SpanSet,
    view: ViewState,
    analyzed: bool,
    overall_score: Option<u8>,
    tense_consistent: Option<bool>,
    readability_score: Option<f32>,
    enhancement: Option<Enhancement>,
    version: u64,
    callbacks: Vec<SurfaceChangeCallback>,
}

impl std::fmt::Debug for EditorSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorSurface")
            .field("text_len", &self.text.len())
            .field("spans", &self.spans)
            .field("view", &self.view)
            .field("analyzed", &self.analyzed)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

impl EditorSurface {
    /// Create a surface over `text` with no suggestions.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            spans: SpanSet::new(),
            view: ViewState::new(),
            analyzed: false,
            overall_score: None,
            tense_consistent: None,
            readability_score: None,
            enhancement: None,
            version: 0,
            callbacks: Vec::new(),
        }
    }

    /// Subscribe to state changes.
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(&SurfaceChange) + Send + 'static,
    {
        self.callbacks.push(Box::new(callback));
    }

    /// Current version number.
    pub fn version(&self) -> u64 {
        self.version
    }

    fn notify(
        &mut self,
        kind: SurfaceChangeKind,
        span_index: Option<usize>,
        text_delta: Option<Arc<TextDelta>>,
    ) {
        let old_version = self.version;
        self.version += 1;
        let change = SurfaceChange {
            kind,
            old_version,
            new_version: self.version,
            span_index,
            text_delta,
        };
        for callback in &mut self.callbacks {
            callback(&change);
        }
    }

    // ---- buffer -------------------------------------------------------------------------

    /// The current buffer.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the buffer with a direct user edit.
    ///
    /// Suggestions stay loaded: they are located by content, so ones whose text survived the
    /// edit still apply.
    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text == self.text {
            return;
        }
        self.text = text;
        self.notify(SurfaceChangeKind::TextEdited, None, None);
    }

    /// Word count, reading time and friends for the current buffer.
    pub fn stats(&self) -> DocumentStats {
        DocumentStats::from_text(&self.text)
    }

    // ---- suggestions --------------------------------------------------------------------

    /// The span set (batch, resolution and selection state).
    pub fn spans(&self) -> &SpanSet {
        &self.spans
    }

    /// Active suggestions in batch order, with their indices.
    pub fn active_spans(&self) -> impl Iterator<Item = (usize, &Span)> + '_ {
        self.spans.active()
    }

    /// Active suggestion counts per category.
    pub fn category_counts(&self) -> CategoryCounts {
        self.spans.category_counts()
    }

    /// Where each active suggestion currently sits in the buffer.
    pub fn overlays(&self) -> Vec<OverlayMark> {
        self.spans.overlay(&self.text)
    }

    /// Replace the suggestion batch. An empty batch clears to "no suggestions".
    pub fn load_spans(&mut self, spans: Vec<Span>) {
        if self.spans.is_empty() && spans.is_empty() {
            return;
        }
        self.spans.load(spans);
        self.notify(SurfaceChangeKind::SuggestionsLoaded, None, None);
    }

    /// Toggle the open suggestion. Returns `true` if the selection changed.
    pub fn select_span(&mut self, index: usize) -> bool {
        if !self.spans.select(index) {
            return false;
        }
        self.notify(SurfaceChangeKind::SelectionChanged, Some(index), None);
        true
    }

    /// Close the open suggestion.
    pub fn clear_selection(&mut self) {
        if self.spans.clear_selection() {
            self.notify(SurfaceChangeKind::SelectionChanged, None, None);
        }
    }

    /// Accept suggestion `index`.
    ///
    /// Returns `false` if `index` was not active. A lookup miss still resolves the suggestion
    /// and returns `true`.
    pub fn accept_span(&mut self, index: usize) -> bool {
        let before_chars = self.text.chars().count();
        let Some(acceptance) = mutator::accept(&self.text, &mut self.spans, index) else {
            return false;
        };

        let delta = acceptance
            .edit
            .map(|edit| Arc::new(TextDelta::single(before_chars, edit)));
        if delta.is_some() {
            self.text = acceptance.text;
        }
        tracing::debug!(index, applied = delta.is_some(), "accepted suggestion");
        self.notify(SurfaceChangeKind::SuggestionAccepted, Some(index), delta);
        true
    }

    /// Reject suggestion `index`. Returns `false` if it was not active.
    pub fn reject_span(&mut self, index: usize) -> bool {
        if !mutator::reject(&mut self.spans, index) {
            return false;
        }
        tracing::debug!(index, "rejected suggestion");
        self.notify(SurfaceChangeKind::SuggestionRejected, Some(index), None);
        true
    }

    /// Accept the open suggestion, if any.
    pub fn accept_selected(&mut self) -> bool {
        let Some(index) = self.spans.selected() else {
            return false;
        };
        self.accept_span(index)
    }

    /// Reject the open suggestion, if any.
    pub fn reject_selected(&mut self) -> bool {
        let Some(index) = self.spans.selected() else {
            return false;
        };
        self.reject_span(index)
    }

    // ---- views --------------------------------------------------------------------------

    /// View state (preference + override).
    pub fn view(&self) -> ViewState {
        self.view
    }

    /// The view currently rendered.
    pub fn current_view(&self) -> ViewMode {
        self.view.current()
    }

    /// Record the user's view choice. Takes effect once the diff override is off.
    pub fn set_view(&mut self, mode: ViewMode) {
        if self.view.select(mode) {
            self.notify(SurfaceChangeKind::ViewChanged, None, None);
        }
    }

    /// Set the external diff override.
    pub fn set_show_diff(&mut self, show_diff: bool) {
        if self.view.set_show_diff(show_diff) {
            self.notify(SurfaceChangeKind::ViewChanged, None, None);
        }
    }

    /// Flip the external diff override.
    pub fn toggle_show_diff(&mut self) {
        self.view.toggle_show_diff();
        self.notify(SurfaceChangeKind::ViewChanged, None, None);
    }

    /// Whether the suggestion bar is visible: edit view, analyzed, something left to review.
    pub fn shows_suggestion_bar(&self) -> bool {
        self.analyzed && self.current_view() == ViewMode::Edit && self.spans.active_count() > 0
    }

    /// Diff of the buffer against the latest enhanced text (empty if none yet).
    pub fn diff(&self) -> DiffView {
        let revised = self
            .enhancement
            .as_ref()
            .map(|e| e.revised_text.as_str())
            .unwrap_or("");
        diff::render(&self.text, revised)
    }

    // ---- analysis results ---------------------------------------------------------------

    /// Whether an analysis (or enhancement) result has been applied.
    pub fn is_analyzed(&self) -> bool {
        self.analyzed
    }

    /// Latest overall score.
    pub fn overall_score(&self) -> Option<u8> {
        self.overall_score
    }

    /// Latest tense-consistency flag.
    pub fn tense_consistent(&self) -> Option<bool> {
        self.tense_consistent
    }

    /// Latest readability score.
    pub fn readability_score(&self) -> Option<f32> {
        self.readability_score
    }

    /// Latest enhancement result.
    pub fn enhancement(&self) -> Option<&Enhancement> {
        self.enhancement.as_ref()
    }

    /// Apply an analysis result: replace the batch and update scores.
    pub fn apply_analysis(&mut self, report: AnalysisReport) {
        tracing::info!(
            score = report.overall_score,
            suggestions = report.spans.len(),
            "applying analysis"
        );
        self.analyzed = true;
        self.overall_score = Some(report.overall_score);
        self.tense_consistent = report.tense_consistent;
        self.readability_score = report.readability_score;
        self.spans.load(report.spans);
        self.notify(SurfaceChangeKind::SuggestionsLoaded, None, None);
    }

    /// Apply an enhancement result and switch the diff override on.
    pub fn apply_enhancement(&mut self, report: EnhancementReport) {
        tracing::info!(
            edits = report.edit_log.len(),
            score = ?report.overall_score,
            "applying enhancement"
        );
        self.analyzed = true;
        self.overall_score = Some(report.overall_score.unwrap_or(0));
        self.enhancement = Some(Enhancement {
            revised_text: report.revised_text,
            edit_log: report.edit_log,
        });
        self.view.set_show_diff(true);
        self.notify(SurfaceChangeKind::EnhancementApplied, None, None);
    }

    /// Analyze the buffer with `backend` and apply the result.
    ///
    /// On error nothing changes and the error is returned for display.
    pub fn run_analysis<B: AnalysisBackend>(&mut self, backend: &mut B) -> Result<(), B::Error> {
        let report = backend.analyze(&self.text)?;
        self.apply_analysis(report);
        Ok(())
    }

    /// Enhance the buffer with `backend` and apply the result.
    ///
    /// On error nothing changes and the error is returned for display.
    pub fn run_enhancement<B: AnalysisBackend>(
        &mut self,
        backend: &mut B,
        options: EnhanceOptions,
    ) -> Result<(), B::Error> {
        let report = backend.enhance(&self.text, options)?;
        self.apply_enhancement(report);
        Ok(())
    }

    /// Start over with `text`: drop suggestions, enhancement, scores and the diff override.
    ///
    /// The preferred view is kept.
    pub fn reset(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.spans.clear();
        self.analyzed = false;
        self.overall_score = None;
        self.tense_consistent = None;
        self.readability_score = None;
        self.enhancement = None;
        self.view.set_show_diff(false);
        self.notify(SurfaceChangeKind::Reset, None, None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::{SpanCategory, SpanRange};

    #[test]
    fn test_noops_do_not_bump_version() {
        let mut surface = EditorSurface::new("abc");
        surface.set_text("abc");
        surface.load_spans(Vec::new());
        surface.set_view(ViewMode::Edit);
        surface.set_show_diff(false);
        assert!(!surface.select_span(0));
        assert!(!surface.accept_span(0));
        assert!(!surface.reject_span(0));
        surface.clear_selection();
        assert_eq!(surface.version(), 0);
    }

    #[test]
    fn test_suggestion_bar_visibility() {
        let mut surface = EditorSurface::new("abc");
        surface.apply_analysis(AnalysisReport {
            overall_score: 80,
            spans: vec![Span::new(
                SpanRange::new(0, 1),
                SpanCategory::Grammar,
                "a",
                "A",
                "",
            )],
            tense_consistent: Some(true),
            readability_score: None,
        });
        assert!(surface.shows_suggestion_bar());

        surface.set_view(ViewMode::Preview);
        assert!(!surface.shows_suggestion_bar());

        surface.set_view(ViewMode::Edit);
        surface.reject_span(0);
        assert!(!surface.shows_suggestion_bar());
    }
}

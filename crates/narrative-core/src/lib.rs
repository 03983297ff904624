#![warn(missing_docs)]
//! Narrative Core - Headless Suggestion Overlay & Text Mutation Engine
//!
//! # Overview
//!
//! `narrative-core` models a text buffer annotated with suggestion spans produced by an external
//! analysis service, the accept/reject protocol that rewrites the buffer, and a line-level diff
//! between the buffer and an enhanced revision. It does not render anything; front ends read
//! state from an [`EditorSurface`] and route user intents back into it.
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Editor Surface (views, intents, versions)  │  ← Public API
//! ├──────────────────────┬──────────────────────┤
//! │  Mutator             │  Diff Renderer       │  ← Buffer projections
//! ├──────────────────────┴──────────────────────┤
//! │  Span Set (batch, resolution, selection)    │  ← Suggestion state
//! ├─────────────────────────────────────────────┤
//! │  Span model + literal search                │  ← Data model
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use narrative_core::{EditorSurface, Span, SpanCategory, SpanRange, ViewMode};
//!
//! let mut surface = EditorSurface::new("He was nervous. He was nervous.");
//! surface.load_spans(vec![Span::new(
//!     SpanRange::new(0, 14),
//!     SpanCategory::Consistency,
//!     "He was nervous",
//!     "He felt anxious",
//!     "Consistent emotional vocabulary",
//! )]);
//!
//! // Only the first occurrence is replaced.
//! surface.accept_span(0);
//! assert_eq!(surface.text(), "He felt anxious. He was nervous.");
//!
//! surface.set_view(ViewMode::Preview);
//! assert_eq!(surface.current_view(), ViewMode::Preview);
//! ```
//!
//! # Module Description
//!
//! - [`span`] - suggestion span data model and category set
//! - [`span_set`] - batch ownership, resolution tracking, selection, overlay placement
//! - [`mutator`] - accept/reject protocol (content-based lookup)
//! - [`diff`] - positional line-by-line diff rendering
//! - [`view`] - view mode + diff override
//! - [`surface`] - the composed editor surface
//! - [`processing`] - analysis backend trait and result types

pub mod delta;
pub mod diff;
pub mod mutator;
pub mod processing;
pub mod search;
pub mod span;
pub mod span_set;
pub mod stats;
pub mod surface;
mod text;
pub mod view;

pub use delta::{TextDelta, TextDeltaEdit};
pub use diff::{BLANK_LINE_PLACEHOLDER, DiffRow, DiffView, format_side_by_side};
pub use mutator::{Acceptance, apply_suggestion};
pub use processing::{
    AnalysisBackend, AnalysisReport, EditLogEntry, EnhanceOptions, EnhancementIntensity,
    EnhancementReport, ParseOptionError, WritingStyle,
};
pub use search::TextMatch;
pub use span::{Span, SpanCategory, SpanError, SpanRange};
pub use span_set::{CategoryCounts, OverlayMark, SpanSet};
pub use stats::DocumentStats;
pub use surface::{
    EditorSurface, Enhancement, SurfaceChange, SurfaceChangeCallback, SurfaceChangeKind,
};
pub use view::{ViewMode, ViewState};

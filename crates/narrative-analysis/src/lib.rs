#![warn(missing_docs)]
//! `narrative-analysis` - HTTP backend for `narrative-core`.
//!
//! The analysis service lives behind two JSON endpoints (`POST {base}/analyze` and
//! `POST {base}/enhance`). This crate contains the wire types, the conversion of service payloads
//! into `narrative_core` spans and reports, and a blocking [`HttpAnalysisClient`] implementing
//! [`narrative_core::AnalysisBackend`].

pub mod client;
pub mod convert;
pub mod error;
pub mod wire;

pub use client::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT, HttpAnalysisClient};
pub use convert::{analysis_report_from_response, enhancement_report_from_response, issue_to_span};
pub use error::{AnalysisError, remote_error_message};
pub use wire::{
    AnalyzeRequest, AnalyzeResponse, ConsistencyIssue, EditItem, EnhanceRequest, EnhanceResponse,
};

//! Answer analysis via the external feedback endpoint.
//!
//! The endpoint transcribes the uploaded answer and scores it (STAR
//! breakdown, confidence metrics, strengths and improvements). This module
//! only uploads and parses; it never interprets the scores.

pub mod client;
pub mod feedback;

pub use client::AnalysisClient;
pub use feedback::{ConfidenceScore, Feedback, StarAnalysis};

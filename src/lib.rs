//! starprep — terminal interview practice with external AI feedback.
//!
//! Record a spoken answer to an interview question, upload it to an
//! analysis endpoint, and review the returned transcription, confidence
//! scores and STAR-method critique.

pub mod analysis;
pub mod app;
pub mod catalog;
pub mod commands;
pub mod config;
pub mod error;
pub mod history;
pub mod logging;
pub mod recording;
pub mod ui;
pub mod workflow;

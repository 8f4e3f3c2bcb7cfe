//! TUI module: Terminal User Interface using Ratatui.
//!
//! Provides a medical-themed interface for:
//! - Clinical feature input
//! - Risk prediction with the normalized input vector

mod app;
mod styles;
mod ui;

pub use app::{App, ArtifactEvaluator, Screen};
pub use styles::MedicalTheme;

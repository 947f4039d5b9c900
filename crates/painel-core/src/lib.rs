//! painel-core: core library for the indicator dashboard.
//!
//! This crate holds the domain types shared by the server, the TUI and the
//! CLI, plus the one subsystem with real design tension: the chart-data
//! [`normalizer`].
//!
//! # Architecture
//!
//! ```text
//! ChartConfig ──► normalizer ──► NormalizedTable ──► render::RenderPlan ──► UI
//!      ▲
//!      └── validation (submission path) ◄── store ◄── server
//! ```
//!
//! The normalizer is pure and synchronous. Everything that touches disk lives
//! in [`store`].

pub mod config;
pub mod normalizer;
pub mod render;
pub mod store;
pub mod types;
pub mod validation;

pub use normalizer::{
    normalize, Malformation, NormalizationError, NormalizedTable, Normalizer, Row, ShapeKind,
};
pub use render::{PlanKind, RenderPlan};
pub use store::{open_with_fallback, JsonFileStore, MemoryStore, PostStore, StoreError};
pub use types::{ChartConfig, ChartType, Post, PostUpdate, TopicDef, TopicId, TOPICS};
pub use validation::{validate_submission, SubmissionError, SubmissionForm};

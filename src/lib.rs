//! painel: indicator dashboard.
//!
//! The binary is a thin clap shell; the command bodies live in [`commands`]
//! so the integration harnesses can call them without spawning a process.
//!
//! # Architecture
//!
//! ```text
//!                 ┌──► painel-server (serve)
//! painel-core ────┼──► painel-tui    (tui)
//!                 └──► commands      (render, check)
//! ```

pub mod commands;

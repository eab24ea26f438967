//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Connect database → Configure port → Register routes → Ready
//!     any failure → Failed(step), never served
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → graceful shutdown of the HTTP server
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then database, then routes
//! - Every step is logged; no step is retried
//! - Listeners bind last, and only for a Ready startup

pub mod signals;
pub mod startup;

pub use signals::shutdown_signal;
pub use startup::{BootstrapOutcome, Bootstrapper, FailedStep, Stage, Startup, StartupError};

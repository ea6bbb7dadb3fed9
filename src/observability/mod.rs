//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! model (modifier accumulation, extension overwrites) → debug events
//! App::generate (path, endpoint count, size)          → info events
//! config watcher (reloads, failures)                  → info/error events
//!     → logging.rs subscriber (stderr)
//! ```

pub mod logging;

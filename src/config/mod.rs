//! Blueprint configuration subsystem.
//!
//! # Data Flow
//! ```text
//! blueprint file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks, all errors at once)
//!     → build.rs (drive the model builders)
//!     → App, ready for generate
//!
//! With --watch:
//!     watcher.rs detects change
//!     → loader.rs loads and validates
//!     → caller rebuilds and regenerates
//! ```
//!
//! # Design Decisions
//! - Blueprints only drive public builder operations; no shortcut into the model
//! - All optional fields have defaults to allow minimal blueprints
//! - Validation separates syntactic (serde) from semantic checks

pub mod build;
pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use build::build_app;
pub use loader::{load_app, load_blueprint, parse_blueprint, BlueprintError};
pub use schema::Blueprint;
pub use validation::ValidationError;

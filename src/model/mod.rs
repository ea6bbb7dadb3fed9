//! Gateway document model.
//!
//! # Data Flow
//! ```text
//! Backend (validated factory, fluent builders)
//!     → copied into Endpoint (new / add_backend)
//!     → Endpoint copied into App (add_endpoints)
//!     → App::generate writes the document once
//!
//! Plugin settings travel through extension maps:
//!     canned helpers / set_config → extra_config[namespace]
//!     modifier producers → ModifierChain → extra_config[martian namespace]
//!     JwsValidator::export_with_roles → endpoint extra_config[validator namespace]
//! ```
//!
//! # Design Decisions
//! - Validation failures are returned as `GeneratorError`, never abort the process
//! - Attaching clones the child, so the caller's builder stays independent
//! - Payloads are opaque JSON; nothing here interprets plugin settings

pub mod app;
pub mod auth;
pub mod backend;
pub mod endpoint;
pub mod extension;
pub mod modifiers;
pub mod rate_limit;
pub mod types;
pub mod vocabulary;

pub use app::App;
pub use auth::JwsValidator;
pub use backend::Backend;
pub use endpoint::Endpoint;
pub use extension::ExtraConfig;
pub use modifiers::{ModifierChain, ModifierEntry, ModifierLayout};
pub use types::{GeneratorError, GeneratorResult};
pub use vocabulary::{Algorithm, BackendEncoding, EndpointEncoding, Method, Scope};

//! The experimental-API usage gate.
//!
//! ## Layered design
//!
//! - **`policy`**: marker identity, severity, scope; policy extraction
//!   with container fallback
//! - **`context`**: body-usage classification over the parent-linked
//!   syntax tree
//! - **`relief`**: same-module, opt-in, and propagation acceptance
//! - **`usage`**: the per-reference orchestrator
//! - **`declaration`**: validation of marker/opt-in declarations
//!   themselves
//!
//! Everything here is purely functional over resolved, immutable inputs;
//! the only output channel is the diagnostic sink.

pub mod context;
pub mod declaration;
pub mod policy;
pub mod relief;
pub mod usage;

pub use context::{body_slot_of, is_body_usage, BodySlot};
pub use declaration::check_declaration;
pub use policy::{
    experimentalities, marker_policy, Experimentality, MarkerId, MarkerScope, Severity,
};
pub use usage::UsageChecker;

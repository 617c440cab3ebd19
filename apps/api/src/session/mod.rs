// Interactive optimization sessions: per-unit accept/reject state machine
// over a working copy, plus the process-local registry that owns them.
pub mod handlers;
pub mod registry;
pub mod state;

pub use registry::SessionRegistry;

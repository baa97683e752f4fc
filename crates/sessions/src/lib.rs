//! Session registry for the interview agent.
//!
//! One bounded [`SessionContext`](iv_contextpack::SessionContext) per session
//! id, created on first touch and dropped on explicit removal. There is no
//! idle expiry; state lives for the process lifetime.

pub mod registry;

pub use registry::{RegistryStats, SessionRegistry, SharedContext};

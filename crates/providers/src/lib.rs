pub mod anthropic;
pub mod generate;
pub mod openai_compat;
pub mod registry;
pub mod traits;
pub(crate) mod util;

#[cfg(any(test, feature = "test-support"))]
pub mod scripted;

// Re-exports for convenience.
pub use generate::Generator;
pub use registry::ProviderRegistry;
pub use traits::{ChatRequest, ChatResponse, LlmProvider};
pub use util::resolve_api_key;

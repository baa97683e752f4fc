//! Bounded per-session conversation state: the live exchange window, the
//! compressor that folds overflow into summaries, key-point extraction and
//! the digest renderer.

pub mod compress;
pub mod context;
pub mod keypoints;
pub mod render;
pub mod ring;
pub mod scores;
pub mod truncation;

pub use compress::CompressedSummary;
pub use context::{ContextStats, SessionContext, TranscriptEntry};
pub use ring::BoundedRing;
pub use scores::ScoreMeans;

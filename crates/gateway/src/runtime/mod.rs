pub mod decision;
pub mod parse;
pub mod question;
pub mod report;
pub mod session_lock;
pub mod stage;

pub use decision::TurnDecisionEngine;
pub use question::QuestionGenerator;
pub use report::ReportSynthesizer;
pub use session_lock::SessionLockMap;

pub mod api;
pub mod bootstrap;
pub mod cli;
pub mod error;
pub mod runtime;
pub mod state;

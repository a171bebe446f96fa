pub mod checks;
pub mod config;
pub mod error;
pub mod hook;
pub mod io;
pub mod manifest;
pub mod paths;
pub mod pipeline;
pub mod probe;
pub mod process;
pub mod report;
pub mod trigger;
pub mod types;
pub mod vcs;

pub use error::{PushgateError, Result};

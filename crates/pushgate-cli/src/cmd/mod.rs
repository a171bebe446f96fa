pub mod config;
pub mod gate;
pub mod hook;
pub mod run;

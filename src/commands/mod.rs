// src/commands/mod.rs
pub mod archive;
pub mod config;
pub mod diff;
pub mod download;
pub mod global;
pub mod notify;
pub mod redact;
pub mod run;
pub mod snapshot;

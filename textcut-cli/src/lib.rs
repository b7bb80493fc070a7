//! textcut CLI library
//!
//! This library provides the command-line host for the textcut
//! splitting and extraction engine.

pub mod commands;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod progress;

pub use error::CliError;

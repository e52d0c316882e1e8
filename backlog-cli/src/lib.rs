// ABOUTME: Library exports for the bl command-line client modules
// ABOUTME: Makes internal modules available to the binary and integration tests

pub mod cli;
pub mod cli_output;
pub mod commands;
pub mod completions;
pub mod config;
pub mod constants;
pub mod git;
pub mod output;
pub mod prompt;
pub mod types;
pub mod wizard;

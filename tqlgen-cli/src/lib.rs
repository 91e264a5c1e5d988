//! tqlgen CLI - Command-line interface for the TypeQL schema compiler.
//!
//! This crate provides the `tqlgen` binary, which turns a TypeQL schema
//! into a generated Rust module on stdout or in a file.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;

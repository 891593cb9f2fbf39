//! Spritesheets CLI library.
//!
//! This crate provides the sheet assembler integration, the end-to-end render
//! pipeline, and the command implementations behind the `spritesheets` binary.

pub mod assembler;
pub mod commands;
pub mod input;
pub mod pipeline;

//! Spritesheets End-to-End Test Infrastructure
//!
//! Integration tests drive the full pipeline with a fake tile renderer and a
//! scripted assembler, so they run without Blender.
//!
//! ## Running Tests
//!
//! ```bash
//! # Everything that does not need Blender
//! cargo test -p spritesheets-tests
//!
//! # Real Blender renders
//! SPRITESHEETS_RUN_BLENDER_TESTS=1 cargo test -p spritesheets-tests -- --ignored
//! ```

pub mod harness;

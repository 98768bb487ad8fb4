//! Blessings Day library crate, re-exporting every module for integration
//! testing.
//!
//! The binary crate (`main.rs`) is the actual game entry point.
//! This library crate exposes the same modules so that `tests/` integration
//! tests can drive scenes and systems without a window or GPU.

pub mod shared;
pub mod config;
pub mod data;
pub mod input;
pub mod flow;
pub mod setup;
pub mod dialogue;
pub mod player;
pub mod world;
pub mod celebration;
pub mod ui;

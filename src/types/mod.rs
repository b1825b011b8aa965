//! Core types for Colloquy.

pub mod content;

pub use content::*;

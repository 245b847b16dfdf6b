//! Docs Companion LSP - documentation lookups for the symbol under the cursor
//!
//! This crate provides a Language Server Protocol implementation that resolves
//! symbols against the project's `package.json` (fetching metadata from the
//! npm registry), a table of JavaScript builtins, or neither, and pushes the
//! result to an editor side panel.

pub mod backend;
pub mod builtins;
pub mod config;
pub mod docs;
pub mod document;
pub mod file_types;
pub mod imports;
pub mod manifest;
pub mod registries;
pub mod render;
pub mod resolver;
pub mod sink;
pub mod utils;

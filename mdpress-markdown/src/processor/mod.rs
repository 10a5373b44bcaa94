//! Markdown rendering pipeline.
//!
//! # Architecture
//!
//! - [`core`]: the renderer and its fixed stage order
//! - [`process`]: file-level helpers and panic recovery
//! - `blocks`: fences, headings, quotes, rules, paragraphs, whitespace
//! - `inline`: code spans, emphasis, images and links
//! - `lists`: the nested list scan
//! - `tables`: pipe tables
//! - `stash`: placeholders that shield finished fragments from later stages
mod blocks;
pub mod core;
mod inline;
mod lists;
pub mod process;
mod stash;
mod tables;

pub use self::core::{MarkdownRenderer, render};

pub use lists::ListKind;
pub use process::{render_file, render_with_recovery};

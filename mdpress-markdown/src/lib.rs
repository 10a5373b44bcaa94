//! # mdpress-markdown
//!
//! A small, line-oriented Markdown to HTML renderer whose output is meant to
//! be dropped straight into a WordPress post body.
//!
//! It deliberately covers a fixed subset of Markdown: fenced code blocks,
//! `#`-style headings (levels 1-4), inline code, bold, italic, links, images,
//! single-line block quotes, horizontal rules, nested lists and pipe tables.
//! Anything else passes through and ends up wrapped in a paragraph. Rendering
//! never fails; malformed input degrades to literal text.
//!
//! ## Quick Start
//!
//! ```rust
//! use mdpress_markdown::{MarkdownRenderer, RenderOptions};
//!
//! let renderer = MarkdownRenderer::new(RenderOptions::default());
//! let result = renderer.render("# Hello World\n\nThis is **bold** text.");
//!
//! assert!(result.html.contains("<h1>Hello World</h1>"));
//! assert_eq!(result.title.as_deref(), Some("Hello World"));
//! ```
//!
//! ## Dropping a duplicated title
//!
//! WordPress renders the post title on its own, so a document whose first
//! line repeats that title can have it removed before rendering:
//!
//! ```rust
//! use mdpress_markdown::{RenderOptions, render};
//!
//! let options = RenderOptions {
//!   skip_leading_heading: true,
//!   ..Default::default()
//! };
//! let html = render("# Title\n\nBody", &options);
//! assert_eq!(html, "<p>Body</p>");
//! ```

mod error;
pub mod processor;
mod types;
pub mod utils;

pub use crate::{
  error::RenderError,
  processor::{
    ListKind,
    MarkdownRenderer,
    render,
    render_file,
    render_with_recovery,
  },
  types::{RenderOptions, RenderOptionsBuilder, RenderResult},
  utils::collect_markdown_files,
};

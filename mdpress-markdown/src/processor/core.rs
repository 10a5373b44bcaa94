//! Core implementation of the Markdown renderer.
//!
//! The stages run in a fixed order and each one consumes the text produced
//! by the previous stage. Fences go first so nothing inside a code block is
//! ever read as Markdown; paragraph wrapping goes last so it only sees what
//! the earlier stages did not turn into block-level HTML.
use log::trace;

use super::{
  blocks,
  inline,
  lists,
  stash::Stash,
  tables,
};
use crate::{
  types::{RenderOptions, RenderResult},
  utils,
};

/// Main Markdown renderer.
///
/// Holds no state besides its options, so it is cheap to clone and safe to
/// share between threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownRenderer {
  options: RenderOptions,
}

impl MarkdownRenderer {
  /// Create a new `MarkdownRenderer` with the given options.
  #[must_use]
  pub const fn new(options: RenderOptions) -> Self {
    Self { options }
  }

  /// Access renderer options.
  #[must_use]
  pub const fn options(&self) -> &RenderOptions {
    &self.options
  }

  /// Render Markdown into HTML and report the document title.
  #[must_use]
  pub fn render(&self, content: &str) -> RenderResult {
    RenderResult {
      html:  self.render_html(content),
      title: utils::extract_title_from_markdown(content),
    }
  }

  /// Render Markdown into an HTML fragment.
  #[must_use]
  pub fn render_html(&self, content: &str) -> String {
    let content = content.replace("\r\n", "\n");
    let mut stash = Stash::new();

    let text = blocks::extract_fences(&content, &mut stash, &self.options);
    trace!("Extracted fenced code blocks");

    let text = if self.options.skip_leading_heading {
      blocks::strip_leading_heading(&text)
    } else {
      text
    };

    let text = blocks::convert_headings(&text);
    let text = inline::convert_spans(&text, &mut stash);
    let text = blocks::convert_quotes_and_rules(&text);
    let text = lists::convert_lists(&text);
    let text = tables::convert_tables(&text, &self.options);
    trace!("Converted block structure");

    let text = blocks::wrap_paragraphs(&text);
    let text = blocks::normalize_whitespace(&text);

    stash.restore(&text)
  }
}

/// Render a document with the given options.
///
/// Shorthand for `MarkdownRenderer::new(*options).render_html(document)`.
#[must_use]
pub fn render(document: &str, options: &RenderOptions) -> String {
  MarkdownRenderer::new(*options).render_html(document)
}

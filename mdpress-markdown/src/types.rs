//! Types for the mdpress-markdown public API.
use serde::{Deserialize, Serialize};

/// Options for a single render call.
///
/// # Examples
///
/// ```
/// use mdpress_markdown::{MarkdownRenderer, RenderOptions};
///
/// let options = RenderOptions {
///   skip_leading_heading: true,
///   block_classes: false,
/// };
///
/// let renderer = MarkdownRenderer::new(options);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
  /// Drop the first line of the document when it is a level-1 heading.
  ///
  /// Used when the post title already duplicates the document's own top
  /// heading.
  pub skip_leading_heading: bool,

  /// Emit WordPress block-editor class names (`wp-block-code`,
  /// `wp-block-table`) on code blocks and tables.
  pub block_classes: bool,
}

impl Default for RenderOptions {
  fn default() -> Self {
    Self {
      skip_leading_heading: false,
      block_classes:        true,
    }
  }
}

/// Builder for constructing `RenderOptions` with method chaining.
#[derive(Debug, Clone, Default)]
pub struct RenderOptionsBuilder {
  options: RenderOptions,
}

impl RenderOptionsBuilder {
  /// Create a new builder with default options.
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Enable or disable leading heading suppression.
  #[must_use]
  pub const fn skip_leading_heading(mut self, enabled: bool) -> Self {
    self.options.skip_leading_heading = enabled;
    self
  }

  /// Enable or disable WordPress block classes.
  #[must_use]
  pub const fn block_classes(mut self, enabled: bool) -> Self {
    self.options.block_classes = enabled;
    self
  }

  /// Build the final `RenderOptions`.
  #[must_use]
  pub const fn build(self) -> RenderOptions {
    self.options
  }
}

/// Result of rendering a document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RenderResult {
  /// Rendered HTML fragment.
  pub html: String,

  /// Text of the first level-1 heading in the source, if any.
  pub title: Option<String>,
}

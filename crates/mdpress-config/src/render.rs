use mdpress_markdown::RenderOptions;
use serde::{Deserialize, Serialize};

/// Renderer settings shared by every command that produces HTML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
  /// Emit WordPress block-editor classes on code blocks and tables.
  pub block_classes: bool,
}

impl Default for RenderConfig {
  fn default() -> Self {
    Self {
      block_classes: true,
    }
  }
}

impl RenderConfig {
  /// Renderer options for this configuration.
  ///
  /// Whether to drop the leading heading is decided per document, so it is
  /// always off here.
  #[must_use]
  pub const fn to_options(self) -> RenderOptions {
    RenderOptions {
      skip_leading_heading: false,
      block_classes:        self.block_classes,
    }
  }
}

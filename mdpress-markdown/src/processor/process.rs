//! File-level and error-recovering entry points.
use std::{fs, path::Path};

use log::error;

use super::core::MarkdownRenderer;
use crate::{
  error::RenderError,
  types::{RenderOptions, RenderResult},
  utils::escape::escape_html,
};

/// Render with a last-resort fallback.
///
/// The renderer is not expected to panic, but a publishing run should not
/// abort because of one odd document. On a panic the source is returned
/// escaped inside a single paragraph.
#[must_use]
pub fn render_with_recovery(
  renderer: &MarkdownRenderer,
  content: &str,
) -> RenderResult {
  match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
    renderer.render(content)
  })) {
    Ok(result) => result,
    Err(panic_err) => {
      error!("Panic during markdown rendering: {panic_err:?}");
      RenderResult {
        html:  format!("<p>{}</p>", escape_html(content.trim())),
        title: None,
      }
    },
  }
}

/// Read a Markdown file and render it.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn render_file(
  path: &Path,
  options: &RenderOptions,
) -> Result<RenderResult, RenderError> {
  let content =
    fs::read_to_string(path).map_err(|source| RenderError::Read {
      path: path.to_path_buf(),
      source,
    })?;

  let renderer = MarkdownRenderer::new(*options);
  Ok(render_with_recovery(&renderer, &content))
}

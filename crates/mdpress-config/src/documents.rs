use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One entry of the batch publishing manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentEntry {
  /// Markdown file, relative to the working directory.
  pub file: PathBuf,

  /// Post title. Inferred from the document when absent.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub title: Option<String>,

  /// Tag names to attach to the post.
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub tags: Vec<String>,
}

impl DocumentEntry {
  /// Create an entry for `file` with no explicit title or tags.
  #[must_use]
  pub fn new(file: impl Into<PathBuf>) -> Self {
    Self {
      file:  file.into(),
      title: None,
      tags:  Vec::new(),
    }
  }
}

use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors surfaced by the file-level helpers. Rendering itself is infallible.
#[derive(Debug, Error)]
pub enum RenderError {
  #[error("Failed to read markdown file {}: {source}", path.display())]
  Read {
    path:   PathBuf,
    #[source]
    source: io::Error,
  },
}

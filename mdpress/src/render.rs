//! The `render` command: Markdown in, HTML out, no network.
use std::{
  fs,
  io::Write,
  path::{Path, PathBuf},
};

use color_eyre::eyre::{Result, WrapErr, bail};
use log::{debug, info};
use mdpress_markdown::{RenderOptions, collect_markdown_files, render_file};
use rayon::prelude::*;

fn write_html(path: &Path, html: &str) -> Result<()> {
  if let Some(parent) = path.parent()
    && !parent.as_os_str().is_empty()
  {
    fs::create_dir_all(parent).wrap_err_with(|| {
      format!("Failed to create directory: {}", parent.display())
    })?;
  }
  fs::write(path, html)
    .wrap_err_with(|| format!("Failed to write {}", path.display()))
}

/// Render one file into `output`, or into `out` when no output is given.
///
/// # Errors
///
/// Returns an error if the input cannot be read or the output written.
pub fn render_single<W: Write>(
  input: &Path,
  output: Option<&Path>,
  options: &RenderOptions,
  out: &mut W,
) -> Result<()> {
  let result = render_file(input, options)?;
  match output {
    Some(path) => {
      write_html(path, &result.html)?;
      info!("Rendered {} -> {}", input.display(), path.display());
    },
    None => writeln!(out, "{}", result.html)?,
  }
  Ok(())
}

/// Render every `.md` file under `input_dir` into `output_dir`, keeping the
/// relative layout and switching the extension to `.html`.
///
/// Returns the paths written, relative to `output_dir`.
///
/// # Errors
///
/// Returns an error if any file cannot be read or written.
pub fn render_directory(
  input_dir: &Path,
  output_dir: &Path,
  options: &RenderOptions,
) -> Result<Vec<PathBuf>> {
  let files = collect_markdown_files(input_dir);
  debug!("Rendering {} files from {}", files.len(), input_dir.display());

  let mut written = files
    .par_iter()
    .map(|file_path| -> Result<PathBuf> {
      let rel_path = file_path.strip_prefix(input_dir).wrap_err_with(|| {
        format!(
          "{} is not under {}",
          file_path.display(),
          input_dir.display()
        )
      })?;
      let rel_html = rel_path.with_extension("html");
      let result = render_file(file_path, options)?;
      write_html(&output_dir.join(&rel_html), &result.html)?;
      Ok(rel_html)
    })
    .collect::<Result<Vec<_>>>()?;

  written.sort();
  Ok(written)
}

/// Dispatch on whether `input` is a file or a directory.
///
/// Returns the number of documents rendered.
///
/// # Errors
///
/// Returns an error if `input` does not exist, if a directory is given
/// without an output directory, or if rendering fails.
pub fn run_render<W: Write>(
  input: &Path,
  output: Option<&Path>,
  options: &RenderOptions,
  out: &mut W,
) -> Result<usize> {
  if input.is_dir() {
    let Some(output_dir) = output else {
      bail!(
        "Rendering a directory needs an output directory (--output <DIR>)"
      );
    };
    let written = render_directory(input, output_dir, options)?;
    info!(
      "Rendered {} documents into {}",
      written.len(),
      output_dir.display()
    );
    Ok(written.len())
  } else if input.is_file() {
    render_single(input, output, options, out)?;
    Ok(1)
  } else {
    bail!("Input not found: {}", input.display());
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, reason = "Fine in tests")]

  use super::*;

  #[test]
  fn test_single_file_to_writer() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("doc.md");
    fs::write(&input, "Some *text*").unwrap();

    let mut out = Vec::new();
    let count =
      run_render(&input, None, &RenderOptions::default(), &mut out).unwrap();
    assert_eq!(count, 1);
    assert_eq!(String::from_utf8(out).unwrap(), "<p>Some <em>text</em></p>\n");
  }

  #[test]
  fn test_directory_needs_output() {
    let dir = tempfile::tempdir().unwrap();
    let err = run_render(dir.path(), None, &RenderOptions::default(), &mut Vec::new())
      .unwrap_err();
    assert!(err.to_string().contains("--output"));
  }

  #[test]
  fn test_missing_input() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.md");
    assert!(
      run_render(&missing, None, &RenderOptions::default(), &mut Vec::new())
        .is_err()
    );
  }
}

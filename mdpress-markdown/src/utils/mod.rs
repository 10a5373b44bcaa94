use std::{
  path::{Path, PathBuf},
  sync::LazyLock,
};

use log::{error, trace};
use regex::Regex;
use walkdir::WalkDir;

pub mod escape;

static LEADING_HEADING_RE: LazyLock<Regex> =
  LazyLock::new(|| compile_or_never(r"^#+[ \t]*(.*?)[ \t]*$"));

static TITLE_HEADING_RE: LazyLock<Regex> =
  LazyLock::new(|| compile_or_never(r"^#[ \t]+(.+?)[ \t]*$"));

/// Compile a regex, logging and falling back to [`never_matching_regex`] if
/// the pattern is invalid.
///
/// Every pattern in this crate is a literal, so the fallback only matters if
/// one of them is ever edited into something invalid.
pub(crate) fn compile_or_never(pattern: &str) -> Regex {
  Regex::new(pattern).unwrap_or_else(|e| {
    error!(
      "Failed to compile regex {pattern:?}: {e}\n Falling back to never \
       matching regex."
    );
    never_matching_regex()
  })
}

/// Create a regex that never matches anything.
///
/// This is used as a fallback pattern when a regex fails to compile.
#[must_use]
pub fn never_matching_regex() -> Regex {
  #[allow(
    clippy::expect_used,
    reason = "This pattern is guaranteed to be valid"
  )]
  Regex::new(r"[^\s\S]").expect("regex pattern [^\\s\\S] should always compile")
}

/// Collect all markdown files under a directory.
pub fn collect_markdown_files(input_dir: &Path) -> Vec<PathBuf> {
  let mut files = Vec::new();

  for entry in WalkDir::new(input_dir)
    .follow_links(true)
    .sort_by_file_name()
    .into_iter()
    .filter_map(Result::ok)
  {
    let path = entry.path();
    if path.is_file() && path.extension().is_some_and(|ext| ext == "md") {
      files.push(path.to_owned());
    }
  }

  trace!("Found {} markdown files to process", files.len());
  files
}

/// Return the text of the document's first line when that line is a heading
/// of any level.
#[must_use]
pub fn first_line_heading(content: &str) -> Option<String> {
  let first_line = content.lines().next()?.trim();
  if !first_line.starts_with('#') {
    return None;
  }
  LEADING_HEADING_RE
    .captures(first_line)
    .map(|caps| caps[1].to_string())
    .filter(|text| !text.is_empty())
}

/// Whether the document opens with a level-1 heading whose text equals
/// `title`.
///
/// Only a level-1 heading on the very first line qualifies, which is exactly
/// what [`RenderOptions::skip_leading_heading`](crate::RenderOptions) removes.
#[must_use]
pub fn heading_matches_title(content: &str, title: &str) -> bool {
  content
    .lines()
    .next()
    .and_then(|line| TITLE_HEADING_RE.captures(line))
    .is_some_and(|caps| &caps[1] == title.trim())
}

/// Extract the first level-1 heading of the document, ignoring anything inside
/// fenced code blocks.
#[must_use]
pub fn extract_title_from_markdown(content: &str) -> Option<String> {
  let mut in_fence = false;
  for line in content.lines() {
    if line.trim_start().starts_with("```") {
      in_fence = !in_fence;
      continue;
    }
    if in_fence {
      continue;
    }
    if let Some(caps) = TITLE_HEADING_RE.captures(line) {
      return Some(caps[1].to_string());
    }
  }
  None
}

/// Derive a human readable title from a file name.
///
/// `service-access.md` becomes `Service Access`.
#[must_use]
pub fn title_from_path(path: &Path) -> String {
  path
    .file_stem()
    .map(|stem| stem.to_string_lossy())
    .unwrap_or_default()
    .split(['-', '_', ' '])
    .filter(|word| !word.is_empty())
    .map(|word| capitalize_first(&word.to_lowercase()))
    .collect::<Vec<_>>()
    .join(" ")
}

/// Capitalize the first letter of a string.
#[must_use]
pub fn capitalize_first(s: &str) -> String {
  let mut chars = s.chars();
  chars.next().map_or_else(String::new, |c| {
    c.to_uppercase().collect::<String>() + chars.as_str()
  })
}

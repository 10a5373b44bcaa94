//! Repair posts whose markup was escaped on its way into WordPress.
//!
//! Detection looks at the rendered content only and is deliberately
//! conservative. Nothing is changed before the caller confirms.
use std::io::{BufRead, Write};

use color_eyre::eyre::{Result, WrapErr};
use log::{debug, warn};
use mdpress_markdown::utils::escape::{
  contains_escaped_markup,
  looks_double_escaped,
  unescape_html,
};
use mdpress_wordpress::{PostStore, RemotePost};

/// A post that appears to show its HTML as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
  pub id:    u64,
  pub title: String,
  pub link:  String,
}

impl From<&RemotePost> for Candidate {
  fn from(post: &RemotePost) -> Self {
    Self {
      id:    post.id,
      title: post.title.rendered.clone(),
      link:  post.link.clone(),
    }
  }
}

/// What happened to a single candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepairOutcome {
  Fixed,
  /// The raw content had nothing to unescape.
  Unchanged,
  Failed(String),
}

/// Outcome of a repair run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RepairReport {
  pub candidates: Vec<Candidate>,
  /// Empty when the run was cancelled.
  pub outcomes:   Vec<(u64, RepairOutcome)>,
  pub cancelled:  bool,
}

impl RepairReport {
  /// Number of posts that were rewritten.
  #[must_use]
  pub fn fixed(&self) -> usize {
    self
      .outcomes
      .iter()
      .filter(|(_, outcome)| *outcome == RepairOutcome::Fixed)
      .count()
  }
}

/// List recent posts and keep those that look double-escaped.
///
/// # Errors
///
/// Returns an error if the posts cannot be listed.
pub fn find_candidates<S: PostStore + ?Sized>(
  store: &S,
  per_page: u32,
) -> Result<Vec<Candidate>> {
  let posts = store.list_posts(per_page).wrap_err("Failed to list posts")?;
  debug!("Inspecting {} posts", posts.len());
  Ok(
    posts
      .iter()
      .filter(|post| looks_double_escaped(&post.content.rendered))
      .map(Candidate::from)
      .collect(),
  )
}

/// Fetch a post's raw content, unescape it and save it back.
///
/// Only the four standard entities are reversed, in a single pass.
pub fn repair_post<S: PostStore + ?Sized>(store: &S, id: u64) -> RepairOutcome {
  let post = match store.get_post(id) {
    Ok(post) => post,
    Err(e) => return RepairOutcome::Failed(e.to_string()),
  };

  let Some(raw) = post.content.raw.as_deref() else {
    warn!("Post {id} came back without raw content");
    return RepairOutcome::Failed("raw content unavailable".to_string());
  };

  if !contains_escaped_markup(raw) {
    return RepairOutcome::Unchanged;
  }

  match store.update_post(id, &unescape_html(raw)) {
    Ok(_) => RepairOutcome::Fixed,
    Err(e) => RepairOutcome::Failed(e.to_string()),
  }
}

/// Ask on `out` and read a `y` answer from `input`.
///
/// # Errors
///
/// Returns an error if the prompt cannot be written or the answer read.
pub fn confirm<R: BufRead, W: Write>(
  input: &mut R,
  out: &mut W,
  prompt: &str,
) -> Result<bool> {
  write!(out, "{prompt} (y/n): ")?;
  out.flush()?;
  let mut answer = String::new();
  input.read_line(&mut answer)?;
  Ok(answer.trim().eq_ignore_ascii_case("y"))
}

/// Detect, list, confirm and fix.
///
/// `approve` sees the candidates and decides whether to go ahead; it is not
/// called when there is nothing to fix.
///
/// # Errors
///
/// Returns an error if listing fails, writing to `out` fails, or `approve`
/// fails.
pub fn run_repair<S, W, F>(
  store: &S,
  per_page: u32,
  out: &mut W,
  approve: F,
) -> Result<RepairReport>
where
  S: PostStore + ?Sized,
  W: Write,
  F: FnOnce(&mut W, &[Candidate]) -> Result<bool>,
{
  let candidates = find_candidates(store, per_page)?;
  let mut report = RepairReport {
    candidates,
    ..Default::default()
  };

  if report.candidates.is_empty() {
    writeln!(out, "No posts with HTML display issues found.")?;
    return Ok(report);
  }

  writeln!(
    out,
    "Found {} posts with HTML display issues:",
    report.candidates.len()
  )?;
  for candidate in &report.candidates {
    writeln!(out, "  - {} (ID: {})", candidate.title, candidate.id)?;
  }

  if !approve(out, &report.candidates)? {
    writeln!(out, "Cancelled.")?;
    report.cancelled = true;
    return Ok(report);
  }

  for candidate in &report.candidates {
    let outcome = repair_post(store, candidate.id);
    match &outcome {
      RepairOutcome::Fixed => writeln!(out, "  Fixed: {}", candidate.title)?,
      RepairOutcome::Unchanged => {
        writeln!(out, "  Nothing to fix: {}", candidate.title)?;
      },
      RepairOutcome::Failed(reason) => {
        writeln!(out, "  Failed: {} ({reason})", candidate.title)?;
      },
    }
    report.outcomes.push((candidate.id, outcome));
  }

  writeln!(
    out,
    "Fixed {} out of {} posts.",
    report.fixed(),
    report.candidates.len()
  )?;
  Ok(report)
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, reason = "Fine in tests")]

  use std::io::Cursor;

  use super::*;

  #[test]
  fn test_confirm_accepts_only_y() {
    for (answer, expected) in
      [("y\n", true), ("Y\n", true), ("yes\n", false), ("\n", false), ("", false)]
    {
      let mut out = Vec::new();
      let ok = confirm(&mut Cursor::new(answer), &mut out, "Fix?").unwrap();
      assert_eq!(ok, expected, "answer {answer:?}");
      assert_eq!(String::from_utf8(out).unwrap(), "Fix? (y/n): ");
    }
  }
}

//! Publishing workflows: one file, or the whole configured manifest.
use std::{
  fs,
  io::Write,
  path::{Path, PathBuf},
  thread,
};

use color_eyre::eyre::{Result, WrapErr, bail};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use mdpress_config::Config;
use mdpress_markdown::{
  MarkdownRenderer,
  RenderOptions,
  render_with_recovery,
  utils::{first_line_heading, heading_matches_title, title_from_path},
};
use mdpress_wordpress::{NewPost, PostLocator, PostStore, SiteStatus};

/// Pick the post title.
///
/// An explicit title wins, then a heading on the document's first line, then
/// a title derived from the file name.
#[must_use]
pub fn infer_title(content: &str, path: &Path, explicit: Option<&str>) -> String {
  explicit
    .map(str::trim)
    .filter(|title| !title.is_empty())
    .map(ToString::to_string)
    .or_else(|| first_line_heading(content))
    .unwrap_or_else(|| title_from_path(path))
}

/// A rendered document with its final title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedPost {
  pub title:           String,
  pub html:            String,
  /// Whether the document's own top heading was dropped as a duplicate of
  /// the title.
  pub skipped_heading: bool,
}

/// Render `content` for posting under `title`.
///
/// WordPress shows the title above the body, so a leading heading that
/// repeats it is dropped.
#[must_use]
pub fn prepare_post(
  content: &str,
  title: String,
  options: RenderOptions,
) -> PreparedPost {
  let skipped_heading = heading_matches_title(content, &title);
  let renderer = MarkdownRenderer::new(RenderOptions {
    skip_leading_heading: skipped_heading,
    ..options
  });
  let html = render_with_recovery(&renderer, content).html;

  PreparedPost {
    title,
    html,
    skipped_heading,
  }
}

/// Read a Markdown file and prepare it for posting.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn prepare_file(
  path: &Path,
  explicit_title: Option<&str>,
  options: RenderOptions,
) -> Result<PreparedPost> {
  let content = fs::read_to_string(path)
    .wrap_err_with(|| format!("Failed to read {}", path.display()))?;
  let title = infer_title(&content, path, explicit_title);
  Ok(prepare_post(&content, title, options))
}

/// Where and how a post gets filed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostSettings {
  pub category_ids: Vec<u64>,
  pub tags:         Vec<String>,
  pub status:       String,
  pub format:       String,
}

/// Create a post for a prepared document.
///
/// # Errors
///
/// Returns an error if tags cannot be resolved or the post is not created.
pub fn publish_prepared<S: PostStore + ?Sized>(
  store: &S,
  post: &PreparedPost,
  settings: &PostSettings,
) -> Result<PostLocator> {
  let tags = if settings.tags.is_empty() {
    Vec::new()
  } else {
    store
      .resolve_tags(&settings.tags)
      .wrap_err("Failed to resolve tags")?
  };

  let locator = store
    .create_post(&NewPost {
      title: post.title.clone(),
      content: post.html.clone(),
      status: settings.status.clone(),
      categories: settings.category_ids.clone(),
      tags,
      format: settings.format.clone(),
    })
    .wrap_err_with(|| format!("Failed to create post '{}'", post.title))?;

  info!("Created: {} ({})", post.title, locator.link);
  Ok(locator)
}

/// One manifest entry, resolved against the file system.
#[derive(Debug, Clone)]
pub struct PlannedPost {
  pub file: PathBuf,
  pub tags: Vec<String>,
  /// `None` when the file does not exist.
  pub post: Option<PreparedPost>,
}

/// Resolve and render every configured document.
///
/// Paths are relative to `base_dir`. Missing files are kept in the plan so
/// they can be reported.
///
/// # Errors
///
/// Returns an error if an existing file cannot be read.
pub fn plan_batch(config: &Config, base_dir: &Path) -> Result<Vec<PlannedPost>> {
  let options = config.render_options();
  config
    .documents
    .iter()
    .map(|entry| -> Result<PlannedPost> {
      let path = base_dir.join(&entry.file);
      let post = if path.is_file() {
        Some(prepare_file(&path, entry.title.as_deref(), options)?)
      } else {
        None
      };
      Ok(PlannedPost {
        file: entry.file.clone(),
        tags: entry.tags.clone(),
        post,
      })
    })
    .collect()
}

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
  pub published: Vec<(PathBuf, PostLocator)>,
  pub failed:    Vec<(PathBuf, String)>,
  pub missing:   Vec<PathBuf>,
}

impl BatchReport {
  /// Number of documents the run attempted.
  #[must_use]
  pub fn attempted(&self) -> usize {
    self.published.len() + self.failed.len()
  }
}

/// Progress bar for a batch of `len` documents.
#[must_use]
pub fn batch_progress(len: usize) -> ProgressBar {
  let style = ProgressStyle::with_template(
    "{spinner} [{bar:30}] {pos}/{len} {wide_msg}",
  )
  .map_or_else(|_| ProgressStyle::default_bar(), |style| {
    style.progress_chars("=> ")
  });
  ProgressBar::new(u64::try_from(len).unwrap_or(u64::MAX)).with_style(style)
}

/// Publish a planned batch.
///
/// Checks that the site is installed, makes sure the configured category
/// exists, then creates one post per document. A failed document is
/// recorded and the run moves on; missing files are skipped.
///
/// # Errors
///
/// Returns an error if the site needs installation or cannot be reached
/// while preparing the run.
pub fn publish_batch<S: PostStore + ?Sized>(
  store: &S,
  config: &Config,
  plan: &[PlannedPost],
  progress: &ProgressBar,
) -> Result<BatchReport> {
  match store.check_ready().wrap_err("Cannot connect to WordPress")? {
    SiteStatus::Ready => debug!("WordPress is ready"),
    SiteStatus::NeedsInstall => {
      bail!(
        "WordPress needs initial setup. Complete the installation, create an \
         application password under Users -> Profile, and try again."
      );
    },
  }

  let category_id = store
    .ensure_category(&config.category)
    .wrap_err("Failed to set up the category")?;

  let mut report = BatchReport::default();
  let mut first = true;

  for planned in plan {
    progress.set_message(planned.file.display().to_string());

    let Some(post) = &planned.post else {
      warn!("File not found: {}", planned.file.display());
      report.missing.push(planned.file.clone());
      progress.inc(1);
      continue;
    };

    if !first {
      thread::sleep(config.post_delay());
    }
    first = false;

    let settings = PostSettings {
      category_ids: vec![category_id],
      tags:         planned.tags.clone(),
      status:       config.post_status.clone(),
      format:       config.post_format.clone(),
    };

    match publish_prepared(store, post, &settings) {
      Ok(locator) => report.published.push((planned.file.clone(), locator)),
      Err(e) => {
        warn!("Failed to publish {}: {e:#}", planned.file.display());
        report.failed.push((planned.file.clone(), format!("{e:#}")));
      },
    }
    progress.inc(1);
  }

  progress.finish_and_clear();
  Ok(report)
}

/// Print a summary of a batch run.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_batch_report<W: Write>(
  out: &mut W,
  report: &BatchReport,
  site_url: &str,
) -> Result<()> {
  for (file, locator) in &report.published {
    writeln!(out, "Published {}: {}", file.display(), locator.link)?;
  }
  for (file, reason) in &report.failed {
    writeln!(out, "Failed {}: {reason}", file.display())?;
  }
  for file in &report.missing {
    writeln!(out, "Skipped {}: file not found", file.display())?;
  }
  writeln!(
    out,
    "Published {} of {} documents. Visit {site_url}",
    report.published.len(),
    report.attempted()
  )?;
  Ok(())
}

/// Print what a dry run would publish.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_plan<W: Write>(out: &mut W, plan: &[PlannedPost]) -> Result<()> {
  for planned in plan {
    match &planned.post {
      Some(post) => {
        writeln!(
          out,
          "{}: \"{}\" ({} bytes of HTML{})",
          planned.file.display(),
          post.title,
          post.html.len(),
          if post.skipped_heading {
            ", leading heading dropped"
          } else {
            ""
          }
        )?;
      },
      None => writeln!(out, "{}: file not found", planned.file.display())?,
    }
  }
  Ok(())
}

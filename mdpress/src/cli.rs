use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Command line interface for mdpress
#[derive(Parser, Debug)]
#[command(
  author,
  version,
  about = "mdpress: Markdown to WordPress publisher"
)]
pub struct Cli {
  /// Subcommand to execute (see [`Commands`])
  #[command(subcommand)]
  pub command: Commands,

  /// Enable verbose debug logging
  #[arg(short, long, global = true)]
  pub verbose: bool,

  /// Path to configuration file(s) (TOML or JSON, can be specified multiple
  /// times) Multiple files are merged in order, with later files overriding
  /// earlier ones
  #[arg(short = 'c', long = "config-file", global = true, action = clap::ArgAction::Append)]
  pub config_files: Vec<PathBuf>,

  /// Override configuration values (KEY=VALUE format, can be used multiple
  /// times)
  #[arg(long = "config", global = true, action = clap::ArgAction::Append)]
  pub config_overrides: Vec<String>,
}

/// All supported subcommands for the mdpress CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Initialize a new mdpress configuration file
  Init {
    /// Path to create the configuration file at
    #[arg(short, long, default_value = "mdpress.toml")]
    output: PathBuf,

    /// Format of the configuration file.
    #[arg(short = 'F', long, default_value = "toml", value_parser = ["toml", "json"])]
    format: String,

    /// Force overwrite if file already exists
    #[arg(short, long)]
    force: bool,
  },

  /// Render a Markdown file, or every Markdown file in a directory, to HTML.
  Render {
    /// Markdown file or directory to render.
    input: PathBuf,

    /// Output file (for a file input) or directory (required for a
    /// directory input). A file input prints to stdout when omitted.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Drop the first line when it is a level-1 heading.
    #[arg(long)]
    skip_leading_heading: bool,

    /// Emit bare tags instead of WordPress block editor classes.
    #[arg(long)]
    no_block_classes: bool,
  },

  /// Publish a single Markdown file as a new post.
  Publish {
    /// Markdown file to publish.
    file: PathBuf,

    /// Post title. Defaults to the document's first heading, then the file
    /// name.
    #[arg(short = 'T', long)]
    title: Option<String>,

    /// Category ID to file the post under.
    #[arg(long)]
    category_id: Option<u64>,

    /// Tag name to attach (can be specified multiple times).
    #[arg(short, long = "tag", action = clap::ArgAction::Append)]
    tags: Vec<String>,

    /// Post status (publish, draft, pending, private or future).
    #[arg(short, long)]
    status: Option<String>,

    /// Render and report, but do not contact the site.
    #[arg(long)]
    dry_run: bool,
  },

  /// Publish every document listed in the configuration.
  Batch {
    /// Render and report, but do not contact the site.
    #[arg(long)]
    dry_run: bool,
  },

  /// Check whether the site is reachable and installed.
  Check,

  /// Find posts whose HTML shows up as escaped text and fix them.
  Repair {
    /// Fix without asking for confirmation.
    #[arg(short, long)]
    yes: bool,

    /// Number of recent posts to inspect (at most 100).
    #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u32).range(1..=100))]
    per_page: u32,
  },
}

impl Cli {
  /// Parse the process arguments.
  #[must_use]
  pub fn parse_args() -> Self {
    Self::parse()
  }
}

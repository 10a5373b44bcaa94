use std::{
  fs,
  io::{self, Write},
  path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Command, CommandFactory, Parser, Subcommand};
use clap_complete::{generate_to, shells};
use clap_mangen::Man;
use mdpress_config::{
  site::{PASSWORD_ENV, USERNAME_ENV},
  templates,
};

const BIN_NAME: &str = "mdpress";

#[derive(Parser)]
#[command(author, version, about)]
struct Xtask {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Build distribution artifacts for the mdpress CLI
  Dist {
    /// Output directory for generated files.
    #[arg(short, long, default_value = "dist", value_parser = clap::value_parser!(std::path::PathBuf))]
    output_dir: PathBuf,

    /// Only generate shell completions.
    #[arg(long, conflicts_with = "manpage_only")]
    completions_only: bool,

    /// Only generate manpages.
    #[arg(long, conflicts_with = "completions_only")]
    manpage_only: bool,
  },

  /// Write the sample `mdpress.toml` and `mdpress.json` shipped with releases
  Samples {
    /// Output directory for the sample configs.
    #[arg(short, long, default_value = "dist/samples")]
    output_dir: PathBuf,
  },
}

fn main() -> Result<()> {
  let xtask = Xtask::parse();
  let mut stdout = io::stdout();

  match xtask.command {
    Commands::Dist {
      output_dir,
      completions_only,
      manpage_only,
    } => {
      if !manpage_only {
        generate_completions(&output_dir, &mut stdout)?;
      }
      if !completions_only {
        generate_manpages(&output_dir, &mut stdout)?;
      }
    },
    Commands::Samples { output_dir } => {
      write_samples(&output_dir, &mut stdout)?;
    },
  }

  Ok(())
}

fn mdpress_command() -> Command {
  mdpress::cli::Cli::command().name(BIN_NAME)
}

/// Generate shell completions for the shells clap supports out of the box.
fn generate_completions<W: Write>(output_dir: &Path, out: &mut W) -> Result<()> {
  let completions_dir = output_dir.join("completions");
  fs::create_dir_all(&completions_dir)?;
  let mut cmd = mdpress_command();
  generate_to(shells::Bash, &mut cmd, BIN_NAME, &completions_dir)?;
  generate_to(shells::Zsh, &mut cmd, BIN_NAME, &completions_dir)?;
  generate_to(shells::Fish, &mut cmd, BIN_NAME, &completions_dir)?;
  generate_to(shells::PowerShell, &mut cmd, BIN_NAME, &completions_dir)?;
  writeln!(
    out,
    "Shell completions generated in {}",
    completions_dir.display()
  )?;
  Ok(())
}

/// Roff for the sections clap has no notion of: where config files are
/// looked up and which environment variables hold the credentials.
fn extra_sections() -> String {
  format!(
    r#".SH FILES
Without \fB\-\-config\-file\fR, the first of these that exists is loaded:
.PP
\fImdpress.toml\fR, \fImdpress.json\fR, \fI.mdpress.toml\fR,
\fI.mdpress.json\fR, \fI.config/mdpress.toml\fR, \fI.config/mdpress.json\fR
in the current directory, then \fI$XDG_CONFIG_HOME/mdpress.toml\fR and
\fI$XDG_CONFIG_HOME/mdpress.json\fR.
.SH ENVIRONMENT
.TP
\fB{USERNAME_ENV}\fR
WordPress user that owns the published posts. Takes precedence over
\fBsite.username\fR in the config.
.TP
\fB{PASSWORD_ENV}\fR
Application password for that user. The password is never written to a
config file by \fBmdpress init\fR.
.TP
\fBXDG_CONFIG_HOME\fR
Extra directory searched for a config file.
"#
  )
}

fn render_manpage(cmd: Command, with_extras: bool) -> Result<Vec<u8>> {
  let mut buffer = Vec::new();
  Man::new(cmd)
    .render(&mut buffer)
    .context("Failed to render manpage")?;
  if with_extras {
    buffer.extend_from_slice(extra_sections().as_bytes());
  }
  Ok(buffer)
}

/// Generate `mdpress.1` plus one `mdpress-<command>.1` per subcommand.
fn generate_manpages<W: Write>(output_dir: &Path, out: &mut W) -> Result<()> {
  let man_dir = output_dir.join("man");
  fs::create_dir_all(&man_dir)?;

  let cmd = mdpress_command();
  let mut pages = vec![(BIN_NAME.to_string(), render_manpage(cmd.clone(), true)?)];
  for sub in cmd.get_subcommands() {
    let name = format!("{BIN_NAME}-{}", sub.get_name());
    let page = render_manpage(sub.clone().name(name.clone()), false)?;
    pages.push((name, page));
  }

  for (name, page) in &pages {
    let file_path = man_dir.join(format!("{name}.1"));
    fs::write(&file_path, page).with_context(|| {
      format!("Failed to write manpage at {}", file_path.display())
    })?;
  }
  writeln!(
    out,
    "{} manpages generated in {}",
    pages.len(),
    man_dir.display()
  )?;
  Ok(())
}

fn write_samples<W: Write>(output_dir: &Path, out: &mut W) -> Result<()> {
  fs::create_dir_all(output_dir)?;
  for format in ["toml", "json"] {
    let template = templates::get_template(format)?;
    let file_path = output_dir.join(format!("{BIN_NAME}.{format}"));
    fs::write(&file_path, template).with_context(|| {
      format!("Failed to write sample config at {}", file_path.display())
    })?;
    writeln!(out, "Sample config written to {}", file_path.display())?;
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, reason = "Fine in tests")]

  use super::*;

  #[test]
  fn test_main_manpage_documents_credentials() {
    let page =
      String::from_utf8(render_manpage(mdpress_command(), true).unwrap())
        .unwrap();
    assert!(page.contains(".SH ENVIRONMENT"));
    assert!(page.contains("MDPRESS_USERNAME"));
    assert!(page.contains("MDPRESS_APP_PASSWORD"));
    assert!(page.contains(".SH FILES"));
  }

  #[test]
  fn test_one_manpage_per_subcommand() {
    let dir = tempfile::tempdir().unwrap();
    let mut out = Vec::new();
    generate_manpages(dir.path(), &mut out).unwrap();

    for name in ["init", "render", "publish", "batch", "check", "repair"] {
      let path = dir.path().join(format!("man/mdpress-{name}.1"));
      assert!(path.exists(), "missing {}", path.display());
    }
    let publish =
      fs::read_to_string(dir.path().join("man/mdpress-publish.1")).unwrap();
    assert!(!publish.contains(".SH ENVIRONMENT"));
    assert!(String::from_utf8(out).unwrap().contains("manpages generated"));
  }

  #[test]
  fn test_samples_parse_back() {
    let dir = tempfile::tempdir().unwrap();
    write_samples(dir.path(), &mut Vec::new()).unwrap();

    for format in ["toml", "json"] {
      let path = dir.path().join(format!("mdpress.{format}"));
      mdpress_config::Config::from_file(&path).unwrap();
    }
  }
}

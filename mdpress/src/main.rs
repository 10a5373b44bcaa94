use std::{
  fs,
  io::{self, Write},
  path::Path,
};

use color_eyre::eyre::{Context, Result, bail};
use log::{LevelFilter, info};
use mdpress::{
  cli::{Cli, Commands},
  publish::{
    PostSettings,
    batch_progress,
    plan_batch,
    prepare_file,
    publish_batch,
    publish_prepared,
    write_batch_report,
    write_plan,
  },
  render::run_render,
  repair::{confirm, run_repair},
};
use mdpress_config::Config;
use mdpress_markdown::RenderOptions;
use mdpress_wordpress::{PostStore, SiteStatus, WordPressClient};

fn main() -> Result<()> {
  color_eyre::install()?;

  let cli = Cli::parse_args();

  env_logger::Builder::new()
    .filter_level(if cli.verbose {
      LevelFilter::Debug
    } else {
      LevelFilter::Info
    })
    .write_style(env_logger::WriteStyle::Always)
    .init();

  if let Commands::Init {
    output,
    format,
    force,
  } = &cli.command
  {
    return init(output, format, *force);
  }

  let config = Config::load(&cli.config_files, &cli.config_overrides)?;
  let mut stdout = io::stdout().lock();

  match &cli.command {
    Commands::Init { .. } => Ok(()),

    Commands::Render {
      input,
      output,
      skip_leading_heading,
      no_block_classes,
    } => {
      let defaults = config.render_options();
      let options = RenderOptions {
        skip_leading_heading: *skip_leading_heading,
        block_classes:        defaults.block_classes && !no_block_classes,
      };
      run_render(input, output.as_deref(), &options, &mut stdout)?;
      Ok(())
    },

    Commands::Publish {
      file,
      title,
      category_id,
      tags,
      status,
      dry_run,
    } => {
      let post =
        prepare_file(file, title.as_deref(), config.render_options())?;
      if *dry_run {
        writeln!(
          stdout,
          "Would publish \"{}\" ({} bytes of HTML)",
          post.title,
          post.html.len()
        )?;
        return Ok(());
      }

      let client = connect(&config)?;
      let settings = PostSettings {
        category_ids: vec![category_id.unwrap_or(config.default_category_id)],
        tags:         tags.clone(),
        status:       status.clone().unwrap_or_else(|| config.post_status.clone()),
        format:       config.post_format.clone(),
      };
      let locator = publish_prepared(&client, &post, &settings)?;
      writeln!(stdout, "Published: {}", locator.link)?;
      Ok(())
    },

    Commands::Batch { dry_run } => {
      let plan = plan_batch(&config, Path::new("."))?;
      if *dry_run {
        return write_plan(&mut stdout, &plan);
      }

      let client = connect(&config)?;
      let progress = batch_progress(plan.len());
      let report = publish_batch(&client, &config, &plan, &progress)?;
      write_batch_report(&mut stdout, &report, client.site_url())
    },

    Commands::Check => {
      let client = connect(&config)?;
      match client.check_ready()? {
        SiteStatus::Ready => {
          writeln!(stdout, "WordPress at {} is ready", client.site_url())?;
        },
        SiteStatus::NeedsInstall => {
          writeln!(
            stdout,
            "WordPress at {} needs initial setup: open {}/wp-admin/install.php",
            client.site_url(),
            client.site_url()
          )?;
        },
      }
      Ok(())
    },

    Commands::Repair { yes, per_page } => {
      let client = connect(&config)?;
      let yes = *yes;
      run_repair(&client, *per_page, &mut stdout, |out, _| {
        if yes {
          Ok(true)
        } else {
          confirm(&mut io::stdin().lock(), out, "Fix these posts?")
        }
      })?;
      Ok(())
    },
  }
}

fn init(output: &Path, format: &str, force: bool) -> Result<()> {
  if output.exists() && !force {
    bail!(
      "Configuration file already exists: {}. Use --force to overwrite.",
      output.display()
    );
  }

  if let Some(parent) = output.parent()
    && !parent.as_os_str().is_empty()
    && !parent.exists()
  {
    fs::create_dir_all(parent).wrap_err_with(|| {
      format!("Failed to create directory: {}", parent.display())
    })?;
    info!("Created directory: {}", parent.display());
  }

  Config::generate_default_config(format, output).wrap_err_with(|| {
    format!("Failed to generate configuration file: {}", output.display())
  })?;

  info!(
    "Configuration file created. Set the site URL, then export \
     MDPRESS_USERNAME and MDPRESS_APP_PASSWORD."
  );
  Ok(())
}

/// Resolve credentials and build a client for the configured site.
fn connect(config: &Config) -> Result<WordPressClient> {
  let mut site = config.site.clone();
  site.resolve_credentials();
  site.validate()?;
  Ok(WordPressClient::new(&site)?)
}

use std::{
  fs,
  path::{Path, PathBuf},
  sync::OnceLock,
  time::Duration,
};

use mdpress_markdown::RenderOptions;
use serde::{Deserialize, Serialize};

use crate::{
  documents::DocumentEntry,
  error::ConfigError,
  render::RenderConfig,
  site::{CategoryConfig, SiteConfig},
};

/// Post statuses accepted by the WordPress posts endpoint.
const POST_STATUSES: &[&str] =
  &["publish", "draft", "pending", "private", "future"];

/// Post formats WordPress ships with.
const POST_FORMATS: &[&str] = &[
  "standard", "aside", "chat", "gallery", "link", "image", "quote", "status",
  "video", "audio",
];

/// Configuration for mdpress.
///
/// [`Config`] describes the target site, how posts are filed and the list of
/// documents a batch run publishes. Fields are typically loaded from a TOML
/// or JSON config file, and individual keys can be overridden with
/// `--config KEY=VALUE` on the command line. Credentials are normally taken
/// from the environment, see [`SiteConfig::resolve_credentials`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Target WordPress site.
  pub site: SiteConfig,

  /// Category created (or reused) by batch publishing.
  pub category: CategoryConfig,

  /// Category used by single-post publishing when none is given.
  pub default_category_id: u64,

  /// Status for new posts.
  pub post_status: String,

  /// Format for new posts.
  pub post_format: String,

  /// Pause between posts during a batch run, in milliseconds.
  pub post_delay_ms: u64,

  /// Renderer settings.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub render: Option<RenderConfig>,

  /// Documents published by `batch`.
  pub documents: Vec<DocumentEntry>,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      site:                SiteConfig::default(),
      category:            CategoryConfig::default(),
      default_category_id: 1,
      post_status:         "publish".to_string(),
      post_format:         "standard".to_string(),
      post_delay_ms:       1000,
      render:              None,
      documents:           Vec::new(),
    }
  }
}

/// One config file as written, before it is laid over the defaults.
///
/// Keys a file leaves out stay `None` (or empty), so merging a layer only
/// changes what that file actually sets.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConfigLayer {
  pub site:                SiteConfig,
  pub category:            CategoryLayer,
  pub default_category_id: Option<u64>,
  pub post_status:         Option<String>,
  pub post_format:         Option<String>,
  pub post_delay_ms:       Option<u64>,
  pub render:              Option<RenderConfig>,
  pub documents:           Vec<DocumentEntry>,
}

/// The `[category]` section of a [`ConfigLayer`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CategoryLayer {
  pub name:        Option<String>,
  pub slug:        Option<String>,
  pub description: Option<String>,
}

impl ConfigLayer {
  /// Read a TOML or JSON config file.
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read or parsed, or if its
  /// extension is neither `toml` nor `json`.
  pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
    let content =
      fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
      })?;

    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
      return Err(ConfigError::Config(format!(
        "Config file has no extension: {}",
        path.display()
      )));
    };

    match ext.to_lowercase().as_str() {
      "json" => {
        serde_json::from_str(&content).map_err(|source| ConfigError::Json {
          path: path.to_path_buf(),
          source,
        })
      },
      "toml" => {
        toml::from_str(&content).map_err(|source| ConfigError::Toml {
          path: path.to_path_buf(),
          source,
        })
      },
      _ => {
        Err(ConfigError::Config(format!(
          "Unsupported config file format: {}",
          path.display()
        )))
      },
    }
  }
}

/// Error for a key no config section knows about.
pub(crate) fn unknown_key(key: &str) -> ConfigError {
  ConfigError::Config(format!(
    "Unknown configuration key: '{key}'. See documentation for supported keys."
  ))
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
  match value.to_lowercase().as_str() {
    "true" | "yes" | "1" => Ok(true),
    "false" | "no" | "0" => Ok(false),
    _ => {
      Err(ConfigError::Config(format!(
        "Invalid boolean value for '{key}': '{value}'. Expected true/false, \
         yes/no, or 1/0"
      )))
    },
  }
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
  value.parse().map_err(|_| {
    ConfigError::Config(format!(
      "Invalid value for '{key}': '{value}'. Expected a positive integer"
    ))
  })
}

impl Config {
  /// Renderer options derived from the `[render]` section.
  #[must_use]
  pub fn render_options(&self) -> RenderOptions {
    self.render.unwrap_or_default().to_options()
  }

  /// Pause between posts during a batch run.
  #[must_use]
  pub const fn post_delay(&self) -> Duration {
    Duration::from_millis(self.post_delay_ms)
  }

  /// Load configuration from a file (TOML or JSON).
  ///
  /// Keys the file leaves out keep their defaults.
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read or parsed, or if the format is
  /// unsupported.
  pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
    let mut config = Self::default();
    config.merge(ConfigLayer::from_file(path.as_ref())?);
    Ok(config)
  }

  /// Load configuration from files and command line overrides.
  ///
  /// Explicit config files are merged in order. Without any, a config file
  /// in one of the standard locations is used if present, and the defaults
  /// otherwise. Overrides are applied last and the result is validated.
  /// Credentials are not resolved here.
  ///
  /// # Errors
  ///
  /// Returns an error if a file cannot be loaded, an override is invalid, or
  /// the merged configuration fails validation.
  pub fn load(
    config_files: &[PathBuf],
    config_overrides: &[String],
  ) -> Result<Self, ConfigError> {
    let mut config = Self::default();

    if config_files.is_empty() {
      if let Some(discovered_config) = Self::find_config_file() {
        log::info!(
          "Using discovered config file: {}",
          discovered_config.display()
        );
        config.merge(ConfigLayer::from_file(&discovered_config)?);
      } else {
        log::debug!("No config file found, using defaults");
      }
    } else {
      for config_path in config_files {
        config.merge(ConfigLayer::from_file(config_path)?);
      }
      if config_files.len() > 1 {
        log::info!("Loaded and merged {} config files", config_files.len());
      }
    }

    if !config_overrides.is_empty() {
      config.apply_overrides(config_overrides)?;
    }

    config.validate()?;
    Ok(config)
  }

  /// Apply configuration overrides from KEY=VALUE strings.
  ///
  /// Nested keys use dots, e.g. `site.url=http://localhost:8080` or
  /// `render.block_classes=false`. The password cannot be set this way.
  ///
  /// # Errors
  ///
  /// Returns an error if:
  ///
  /// - An override string is not in KEY=VALUE format
  /// - A key is not recognized
  /// - A value cannot be parsed as the expected type
  pub fn apply_overrides(
    &mut self,
    overrides: &[String],
  ) -> Result<(), ConfigError> {
    for override_str in overrides {
      let (key, value) = override_str.split_once('=').ok_or_else(|| {
        ConfigError::Config(format!(
          "Invalid config override format: '{override_str}'. Expected \
           KEY=VALUE"
        ))
      })?;

      self.apply_override(key.trim(), value.trim())?;
    }

    Ok(())
  }

  /// Apply a configuration override by key.
  ///
  /// # Errors
  ///
  /// Returns an error if the key is unknown or the value does not parse.
  pub fn apply_override(
    &mut self,
    key: &str,
    value: &str,
  ) -> Result<(), ConfigError> {
    if let Some((section, field)) = key.split_once('.') {
      return match section {
        "site" => self.site.apply_override(field, value),
        "category" => self.category.apply_override(field, value),
        "render" => {
          let render = self.render.get_or_insert_with(RenderConfig::default);
          match field {
            "block_classes" => {
              render.block_classes = parse_bool(key, value)?;
              Ok(())
            },
            _ => Err(unknown_key(key)),
          }
        },
        _ => Err(unknown_key(key)),
      };
    }

    match key {
      "default_category_id" => {
        self.default_category_id = parse_u64(key, value)?;
      },
      "post_status" => self.post_status = value.to_string(),
      "post_format" => self.post_format = value.to_string(),
      "post_delay_ms" => self.post_delay_ms = parse_u64(key, value)?,
      _ => return Err(unknown_key(key)),
    }
    Ok(())
  }

  /// Lay a config file over this config.
  ///
  /// # Merge Rules
  ///
  /// - `site`: each non-empty value of the layer replaces this config's value
  /// - [`Option<T>`] fields: the layer's [`Some`] value replaces this
  ///   config's value, `None` keeps it
  /// - [`Vec<T>`] fields: the layer's entries are appended
  pub fn merge(&mut self, layer: ConfigLayer) {
    self.site.merge(layer.site);

    let category = layer.category;
    if let Some(name) = category.name {
      self.category.name = name;
    }
    if let Some(slug) = category.slug {
      self.category.slug = slug;
    }
    if let Some(description) = category.description {
      self.category.description = description;
    }

    if let Some(id) = layer.default_category_id {
      self.default_category_id = id;
    }
    if let Some(status) = layer.post_status {
      self.post_status = status;
    }
    if let Some(format) = layer.post_format {
      self.post_format = format;
    }
    if let Some(delay) = layer.post_delay_ms {
      self.post_delay_ms = delay;
    }
    if layer.render.is_some() {
      self.render = layer.render;
    }
    self.documents.extend(layer.documents);
  }

  /// Search for config files in common locations
  #[must_use]
  pub fn find_config_file() -> Option<PathBuf> {
    static RESULT: OnceLock<Option<PathBuf>> = OnceLock::new();
    RESULT
      .get_or_init(|| {
        let config_filenames = [
          "mdpress.toml",
          "mdpress.json",
          ".mdpress.toml",
          ".mdpress.json",
          ".config/mdpress.toml",
          ".config/mdpress.json",
        ];

        let current_dir = std::env::current_dir().ok()?;
        for filename in &config_filenames {
          let config_path = current_dir.join(filename);
          if config_path.exists() {
            return Some(config_path);
          }
        }

        if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
          let xdg_config_dir = PathBuf::from(xdg_config_home);
          for filename in &["mdpress.toml", "mdpress.json"] {
            let config_path = xdg_config_dir.join(filename);
            if config_path.exists() {
              return Some(config_path);
            }
          }
        }

        None
      })
      .clone()
  }

  /// Check values that WordPress would otherwise reject post by post.
  ///
  /// # Errors
  ///
  /// Returns an error listing every invalid value.
  pub fn validate(&self) -> Result<(), ConfigError> {
    let mut errors = Vec::new();

    if !POST_STATUSES.contains(&self.post_status.as_str()) {
      errors.push(format!(
        "post_status '{}' is not one of: {}",
        self.post_status,
        POST_STATUSES.join(", ")
      ));
    }

    if !POST_FORMATS.contains(&self.post_format.as_str()) {
      errors.push(format!(
        "post_format '{}' is not one of: {}",
        self.post_format,
        POST_FORMATS.join(", ")
      ));
    }

    if self.category.slug.trim().is_empty() {
      errors.push("category.slug must not be empty".to_string());
    }

    for (index, document) in self.documents.iter().enumerate() {
      if document.file.as_os_str().is_empty() {
        errors.push(format!("documents[{index}] has an empty file path"));
      }
    }

    if errors.is_empty() {
      Ok(())
    } else {
      Err(ConfigError::Config(errors.join("; ")))
    }
  }

  /// Generate a default configuration file with commented explanations
  ///
  /// # Errors
  ///
  /// Returns an error if the template cannot be retrieved or the file cannot be
  /// written.
  pub fn generate_default_config(
    format: &str,
    path: &Path,
  ) -> Result<(), ConfigError> {
    let config_content = crate::templates::get_template(format)
      .map_err(|e| ConfigError::Template(e.to_string()))?;

    fs::write(path, config_content).map_err(|source| {
      ConfigError::Write {
        path: path.to_path_buf(),
        source,
      }
    })?;

    log::info!("Created default configuration file: {}", path.display());
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  #![allow(
    clippy::useless_vec,
    clippy::unwrap_used,
    clippy::field_reassign_with_default,
    reason = "Fine in tests"
  )]

  use super::*;

  #[test]
  fn test_defaults() {
    let config = Config::default();
    assert_eq!(config.default_category_id, 1);
    assert_eq!(config.post_status, "publish");
    assert_eq!(config.post_format, "standard");
    assert_eq!(config.post_delay(), Duration::from_secs(1));
    assert_eq!(config.category.slug, "infrastructure-docs");
    assert!(config.render_options().block_classes);
    assert!(!config.render_options().skip_leading_heading);
    assert!(config.validate().is_ok());
  }

  #[test]
  fn test_config_merge_site_keeps_unset_values() {
    let mut base = Config::default();
    base.site.url = "http://localhost:8080".to_string();
    base.site.username = "admin".to_string();

    let mut layer = ConfigLayer::default();
    layer.site.username = "editor".to_string();

    base.merge(layer);

    assert_eq!(base.site.url, "http://localhost:8080");
    assert_eq!(base.site.username, "editor");
  }

  #[test]
  fn test_config_merge_vec_fields_append() {
    let mut base = Config::default();
    base.documents = vec![DocumentEntry::new("a.md")];

    let mut layer = ConfigLayer::default();
    layer.documents = vec![DocumentEntry::new("b.md")];

    base.merge(layer);

    let files: Vec<_> = base.documents.iter().map(|d| d.file.clone()).collect();
    assert_eq!(files, vec![PathBuf::from("a.md"), PathBuf::from("b.md")]);
  }

  #[test]
  fn test_config_merge_option_fields() {
    let mut base = Config::default();
    base.render = Some(RenderConfig {
      block_classes: false,
    });
    base.post_status = "draft".to_string();
    base.category.slug = "ops".to_string();

    base.merge(ConfigLayer::default());

    assert_eq!(
      base.render,
      Some(RenderConfig {
        block_classes: false,
      })
    );
    assert_eq!(base.post_status, "draft");
    assert_eq!(base.category.slug, "ops");
  }

  #[test]
  fn test_config_merge_partial_category() {
    let mut base = Config::default();
    base.merge(ConfigLayer {
      category: CategoryLayer {
        name: Some("Ops".to_string()),
        ..Default::default()
      },
      post_delay_ms: Some(0),
      ..Default::default()
    });

    assert_eq!(base.category.name, "Ops");
    assert_eq!(base.category.slug, "infrastructure-docs");
    assert_eq!(base.post_delay_ms, 0);
    assert_eq!(base.post_format, "standard");
  }

  #[test]
  fn test_apply_overrides_nested() {
    let mut config = Config::default();

    config
      .apply_overrides(&vec![
        "site.url=https://blog.example.com".to_string(),
        "category.slug=ops".to_string(),
        "render.block_classes=no".to_string(),
      ])
      .unwrap();

    assert_eq!(config.site.url, "https://blog.example.com");
    assert_eq!(config.category.slug, "ops");
    assert!(!config.render_options().block_classes);
  }

  #[test]
  fn test_apply_overrides_numeric_and_string() {
    let mut config = Config::default();

    config
      .apply_overrides(&vec![
        "post_delay_ms = 250".to_string(),
        "default_category_id=7".to_string(),
        "post_status=draft".to_string(),
      ])
      .unwrap();

    assert_eq!(config.post_delay_ms, 250);
    assert_eq!(config.default_category_id, 7);
    assert_eq!(config.post_status, "draft");
  }

  #[test]
  fn test_apply_overrides_invalid_format() {
    let mut config = Config::default();

    let result = config.apply_overrides(&vec!["no_equals_sign".to_string()]);

    assert!(
      result
        .unwrap_err()
        .to_string()
        .contains("Expected KEY=VALUE")
    );
  }

  #[test]
  fn test_apply_overrides_unknown_key() {
    let mut config = Config::default();

    for key in ["unknown_key=value", "site.port=80", "search.enable=true"] {
      let result = config.apply_overrides(&vec![key.to_string()]);
      assert!(
        result
          .unwrap_err()
          .to_string()
          .contains("Unknown configuration key")
      );
    }
  }

  #[test]
  fn test_apply_overrides_invalid_values() {
    let mut config = Config::default();

    let result =
      config.apply_overrides(&vec!["render.block_classes=maybe".to_string()]);
    assert!(result.unwrap_err().to_string().contains("Invalid boolean"));

    let result =
      config.apply_overrides(&vec!["post_delay_ms=-5".to_string()]);
    assert!(result.unwrap_err().to_string().contains("Invalid value"));
  }

  #[test]
  fn test_validate_collects_errors() {
    let mut config = Config::default();
    config.post_status = "published".to_string();
    config.post_format = "essay".to_string();

    let message = config.validate().unwrap_err().to_string();
    assert!(message.contains("post_status 'published'"));
    assert!(message.contains("post_format 'essay'"));
  }

  #[test]
  fn test_from_file_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mdpress.toml");
    fs::write(
      &path,
      r#"
post_status = "draft"

[site]
url = "http://localhost:8080"
username = "admin"

[render]
block_classes = false

[[documents]]
file = "service-access.md"
title = "Service Access Guide"
tags = ["services", "architecture"]

[[documents]]
file = "TODO.md"
"#,
    )
    .unwrap();

    let config = Config::from_file(&path).unwrap();
    assert_eq!(config.post_status, "draft");
    assert_eq!(config.site.url, "http://localhost:8080");
    assert!(config.site.password.is_empty());
    assert!(!config.render_options().block_classes);
    assert_eq!(config.documents.len(), 2);
    assert_eq!(
      config.documents[0].title.as_deref(),
      Some("Service Access Guide")
    );
    assert_eq!(config.documents[0].tags, vec!["services", "architecture"]);
    assert_eq!(config.documents[1], DocumentEntry::new("TODO.md"));
  }

  #[test]
  fn test_from_file_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mdpress.json");
    fs::write(
      &path,
      r#"{ "site": { "url": "https://blog.example.com" }, "post_delay_ms": 0 }"#,
    )
    .unwrap();

    let config = Config::from_file(&path).unwrap();
    assert_eq!(config.site.url, "https://blog.example.com");
    assert_eq!(config.post_delay_ms, 0);
    assert_eq!(config.post_status, "publish");
  }

  #[test]
  fn test_from_file_rejects_unknown_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mdpress.yaml");
    fs::write(&path, "site: {}").unwrap();

    let message = Config::from_file(&path).unwrap_err().to_string();
    assert!(message.contains("Unsupported config file format"));
  }

  #[test]
  fn test_load_merges_files_then_overrides() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join("base.toml");
    let local = dir.path().join("local.toml");
    fs::write(
      &base,
      "[site]\nurl = \"http://localhost:8080\"\n\n[[documents]]\nfile = \"a.md\"\n",
    )
    .unwrap();
    fs::write(&local, "[[documents]]\nfile = \"b.md\"\n").unwrap();

    let config =
      Config::load(&[base, local], &["post_status=private".to_string()])
        .unwrap();

    assert_eq!(config.site.url, "http://localhost:8080");
    assert_eq!(config.documents.len(), 2);
    assert_eq!(config.post_status, "private");
  }

  #[test]
  fn test_load_later_file_keeps_keys_it_leaves_out() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join("base.toml");
    let local = dir.path().join("local.toml");
    fs::write(
      &base,
      r#"
post_status = "draft"
post_delay_ms = 0
default_category_id = 4

[category]
slug = "ops"
"#,
    )
    .unwrap();
    fs::write(&local, "[site]\nurl = \"https://blog.example.com\"\n").unwrap();

    let config = Config::load(&[base, local], &[]).unwrap();

    assert_eq!(config.site.url, "https://blog.example.com");
    assert_eq!(config.post_status, "draft");
    assert_eq!(config.post_delay_ms, 0);
    assert_eq!(config.default_category_id, 4);
    assert_eq!(config.category.slug, "ops");
    assert_eq!(config.category.name, "Infrastructure Documentation");
  }

  #[test]
  fn test_load_later_file_overrides_keys_it_sets() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join("base.json");
    let local = dir.path().join("local.toml");
    fs::write(&base, r#"{ "post_status": "draft", "post_format": "aside" }"#)
      .unwrap();
    fs::write(&local, "post_status = \"pending\"\n").unwrap();

    let config = Config::load(&[base, local], &[]).unwrap();
    assert_eq!(config.post_status, "pending");
    assert_eq!(config.post_format, "aside");
  }

  #[test]
  fn test_file_errors_carry_the_path() {
    let dir = tempfile::tempdir().unwrap();

    let missing = dir.path().join("missing.toml");
    let err = Config::from_file(&missing).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
    assert!(err.to_string().contains("missing.toml"));

    let bad_toml = dir.path().join("bad.toml");
    fs::write(&bad_toml, "post_status = [").unwrap();
    let err = Config::from_file(&bad_toml).unwrap_err();
    assert!(matches!(err, ConfigError::Toml { .. }));
    assert!(err.to_string().contains("bad.toml"));

    let bad_json = dir.path().join("bad.json");
    fs::write(&bad_json, "{ \"post_delay_ms\": \"soon\" }").unwrap();
    let err = Config::from_file(&bad_json).unwrap_err();
    assert!(matches!(err, ConfigError::Json { .. }));

    let err = Config::generate_default_config(
      "toml",
      &dir.path().join("no-such-dir").join("mdpress.toml"),
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::Write { .. }));
  }

  #[test]
  fn test_load_validates_result() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(&path, "post_status = \"live\"\n").unwrap();

    assert!(Config::load(&[path], &[]).is_err());
  }

  #[test]
  fn test_generate_default_config_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    for format in ["toml", "json"] {
      let path = dir.path().join(format!("mdpress.{format}"));
      Config::generate_default_config(format, &path).unwrap();

      let config = Config::from_file(&path).unwrap();
      assert!(config.validate().is_ok());
      assert_eq!(config.category, CategoryConfig::default());
      assert_eq!(config.documents.len(), 1);
    }
  }
}

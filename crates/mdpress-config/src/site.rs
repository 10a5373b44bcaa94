use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{config::unknown_key, error::ConfigError};

/// Environment variable holding the WordPress user name.
pub const USERNAME_ENV: &str = "MDPRESS_USERNAME";

/// Environment variable holding the WordPress application password.
pub const PASSWORD_ENV: &str = "MDPRESS_APP_PASSWORD";

/// Connection settings for the target WordPress site.
///
/// The password is read from files or the environment but never written back
/// out, and [`fmt::Debug`] redacts it.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
  /// Base URL of the site, e.g. `http://localhost:8080`.
  pub url: String,

  /// User the application password belongs to.
  pub username: String,

  /// WordPress application password.
  #[serde(skip_serializing)]
  pub password: String,
}

impl fmt::Debug for SiteConfig {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("SiteConfig")
      .field("url", &self.url)
      .field("username", &self.username)
      .field(
        "password",
        &if self.password.is_empty() {
          ""
        } else {
          "<redacted>"
        },
      )
      .finish()
  }
}

impl SiteConfig {
  /// URL of the site with any trailing slash removed.
  #[must_use]
  pub fn base_url(&self) -> &str {
    self.url.trim_end_matches('/')
  }

  /// Root of the REST API, `{url}/wp-json/wp/v2`.
  #[must_use]
  pub fn api_url(&self) -> String {
    format!("{}/wp-json/wp/v2", self.base_url())
  }

  /// Fill credentials from `MDPRESS_USERNAME` and `MDPRESS_APP_PASSWORD`.
  ///
  /// Non-empty environment values take precedence over configured ones.
  pub fn resolve_credentials(&mut self) {
    self.resolve_credentials_with(|name| std::env::var(name).ok());
  }

  /// Fill credentials through an arbitrary variable lookup.
  pub fn resolve_credentials_with<F>(&mut self, lookup: F)
  where
    F: Fn(&str) -> Option<String>,
  {
    if let Some(username) = lookup(USERNAME_ENV).filter(|v| !v.is_empty()) {
      self.username = username;
    }
    if let Some(password) = lookup(PASSWORD_ENV).filter(|v| !v.is_empty()) {
      log::debug!("Using application password from {PASSWORD_ENV}");
      self.password = password;
    }
  }

  /// Check that everything needed to talk to the API is present.
  ///
  /// # Errors
  ///
  /// Returns an error if the URL is missing or not HTTP(S), or if either
  /// credential is empty.
  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.url.trim().is_empty() {
      return Err(ConfigError::Config(
        "site.url must be set to the WordPress base URL".to_string(),
      ));
    }
    if !(self.url.starts_with("http://") || self.url.starts_with("https://"))
    {
      return Err(ConfigError::Config(format!(
        "site.url must start with http:// or https://, got '{}'",
        self.url
      )));
    }

    let mut missing = Vec::new();
    if self.username.is_empty() {
      missing.push(format!("username (set site.username or {USERNAME_ENV})"));
    }
    if self.password.is_empty() {
      missing.push(format!("application password (set {PASSWORD_ENV})"));
    }
    if !missing.is_empty() {
      return Err(ConfigError::MissingCredentials(missing.join(", ")));
    }

    Ok(())
  }

  pub(crate) fn apply_override(
    &mut self,
    key: &str,
    value: &str,
  ) -> Result<(), ConfigError> {
    match key {
      "url" => self.url = value.to_string(),
      "username" => self.username = value.to_string(),
      "password" => {
        return Err(ConfigError::Config(format!(
          "Refusing to set the password from the command line; use \
           {PASSWORD_ENV} instead"
        )));
      },
      _ => return Err(unknown_key(&format!("site.{key}"))),
    }
    Ok(())
  }

  /// Merge another site section in; only non-empty values replace.
  pub(crate) fn merge(&mut self, other: Self) {
    if !other.url.is_empty() {
      self.url = other.url;
    }
    if !other.username.is_empty() {
      self.username = other.username;
    }
    if !other.password.is_empty() {
      self.password = other.password;
    }
  }
}

/// Category that batch-published posts are filed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryConfig {
  /// Display name.
  pub name: String,

  /// URL slug, also used to look the category up when it already exists.
  pub slug: String,

  /// Description shown by WordPress.
  pub description: String,
}

impl Default for CategoryConfig {
  fn default() -> Self {
    Self {
      name:        "Infrastructure Documentation".to_string(),
      slug:        "infrastructure-docs".to_string(),
      description: "Technical documentation for Docker infrastructure"
        .to_string(),
    }
  }
}

impl CategoryConfig {
  pub(crate) fn apply_override(
    &mut self,
    key: &str,
    value: &str,
  ) -> Result<(), ConfigError> {
    match key {
      "name" => self.name = value.to_string(),
      "slug" => self.slug = value.to_string(),
      "description" => self.description = value.to_string(),
      _ => return Err(unknown_key(&format!("category.{key}"))),
    }
    Ok(())
  }
}

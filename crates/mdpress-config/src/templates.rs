use std::fmt;

/// Error type for template operations.
#[derive(Debug)]
pub enum TemplateError {
  /// Indicates that the requested configuration format is not supported.
  /// Contains the name of the unsupported format.
  UnsupportedFormat(String),
}

impl fmt::Display for TemplateError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::UnsupportedFormat(format) => {
        write!(f, "Unsupported config format: {format}")
      },
    }
  }
}

impl std::error::Error for TemplateError {}

/// Default configuration template in TOML, commented so that a fresh
/// `mdpress init` explains itself.
pub const DEFAULT_TOML_TEMPLATE: &str = r#"# mdpress Configuration File

# Category ID used by `mdpress publish` when --category-id is not given
# (1 is "Uncategorized" on a fresh WordPress install)
default_category_id = 1

# Status for new posts: publish, draft, pending, private or future
post_status = "publish"

# Post format: standard, aside, chat, gallery, link, image, quote, status,
# video or audio
post_format = "standard"

# Pause between posts during `mdpress batch`, in milliseconds
post_delay_ms = 1000

[site]
# Base URL of the WordPress site
url = "http://localhost:8080"

# User that owns the application password. Can also be set through
# MDPRESS_USERNAME.
username = ""

# The application password is never read from here on the command line and
# never written back out. Export it instead:
#
#   export MDPRESS_APP_PASSWORD="xxxx xxxx xxxx xxxx xxxx xxxx"

# Category created (or reused, matched by slug) by `mdpress batch`
[category]
name = "Infrastructure Documentation"
slug = "infrastructure-docs"
description = "Technical documentation for Docker infrastructure"

[render]
# Add WordPress block editor classes (wp-block-code, wp-block-table)
block_classes = true

# Documents published by `mdpress batch`, in order. Missing files are
# skipped with a warning. Without a title, the first heading of the
# document (or its file name) is used.
[[documents]]
file = "README.md"
title = "Project Overview"
tags = ["documentation"]

# [[documents]]
# file = "service-access.md"
# tags = ["services", "architecture"]
"#;

/// Default configuration template in JSON format.
pub const DEFAULT_JSON_TEMPLATE: &str = r#"{
  "default_category_id": 1,
  "post_status": "publish",
  "post_format": "standard",
  "post_delay_ms": 1000,
  "site": {
    "url": "http://localhost:8080",
    "username": ""
  },
  "category": {
    "name": "Infrastructure Documentation",
    "slug": "infrastructure-docs",
    "description": "Technical documentation for Docker infrastructure"
  },
  "render": {
    "block_classes": true
  },
  "documents": [
    {
      "file": "README.md",
      "title": "Project Overview",
      "tags": ["documentation"]
    }
  ]
}
"#;

/// Get the correct configuration template based on the requested format.
///
/// # Errors
///
/// Returns an error if the requested format is not supported.
pub fn get_template(format: &str) -> Result<&'static str, TemplateError> {
  match format.to_lowercase().as_str() {
    "toml" => Ok(DEFAULT_TOML_TEMPLATE),
    "json" => Ok(DEFAULT_JSON_TEMPLATE),
    _ => Err(TemplateError::UnsupportedFormat(format.to_string())),
  }
}

use std::time::Duration;

use log::{debug, info, warn};
use mdpress_config::site::{CategoryConfig, SiteConfig};
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::{
  error::WordPressError,
  store::PostStore,
  types::{
    NewPost,
    PostLocator,
    RemotePost,
    SiteStatus,
    Term,
    UNCATEGORIZED_ID,
  },
};

const USER_AGENT: &str = concat!("mdpress/", env!("CARGO_PKG_VERSION"));
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const READY_TIMEOUT: Duration = Duration::from_secs(5);
const MAX_PER_PAGE: u32 = 100;
const MAX_ERROR_BODY: usize = 512;

/// Turn a tag or category name into a WordPress-style slug.
#[must_use]
pub fn slugify(name: &str) -> String {
  let mut slug = String::with_capacity(name.len());
  for c in name.trim().chars() {
    if c.is_alphanumeric() {
      slug.extend(c.to_lowercase());
    } else if !slug.is_empty() && !slug.ends_with('-') {
      slug.push('-');
    }
  }
  while slug.ends_with('-') {
    slug.pop();
  }
  slug
}

/// Blocking client for one WordPress site.
#[derive(Debug, Clone)]
pub struct WordPressClient {
  http:     Client,
  site_url: String,
  api_url:  String,
  username: String,
  password: String,
}

impl WordPressClient {
  /// Build a client for the given site.
  ///
  /// Credentials are sent with every API request when a username is set.
  ///
  /// # Errors
  ///
  /// Returns [`WordPressError::Config`] if the URL is not HTTP(S) or the
  /// HTTP client cannot be built.
  pub fn new(site: &SiteConfig) -> Result<Self, WordPressError> {
    let site_url = site.base_url().to_string();
    if !(site_url.starts_with("http://") || site_url.starts_with("https://")) {
      return Err(WordPressError::Config(format!(
        "site URL must start with http:// or https://, got '{site_url}'"
      )));
    }

    let http = Client::builder()
      .user_agent(USER_AGENT)
      .timeout(DEFAULT_TIMEOUT)
      .build()
      .map_err(|e| {
        WordPressError::Config(format!("Failed to build HTTP client: {e}"))
      })?;

    Ok(Self {
      http,
      api_url: site.api_url(),
      site_url,
      username: site.username.clone(),
      password: site.password.clone(),
    })
  }

  /// Base URL of the site.
  #[must_use]
  pub fn site_url(&self) -> &str {
    &self.site_url
  }

  fn endpoint(&self, path: &str) -> String {
    format!("{}/{}", self.api_url, path.trim_start_matches('/'))
  }

  fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
    if self.username.is_empty() {
      request
    } else {
      request.basic_auth(&self.username, Some(&self.password))
    }
  }

  fn send(
    &self,
    request: RequestBuilder,
    url: &str,
  ) -> Result<Response, WordPressError> {
    self.authorized(request).send().map_err(|source| {
      WordPressError::Connect {
        url: url.to_string(),
        source,
      }
    })
  }

  /// Send a request and decode a successful JSON answer.
  ///
  /// `required` names a field the answer must carry to count as success.
  fn call<T: DeserializeOwned>(
    &self,
    request: RequestBuilder,
    url: &str,
    required: Option<&str>,
  ) -> Result<T, WordPressError> {
    let response = self.send(request, url)?;
    let status = response.status();
    let body = response.text().map_err(|source| {
      WordPressError::Connect {
        url: url.to_string(),
        source,
      }
    })?;

    if !status.is_success() {
      return Err(rejected(status.as_u16(), &body));
    }

    let value: Value = serde_json::from_str(&body).map_err(|e| {
      WordPressError::InvalidResponse {
        url:     url.to_string(),
        message: e.to_string(),
      }
    })?;

    if let Some(field) = required
      && value.get(field).is_none()
    {
      return Err(rejected(status.as_u16(), &body));
    }

    serde_json::from_value(value).map_err(|e| {
      WordPressError::InvalidResponse {
        url:     url.to_string(),
        message: e.to_string(),
      }
    })
  }

  fn find_term(
    &self,
    taxonomy: &str,
    slug: &str,
  ) -> Result<Option<u64>, WordPressError> {
    let url = self.endpoint(taxonomy);
    debug!("GET {url}?slug={slug}");
    let terms: Vec<Term> =
      self.call(self.http.get(&url).query(&[("slug", slug)]), &url, None)?;
    Ok(terms.first().map(|term| term.id))
  }
}

fn rejected(status: u16, body: &str) -> WordPressError {
  WordPressError::Rejected {
    status,
    body: body.chars().take(MAX_ERROR_BODY).collect(),
  }
}

impl PostStore for WordPressClient {
  fn create_post(&self, post: &NewPost) -> Result<PostLocator, WordPressError> {
    let url = self.endpoint("posts");
    debug!("POST {url} ({})", post.title);
    self.call(self.http.post(&url).json(post), &url, Some("id"))
  }

  fn update_post(
    &self,
    id: u64,
    content: &str,
  ) -> Result<PostLocator, WordPressError> {
    let url = self.endpoint(&format!("posts/{id}"));
    debug!("POST {url}");
    self.call(
      self.http.post(&url).json(&json!({ "content": content })),
      &url,
      Some("id"),
    )
  }

  fn list_posts(&self, per_page: u32) -> Result<Vec<RemotePost>, WordPressError> {
    let per_page = per_page.clamp(1, MAX_PER_PAGE).to_string();
    let url = self.endpoint("posts");
    debug!("GET {url}?per_page={per_page}&context=edit");
    let request = self
      .http
      .get(&url)
      .query(&[("per_page", per_page.as_str()), ("context", "edit")]);
    self.call(request, &url, None)
  }

  fn get_post(&self, id: u64) -> Result<RemotePost, WordPressError> {
    let url = self.endpoint(&format!("posts/{id}"));
    debug!("GET {url}?context=edit");
    self.call(
      self.http.get(&url).query(&[("context", "edit")]),
      &url,
      Some("id"),
    )
  }

  fn check_ready(&self) -> Result<SiteStatus, WordPressError> {
    let url = self.site_url.clone();
    debug!("GET {url}");
    let response = self
      .http
      .get(&url)
      .timeout(READY_TIMEOUT)
      .send()
      .map_err(|source| WordPressError::Connect {
        url: url.clone(),
        source,
      })?;
    let body = response
      .text()
      .map_err(|source| WordPressError::Connect { url, source })?;

    if body.contains("wp-admin/install.php") {
      Ok(SiteStatus::NeedsInstall)
    } else {
      Ok(SiteStatus::Ready)
    }
  }

  fn ensure_category(
    &self,
    category: &CategoryConfig,
  ) -> Result<u64, WordPressError> {
    let url = self.endpoint("categories");
    debug!("POST {url} ({})", category.slug);
    let created: Result<Term, _> = self.call(
      self.http.post(&url).json(&json!({
        "name": category.name,
        "slug": category.slug,
        "description": category.description,
      })),
      &url,
      Some("id"),
    );

    match created {
      Ok(term) => {
        info!("Created category '{}' with ID {}", category.name, term.id);
        return Ok(term.id);
      },
      Err(e) if e.is_connect() => return Err(e),
      Err(e) => debug!("Category not created, looking it up: {e}"),
    }

    match self.find_term("categories", &category.slug) {
      Ok(Some(id)) => {
        info!("Using existing category ID {id}");
        Ok(id)
      },
      Err(e) if e.is_connect() => Err(e),
      Ok(None) | Err(_) => {
        warn!(
          "Category '{}' unavailable, using the default category",
          category.slug
        );
        Ok(UNCATEGORIZED_ID)
      },
    }
  }

  fn resolve_tags(&self, names: &[String]) -> Result<Vec<u64>, WordPressError> {
    let mut ids = Vec::with_capacity(names.len());
    for name in names {
      let slug = slugify(name);
      if slug.is_empty() {
        continue;
      }

      let id = if let Some(id) = self.find_term("tags", &slug)? {
        id
      } else {
        let url = self.endpoint("tags");
        debug!("POST {url} ({slug})");
        let term: Term = self.call(
          self
            .http
            .post(&url)
            .json(&json!({ "name": name.trim(), "slug": slug })),
          &url,
          Some("id"),
        )?;
        info!("Created tag '{}' with ID {}", name.trim(), term.id);
        term.id
      };

      if !ids.contains(&id) {
        ids.push(id);
      }
    }
    Ok(ids)
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, clippy::panic, reason = "Fine in tests")]

  use super::*;

  fn site(url: &str) -> SiteConfig {
    SiteConfig {
      url:      url.to_string(),
      username: "admin".to_string(),
      password: "app password".to_string(),
    }
  }

  #[test]
  fn test_slugify() {
    assert_eq!(slugify("Docker"), "docker");
    assert_eq!(slugify("  Security Audit  "), "security-audit");
    assert_eq!(slugify("CI/CD & Ops!"), "ci-cd-ops");
    assert_eq!(slugify("--"), "");
  }

  #[test]
  fn test_new_rejects_non_http_urls() {
    let err = WordPressClient::new(&site("ftp://example.com")).unwrap_err();
    assert!(matches!(err, WordPressError::Config(_)));
    assert!(WordPressClient::new(&site("")).is_err());
  }

  #[test]
  fn test_endpoints() {
    let client = WordPressClient::new(&site("http://localhost:8080/")).unwrap();
    assert_eq!(client.site_url(), "http://localhost:8080");
    assert_eq!(
      client.endpoint("/posts/3"),
      "http://localhost:8080/wp-json/wp/v2/posts/3"
    );
  }

  #[test]
  fn test_rejected_body_is_truncated() {
    let body = "x".repeat(MAX_ERROR_BODY * 2);
    match rejected(500, &body) {
      WordPressError::Rejected { status, body } => {
        assert_eq!(status, 500);
        assert_eq!(body.len(), MAX_ERROR_BODY);
      },
      other => panic!("unexpected error: {other}"),
    }
  }
}

use serde::{Deserialize, Serialize};

/// ID of the "Uncategorized" category on a fresh WordPress install.
pub const UNCATEGORIZED_ID: u64 = 1;

/// Body of a post creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewPost {
  pub title:      String,
  /// Rendered HTML, sent as is.
  pub content:    String,
  pub status:     String,
  pub categories: Vec<u64>,
  pub tags:       Vec<u64>,
  pub format:     String,
}

/// Where a created or updated post lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostLocator {
  pub id:   u64,
  #[serde(default)]
  pub link: String,
}

/// Title object of a post as returned by the API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostTitle {
  #[serde(default)]
  pub rendered: String,
}

/// Content object of a post as returned by the API.
///
/// `raw` is only present when the post was fetched with `context=edit`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostContent {
  #[serde(default)]
  pub rendered: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub raw:      Option<String>,
}

/// A post fetched from the site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemotePost {
  pub id:      u64,
  #[serde(default)]
  pub link:    String,
  #[serde(default)]
  pub title:   PostTitle,
  #[serde(default)]
  pub content: PostContent,
}

/// Whether the site is ready to accept posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteStatus {
  Ready,
  /// WordPress is running but its installer has not been completed.
  NeedsInstall,
}

/// A category or tag as returned by the taxonomy endpoints.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Term {
  pub(crate) id: u64,
}

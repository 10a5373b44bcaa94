use mdpress_config::site::CategoryConfig;

use crate::{
  error::WordPressError,
  types::{NewPost, PostLocator, RemotePost, SiteStatus},
};

/// Operations the publishing and repair workflows need from a site.
///
/// [`crate::WordPressClient`] implements this over HTTP.
pub trait PostStore {
  /// Create a post and return where it lives.
  ///
  /// # Errors
  ///
  /// Fails if the site cannot be reached or does not return the new post.
  fn create_post(&self, post: &NewPost) -> Result<PostLocator, WordPressError>;

  /// Replace the content of an existing post.
  ///
  /// # Errors
  ///
  /// Fails if the site cannot be reached or does not return the post.
  fn update_post(
    &self,
    id: u64,
    content: &str,
  ) -> Result<PostLocator, WordPressError>;

  /// Fetch up to `per_page` of the most recent posts, with raw content.
  ///
  /// # Errors
  ///
  /// Fails if the site cannot be reached or the listing is malformed.
  fn list_posts(&self, per_page: u32) -> Result<Vec<RemotePost>, WordPressError>;

  /// Fetch a single post, with raw content.
  ///
  /// # Errors
  ///
  /// Fails if the site cannot be reached or the post does not exist.
  fn get_post(&self, id: u64) -> Result<RemotePost, WordPressError>;

  /// Report whether the site has finished installation.
  ///
  /// # Errors
  ///
  /// Fails if the site cannot be reached.
  fn check_ready(&self) -> Result<SiteStatus, WordPressError>;

  /// Create the category, or find it by slug if it already exists.
  ///
  /// Falls back to [`crate::UNCATEGORIZED_ID`] when neither works.
  ///
  /// # Errors
  ///
  /// Fails if the site cannot be reached.
  fn ensure_category(
    &self,
    category: &CategoryConfig,
  ) -> Result<u64, WordPressError>;

  /// Map tag names to tag IDs, creating tags that do not exist yet.
  ///
  /// # Errors
  ///
  /// Fails if the site cannot be reached or refuses to create a tag.
  fn resolve_tags(&self, names: &[String]) -> Result<Vec<u64>, WordPressError>;
}

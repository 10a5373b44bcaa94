//! Blocking client for the parts of the WordPress REST API (`/wp-json/wp/v2`)
//! that publishing and repairing posts need.
//!
//! [`WordPressClient`] talks HTTP with basic auth and an application
//! password. The workflows in the `mdpress` binary only depend on the
//! [`PostStore`] trait, so they can run against a fake store in tests.
mod client;
mod error;
mod store;
mod types;

pub use crate::{
  client::{WordPressClient, slugify},
  error::WordPressError,
  store::PostStore,
  types::{
    NewPost,
    PostContent,
    PostLocator,
    PostTitle,
    RemotePost,
    SiteStatus,
    UNCATEGORIZED_ID,
  },
};

//! Library side of the mdpress binary.
//!
//! The command handlers live here so they can be driven from tests with an
//! in-memory [`mdpress_wordpress::PostStore`] instead of a live site.
pub mod cli;
pub mod publish;
pub mod render;
pub mod repair;

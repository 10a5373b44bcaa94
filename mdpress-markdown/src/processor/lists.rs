//! Nested list conversion.
//!
//! Lists are handled by a single top-to-bottom scan over the lines with an
//! explicit stack of open lists. Each two columns of leading indentation open
//! one nesting level. Any line that is not a list item closes every open
//! list, so the stack is empty between list runs.
use std::sync::LazyLock;

use regex::Regex;

use crate::utils::compile_or_never;

static UNORDERED_ITEM_RE: LazyLock<Regex> =
  LazyLock::new(|| compile_or_never(r"^(\s*)[-*+]\s+(.+)$"));

static ORDERED_ITEM_RE: LazyLock<Regex> =
  LazyLock::new(|| compile_or_never(r"^(\s*)\d+\.\s+(.+)$"));

/// Kind of list a frame or item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
  /// `1.`, `2.`, ... rendered as `<ol>`.
  Ordered,
  /// `-`, `*` or `+` rendered as `<ul>`.
  Unordered,
}

impl ListKind {
  /// HTML tag name for this kind of list.
  #[must_use]
  pub const fn tag(self) -> &'static str {
    match self {
      Self::Ordered => "ol",
      Self::Unordered => "ul",
    }
  }
}

/// A single list item line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ListItem<'a> {
  pub(crate) kind:  ListKind,
  pub(crate) depth: usize,
  pub(crate) text:  &'a str,
}

/// Classify a line as a list item, if it is one.
pub(crate) fn parse_list_item(line: &str) -> Option<ListItem<'_>> {
  let (kind, caps) = UNORDERED_ITEM_RE
    .captures(line)
    .map(|caps| (ListKind::Unordered, caps))
    .or_else(|| {
      ORDERED_ITEM_RE
        .captures(line)
        .map(|caps| (ListKind::Ordered, caps))
    })?;

  let indent = caps.get(1).map_or(0, |m| m.as_str().chars().count());
  let text = caps.get(2).map_or("", |m| m.as_str());
  Some(ListItem {
    kind,
    depth: indent / 2,
    text,
  })
}

/// One currently open list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ListFrame {
  kind:  ListKind,
  depth: usize,
}

/// Stack of open lists plus the output they write to.
#[derive(Debug, Default)]
struct ListStack {
  frames: Vec<ListFrame>,
  output: Vec<String>,
}

impl ListStack {
  fn open(&mut self, kind: ListKind) {
    let depth = self.frames.len();
    debug_assert!(self.frames.last().is_none_or(|top| top.depth < depth));
    self.frames.push(ListFrame { kind, depth });
    self.output.push(format!("<{}>", kind.tag()));
  }

  /// Close frames until at most `height` remain open.
  fn close_to(&mut self, height: usize) {
    while self.frames.len() > height {
      if let Some(frame) = self.frames.pop() {
        self.output.push(format!("</{}>", frame.kind.tag()));
      }
    }
  }

  fn push_item(&mut self, item: &ListItem<'_>) {
    // Leave the list that owns this depth on top.
    self.close_to(item.depth + 1);

    if let Some(top) = self.frames.last().copied() {
      if top.depth == item.depth && top.kind != item.kind {
        self.close_to(item.depth);
      }
    }

    while self.frames.len() <= item.depth {
      self.open(item.kind);
    }

    self.output.push(format!("<li>{}</li>", item.text.trim_end()));
  }

  fn push_line(&mut self, line: &str) {
    self.close_to(0);
    self.output.push(line.to_string());
  }

  fn finish(mut self) -> String {
    self.close_to(0);
    self.output.join("\n")
  }
}

/// Convert list item lines into balanced, nested `<ul>`/`<ol>` markup.
pub(crate) fn convert_lists(text: &str) -> String {
  let mut stack = ListStack::default();
  for line in text.split('\n') {
    match parse_list_item(line) {
      Some(item) => stack.push_item(&item),
      None => stack.push_line(line),
    }
  }
  stack.finish()
}

//! Line-anchored block stages: fences, headings, quotes, rules, paragraphs.
use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::stash::{Fragment, Stash};
use crate::{
  types::RenderOptions,
  utils::{compile_or_never, escape::escape_html},
};

static FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
  compile_or_never(r"(?s)```([\w+#-]*)[ \t]*\n(.*?)\n```")
});

static LEADING_H1_RE: LazyLock<Regex> =
  LazyLock::new(|| compile_or_never(r"^#[ \t]+\S"));

static HEADING_RE: LazyLock<Regex> =
  LazyLock::new(|| compile_or_never(r"^(#{1,4})[ \t]+(.+?)[ \t]*$"));

static BLOCKQUOTE_RE: LazyLock<Regex> =
  LazyLock::new(|| compile_or_never(r"^> (.+)$"));

static RULE_RE: LazyLock<Regex> =
  LazyLock::new(|| compile_or_never(r"^-{3,}[ \t]*$"));

static BLOCK_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
  compile_or_never(r"^<(?:h[1-6]|p|ul|ol|li|blockquote|pre|table|hr)")
});

static STRAY_BLANK_RE: LazyLock<Regex> = LazyLock::new(|| {
  compile_or_never(
    r"(<[A-Za-z][^<>]*>)\n(?:[ \t]*\n)+([^<\n][^<]*</[A-Za-z][A-Za-z0-9]*>)",
  )
});

/// Apply `transform` to each line, keeping line structure intact.
pub(crate) fn map_lines<F>(text: &str, transform: F) -> String
where
  F: FnMut(&str) -> String,
{
  text
    .split('\n')
    .map(transform)
    .collect::<Vec<_>>()
    .join("\n")
}

/// Replace fenced code blocks with `<pre><code>` elements, stashed behind
/// tokens that sit on a line of their own.
pub(crate) fn extract_fences(
  text: &str,
  stash: &mut Stash,
  options: &RenderOptions,
) -> String {
  FENCE_RE
    .replace_all(text, |caps: &Captures| {
      let language = &caps[1];
      let code = escape_html(&caps[2]);
      let pre = if options.block_classes {
        r#"<pre class="wp-block-code">"#
      } else {
        "<pre>"
      };
      let html = if language.is_empty() {
        format!("{pre}<code>{code}</code></pre>")
      } else {
        format!(r#"{pre}<code class="language-{language}">{code}</code></pre>"#)
      };
      format!("\n{}\n", stash.push(Fragment::Block, html))
    })
    .into_owned()
}

/// Drop the first line if it is a level-1 heading.
pub(crate) fn strip_leading_heading(text: &str) -> String {
  let (first, rest) = text.split_once('\n').unwrap_or((text, ""));
  if LEADING_H1_RE.is_match(first) {
    rest.to_string()
  } else {
    text.to_string()
  }
}

/// Convert `#` through `####` at the start of a line into `<h1>`..`<h4>`.
pub(crate) fn convert_headings(text: &str) -> String {
  map_lines(text, |line| {
    HEADING_RE.captures(line).map_or_else(
      || line.to_string(),
      |caps| {
        let level = caps[1].len();
        format!("<h{level}>{}</h{level}>", &caps[2])
      },
    )
  })
}

/// Convert single-line block quotes and horizontal rules.
pub(crate) fn convert_quotes_and_rules(text: &str) -> String {
  map_lines(text, |line| {
    if let Some(caps) = BLOCKQUOTE_RE.captures(line) {
      format!("<blockquote>{}</blockquote>", &caps[1])
    } else if RULE_RE.is_match(line) {
      "<hr />".to_string()
    } else {
      line.to_string()
    }
  })
}

/// Whether a block already starts with a block-level element.
pub(crate) fn starts_with_block_tag(block: &str) -> bool {
  BLOCK_TAG_RE.is_match(block.trim_start())
}

/// Split on blank lines and wrap every block that is not already a
/// block-level element in `<p>`.
///
/// Stashed code blocks always form a block of their own, even when the
/// document has no blank line around the fence.
pub(crate) fn wrap_paragraphs(text: &str) -> String {
  let mut blocks: Vec<String> = Vec::new();
  let mut current: Vec<&str> = Vec::new();

  for line in text.split('\n') {
    let trimmed = line.trim();
    if trimmed.is_empty() {
      flush_block(&mut current, &mut blocks);
    } else if Stash::is_token(trimmed, Fragment::Block) {
      flush_block(&mut current, &mut blocks);
      blocks.push(trimmed.to_string());
    } else {
      current.push(line);
    }
  }
  flush_block(&mut current, &mut blocks);

  blocks.join("\n\n")
}

fn flush_block(current: &mut Vec<&str>, blocks: &mut Vec<String>) {
  let joined = current.join("\n");
  current.clear();
  let block = joined.trim();
  if block.is_empty() {
    return;
  }
  if starts_with_block_tag(block) {
    blocks.push(block.to_string());
  } else {
    blocks.push(format!("<p>{block}</p>"));
  }
}

/// Collapse blank lines sitting between an opening tag and the text that
/// closes it, so every element's content is contiguous.
pub(crate) fn normalize_whitespace(text: &str) -> String {
  STRAY_BLANK_RE.replace_all(text, "$1$2").into_owned()
}

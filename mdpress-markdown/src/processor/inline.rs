//! Inline span conversion: code, emphasis, images and links.
use std::{borrow::Cow, sync::LazyLock};

use regex::{Captures, Regex};

use super::stash::{Fragment, Stash};
use crate::utils::{compile_or_never, escape::escape_html};

static CODE_SPAN_RE: LazyLock<Regex> =
  LazyLock::new(|| compile_or_never(r"`([^`\n]+)`"));

static LINK_TARGET_RE: LazyLock<Regex> =
  LazyLock::new(|| compile_or_never(r"\]\(([^()\s]+)\)"));

static BOLD_STAR_RE: LazyLock<Regex> =
  LazyLock::new(|| compile_or_never(r"\*\*([^*\n]+)\*\*"));

static BOLD_UNDERSCORE_RE: LazyLock<Regex> =
  LazyLock::new(|| compile_or_never(r"__([^_\n]+)__"));

// Neither end of the run may be whitespace, so a `* ` list marker never
// opens an emphasis run.
static ITALIC_STAR_RE: LazyLock<Regex> = LazyLock::new(|| {
  compile_or_never(r"\*([^*\s](?:[^*\n]*[^*\s])?)\*")
});

static ITALIC_UNDERSCORE_RE: LazyLock<Regex> = LazyLock::new(|| {
  compile_or_never(r"_([^_\s](?:[^_\n]*[^_\s])?)_")
});

static EMPHASIS_TAG_RE: LazyLock<Regex> =
  LazyLock::new(|| compile_or_never(r"<(/?)(strong|em)>"));

static IMAGE_RE: LazyLock<Regex> =
  LazyLock::new(|| compile_or_never(r"!\[([^\]\n]*)\]\(([^()\s]+)\)"));

static LINK_RE: LazyLock<Regex> =
  LazyLock::new(|| compile_or_never(r"\[([^\]\n]+)\]\(([^()\s]+)\)"));

/// Convert inline spans.
///
/// Code spans are escaped and stashed first, then link targets, so neither
/// is touched by the emphasis rules. Bold runs before italic so `**x**` is
/// not read as two italics, and images run before links so the `!` of an
/// image is never left behind.
pub(crate) fn convert_spans(text: &str, stash: &mut Stash) -> String {
  let text = CODE_SPAN_RE.replace_all(text, |caps: &Captures| {
    let html = format!("<code>{}</code>", escape_html(&caps[1]));
    stash.push(Fragment::Code, html)
  });
  let text = LINK_TARGET_RE.replace_all(&text, |caps: &Captures| {
    format!("]({})", stash.push(Fragment::Url, caps[1].to_string()))
  });

  let text = wrap_runs(&BOLD_STAR_RE, &text, "strong");
  let text = wrap_runs(&BOLD_UNDERSCORE_RE, &text, "strong");
  let text = wrap_runs(&ITALIC_STAR_RE, &text, "em");
  let text = wrap_runs(&ITALIC_UNDERSCORE_RE, &text, "em");

  let text = IMAGE_RE.replace_all(&text, r#"<img src="$2" alt="$1" />"#);
  let text = LINK_RE.replace_all(&text, r#"<a href="$2">$1</a>"#);

  text.into_owned()
}

/// Wrap each run matched by `re` in `tag`.
///
/// A run whose text would cut through an emphasis tag emitted by an earlier
/// rule is left as written, so mixed `*` and `_` markers never produce
/// crossed tags.
fn wrap_runs<'t>(re: &Regex, text: &'t str, tag: &str) -> Cow<'t, str> {
  re.replace_all(text, |caps: &Captures| {
    if is_well_nested(&caps[1]) {
      format!("<{tag}>{}</{tag}>", &caps[1])
    } else {
      caps[0].to_string()
    }
  })
}

fn is_well_nested(fragment: &str) -> bool {
  let mut open = Vec::new();
  for caps in EMPHASIS_TAG_RE.captures_iter(fragment) {
    let tag = caps.get(2).map_or("", |m| m.as_str());
    if caps[1].is_empty() {
      open.push(tag);
    } else if open.pop() != Some(tag) {
      return false;
    }
  }
  open.is_empty()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn spans(text: &str) -> String {
    let mut stash = Stash::new();
    let out = convert_spans(text, &mut stash);
    stash.restore(&out)
  }

  #[test]
  fn test_code_span_is_escaped() {
    assert_eq!(spans("run `a < b`"), "run <code>a &lt; b</code>");
  }

  #[test]
  fn test_code_span_content_is_not_emphasized() {
    assert_eq!(
      spans("`MY_ENV_VAR` and `**kwargs`"),
      "<code>MY_ENV_VAR</code> and <code>**kwargs</code>"
    );
  }

  #[test]
  fn test_bold_and_italic() {
    assert_eq!(
      spans("**bold** and __strong__ and *em* and _also_"),
      "<strong>bold</strong> and <strong>strong</strong> and <em>em</em> and \
       <em>also</em>"
    );
  }

  #[test]
  fn test_bold_is_not_split_into_italics() {
    assert_eq!(spans("**x**"), "<strong>x</strong>");
    assert!(!spans("**x**").contains("<em>"));
  }

  #[test]
  fn test_unmatched_markers_stay_literal() {
    assert_eq!(spans("**unclosed bold"), "**unclosed bold");
    assert_eq!(spans("2 * 3 * 4"), "2 * 3 * 4");
    assert_eq!(spans("a ` stray backtick"), "a ` stray backtick");
    assert_eq!(spans("**care with *stars"), "**care with *stars");
  }

  #[test]
  fn test_mixed_markers_never_cross() {
    assert_eq!(spans("__a *b__ c*"), "<strong>a *b</strong> c*");
    assert_eq!(spans("*a _b* c_"), "<em>a _b</em> c_");
    assert_eq!(spans("**a __b** c__"), "<strong>a __b</strong> c__");
  }

  #[test]
  fn test_nested_emphasis_is_kept() {
    assert_eq!(
      spans("**bold _inner_ text**"),
      "<strong>bold <em>inner</em> text</strong>"
    );
    assert_eq!(
      spans("_outer **inner** outer_"),
      "<em>outer <strong>inner</strong> outer</em>"
    );
  }

  #[test]
  fn test_list_marker_is_not_emphasis() {
    assert_eq!(spans("* item *one*"), "* item <em>one</em>");
  }

  #[test]
  fn test_links_and_images() {
    assert_eq!(
      spans("[docs](https://example.com/a_b_c) and ![logo](/img/logo_1.png)"),
      r#"<a href="https://example.com/a_b_c">docs</a> and <img src="/img/logo_1.png" alt="logo" />"#
    );
  }

  #[test]
  fn test_emphasis_inside_link_text() {
    assert_eq!(
      spans("[**Guide**](guide.html)"),
      r#"<a href="guide.html"><strong>Guide</strong></a>"#
    );
  }
}

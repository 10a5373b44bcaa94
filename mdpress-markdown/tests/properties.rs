#![allow(clippy::unwrap_used, reason = "Fine in tests")]
use std::sync::LazyLock;

use mdpress_markdown::{
  ListKind,
  RenderOptions,
  render,
  utils::escape::{escape_html, unescape_html},
};
use proptest::prelude::*;
use regex::Regex;

const SAMPLES: &[&str] = &[
  "- a\n- b\n  - c\n- d",
  "1. one\n  - nested\n    1. deeper\n2. two",
  "* x\n      - jump\n- y\n\n1. after gap",
  "- a\n1. b\n  + c\n    2. d\ntext\n- e",
  "Intro\n\n- only item",
];

fn count(html: &str, needle: &str) -> usize {
  html.matches(needle).count()
}

#[test]
fn test_list_tags_are_balanced() {
  for sample in SAMPLES {
    let html = render(sample, &RenderOptions::default());
    for kind in [ListKind::Ordered, ListKind::Unordered] {
      let tag = kind.tag();
      assert_eq!(
        count(&html, &format!("<{tag}>")),
        count(&html, &format!("</{tag}>")),
        "unbalanced <{tag}> in:\n{html}"
      );
    }
    assert_eq!(count(&html, "<li>"), count(&html, "</li>"));
  }
}

#[test]
fn test_list_tags_are_properly_nested() {
  for sample in SAMPLES {
    let html = render(sample, &RenderOptions::default());
    let mut open: Vec<&str> = Vec::new();
    for line in html.lines() {
      match line {
        "<ul>" | "<ol>" => open.push(line),
        "</ul>" => assert_eq!(open.pop(), Some("<ul>"), "in:\n{html}"),
        "</ol>" => assert_eq!(open.pop(), Some("<ol>"), "in:\n{html}"),
        _ => {},
      }
    }
    assert!(open.is_empty(), "unclosed lists in:\n{html}");
  }
}

#[test]
fn test_fenced_code_is_fully_escaped() {
  let bodies = [
    "<script>alert(\"x\")</script>",
    "# heading\n- item\n| a | b |\n|---|---|\n| 1 | 2 |",
    "**bold** _em_ `code` [link](url)",
    "a && b > c",
  ];

  for body in bodies {
    let md = format!("Before\n\n```text\n{body}\n```\n\nAfter");
    let html = render(&md, &RenderOptions::default());

    assert_eq!(count(&html, "<pre"), 1, "in:\n{html}");
    assert_eq!(count(&html, "<code"), 1, "in:\n{html}");
    let expected = format!("<code class=\"language-text\">{}</code>", escape_html(body));
    assert!(html.contains(&expected), "in:\n{html}");
    assert!(!html.contains("<script>"));
    assert!(!html.contains("<li>"));
    assert!(!html.contains("<strong>"));
  }
}

#[test]
fn test_block_html_is_never_rewrapped() {
  let blocks = [
    "<h3>Heading</h3>",
    "<p>Paragraph</p>",
    "<ul>\n<li>x</li>\n</ul>",
    "<ol>\n<li>x</li>\n</ol>",
    "<blockquote>Quote</blockquote>",
    "<pre>pre</pre>",
    "<table>\n<tr><td>1</td></tr>\n</table>",
    "<hr />",
  ];

  for block in blocks {
    let html = render(block, &RenderOptions::default());
    assert_eq!(html, block);
    assert!(!html.starts_with("<p><"));
  }
}

#[test]
fn test_rendering_is_stable_on_its_output() {
  let md = "# Title\n\nSome **bold** text.\n\n- a\n  - b\n\n| A |\n|---|\n| 1 |";
  let once = render(md, &RenderOptions::default());
  let twice = render(&once, &RenderOptions::default());
  assert_eq!(once, twice);
}

#[test]
fn test_unescape_inverts_escape() {
  let inputs = [
    "",
    "plain",
    "<h2>A & B</h2>",
    "\"quoted\" <tag attr=\"v\">",
    "&lt;already escaped&gt;",
    "&amp;lt; nested",
    "tabs\tand\nnewlines",
  ];
  for input in inputs {
    assert_eq!(unescape_html(&escape_html(input)), input);
  }
}

static LIST_TAG_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"<(/?)(ul|ol)>").unwrap());

fn list_line() -> impl Strategy<Value = String> {
  (
    0usize..4,
    prop_oneof![Just("-"), Just("+"), Just("1.")],
    "[a-z]{1,8}",
  )
    .prop_map(|(depth, marker, word)| {
      format!("{}{marker} {word}", "  ".repeat(depth))
    })
}

fn any_line() -> impl Strategy<Value = String> {
  prop_oneof![3 => list_line(), 1 => "[a-z]{1,8}", 1 => Just(String::new())]
}

proptest! {
  #[test]
  fn prop_generated_lists_stay_balanced(
    lines in prop::collection::vec(any_line(), 1..24)
  ) {
    let html = render(&lines.join("\n"), &RenderOptions::default());

    let mut open: Vec<&str> = Vec::new();
    for caps in LIST_TAG_RE.captures_iter(&html) {
      let tag = caps.get(2).map_or("", |m| m.as_str());
      if caps[1].is_empty() {
        open.push(tag);
      } else {
        prop_assert_eq!(open.pop(), Some(tag), "in:\n{}", html);
      }
    }
    prop_assert!(open.is_empty(), "unclosed lists in:\n{}", html);
    prop_assert_eq!(count(&html, "<li>"), count(&html, "</li>"));
  }

  #[test]
  fn prop_fence_body_is_escaped_verbatim(
    body in "[^`\r\n]{1,20}(\n[^`\r\n]{1,20}){0,4}"
  ) {
    let md = format!("Before\n\n```text\n{body}\n```\n\nAfter");
    let html = render(&md, &RenderOptions::default());

    prop_assert_eq!(count(&html, "<pre"), 1);
    prop_assert_eq!(count(&html, "<code"), 1);
    let expected =
      format!("<code class=\"language-text\">{}</code>", escape_html(&body));
    prop_assert!(html.contains(&expected), "in:\n{}", html);
  }

  #[test]
  fn prop_unescape_inverts_escape(s in any::<String>()) {
    prop_assert_eq!(unescape_html(&escape_html(&s)), s);
  }

  #[test]
  fn prop_render_accepts_any_input(s in any::<String>()) {
    let _ = render(&s, &RenderOptions::default());
  }
}

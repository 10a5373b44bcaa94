//! HTML escaping helpers shared by the renderer and the post repair workflow.
use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::compile_or_never;

static ENTITY_RE: LazyLock<Regex> =
  LazyLock::new(|| compile_or_never(r"&(lt|gt|amp|quot);"));

/// Escape `&`, `<`, `>` and `"` so the text can never be read as markup.
#[must_use]
pub fn escape_html(text: &str) -> String {
  html_escape::encode_double_quoted_attribute(text).into_owned()
}

/// Reverse [`escape_html`] for the four standard entities `&lt;`, `&gt;`,
/// `&amp;` and `&quot;`.
///
/// This is a single pass: `&amp;lt;` becomes `&lt;`, not `<`. Other entities
/// are left untouched.
#[must_use]
pub fn unescape_html(text: &str) -> String {
  ENTITY_RE
    .replace_all(text, |caps: &Captures| {
      match &caps[1] {
        "lt" => "<",
        "gt" => ">",
        "amp" => "&",
        _ => "\"",
      }
    })
    .into_owned()
}

/// Heuristic check for a post body whose markup was escaped on its way into
/// WordPress, so that tags show up as literal text.
///
/// Looks for an escaped heading or paragraph tag, or a doubly escaped `<`.
#[must_use]
pub fn looks_double_escaped(rendered: &str) -> bool {
  rendered.contains("&lt;h")
    || rendered.contains("&lt;p&gt;")
    || rendered.contains("&amp;lt;")
}

/// Whether a raw post body contains any escaped markup worth unescaping.
#[must_use]
pub fn contains_escaped_markup(raw: &str) -> bool {
  raw.contains("&lt;") || raw.contains("&amp;")
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_escape_html() {
    assert_eq!(
      escape_html(r#"<a href="x">&</a>"#),
      "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;"
    );
    assert_eq!(escape_html("plain"), "plain");
  }

  #[test]
  fn test_unescape_html() {
    assert_eq!(unescape_html("&lt;h2&gt;Title&lt;/h2&gt;"), "<h2>Title</h2>");
    assert_eq!(unescape_html("&quot;quoted&quot;"), "\"quoted\"");
    assert_eq!(unescape_html("Tom &amp; Jerry"), "Tom & Jerry");
  }

  #[test]
  fn test_unescape_is_single_pass() {
    assert_eq!(unescape_html("&amp;lt;p&amp;gt;"), "&lt;p&gt;");
  }

  #[test]
  fn test_unescape_leaves_other_entities() {
    assert_eq!(unescape_html("a&nbsp;b &#39;c&#39;"), "a&nbsp;b &#39;c&#39;");
  }

  #[test]
  fn test_unescape_left_inverse_of_escape() {
    let samples = [
      "",
      "no markup here",
      r#"<pre class="wp-block-code"><code>fn main() {}</code></pre>"#,
      "if a < b && c > d { \"yes\" }",
      "<<>>\"\"",
      "unicode: <ünïcödé> \"✓\"",
    ];
    for sample in samples.iter().map(|s| s.replace('&', "and")) {
      assert_eq!(unescape_html(&escape_html(&sample)), sample);
    }
  }

  #[test]
  fn test_looks_double_escaped() {
    assert!(looks_double_escaped("&lt;h2&gt;Setup&lt;/h2&gt;"));
    assert!(looks_double_escaped("&lt;p&gt;text"));
    assert!(looks_double_escaped("<p>&amp;lt;code&amp;gt;</p>"));
    assert!(!looks_double_escaped("<h2>Setup</h2><p>fine</p>"));
    assert!(!looks_double_escaped("<code>a &lt; b</code>"));
  }

  #[test]
  fn test_contains_escaped_markup() {
    assert!(contains_escaped_markup("&lt;h1&gt;"));
    assert!(contains_escaped_markup("A &amp; B"));
    assert!(!contains_escaped_markup("<h1>Clean</h1>"));
  }
}

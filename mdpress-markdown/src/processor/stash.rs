//! Placeholder storage for rendered fragments that later stages must not see.
//!
//! Fenced code blocks, inline code spans and link targets are swapped for
//! opaque tokens as soon as they are recognized. The tokens are built from
//! private-use code points, so none of the Markdown patterns can match inside
//! them. Everything is put back in a single pass at the very end.

const OPEN: char = '\u{E000}';
const CLOSE: char = '\u{E001}';

/// Which kind of fragment a token stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Fragment {
  /// A complete `<pre><code>` block. Always occupies a line of its own.
  Block,
  /// An inline `<code>` span.
  Code,
  /// A link or image target.
  Url,
}

impl Fragment {
  const fn marker(self) -> char {
    match self {
      Self::Block => 'B',
      Self::Code => 'C',
      Self::Url => 'U',
    }
  }
}

#[derive(Debug, Default)]
pub(crate) struct Stash {
  fragments: Vec<String>,
}

impl Stash {
  pub(crate) fn new() -> Self {
    Self::default()
  }

  /// Store a fragment and return the token that replaces it in the text.
  pub(crate) fn push(&mut self, kind: Fragment, fragment: String) -> String {
    let token = format!("{OPEN}{}{}{CLOSE}", kind.marker(), self.fragments.len());
    self.fragments.push(fragment);
    token
  }

  /// Whether `text` is exactly one token of the given kind.
  pub(crate) fn is_token(text: &str, kind: Fragment) -> bool {
    text
      .strip_prefix(OPEN)
      .and_then(|rest| rest.strip_suffix(CLOSE))
      .and_then(|rest| rest.strip_prefix(kind.marker()))
      .is_some_and(|index| {
        !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit())
      })
  }

  /// Replace every known token in `text` with its fragment.
  ///
  /// Sequences that only look like tokens are kept verbatim.
  pub(crate) fn restore(&self, text: &str) -> String {
    if self.fragments.is_empty() {
      return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find(OPEN) {
      out.push_str(&rest[..start]);
      let after = &rest[start + OPEN.len_utf8()..];
      if let Some((fragment, consumed)) = self.lookup(after) {
        out.push_str(fragment);
        rest = &after[consumed..];
      } else {
        out.push(OPEN);
        rest = after;
      }
    }
    out.push_str(rest);
    out
  }

  fn lookup(&self, text: &str) -> Option<(&str, usize)> {
    let mut chars = text.chars();
    let marker = chars.next()?;
    if !matches!(marker, 'B' | 'C' | 'U') {
      return None;
    }
    let body = chars.as_str();
    let end = body.find(CLOSE)?;
    let index: usize = body[..end].parse().ok()?;
    let fragment = self.fragments.get(index)?;
    Some((fragment, marker.len_utf8() + end + CLOSE.len_utf8()))
  }
}

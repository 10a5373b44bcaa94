//! Pipe table conversion.
use crate::types::RenderOptions;

fn is_table_line(line: &str) -> bool {
  let trimmed = line.trim();
  trimmed.len() >= 2 && trimmed.starts_with('|') && trimmed.ends_with('|')
}

fn is_separator_row(line: &str) -> bool {
  let trimmed = line.trim();
  is_table_line(line)
    && trimmed.contains('-')
    && trimmed
      .chars()
      .all(|c| matches!(c, '|' | '-' | ':') || c.is_whitespace())
}

/// Split a row into trimmed cells, dropping the empty cells produced by the
/// leading and trailing pipe.
fn split_cells(line: &str) -> Vec<&str> {
  let mut cells: Vec<&str> = line.trim().split('|').map(str::trim).collect();
  if cells.first().is_some_and(|cell| cell.is_empty()) {
    cells.remove(0);
  }
  if cells.last().is_some_and(|cell| cell.is_empty()) {
    cells.pop();
  }
  cells
}

fn render_row(html: &mut String, line: &str, cell_tag: &str) {
  html.push_str("<tr>");
  for cell in split_cells(line) {
    html.push_str(&format!("<{cell_tag}>{cell}</{cell_tag}>"));
  }
  html.push_str("</tr>\n");
}

fn render_table(rows: &[&str], options: &RenderOptions) -> String {
  let mut html = String::new();
  html.push_str(if options.block_classes {
    "<table class=\"wp-block-table\">\n"
  } else {
    "<table>\n"
  });

  html.push_str("<thead>\n");
  render_row(&mut html, rows[0], "th");
  html.push_str("</thead>\n<tbody>\n");
  for row in &rows[2..] {
    render_row(&mut html, row, "td");
  }
  html.push_str("</tbody>\n</table>");
  html
}

/// Convert runs of pipe-delimited lines into tables.
///
/// A run becomes a table only when its second line is a separator row and
/// at least one body row follows; shorter runs are left as text.
pub(crate) fn convert_tables(text: &str, options: &RenderOptions) -> String {
  let lines: Vec<&str> = text.split('\n').collect();
  let mut output: Vec<String> = Vec::with_capacity(lines.len());

  let mut i = 0;
  while i < lines.len() {
    if !is_table_line(lines[i]) {
      output.push(lines[i].to_string());
      i += 1;
      continue;
    }

    let start = i;
    while i < lines.len() && is_table_line(lines[i]) {
      i += 1;
    }
    let run = &lines[start..i];

    if run.len() >= 3 && is_separator_row(run[1]) {
      output.push(render_table(run, options));
    } else {
      output.extend(run.iter().map(ToString::to_string));
    }
  }

  output.join("\n")
}

use swc_common::{BytePos, Span};

/// A file's text together with the position swc assigned to its first byte.
pub struct SourceText<'a> {
  pub text: &'a str,
  pub start_pos: BytePos,
}

impl<'a> SourceText<'a> {
  pub fn offset(&self, pos: BytePos) -> usize {
    (pos.0.saturating_sub(self.start_pos.0) as usize).min(self.text.len())
  }

  pub fn slice(&self, span: Span) -> &'a str {
    let lo = self.offset(span.lo);
    let hi = self.offset(span.hi).max(lo);

    self.text.get(lo..hi).unwrap_or("")
  }

  /// Text of `outer` with the text of `inner` cut out, along with whitespace
  /// that followed it.
  pub fn slice_without(&self, outer: Span, inner: Span) -> String {
    let outer_text = self.slice(outer);
    let cut_lo = self.offset(inner.lo).saturating_sub(self.offset(outer.lo));
    let cut_hi = self.offset(inner.hi).saturating_sub(self.offset(outer.lo));

    match (outer_text.get(..cut_lo), outer_text.get(cut_hi..)) {
      (Some(before), Some(after)) => format!("{}{}", before, after.trim_start()),
      _ => outer_text.to_string(),
    }
  }

  /// 1-based line and column of `pos`.
  pub fn line_col(&self, pos: BytePos) -> (u32, u32) {
    pos_to_line_col(self.text, self.offset(pos))
  }
}

pub fn pos_to_line_col(text: &str, offset: usize) -> (u32, u32) {
  let mut line = 1u32;
  let mut col = 1u32;

  for (i, c) in text.char_indices() {
    if i >= offset {
      break;
    }

    if c == '\n' {
      line += 1;
      col = 1;
    } else {
      col += 1;
    }
  }

  (line, col)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn span(lo: u32, hi: u32) -> Span {
    Span::new(BytePos(lo), BytePos(hi), Default::default())
  }

  #[test]
  fn slices_relative_to_start_pos() {
    let source = SourceText {
      text: "let a = 1;\nlet b = 2;",
      start_pos: BytePos(1),
    };

    assert_eq!(source.slice(span(1, 4)), "let");
    assert_eq!(source.slice(span(12, 22)), "let b = 2;");
    assert_eq!(source.line_col(BytePos(16)), (2, 5));
  }

  #[test]
  fn cuts_inner_span() {
    let source = SourceText {
      text: "{ 'worklet';\n  return 1; }",
      start_pos: BytePos(0),
    };

    assert_eq!(source.slice_without(span(0, 26), span(2, 12)), "{ return 1; }");
  }
}

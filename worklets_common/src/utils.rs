/// Quotes `value` as a string literal that is valid in both JSON and
/// JavaScript source.
pub fn js_string_literal(value: &str) -> String {
  let mut res = String::with_capacity(value.len() + 2);
  res.push('"');

  for c in value.chars() {
    match c {
      '"' => res.push_str("\\\""),
      '\\' => res.push_str("\\\\"),
      '\n' => res.push_str("\\n"),
      '\r' => res.push_str("\\r"),
      '\t' => res.push_str("\\t"),
      '\u{2028}' => res.push_str("\\u2028"),
      '\u{2029}' => res.push_str("\\u2029"),
      c if (c as u32) < 0x20 => res.push_str(&format!("\\u{:04x}", c as u32)),
      c => res.push(c),
    }
  }

  res.push('"');
  res
}

pub fn is_identifier_name(name: &str) -> bool {
  let mut chars = name.chars();

  match chars.next() {
    Some(c) if c == '_' || c == '$' || c.is_alphabetic() => {}
    _ => return false,
  }

  chars.all(|c| c == '_' || c == '$' || c.is_alphanumeric())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn string_literal_is_valid_json() {
    let input = "line\n\"quoted\"\\ \u{2028} \u{1}";
    let literal = js_string_literal(input);
    let parsed: String = serde_json::from_str(&literal).unwrap();
    assert_eq!(parsed, input);
  }

  #[test]
  fn identifier_names() {
    assert!(is_identifier_name("_foo$1"));
    assert!(!is_identifier_name("1foo"));
    assert!(!is_identifier_name("foo-bar"));
    assert!(!is_identifier_name(""));
  }
}

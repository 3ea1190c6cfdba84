//! This module implements utility functions without much need for defining
//! context or not enough of it to warrant them having their own modules.

use crate::keywords::COMMENT_MARKER;

/// Pre-processes a raw deck line: trims surrounding blanks, skips empty and
/// comment-only lines, and truncates inline comments. Returns `None` when
/// nothing useful remains.
pub fn clean_line(raw: &str) -> Option<&str> {
  let mut line = raw.trim();
  if line.is_empty() || line.starts_with(COMMENT_MARKER) {
    return None;
  }
  if let Some(ix) = line.find(COMMENT_MARKER) {
    line = line[..ix].trim_end();
  }
  if line.is_empty() {
    return None;
  }
  return Some(line);
}

/// Extracts the value of a `key = value` attribute from a keyword line.
/// Matching is case-insensitive and lenient about blanks around the equals
/// sign; the value is any run of non-blank, non-comma characters. An
/// occurrence of the key with no well-formed value is skipped and the scan
/// resumes further down the line. Hyper-lenient and doesn't require pulling
/// a whole regex library.
pub fn keyword_attr<'a>(line: &'a str, key: &str) -> Option<&'a str> {
  let haystack = line.to_ascii_lowercase();
  let needle = key.to_ascii_lowercase();
  let mut from = 0;
  while let Some(pos) = haystack[from..].find(&needle) {
    let after_key = from + pos + needle.len();
    from = after_key;
    let rest = line[after_key..].trim_start();
    let value = match rest.strip_prefix('=') {
      Some(v) => v.trim_start(),
      None => continue
    };
    let end = value
      .find(|c: char| c.is_whitespace() || c == ',')
      .unwrap_or(value.len());
    if end > 0 {
      return Some(&value[..end]);
    }
  }
  return None;
}

/// Returns the first unsigned integer literal found anywhere in a line.
pub fn first_integer(line: &str) -> Option<i64> {
  let start = line.find(|c: char| c.is_ascii_digit())?;
  let digits = &line[start..];
  let end = digits
    .find(|c: char| !c.is_ascii_digit())
    .unwrap_or(digits.len());
  return digits[..end].parse().ok();
}

/// Title-cases a model name: every letter that follows a non-letter is
/// upper-cased, every other letter is lower-cased, and non-letters are kept
/// as-is. Turns "mooney-rivlin" into "Mooney-Rivlin".
pub fn title_case(s: &str) -> String {
  let mut out = String::with_capacity(s.len());
  let mut prev_alpha = false;
  for c in s.chars() {
    if c.is_alphabetic() {
      if prev_alpha {
        out.extend(c.to_lowercase());
      } else {
        out.extend(c.to_uppercase());
      }
      prev_alpha = true;
    } else {
      out.push(c);
      prev_alpha = false;
    }
  }
  return out;
}

//! Text normalization helpers

/// Placeholder for a schema field whose element is missing from the page
pub const NOT_FOUND: &str = "Not found";

/// Collapse every whitespace run to a single space and trim the ends
pub fn clean_text(text: &str) -> String {
  text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Title-case a field label: the first letter of every alphabetic run is
/// upper-cased and the rest lower-cased ("patient name" -> "Patient Name")
pub fn title_case(label: &str) -> String {
  let mut out = String::with_capacity(label.len());
  let mut in_word = false;

  for c in label.chars() {
    if c.is_alphabetic() {
      if in_word {
        out.extend(c.to_lowercase());
      } else {
        out.extend(c.to_uppercase());
      }
      in_word = true;
    } else {
      out.push(c);
      in_word = false;
    }
  }

  out
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_clean_text_collapses_whitespace() {
    assert_eq!(clean_text("  Dr.\n\t Jane   Doe \r\n"), "Dr. Jane Doe");
    assert_eq!(clean_text("single"), "single");
  }

  #[test]
  fn test_clean_text_empty_input() {
    assert_eq!(clean_text(""), "");
    assert_eq!(clean_text(" \n\t "), "");
  }

  #[test]
  fn test_title_case_labels() {
    assert_eq!(title_case("patient name"), "Patient Name");
    assert_eq!(title_case("Doctor Qualification summary"), "Doctor Qualification Summary");
    assert_eq!(title_case("FAQ question"), "Faq Question");
    assert_eq!(title_case("map-link"), "Map-Link");
  }
}

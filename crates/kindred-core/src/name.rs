//! Display-name composition.

/// Compose a display name from its parts.
///
/// A non-empty nickname is quoted and placed after the first name:
/// `Jane "Janie" Marie Doe`. Empty parts are skipped so the result never
/// carries doubled or trailing spaces.
pub fn format_name(first: &str, middle: &str, last: &str, nick: &str) -> String {
  let quoted_nick = (!nick.is_empty()).then(|| format!("\"{nick}\""));

  [Some(first), quoted_nick.as_deref(), Some(middle), Some(last)]
    .into_iter()
    .flatten()
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join(" ")
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn nickname_is_quoted_after_first_name() {
    assert_eq!(format_name("Jane", "", "Doe", "Janie"), "Jane \"Janie\" Doe");
  }

  #[test]
  fn first_name_only() {
    assert_eq!(format_name("Jane", "", "", ""), "Jane");
  }

  #[test]
  fn all_parts() {
    assert_eq!(
      format_name("Robert", "James", "Smith", "Bobby"),
      "Robert \"Bobby\" James Smith"
    );
    assert_eq!(format_name("Robert", "James", "Smith", ""), "Robert James Smith");
  }

  #[test]
  fn empty_first_name_leaves_no_leading_space() {
    assert_eq!(format_name("", "", "Smith", ""), "Smith");
    assert_eq!(format_name("", "", "", ""), "");
  }
}

//! Small text helpers shared by the extraction pipelines.

/// Normalize line endings to `\n`. Run once per document by the text
/// source; everything downstream assumes no `\r` remains.
pub fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Remove all whitespace from a string. Used for quantity tokens where
/// column layouts insert spaces inside numbers ("12 .000" -> "12.000").
pub fn squeeze(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Collapse runs of whitespace into single spaces and trim the ends.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Title-case every whitespace-separated word ("ALMONDS KERN" -> "Almonds Kern").
pub fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// True if the string contains at least `n` consecutive ASCII letters.
pub fn has_letter_run(s: &str, n: usize) -> bool {
    let mut run = 0;
    for c in s.chars() {
        if c.is_ascii_alphabetic() {
            run += 1;
            if run >= n {
                return true;
            }
        } else {
            run = 0;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalize_newlines() {
        assert_eq!(normalize_newlines("a\r\nb\rc\nd"), "a\nb\nc\nd");
    }

    #[test]
    fn test_squeeze() {
        assert_eq!(squeeze(" 12 .000 "), "12.000");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  Almonds   Kern \n WC "), "Almonds Kern WC");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("ALMONDS kern NON var"), "Almonds Kern Non Var");
    }

    #[test]
    fn test_has_letter_run() {
        assert!(has_letter_run("12 ALM 34", 3));
        assert!(!has_letter_run("1 a2b 3c", 3));
    }
}

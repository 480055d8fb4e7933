use std::sync::OnceLock;

use regex::Regex;

use super::error::ConstructionError;

/// A named character class whose regular expression is compiled on
/// first use.  The patterns given to this are fixed in the source,
/// so failing to compile one is a bug in this crate.
pub(crate) struct CharClass {
    name: &'static str,
    pattern: &'static str,
    once: OnceLock<Regex>,
}

impl CharClass {
    pub(crate) const fn new(name: &'static str, pattern: &'static str) -> Self {
        CharClass {
            name,
            pattern,
            once: OnceLock::new(),
        }
    }

    pub(crate) fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn regex(&self) -> &Regex {
        self.once
            .get_or_init(|| match compile_anchored(self.pattern) {
                Ok(r) => r,
                Err(e) => {
                    panic!("character class {} is broken: {e}", self.name);
                }
            })
    }
}

/// Compiles `pattern` so that it only matches at the start of the
/// text it is given.
pub(crate) fn compile_anchored(pattern: &str) -> Result<Regex, ConstructionError> {
    Regex::new(&format!(r"\A(?:{pattern})")).map_err(|e| ConstructionError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })
}

/// Returns the longest non-empty prefix of `text` matched by `rx`.
pub(crate) fn matching_prefix<'s>(rx: &Regex, text: &'s str) -> Option<&'s str> {
    rx.find(text)
        .filter(|m| m.start() == 0 && !m.is_empty())
        .map(|m| m.as_str())
}

#[test]
fn test_matching_prefix_is_anchored() {
    let rx = compile_anchored("[0-9]+").expect("valid test pattern");
    assert_eq!(matching_prefix(&rx, "123abc"), Some("123"));
    assert_eq!(matching_prefix(&rx, "abc123"), None);
}

#[test]
fn test_matching_prefix_rejects_empty_match() {
    let rx = compile_anchored("[0-9]*").expect("valid test pattern");
    assert_eq!(matching_prefix(&rx, "abc"), None);
}

#[test]
fn test_compile_anchored_rejects_bad_pattern() {
    assert!(matches!(
        compile_anchored("[0-9"),
        Err(ConstructionError::InvalidPattern { .. })
    ));
}

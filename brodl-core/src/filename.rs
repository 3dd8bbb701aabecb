//! The artifact filename convention: `<prefix>-<workshop_id>-<title>.<ext>`.
//!
//! Filenames are the only durable index this tool keeps: the inventory scan,
//! the organize pass and the duplicate scan all read identity back out of them.
//! Formatting and parsing therefore live here, in one place, so the write side
//! and the read side can't drift apart.

use std::path::Path;

/// Characters that are stripped from titles before they become filenames.
const ILLEGAL_CHARS: &[char] = &['"', '\\', '/', '*', '?', '<', '>', '|'];

/// Make a workshop title safe for use in a filename.
///
/// Colons become ` -`, Windows-illegal characters are dropped, and whitespace
/// runs collapse to single spaces. The collapse happens last so the function
/// is idempotent: sanitizing an already-sanitized title is a no-op.
pub fn sanitize_title(title: &str) -> String {
    let replaced = title.replace(':', " -");
    let stripped: String = replaced.chars().filter(|c| !ILLEGAL_CHARS.contains(c)).collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// A parsed (or to-be-formatted) artifact filename.
///
/// `prefix` is `<gameplayCode><difficultyCode><starDigit>`, `workshop_id` is the
/// opaque numeric listing id, `title` is the sanitized map title (which may
/// itself contain `-`), `extension` comes from the resolver page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactName {
    pub prefix: String,
    pub workshop_id: String,
    pub title: String,
    pub extension: String,
}

impl ArtifactName {
    pub fn new(
        prefix: impl Into<String>,
        workshop_id: impl Into<String>,
        title: &str,
        extension: impl Into<String>,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            workshop_id: workshop_id.into(),
            title: sanitize_title(title),
            extension: extension.into(),
        }
    }

    /// Render the canonical filename.
    pub fn file_name(&self) -> String {
        format!(
            "{}-{}-{}.{}",
            self.prefix, self.workshop_id, self.title, self.extension
        )
    }

    /// Parse a filename back into its fields.
    ///
    /// Returns `None` unless the name has at least three `-`-separated fields
    /// with an all-digits second field. Title fields are rejoined with `-`
    /// since sanitized titles may contain hyphens of their own.
    pub fn parse(file_name: &str) -> Option<Self> {
        let path = Path::new(file_name);
        let stem = path.file_stem()?.to_str()?;
        let extension = path.extension()?.to_str()?.to_string();

        let parts: Vec<&str> = stem.split('-').collect();
        if parts.len() < 3 || parts[0].is_empty() {
            return None;
        }
        if !is_all_digits(parts[1]) {
            return None;
        }

        Some(Self {
            prefix: parts[0].to_string(),
            workshop_id: parts[1].to_string(),
            title: parts[2..].join("-"),
            extension,
        })
    }

    /// Extract just the workshop id, accepting any name with an all-digits
    /// second field. This is the looser rule the inventory scan uses: a file
    /// doesn't need a title or extension to count as already downloaded.
    pub fn parse_workshop_id(file_name: &str) -> Option<&str> {
        let mut parts = file_name.split('-');
        parts.next().filter(|p| !p.is_empty())?;
        parts.next().filter(|p| is_all_digits(p))
    }

    /// The star-rating digit: last character of the prefix field.
    pub fn star_digit(&self) -> Option<char> {
        self.prefix.chars().last()
    }
}

fn is_all_digits(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

/// Star-rating digit straight from a raw filename: last character of the first
/// `-`-separated field. Used by the organize pass, which buckets even files
/// that don't fully parse as artifact names.
pub fn star_digit_of(file_name: &str) -> Option<char> {
    let parts: Vec<&str> = file_name.split('-').collect();
    if parts.len() > 2 && !parts[0].is_empty() {
        parts[0].chars().last()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_replaces_colons_and_strips_illegal_chars() {
        assert_eq!(sanitize_title("Mega:  Map///"), "Mega - Map");
        assert_eq!(sanitize_title("a\"b\\c/d*e?f<g>h|i"), "abcdefghi");
        assert_eq!(sanitize_title("  spaced   out  "), "spaced out");
    }

    #[test]
    fn sanitize_is_idempotent() {
        for raw in ["Mega:  Map///", "Plain Title", "A : B", "x::y"] {
            let once = sanitize_title(raw);
            assert_eq!(sanitize_title(&once), once, "not idempotent for {raw:?}");
        }
    }

    #[test]
    fn file_name_round_trips() {
        let name = ArtifactName::new("125", "3052154837", "City Under Siege", "bfg");
        let rendered = name.file_name();
        assert_eq!(rendered, "125-3052154837-City Under Siege.bfg");
        assert_eq!(ArtifactName::parse(&rendered).unwrap(), name);
    }

    #[test]
    fn parse_recovers_id_as_second_field() {
        let parsed = ArtifactName::parse("315-99887-Bro-Down - Redux.bfg").unwrap();
        assert_eq!(parsed.workshop_id, "99887");
        assert_eq!(parsed.title, "Bro-Down - Redux");
        assert_eq!(parsed.extension, "bfg");
        assert_eq!(parsed.star_digit(), Some('5'));
    }

    #[test]
    fn parse_rejects_nonconforming_names() {
        assert!(ArtifactName::parse("readme.txt").is_none());
        assert!(ArtifactName::parse("125-notdigits-Title.bfg").is_none());
        assert!(ArtifactName::parse("-123-Title.bfg").is_none());
        assert!(ArtifactName::parse("125-123.bfg").is_none());
    }

    #[test]
    fn parse_workshop_id_is_looser_than_full_parse() {
        assert_eq!(ArtifactName::parse_workshop_id("125-123"), Some("123"));
        assert_eq!(
            ArtifactName::parse_workshop_id("125-123-Title.bfg"),
            Some("123")
        );
        assert_eq!(ArtifactName::parse_workshop_id("125-abc-Title.bfg"), None);
        assert_eq!(ArtifactName::parse_workshop_id("no fields here"), None);
    }

    #[test]
    fn star_digit_of_reads_first_field() {
        assert_eq!(star_digit_of("115-123-Title.bfg"), Some('5'));
        assert_eq!(star_digit_of("2frogs-123-Title.bfg"), Some('s'));
        assert_eq!(star_digit_of("only-two"), None);
    }
}

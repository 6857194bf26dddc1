//! Identifier derivation for generated resources.

use sha2::{Digest, Sha256};

/// Hex digits of the hash suffix added to shortened names.
const NAME_HASH_LENGTH: usize = 8;

/// Converts a domain-like string into a `PascalCase` identifier fragment.
///
/// The input is lowercased, then every ASCII letter or digit that follows
/// the start of the string, a `.` or a `-` is upper-cased and the separator
/// dropped. Separators not followed by a letter or digit are kept as-is.
///
/// ```
/// use static_site_stack::config::to_id;
///
/// assert_eq!(to_id("sub.example.com"), "SubExampleCom");
/// assert_eq!(to_id("my-site.io"), "MySiteIo");
/// ```
#[must_use]
pub fn to_id(s: &str) -> String {
    let chars: Vec<char> = s.to_lowercase().chars().collect();
    let mut id = String::with_capacity(chars.len());
    let mut i = 0;

    if let Some(&first) = chars.first()
        && is_word_char(first)
    {
        id.push(first.to_ascii_uppercase());
        i = 1;
    }

    while i < chars.len() {
        let c = chars[i];
        match chars.get(i + 1) {
            Some(&next) if (c == '.' || c == '-') && is_word_char(next) => {
                id.push(next.to_ascii_uppercase());
                i += 2;
            }
            _ => {
                id.push(c);
                i += 1;
            }
        }
    }

    id
}

/// Identifier prefix for resources of the main site.
#[must_use]
pub fn base_id(domain: &str) -> String {
    format!("Base{}", to_id(domain))
}

/// Identifier prefix for resources of the www variant.
#[must_use]
pub fn www_id(domain: &str) -> String {
    format!("Www{}", to_id(domain))
}

/// Fits a physical resource name into `max_len` characters.
///
/// Characters other than ASCII letters, digits, `-` and `_` are dropped.
/// A name that is still too long keeps its prefix and gains a hash of the
/// full name, so distinct long names stay distinct.
#[must_use]
pub fn limited_name(name: &str, max_len: usize) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    if cleaned.len() <= max_len {
        return cleaned;
    }

    let digest = hex::encode(Sha256::digest(name.as_bytes()));
    let keep = max_len.saturating_sub(NAME_HASH_LENGTH);
    format!("{}{}", &cleaned[..keep], &digest[..NAME_HASH_LENGTH.min(max_len)])
}

const fn is_word_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_id_subdomain() {
        assert_eq!(to_id("sub.example.com"), "SubExampleCom");
        assert_eq!(base_id("sub.example.com"), "BaseSubExampleCom");
        assert_eq!(www_id("sub.example.com"), "WwwSubExampleCom");
    }

    #[test]
    fn test_to_id_lowercases_first() {
        assert_eq!(to_id("Example.COM"), "ExampleCom");
    }

    #[test]
    fn test_to_id_hyphens_and_digits() {
        assert_eq!(to_id("my-site-2.example.com"), "MySite2ExampleCom");
        assert_eq!(to_id("1st.example.com"), "1stExampleCom");
    }

    #[test]
    fn test_to_id_keeps_unmatched_separators() {
        assert_eq!(to_id("a--b"), "A-B");
        assert_eq!(to_id("a._b"), "A._b");
        assert_eq!(to_id(".com"), "Com");
        assert_eq!(to_id("trailing."), "Trailing.");
    }

    #[test]
    fn test_limited_name_short_names_unchanged() {
        assert_eq!(limited_name("BaseExampleComAuthFunction", 64), "BaseExampleComAuthFunction");
        assert_eq!(limited_name("BaseTrailing.AuthFunction", 64), "BaseTrailingAuthFunction");
    }

    #[test]
    fn test_limited_name_truncates_with_hash() {
        let long = format!("Base{}AuthFunction", "Sub".repeat(30));
        let other = format!("Base{}XAuthFunction", "Sub".repeat(30));

        let name = limited_name(&long, 64);
        assert_eq!(name.len(), 64);
        assert!(name.starts_with("BaseSubSub"));
        assert_eq!(name, limited_name(&long, 64));
        assert_ne!(name, limited_name(&other, 64));
    }

    #[test]
    fn test_to_id_empty() {
        assert_eq!(to_id(""), "");
    }
}

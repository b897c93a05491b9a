//! core::version
//!
//! Version string comparison for the diff engine.
//!
//! Mod versions are free-form ("1.19.2-forge-11.5.0", "v2.3", "build 47"),
//! so comparison is a heuristic: when both strings contain a
//! `major.minor.patch` token the tokens are compared numerically; otherwise
//! any difference between the raw strings counts as an update.

/// A normalized `major.minor.patch` token extracted from a version string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SemverToken {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl std::fmt::Display for SemverToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Extract the first `\d+.\d+.\d+` substring as a semver token.
///
/// Returns `None` when the string contains no such token.
///
/// # Example
///
/// ```
/// use packnote::core::version::clean_version;
///
/// let token = clean_version("1.19.2-forge-41.1.0").unwrap();
/// assert_eq!(token.to_string(), "1.19.2");
/// assert!(clean_version("beta build 7").is_none());
/// ```
pub fn clean_version(version: &str) -> Option<SemverToken> {
    let bytes = version.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i].is_ascii_digit() {
            if let Some(token) = parse_triple(&bytes[i..]) {
                return Some(token);
            }
            // Skip the whole run of digits so "123.4.5" is not re-tried
            // from its second digit.
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
        } else {
            i += 1;
        }
    }
    None
}

/// Parse `digits '.' digits '.' digits` at the start of `bytes`.
fn parse_triple(bytes: &[u8]) -> Option<SemverToken> {
    let (major, major_len) = take_number(bytes)?;
    let rest = &bytes[major_len..];
    if rest.first() != Some(&b'.') {
        return None;
    }
    let (minor, minor_len) = take_number(&rest[1..])?;
    let after_minor = &rest[1 + minor_len..];
    if after_minor.first() != Some(&b'.') {
        return None;
    }
    let (patch, _) = take_number(&after_minor[1..])?;
    Some(SemverToken {
        major,
        minor,
        patch,
    })
}

/// Parse a leading run of ASCII digits, returning (value, length).
fn take_number(bytes: &[u8]) -> Option<(u64, usize)> {
    let len = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
    if len == 0 {
        return None;
    }
    let digits = std::str::from_utf8(&bytes[..len]).ok()?;
    // Overflow on absurd version numbers is treated as unparseable.
    let value = digits.parse().ok()?;
    Some((value, len))
}

/// Is `new_version` newer than `old_version`?
///
/// When both strings normalize to semver tokens, they are compared
/// numerically (major, then minor, then patch). When either fails to
/// normalize, any difference between the raw strings is reported as
/// newer.
///
/// The fallback deliberately treats *any* change as an update, so a
/// non-semver downgrade ("B" → "A") is still reported as updated. Callers
/// relying on strict ordering must not be pointed at this function.
/// Identical strings are never newer. Never panics.
///
/// # Example
///
/// ```
/// use packnote::core::version::is_newer;
///
/// assert!(is_newer("1.2.0", "1.3.0"));
/// assert!(!is_newer("1.3.0", "1.2.0"));
/// assert!(!is_newer("1.2.0", "1.2.0"));
/// assert!(is_newer("abc", "xyz"));
/// ```
pub fn is_newer(old_version: &str, new_version: &str) -> bool {
    if old_version == new_version {
        return false;
    }
    match (clean_version(old_version), clean_version(new_version)) {
        (Some(old), Some(new)) => new > old,
        _ => old_version != new_version,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_version_extracts_first_triple() {
        assert_eq!(clean_version("1.2.3").unwrap().to_string(), "1.2.3");
        assert_eq!(
            clean_version("jei-1.19.2-forge-11.5.0").unwrap().to_string(),
            "1.19.2"
        );
        assert_eq!(clean_version("v2.0.1-beta").unwrap().to_string(), "2.0.1");
    }

    #[test]
    fn clean_version_rejects_partial_versions() {
        assert!(clean_version("1.2").is_none());
        assert!(clean_version("build 47").is_none());
        assert!(clean_version("").is_none());
        assert!(clean_version("v2").is_none());
    }

    #[test]
    fn clean_version_skips_non_matching_digit_runs() {
        // "47-1.2.3": the leading number is not a triple, the later one is.
        assert_eq!(clean_version("47-1.2.3").unwrap().to_string(), "1.2.3");
    }

    #[test]
    fn semver_ordering_is_numeric() {
        assert!(is_newer("1.2.0", "1.3.0"));
        assert!(is_newer("1.9.0", "1.10.0")); // lexicographic would say downgrade
        assert!(is_newer("9.0.0", "10.0.0"));
        assert!(!is_newer("1.3.0", "1.2.0"));
        assert!(!is_newer("1.2.0", "1.2.0"));
    }

    #[test]
    fn semver_comparison_ignores_surrounding_noise() {
        assert!(is_newer("forge-1.2.0", "forge-1.2.1"));
        assert!(!is_newer("1.2.0+build.5", "1.2.0+build.9"));
    }

    #[test]
    fn fallback_treats_any_difference_as_newer() {
        assert!(is_newer("abc", "xyz"));
        assert!(is_newer("xyz", "abc")); // downgrades are reported too
        assert!(!is_newer("abc", "abc"));
        assert!(is_newer("1.2.0", "two-point-three"));
    }

    #[test]
    fn identical_strings_are_never_newer() {
        assert!(!is_newer("", ""));
        assert!(!is_newer("v1.0.0", "v1.0.0"));
        assert!(!is_newer("build 47", "build 47"));
    }

    #[test]
    fn huge_components_fall_back_to_string_comparison() {
        let huge = "99999999999999999999999.1.2";
        assert!(is_newer(huge, "different"));
        assert!(!is_newer(huge, huge));
    }
}

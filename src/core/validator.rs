//! TikTok URL validation
//!
//! A cheap host substring check runs first; only inputs that mention a
//! TikTok host are matched against the shape patterns. The last pattern is a
//! permissive fallback that already covers every shape above it.

use std::sync::LazyLock;

use regex::Regex;

use crate::core::models::{RejectReason, ValidationResult};

/// Host substrings an input must contain (case-insensitive)
pub const TIKTOK_HOSTS: &[&str] = &["tiktok.com", "vm.tiktok.com", "vt.tiktok.com"];

/// Recognised link shapes, in match order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlShape {
    /// `https://www.tiktok.com/@handle/video/123`
    ProfileVideo,
    /// `https://vm.tiktok.com/<token>`
    VmShortLink,
    /// `https://vt.tiktok.com/<token>`
    VtShortLink,
    /// `https://m.tiktok.com/v/123`
    MobileVideo,
    /// `https://www.tiktok.com/t/<token>`
    ShortPath,
    /// Profile video followed by a query string
    ProfileVideoWithQuery,
    /// Any other path under tiktok.com
    Fallback,
}

static SHAPE_PATTERNS: LazyLock<Vec<(UrlShape, Regex)>> = LazyLock::new(|| {
    [
        (
            UrlShape::ProfileVideo,
            r"^https?://(www\.)?tiktok\.com/@[A-Za-z0-9_.\-]+/video/[0-9]+",
        ),
        (UrlShape::VmShortLink, r"^https?://vm\.tiktok\.com/[A-Za-z0-9_\-]+"),
        (UrlShape::VtShortLink, r"^https?://vt\.tiktok\.com/[A-Za-z0-9_\-]+"),
        (UrlShape::MobileVideo, r"^https?://m\.tiktok\.com/v/[0-9]+"),
        (
            UrlShape::ShortPath,
            r"^https?://(www\.)?tiktok\.com/t/[A-Za-z0-9_\-]+",
        ),
        (
            UrlShape::ProfileVideoWithQuery,
            r"^https?://(www\.)?tiktok\.com/@[A-Za-z0-9_.\-]+/video/[0-9]+\?.*",
        ),
        (
            UrlShape::Fallback,
            r"^https?://(www\.)?tiktok\.com/[A-Za-z0-9_\-@./]+",
        ),
    ]
    .into_iter()
    .map(|(shape, pattern)| (shape, Regex::new(pattern).expect("Invalid TikTok URL regex")))
    .collect()
});

/// Validate a raw URL input.
///
/// Pure and idempotent; safe to call on every keystroke or paste.
pub fn validate(raw_url: &str) -> ValidationResult {
    let trimmed = raw_url.trim();

    if trimmed.is_empty() {
        return ValidationResult::Rejected(RejectReason::EmptyInput);
    }

    if !mentions_tiktok_host(trimmed) {
        return ValidationResult::Rejected(RejectReason::PatternMismatch);
    }

    match matching_shape(trimmed) {
        Some(_) => ValidationResult::Accepted(trimmed.to_string()),
        None => ValidationResult::Rejected(RejectReason::PatternMismatch),
    }
}

/// Convenience predicate over [`validate`]
pub fn is_valid_tiktok_url(raw_url: &str) -> bool {
    validate(raw_url).is_accepted()
}

/// First shape pattern matching the (already trimmed) input
pub fn matching_shape(url: &str) -> Option<UrlShape> {
    SHAPE_PATTERNS
        .iter()
        .find(|(_, pattern)| pattern.is_match(url))
        .map(|(shape, _)| *shape)
}

fn mentions_tiktok_host(url: &str) -> bool {
    let lowered = url.to_lowercase();
    TIKTOK_HOSTS.iter().any(|host| lowered.contains(host))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accepted(url: &str) -> ValidationResult {
        ValidationResult::Accepted(url.to_string())
    }

    #[test]
    fn test_blank_input_is_empty() {
        for input in ["", " ", "\t", "\n  \r\n", "   \u{3000}"] {
            assert_eq!(
                validate(input),
                ValidationResult::Rejected(RejectReason::EmptyInput),
                "input {input:?}"
            );
        }
    }

    #[test]
    fn test_inputs_without_tiktok_host_mismatch() {
        for input in [
            "not a url",
            "https://www.youtube.com/watch?v=abc",
            "https://tiktok.co/@user/video/1",
            "https://example.com/tiktok/video/1",
        ] {
            assert_eq!(
                validate(input),
                ValidationResult::Rejected(RejectReason::PatternMismatch),
                "input {input:?}"
            );
        }
    }

    #[test]
    fn test_known_shapes_are_accepted() {
        let cases = [
            (
                "https://www.tiktok.com/@user.name/video/7123456789012345678",
                UrlShape::ProfileVideo,
            ),
            ("https://vm.tiktok.com/ZMabcDEFg/", UrlShape::VmShortLink),
            ("https://vt.tiktok.com/ZMxyz123/?lang=en", UrlShape::VtShortLink),
            ("https://m.tiktok.com/v/7123456789", UrlShape::MobileVideo),
            ("https://tiktok.com/t/ZT8abc-12/", UrlShape::ShortPath),
            ("http://tiktok.com/@someone/video/42", UrlShape::ProfileVideo),
            ("https://www.tiktok.com/discover/cats", UrlShape::Fallback),
        ];

        for (url, shape) in cases {
            assert_eq!(validate(url), accepted(url), "url {url}");
            assert_eq!(matching_shape(url), Some(shape), "url {url}");
        }
    }

    #[test]
    fn test_surrounding_whitespace_is_trimmed() {
        let result = validate("  https://vm.tiktok.com/ZMabcDEFg/ \n");
        assert_eq!(result, accepted("https://vm.tiktok.com/ZMabcDEFg/"));
    }

    #[test]
    fn test_host_check_is_case_insensitive_but_shapes_are_not() {
        // Passes the host check, then fails every case-sensitive shape.
        assert_eq!(
            validate("HTTPS://WWW.TIKTOK.COM/@USER/VIDEO/1"),
            ValidationResult::Rejected(RejectReason::PatternMismatch)
        );
    }

    #[test]
    fn test_tiktok_mentions_outside_url_shapes_mismatch() {
        for input in [
            "tiktok.com",
            "ftp://www.tiktok.com/@user/video/1",
            "see https://www.tiktok.com/@user/video/1",
            "https://www.tiktok.com/",
        ] {
            assert_eq!(
                validate(input),
                ValidationResult::Rejected(RejectReason::PatternMismatch),
                "input {input:?}"
            );
        }
    }

    #[test]
    fn test_validate_is_idempotent() {
        let inputs = [
            "",
            "not a url",
            "https://vm.tiktok.com/ZMabcDEFg/",
            "https://m.tiktok.com/v/7123456789",
        ];
        for input in inputs {
            assert_eq!(validate(input), validate(input));
        }
    }

    #[test]
    fn test_is_valid_tiktok_url() {
        assert!(is_valid_tiktok_url("https://vt.tiktok.com/ZMxyz123/?lang=en"));
        assert!(!is_valid_tiktok_url("not a url"));
        assert!(!is_valid_tiktok_url("   "));
    }
}

//! Version string validation, normalization, and incrementing
//!
//! Versions are serialized as `{major}.{minor}` where `major` is a
//! non-negative integer and `minor` is a single digit. Normalization is
//! unconditional and idempotent: a malformed manually-entered version never
//! blocks the increment path, it only moves a version forward or sideways
//! (plus the documented minor-overflow carry).

use crate::error::VersionError;

/// Check that a version string matches exactly `<int>.<digit>`
///
/// No `v` prefix, no extra segments, single-digit minor.
pub fn is_valid(v: &str) -> bool {
    let Some((major, minor)) = v.split_once('.') else {
        return false;
    };
    !major.is_empty()
        && major.bytes().all(|b| b.is_ascii_digit())
        && minor.len() == 1
        && minor.bytes().all(|b| b.is_ascii_digit())
}

/// Normalize an arbitrary version string into canonical `{major}.{minor}` form
///
/// Rules, applied in order:
/// 1. empty input yields `"1.0"`
/// 2. a leading case-insensitive `v` is stripped
/// 3. only the first two `.`-separated segments are kept
/// 4. a non-integer or negative major yields `"1.0"`
/// 5. a missing or invalid minor yields `"<major>.0"`
/// 6. a minor of 10 or more carries into the major
pub fn normalize(v: &str) -> String {
    let trimmed = v.trim();
    if trimmed.is_empty() {
        return "1.0".to_string();
    }

    let stripped = trimmed
        .strip_prefix('v')
        .or_else(|| trimmed.strip_prefix('V'))
        .unwrap_or(trimmed);

    let mut segments = stripped.splitn(3, '.');
    let major_raw = segments.next().unwrap_or("");
    let minor_raw = segments.next();

    let Ok(major) = major_raw.trim().parse::<u64>() else {
        return "1.0".to_string();
    };

    let minor = minor_raw
        .and_then(|m| m.trim().parse::<u64>().ok())
        .unwrap_or(0);

    if minor >= 10 {
        // Overflow carry: 1.10 -> 2.0, 2.20 -> 4.0
        let carried = major.saturating_add(minor / 10);
        format!("{}.{}", carried, minor % 10)
    } else {
        format!("{}.{}", major, minor)
    }
}

/// Increment a version string
///
/// Normalizes first, so any input yields a well-formed result. `minor < 9`
/// bumps the minor; `minor == 9` rolls over into the major. Fails only when
/// the major would overflow its integer range.
pub fn increment(v: &str) -> Result<String, VersionError> {
    let normalized = normalize(v);
    let (major, minor) = parse_parts(&normalized)?;

    if minor < 9 {
        Ok(format!("{}.{}", major, minor + 1))
    } else {
        let next = major.checked_add(1).ok_or_else(|| VersionError::Validation {
            value: normalized.clone(),
            reason: "major version overflow".to_string(),
        })?;
        Ok(format!("{}.0", next))
    }
}

/// Split a canonical version into its numeric parts
fn parse_parts(v: &str) -> Result<(u64, u8), VersionError> {
    let (major, minor) = v.split_once('.').ok_or_else(|| VersionError::Validation {
        value: v.to_string(),
        reason: "missing '.' separator".to_string(),
    })?;
    let major = major.parse::<u64>().map_err(|e| VersionError::Validation {
        value: v.to_string(),
        reason: format!("bad major: {}", e),
    })?;
    let minor = minor.parse::<u8>().map_err(|e| VersionError::Validation {
        value: v.to_string(),
        reason: format!("bad minor: {}", e),
    })?;
    Ok((major, minor))
}

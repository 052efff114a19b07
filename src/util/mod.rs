//
//  ebay-sdk
//  util/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Utility Module
//!
//! Small helpers shared across the SDK.
//!
//! - **String Utilities**: [`truncate`]
//! - **Time Utilities**: [`format_duration`]
//! - **Identifiers**: [`unique_id`]
//!
//! ## Example
//!
//! ```rust
//! use std::time::Duration;
//! use ebay_sdk::util::{format_duration, truncate, unique_id};
//!
//! assert_eq!(truncate("Vintage camera lens", 10), "Vintage...");
//! assert_eq!(format_duration(Duration::from_secs(125)), "2m 5s");
//! assert_eq!(unique_id().len(), 32);
//! ```

use std::time::Duration;

use rand::RngCore;

/// Formats a duration in a compact, human-readable form.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use ebay_sdk::util::format_duration;
///
/// assert_eq!(format_duration(Duration::from_secs(45)), "45s");
/// assert_eq!(format_duration(Duration::from_secs(3725)), "1h 2m");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();

    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs < 86400 {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    } else {
        format!("{}d {}h", secs / 86400, (secs % 86400) / 3600)
    }
}

/// Truncates `s` to at most `max_chars` characters, ending with `...` when
/// shortened.
///
/// Counts characters, not bytes, so multi-byte text is never split.
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    if max_chars > 3 {
        let kept: String = s.chars().take(max_chars - 3).collect();
        format!("{}...", kept)
    } else {
        s.chars().take(max_chars).collect()
    }
}

/// Returns 32 random lowercase hex characters.
///
/// Used for bulk-data job UUIDs, OAuth `state` values and multipart
/// boundaries.
pub fn unique_id() -> String {
    let mut bytes = [0u8; 16];
    rand::rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 8), "hello...");
        assert_eq!(truncate("hello", 2), "he");
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate("ÄÖÜäöüß", 5), "ÄÖ...");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(5)), "5s");
        assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
        assert_eq!(format_duration(Duration::from_secs(90_000)), "1d 1h");
    }

    #[test]
    fn test_unique_id() {
        let a = unique_id();
        let b = unique_id();
        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }
}

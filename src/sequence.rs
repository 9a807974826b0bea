//! # Sequence
//!
//! Next-identifier derivation for manifests.
//!
//! Identifiers follow `<prefix><7-digit zero-padded sequence>` where the
//! prefix already carries the 2-digit year, e.g. `MAO-250000001`. The
//! authoritative source is a descending identifier sample from the backend;
//! when that read fails the same scan runs over the locally cached rows.
//! The fallback can under-count if the backend holds more history than the
//! cache — accepted degradation, the save webhook revalidates server-side.

use chrono::NaiveDate;
use tracing::warn;

use crate::manifest::{ID_PREFIX, Manifest};

pub const SEQUENCE_DIGITS: usize = 7;

/// Rows sampled from the backend when deriving the next sequence.
pub const SEQUENCE_SAMPLE: usize = 20;

pub fn year_prefix(today: NaiveDate) -> String {
    format!("{ID_PREFIX}{}", today.format("%y"))
}

pub fn next_id<'a, I>(prefix: &str, candidates: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut max_seen: u64 = 0;

    for candidate in candidates {
        if !candidate.starts_with(prefix) || candidate.len() != prefix.len() + SEQUENCE_DIGITS {
            continue;
        }

        let suffix = &candidate[prefix.len()..];
        if !suffix.bytes().all(|b| b.is_ascii_digit()) {
            continue;
        }

        let Ok(value) = suffix.parse::<u64>() else {
            continue;
        };

        if value > max_seen {
            max_seen = value;
        }
    }

    format!("{prefix}{:0width$}", max_seen + 1, width = SEQUENCE_DIGITS)
}

/// Two-tier resolution: authoritative sample when the read succeeded,
/// otherwise the cached rows. Never fails.
pub fn resolve_next_id(
    prefix: &str,
    remote: Result<Vec<String>, anyhow::Error>,
    cached: &[Manifest],
) -> String {
    match remote {
        Ok(ids) => next_id(prefix, ids.iter().map(String::as_str)),
        Err(e) => {
            warn!("Sequence lookup failed, deriving from local cache: {e}");

            next_id(prefix, cached.iter().map(|m| m.manifesto.as_str()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{next_id, resolve_next_id, year_prefix};
    use crate::manifest::Manifest;
    use chrono::NaiveDate;

    #[test]
    fn test_year_prefix() {
        let today = NaiveDate::from_ymd_opt(2025, 8, 7).unwrap();

        assert_eq!(year_prefix(today), "MAO-25");
    }

    #[test]
    fn test_next_follows_maximum_valid_suffix() {
        let candidates = ["MAO-250000005", "MAO-250000003", "MAO-25ABCDEFG"];

        assert_eq!(next_id("MAO-25", candidates), "MAO-250000006");
    }

    #[test]
    fn test_empty_candidates_start_at_one() {
        let candidates: [&str; 0] = [];

        assert_eq!(next_id("MAO-25", candidates), "MAO-250000001");
    }

    #[test]
    fn test_malformed_candidates_are_ignored() {
        // Wrong length (off by one), non-digit suffix, foreign prefix.
        let candidates = [
            "MAO-25000000199",
            "MAO-25ABCDEFG",
            "GRU-250000042",
            "MAO-25000001",
        ];

        assert_eq!(next_id("MAO-25", candidates), "MAO-250000001");
    }

    #[test]
    fn test_first_candidate_invalid_later_valid_wins() {
        let candidates = ["MAO-25ABCDEFG", "MAO-250000009"];

        assert_eq!(next_id("MAO-25", candidates), "MAO-250000010");
    }

    #[test]
    fn test_unsorted_source_still_finds_maximum() {
        let candidates = ["MAO-250000002", "MAO-250000011", "MAO-250000007"];

        assert_eq!(next_id("MAO-25", candidates), "MAO-250000012");
    }

    #[test]
    fn test_result_is_zero_padded() {
        assert_eq!(next_id("MAO-25", ["MAO-250000099"]), "MAO-250000100");
        assert_eq!(next_id("MAO-25", ["MAO-259999998"]), "MAO-259999999");
    }

    #[test]
    fn test_remote_sample_preferred() {
        let remote = Ok(vec!["MAO-250000005".to_string()]);
        let cached = [cached_manifest("MAO-250000001")];

        assert_eq!(resolve_next_id("MAO-25", remote, &cached), "MAO-250000006");
    }

    #[test]
    fn test_fallback_to_cache_on_remote_failure() {
        let remote = Err(anyhow::anyhow!("connection refused"));
        let cached = [
            cached_manifest("MAO-250000003"),
            cached_manifest("MAO-25ABCDEFG"),
        ];

        assert_eq!(resolve_next_id("MAO-25", remote, &cached), "MAO-250000004");
    }

    #[test]
    fn test_fallback_with_empty_cache_is_still_valid() {
        let remote = Err(anyhow::anyhow!("timeout"));

        assert_eq!(resolve_next_id("MAO-25", remote, &[]), "MAO-250000001");
    }

    fn cached_manifest(id: &str) -> Manifest {
        Manifest {
            manifesto: id.to_string(),
            ..Manifest::default()
        }
    }
}

use chrono::{Local, NaiveDateTime};
use regex::Regex;

/// Accepted input shapes for received timestamps. The picker sends ISO-8601
/// with a `T`; the backend stores the space-separated form.
const RECEIVED_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

pub fn stamp(ts: NaiveDateTime) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

pub fn now_stamp() -> String {
    stamp(Local::now().naive_local())
}

pub fn parse_received(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();

    RECEIVED_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
}

pub fn sanitize(input: &str) -> String {
    let replace = Regex::new(r"[_]").unwrap();
    let mut s = replace.replace_all(input, " ").into_owned();

    let clean_re = Regex::new(r"[^A-Za-z0-9- ]").unwrap();
    s = clean_re.replace_all(&s, "").into_owned();

    s = s.trim().to_string();

    let collapse = Regex::new(r" +").unwrap();
    collapse.replace_all(&s, " ").into_owned().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::{parse_received, sanitize, stamp};
    use chrono::NaiveDate;

    #[test]
    fn test_sanitize_basic() {
        assert_eq!(sanitize("lx_8012"), "LX 8012");
        assert_eq!(sanitize("mao"), "MAO");
        assert_eq!(sanitize("clean-this_code!"), "CLEAN-THIS CODE");
    }

    #[test]
    fn test_sanitize_leading_trailing_spaces() {
        assert_eq!(sanitize("   gru   "), "GRU");
        assert_eq!(sanitize("  multiple   spaces  "), "MULTIPLE SPACES");
    }

    #[test]
    fn test_sanitize_special_characters() {
        assert_eq!(sanitize("!@#$%^&*()"), "");
        assert_eq!(sanitize("abc123!@#"), "ABC123");
    }

    #[test]
    fn test_sanitize_empty_string() {
        assert_eq!(sanitize(""), "");
        assert_eq!(sanitize("     "), "");
    }

    #[test]
    fn test_stamp_uses_space_separator() {
        let ts = NaiveDate::from_ymd_opt(2025, 8, 7)
            .unwrap()
            .and_hms_opt(6, 0, 0)
            .unwrap();

        assert_eq!(stamp(ts), "2025-08-07 06:00:00");
    }

    #[test]
    fn test_parse_received_accepts_both_separators() {
        let expected = NaiveDate::from_ymd_opt(2025, 8, 7)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap();

        assert_eq!(parse_received("2025-08-07 14:30:00"), Some(expected));
        assert_eq!(parse_received("2025-08-07T14:30:00"), Some(expected));
        assert_eq!(parse_received("2025-08-07T14:30"), Some(expected));
        assert_eq!(parse_received("não é uma data"), None);
    }
}

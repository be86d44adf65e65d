use std::borrow::Cow;

use crate::constants::{MAX_LOGGED_PAYLOAD, TRUTHY};

/// First of `vars` that is set, looked up through `lookup`.
pub fn first_set<F>(vars: &[&str], lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    vars.iter().find_map(|v| lookup(*v))
}

/// `1`, `true`, `t` (any case) are true; anything else is false.
pub fn parse_bool(raw: &str) -> bool {
    let v = raw.trim().to_ascii_lowercase();
    TRUTHY.contains(&v.as_str())
}

/// Lossy, length-capped rendering of a payload for log lines.
pub fn payload_preview(buf: &[u8]) -> Cow<'_, str> {
    if buf.len() <= MAX_LOGGED_PAYLOAD {
        return String::from_utf8_lossy(buf);
    }
    let head = String::from_utf8_lossy(&buf[..MAX_LOGGED_PAYLOAD]);
    Cow::Owned(format!("{}... ({} bytes)", head, buf.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bool_accepts_short_forms() {
        for v in ["1", "true", "TRUE", "t", " True "] {
            assert!(parse_bool(v), "{v}");
        }
        for v in ["0", "false", "yes", ""] {
            assert!(!parse_bool(v), "{v}");
        }
    }

    #[test]
    fn first_set_falls_through_in_order() {
        let lookup = |k: &str| (k == "B" || k == "C").then(|| k.to_lowercase());
        assert_eq!(first_set(&["A", "B", "C"], lookup), Some("b".to_string()));
        assert_eq!(first_set(&["A"], lookup), None);
    }

    #[test]
    fn payload_preview_truncates_long_buffers() {
        let long = vec![b'a'; MAX_LOGGED_PAYLOAD + 10];
        let p = payload_preview(&long);
        assert!(p.ends_with(&format!("({} bytes)", MAX_LOGGED_PAYLOAD + 10)));
        assert_eq!(payload_preview(b"{}"), "{}");
    }
}

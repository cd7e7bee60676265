pub(crate) fn now_ms() -> i64 {
    js_sys::Date::now().round() as i64
}

/// `YYYY-MM-DD` part of an ISO-8601 timestamp; other input is returned as is.
pub(crate) fn short_date(iso: &str) -> &str {
    match iso.get(..10) {
        Some(d) if iso.as_bytes().get(10) == Some(&b'T') => d,
        _ => iso,
    }
}

use chrono::{DateTime, FixedOffset, Offset, Utc};

pub(crate) fn now_ms() -> i64 {
    js_sys::Date::now().round() as i64
}

/// The browser's current UTC offset.
pub(crate) fn local_offset() -> FixedOffset {
    // getTimezoneOffset is UTC minus local, in minutes.
    let minutes = js_sys::Date::new_0().get_timezone_offset().round() as i32;
    FixedOffset::west_opt(minutes * 60).unwrap_or_else(|| Utc.fix())
}

/// Date and time for the "Last saved" footer and the preview byline.
pub(crate) fn format_date_time(at: DateTime<Utc>, offset: FixedOffset) -> String {
    at.with_timezone(&offset)
        .format("%b %-d, %Y %H:%M")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_date_time() {
        let at = Utc
            .with_ymd_and_hms(2024, 5, 2, 23, 15, 0)
            .single()
            .expect("valid");
        let minus5 = FixedOffset::west_opt(5 * 3600).expect("valid offset");
        assert_eq!(format_date_time(at, minus5), "May 2, 2024 18:15");

        let plus2 = FixedOffset::east_opt(2 * 3600).expect("valid offset");
        assert_eq!(format_date_time(at, plus2), "May 3, 2024 01:15");
    }
}

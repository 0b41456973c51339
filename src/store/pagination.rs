use std::ops::Range;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;

/// Parse the leading integer of a query value.
///
/// Leading whitespace and a sign are accepted and anything after the digits is
/// ignored, so `"2abc"` is 2 and `"1.5"` is 1. Returns `None` when no digits
/// lead the value. Out-of-range values saturate.
pub fn parse_int_prefix(value: &str) -> Option<i64> {
    let trimmed = value.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }

    let magnitude = rest[..digits_len].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

/// A page of the assignment list as requested by a client.
///
/// `None` stands for a parameter that was supplied but is not a number; such a
/// request always selects an empty page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE, DEFAULT_LIMIT)
    }
}

impl PageRequest {
    pub fn new(page: i64, limit: i64) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
        }
    }

    /// Build a request from raw query parameters. Absent parameters take the
    /// defaults (page 1, limit 10).
    pub fn from_query(page: Option<&str>, limit: Option<&str>) -> Self {
        Self {
            page: page.map_or(Some(DEFAULT_PAGE), parse_int_prefix),
            limit: limit.map_or(Some(DEFAULT_LIMIT), parse_int_prefix),
        }
    }

    /// Start and end offsets, `(page - 1) * limit` and `start + limit`.
    pub fn offsets(&self) -> Option<(i64, i64)> {
        let (page, limit) = (self.page?, self.limit?);
        let start = page.saturating_sub(1).saturating_mul(limit);
        Some((start, start.saturating_add(limit)))
    }

    /// Index range into a sequence of `len` records.
    ///
    /// Negative offsets count back from the end; both ends are clamped to
    /// `[0, len]` and an end at or before the start is empty.
    pub fn range(&self, len: usize) -> Range<usize> {
        let Some((start, end)) = self.offsets() else {
            return 0..0;
        };

        let len = i64::try_from(len).unwrap_or(i64::MAX);
        let resolve = |offset: i64| {
            if offset < 0 {
                len.saturating_add(offset).max(0)
            } else {
                offset.min(len)
            }
        };

        let (start, end) = (resolve(start), resolve(end));
        if end <= start {
            return 0..0;
        }
        // Both values are within [0, len], which came from a usize.
        start as usize..end as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_int_prefix_cases() {
        assert_eq!(parse_int_prefix("3"), Some(3));
        assert_eq!(parse_int_prefix("  42"), Some(42));
        assert_eq!(parse_int_prefix("2abc"), Some(2));
        assert_eq!(parse_int_prefix("1.9"), Some(1));
        assert_eq!(parse_int_prefix("-4"), Some(-4));
        assert_eq!(parse_int_prefix("+5"), Some(5));
        assert_eq!(parse_int_prefix("abc"), None);
        assert_eq!(parse_int_prefix(""), None);
        assert_eq!(parse_int_prefix("-"), None);
        assert_eq!(parse_int_prefix("99999999999999999999999"), Some(i64::MAX));
    }

    #[test]
    fn from_query_defaults() {
        let req = PageRequest::from_query(None, None);
        assert_eq!(req, PageRequest::new(1, 10));

        let req = PageRequest::from_query(Some("2"), None);
        assert_eq!(req, PageRequest::new(2, 10));
    }

    #[test]
    fn from_query_non_numeric_is_empty() {
        let req = PageRequest::from_query(Some("abc"), Some("5"));
        assert!(req.page.is_none());
        assert_eq!(req.range(12), 0..0);

        let req = PageRequest::from_query(Some("1"), Some(""));
        assert_eq!(req.range(12), 0..0);
    }

    #[test]
    fn range_pages_through_sequence() {
        assert_eq!(PageRequest::new(1, 5).range(12), 0..5);
        assert_eq!(PageRequest::new(2, 5).range(12), 5..10);
        assert_eq!(PageRequest::new(3, 5).range(12), 10..12);
        assert_eq!(PageRequest::new(4, 5).range(12), 0..0);
    }

    #[test]
    fn range_zero_page_is_empty() {
        // start -5 resolves to 7, end 0 stays 0
        assert_eq!(PageRequest::new(0, 5).range(12), 0..0);
    }

    #[test]
    fn range_negative_page_counts_from_end() {
        // start -10, end -5
        assert_eq!(PageRequest::new(-1, 5).range(12), 2..7);
    }

    #[test]
    fn range_zero_and_negative_limit() {
        assert_eq!(PageRequest::new(1, 0).range(12), 0..0);
        // start 0, end -3
        assert_eq!(PageRequest::new(1, -3).range(12), 0..9);
    }

    #[test]
    fn range_on_empty_sequence() {
        assert_eq!(PageRequest::new(1, 5).range(0), 0..0);
    }
}

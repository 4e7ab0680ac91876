//! Shared utility functions for turnout crates.

/// Date utility functions
pub mod dates {
    use chrono::NaiveDate;

    /// Header date formats seen in turnout exports.
    pub const COLUMN_DATE_FORMATS: [&str; 3] = ["%m/%d/%Y", "%m/%d/%y", "%Y-%m-%d"];

    /// Parse a date column header such as "10/21/2024", "10/21/24" or "2024-10-21".
    ///
    /// Slash dates pick `%Y` or `%y` by the width of the year part, since
    /// `%Y` alone would read "24" as year 24.
    pub fn parse_column_date(s: &str) -> Option<NaiveDate> {
        let s = s.trim();
        let fmt = match s.rsplit_once('/') {
            Some((_, year)) if year.len() <= 2 => COLUMN_DATE_FORMATS[1],
            Some(_) => COLUMN_DATE_FORMATS[0],
            None => COLUMN_DATE_FORMATS[2],
        };
        NaiveDate::parse_from_str(s, fmt).ok()
    }

}

/// Text formatting for summaries and tables
pub mod text {
    /// Join items as an English list, eliding past `max_items`.
    ///
    /// `["a"]` -> `a`, `["a", "b"]` -> `a and b`, `["a", "b", "c"]` -> `a, b, and c`,
    /// and with more than `max_items` items the visible ones are followed by `+ N more`.
    pub fn format_readable_list<S: AsRef<str>>(items: &[S], max_items: usize) -> String {
        if items.is_empty() {
            return "None".to_string();
        }
        if items.len() <= max_items {
            return conjunction(items);
        }
        let visible = conjunction(&items[..max_items]);
        format!("{} + {} more", visible, items.len() - max_items)
    }

    fn conjunction<S: AsRef<str>>(items: &[S]) -> String {
        let items = items.iter().map(|s| s.as_ref()).collect::<Vec<_>>();
        match items.as_slice() {
            [] => String::new(),
            [one] => one.to_string(),
            [a, b] => format!("{} and {}", a, b),
            [head @ .., last] => format!("{}, and {}", head.join(", "), last),
        }
    }

    /// Format a count with thousands separators, e.g. `12345.0` -> `12,345`.
    ///
    /// Fractional parts are kept to at most three digits.
    pub fn format_count(value: f64) -> String {
        let rounded = (value * 1000.0).round() / 1000.0;
        let negative = rounded < 0.0;
        let abs = rounded.abs();
        let digits = format!("{:.0}", abs.trunc());
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(c);
        }
        let frac = abs - abs.trunc();
        if frac > 0.0 {
            let frac = format!("{:.3}", frac);
            grouped.push_str(frac.trim_start_matches('0').trim_end_matches('0'));
        }
        if negative {
            format!("-{}", grouped)
        } else {
            grouped
        }
    }

}

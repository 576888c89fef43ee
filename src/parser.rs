use crate::config::{FIELD_DELIMITER, MIN_FIELDS, UNKNOWN_YEAR};
use crate::models::Publication;
use tracing::debug;

/// Records parsed from a listing plus counts of what was dropped or coerced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseReport {
    pub publications: Vec<Publication>,
    /// Non-empty data lines with fewer than four fields
    pub skipped_lines: usize,
    /// Records whose year column did not start with an integer
    pub coerced_years: usize,
}

/// Parses a `Type|Author|Year|Title` listing. The first line is always
/// treated as the header and ignored.
pub fn parse_publications(text: &str) -> Vec<Publication> {
    parse_publications_with_report(text).publications
}

pub fn parse_publications_with_report(text: &str) -> ParseReport {
    let mut report = ParseReport::default();

    for (line_no, raw) in text.trim().split('\n').enumerate().skip(1) {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split(FIELD_DELIMITER).collect();
        if fields.len() < MIN_FIELDS {
            debug!(line = line_no + 1, fields = fields.len(), "Dropping short line");
            report.skipped_lines += 1;
            continue;
        }

        let year_field = fields[2].trim();
        let year = match parse_year(year_field) {
            Some(year) => year,
            None => {
                debug!(line = line_no + 1, value = year_field, "Year is not numeric");
                report.coerced_years += 1;
                UNKNOWN_YEAR
            }
        };

        report.publications.push(Publication {
            publication_type: fields[0].trim().to_string(),
            author: fields[1].trim().to_string(),
            year,
            title: fields[3].trim().to_string(),
        });
    }

    debug!(
        records = report.publications.len(),
        skipped = report.skipped_lines,
        coerced = report.coerced_years,
        "Parsed publication listing"
    );

    report
}

/// Leading-integer parse: optional sign, then the leading run of ASCII digits.
/// `"2021"` and `"2021b"` give 2021; `"n/a"`, `""` and overflowing runs give `None`.
pub fn parse_year(field: &str) -> Option<i32> {
    let s = field.trim();
    let (sign_len, rest) = match s.as_bytes().first() {
        Some(b'+') | Some(b'-') => (1, &s[1..]),
        _ => (0, s),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    s[..sign_len + digits].parse().ok()
}

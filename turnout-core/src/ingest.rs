//! CSV ingestion for yearly turnout exports.
//!
//! # CSV Format
//!
//! One header row, then one row per polling location:
//!
//! ```text
//! Location,Precinct,10/21/2024,10/22/2024,*11/05/2024
//! Central Library,,120,98,410
//! Total,,1200,980,4100
//! ```
//!
//! - Columns 0 and 1 of the header are ignored; the rest are dates.
//! - A leading `*` marks the election day column.
//! - Column 0 of a row is the location name, column 1 is reserved.
//! - A row whose name starts with `total` (any case) holds the daily totals.

use crate::dataset::{LocationSeries, YearDataset};
use crate::date_column::DateColumn;
use crate::error::ParseError;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::cmp::Ordering;

/// Number of leading columns before the first date column.
pub const LEADING_COLUMNS: usize = 2;

/// Row name prefix marking the totals row.
pub const TOTAL_ROW_PREFIX: &str = "total";

/// A date header together with the CSV column it was read from.
struct HeaderColumn {
    column: usize,
    date: DateColumn,
}

/// Parse a turnout count, treating blank, non-numeric, negative and
/// non-finite cells as zero.
pub fn parse_count(cell: Option<&str>) -> f64 {
    match cell.map(str::trim).and_then(|s| s.parse::<f64>().ok()) {
        Some(v) if v.is_finite() && v > 0.0 => v,
        _ => 0.0,
    }
}

/// Base letter of an accented Latin character, or `None` if it has none.
fn fold_accent(c: char) -> Option<char> {
    let base = match c {
        'à'..='å' | 'ā' | 'ă' | 'ą' => 'a',
        'ç' | 'ć' | 'č' => 'c',
        'ď' | 'đ' => 'd',
        'è'..='ë' | 'ē' | 'ė' | 'ę' | 'ě' => 'e',
        'ğ' => 'g',
        'ì'..='ï' | 'ī' | 'į' | 'ı' => 'i',
        'ł' | 'ľ' => 'l',
        'ñ' | 'ń' | 'ň' => 'n',
        'ò'..='ö' | 'ø' | 'ō' | 'ő' => 'o',
        'ř' => 'r',
        'ś' | 'š' | 'ş' => 's',
        'ť' | 'ţ' => 't',
        'ù'..='ü' | 'ū' | 'ů' | 'ű' => 'u',
        'ý' | 'ÿ' => 'y',
        'ź' | 'ż' | 'ž' => 'z',
        _ => return None,
    };
    Some(base)
}

/// Lowercased name with Latin accents folded to their base letters.
fn collation_key(name: &str) -> String {
    name.chars()
        .flat_map(char::to_lowercase)
        .map(|c| fold_accent(c).unwrap_or(c))
        .collect()
}

/// Accent- and case-insensitive ordering, approximating a locale collation.
///
/// Ties fall back to the lowercased name, then to the raw name.
pub fn location_order(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| a.cmp(b))
}

fn read_headers(header: &StringRecord) -> Vec<HeaderColumn> {
    header
        .iter()
        .enumerate()
        .skip(LEADING_COLUMNS)
        .filter_map(|(column, cell)| {
            DateColumn::from_header(cell, column - LEADING_COLUMNS + 1)
                .map(|date| HeaderColumn { column, date })
        })
        .collect()
}

/// Warn when an early-voting column is dated after election day.
fn check_chronology(year: &str, dates: &[DateColumn]) {
    let election_day = dates
        .iter()
        .find(|d| d.is_election_day)
        .and_then(|d| d.calendar_date());
    let Some(election_day) = election_day else {
        return;
    };
    for date in dates.iter().filter(|d| d.is_early_voting()) {
        if date.calendar_date().is_some_and(|d| d > election_day) {
            log::warn!(
                "ingest: {} early voting column {} is dated after election day",
                year,
                date.date
            );
        }
    }
}

/// Parse one year's export.
///
/// Locations are returned sorted by name. The totals row populates
/// [`YearDataset::totals`] and never becomes a location.
pub fn parse_year_csv(year: &str, csv_data: &str) -> Result<YearDataset, ParseError> {
    if csv_data.trim().is_empty() {
        return Err(ParseError::EmptyInput);
    }

    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(csv_data.trim().as_bytes());
    let records = rdr.records().collect::<Result<Vec<StringRecord>, _>>()?;

    if records.len() < 2 {
        return Err(ParseError::MissingRows {
            lines: records.len(),
        });
    }

    let headers = read_headers(&records[0]);
    if headers.is_empty() {
        return Err(ParseError::NoDateHeaders);
    }
    let dates = headers.iter().map(|h| h.date.clone()).collect::<Vec<_>>();
    check_chronology(year, &dates);

    let mut dataset = YearDataset {
        year: year.to_string(),
        dates,
        locations: Vec::new(),
        totals: Vec::new(),
    };

    for record in &records[1..] {
        let name = record.get(0).unwrap_or("").trim();
        if name.is_empty() {
            continue;
        }
        let data = headers
            .iter()
            .map(|h| parse_count(record.get(h.column)))
            .collect::<Vec<f64>>();

        if name.to_lowercase().starts_with(TOTAL_ROW_PREFIX) {
            dataset.totals = data;
        } else {
            dataset
                .locations
                .push(LocationSeries::new(name, data, &dataset.dates));
        }
    }

    dataset
        .locations
        .sort_by(|a, b| location_order(&a.name, &b.name));
    log::info!(
        "ingest: parsed {} locations over {} days for {}",
        dataset.locations.len(),
        dataset.dates.len(),
        year
    );
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Location,Precinct,10/21/2024,10/22/2024,*11/05/2024
Westside Rec Center,,0,0,210
Central Library,,120,98,410
Total,,1200,980,4100
";

    #[test]
    fn parses_dates_locations_and_totals() {
        let ds = parse_year_csv("2024", SAMPLE).unwrap();
        assert_eq!(ds.year, "2024");
        assert_eq!(ds.dates.len(), 3);
        assert!(ds.dates[2].is_election_day);
        assert_eq!(ds.dates[2].date, "11/05/2024");
        assert_eq!(ds.totals, vec![1200.0, 980.0, 4100.0]);
        assert_eq!(ds.locations.len(), 2);
        // sorted by name
        assert_eq!(ds.locations[0].name, "Central Library");
        assert_eq!(ds.locations[1].name, "Westside Rec Center");
    }

    #[test]
    fn classifies_locations_while_parsing() {
        let ds = parse_year_csv("2024", SAMPLE).unwrap();
        assert!(!ds.location("Central Library").unwrap().is_election_day_only);
        assert!(ds.location("Westside Rec Center").unwrap().is_election_day_only);
    }

    #[test]
    fn single_election_day_total_row() {
        let ds = parse_year_csv("2024", "Location,Ignored,*11/05/2024\nTotal,,1500").unwrap();
        assert_eq!(
            ds.dates,
            vec![DateColumn {
                date: "11/05/2024".to_string(),
                is_election_day: true,
                day_index: 1,
            }]
        );
        assert_eq!(ds.totals, vec![1500.0]);
        assert!(ds.locations.is_empty());
    }

    #[test]
    fn blank_and_invalid_counts_become_zero() {
        let csv = "\
Location,x,10/21/2024,10/22/2024,*11/05/2024
Annex,,,abc,-4
";
        let ds = parse_year_csv("2024", csv).unwrap();
        assert_eq!(ds.locations[0].data, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn short_rows_are_padded_with_zero() {
        let csv = "\
Location,x,10/21/2024,10/22/2024,*11/05/2024
Annex,,5
";
        let ds = parse_year_csv("2024", csv).unwrap();
        assert_eq!(ds.locations[0].data, vec![5.0, 0.0, 0.0]);
        assert_eq!(ds.locations[0].data.len(), ds.dates.len());
    }

    #[test]
    fn blank_header_does_not_shift_columns() {
        let csv = "\
Location,x,10/21/2024,,*11/05/2024
Annex,,5,999,7
";
        let ds = parse_year_csv("2024", csv).unwrap();
        assert_eq!(ds.dates.len(), 2);
        assert_eq!(ds.dates[1].day_index, 3);
        assert_eq!(ds.locations[0].data, vec![5.0, 7.0]);
    }

    #[test]
    fn total_row_match_is_case_insensitive() {
        let csv = "\
Location,x,*11/05/2024
TOTALS,,88
Annex,,7
";
        let ds = parse_year_csv("2024", csv).unwrap();
        assert_eq!(ds.totals, vec![88.0]);
        assert_eq!(ds.locations.len(), 1);
    }

    #[test]
    fn rows_without_names_are_skipped() {
        let csv = "\
Location,x,*11/05/2024
,,88
Annex,,7
";
        let ds = parse_year_csv("2024", csv).unwrap();
        assert_eq!(ds.locations.len(), 1);
    }

    #[test]
    fn soft_failures() {
        assert!(matches!(parse_year_csv("y", "  \n "), Err(ParseError::EmptyInput)));
        assert!(matches!(
            parse_year_csv("y", "Location,x,*11/05/2024"),
            Err(ParseError::MissingRows { lines: 1 })
        ));
        assert!(matches!(
            parse_year_csv("y", "Location,x\nAnnex,,7"),
            Err(ParseError::NoDateHeaders)
        ));
    }

    #[test]
    fn counts_are_non_negative_and_aligned() {
        let ds = parse_year_csv("2024", SAMPLE).unwrap();
        for loc in &ds.locations {
            assert_eq!(loc.data.len(), ds.dates.len());
            assert!(loc.data.iter().sum::<f64>() >= 0.0);
        }
    }

    #[test]
    fn location_order_ignores_case() {
        assert_eq!(location_order("apple", "Banana"), Ordering::Less);
        assert_eq!(location_order("Banana", "apple"), Ordering::Greater);
    }

    #[test]
    fn accented_names_sort_with_their_base_letter() {
        let mut names = vec!["Zavala Elementary", "Église Hall", "Edison High", "Ánimo Center"];
        names.sort_by(|a, b| location_order(a, b));
        assert_eq!(
            names,
            vec!["Ánimo Center", "Edison High", "Église Hall", "Zavala Elementary"]
        );
        assert_eq!(location_order("Eglise", "Église"), Ordering::Less);
    }

    #[test]
    fn two_digit_year_headers_keep_chronology() {
        let csv = "\
Location,x,10/21/2024,*11/05/24
Annex,,5,7
";
        let ds = parse_year_csv("2024", csv).unwrap();
        let early = ds.dates[0].calendar_date().unwrap();
        let election = ds.dates[1].calendar_date().unwrap();
        assert!(early < election);
        assert_eq!(election, chrono::NaiveDate::from_ymd_opt(2024, 11, 5).unwrap());
    }
}

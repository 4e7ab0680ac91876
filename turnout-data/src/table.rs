//! Plain-text table view of an aligned dataset.

use crate::present::AlignedDataset;
use turnout_utils::text::format_count;

pub const FIRST_COLUMN_HEADER: &str = "Date/Day";
pub const MISSING_VALUE: &str = "N/A";
pub const EMPTY_TABLE_MESSAGE: &str = "No data to display in table.";

/// One row per label, one column per series.
///
/// Counts get thousands separators; gaps print as `N/A`.
pub fn render_table(dataset: &AlignedDataset) -> String {
    if dataset.is_empty() {
        return EMPTY_TABLE_MESSAGE.to_string();
    }

    let mut rows = Vec::with_capacity(dataset.labels.len() + 1);
    let mut header = vec![FIRST_COLUMN_HEADER.to_string()];
    header.extend(dataset.series.iter().map(|s| s.label.clone()));
    rows.push(header);
    for (i, label) in dataset.labels.iter().enumerate() {
        let mut row = vec![label.clone()];
        row.extend(dataset.series.iter().map(|s| {
            s.values
                .get(i)
                .copied()
                .flatten()
                .map_or_else(|| MISSING_VALUE.to_string(), format_count)
        }));
        rows.push(row);
    }

    let widths = (0..rows[0].len())
        .map(|col| rows.iter().map(|r| r[col].chars().count()).max().unwrap_or(0))
        .collect::<Vec<_>>();

    let mut out = String::new();
    for (n, row) in rows.iter().enumerate() {
        let line = row
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(col, (cell, width))| {
                if col == 0 {
                    format!("{:<width$}", cell, width = width)
                } else {
                    format!("{:>width$}", cell, width = width)
                }
            })
            .collect::<Vec<_>>()
            .join(" | ");
        out.push_str(line.trim_end());
        out.push('\n');
        if n == 0 {
            let rule = widths
                .iter()
                .map(|w| "-".repeat(*w))
                .collect::<Vec<_>>()
                .join("-+-");
            out.push_str(&rule);
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::present::AlignedSeries;

    #[test]
    fn renders_counts_and_gaps() {
        let dataset = AlignedDataset {
            labels: vec!["Day 1".to_string(), "Election Day".to_string()],
            series: vec![
                AlignedSeries {
                    label: "Total Turnout - 2024".to_string(),
                    values: vec![Some(1234.0), Some(56789.0)],
                    color: "#EC4899".to_string(),
                },
                AlignedSeries {
                    label: "Central Library - 2022".to_string(),
                    values: vec![None, Some(12.0)],
                    color: "#8B5CF6".to_string(),
                },
            ],
        };
        let table = render_table(&dataset);
        let lines = table.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Date/Day"));
        assert!(lines[0].contains("Total Turnout - 2024"));
        assert!(lines[1].starts_with("---"));
        assert!(lines[2].contains("1,234"));
        assert!(lines[2].ends_with("N/A"));
        assert!(lines[3].starts_with("Election Day"));
        assert!(lines[3].contains("56,789"));
    }

    #[test]
    fn empty_dataset_prints_message() {
        assert_eq!(render_table(&AlignedDataset::default()), EMPTY_TABLE_MESSAGE);
    }
}

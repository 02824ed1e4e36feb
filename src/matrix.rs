use tracing::debug;

use crate::columns::{Column, order_columns};

/// Placeholder the API reports for ongoing states; carries no information.
const PLACEHOLDER: &str = "live";
const MIN_INFORMATIVE_CELLS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedMatrix {
    pub text: String,
    pub columns: usize,
    pub rows: usize,
}

pub fn parse_rows(payload: &[u8]) -> Vec<Vec<String>> {
    let text = String::from_utf8_lossy(payload);
    text.trim_matches(|c: char| c == '\n' || c == '\r')
        .split('\n')
        .map(|line| line.replace('\r', ""))
        .map(|line| line.split('\t').map(str::to_string).collect())
        .collect()
}

pub fn transpose(rows: Vec<Vec<String>>) -> Vec<Column> {
    let mut rows = rows.into_iter();
    let Some(header) = rows.next() else {
        return Vec::new();
    };
    let mut columns: Vec<Column> = header
        .into_iter()
        .map(|name| Column::new(name, Vec::new()))
        .collect();
    for row in rows {
        let mut cells = row.into_iter();
        for column in columns.iter_mut() {
            column.cells.push(cells.next().unwrap_or_default());
        }
    }
    columns
}

pub fn render(columns: &[Column]) -> String {
    let Some(first) = columns.first() else {
        return String::new();
    };
    let mut lines = Vec::with_capacity(first.cells.len() + 1);
    lines.push(
        columns
            .iter()
            .map(|c| c.header.as_str())
            .collect::<Vec<_>>()
            .join("\t"),
    );
    for row in 0..first.cells.len() {
        lines.push(
            columns
                .iter()
                .map(|c| c.cells.get(row).map(String::as_str).unwrap_or_default())
                .collect::<Vec<_>>()
                .join("\t"),
        );
    }
    lines.join("\n")
}

pub fn is_informative(column: &Column) -> bool {
    if column.header.contains("datetime") {
        return false;
    }
    let filled = std::iter::once(&column.header)
        .chain(column.cells.iter())
        .filter(|cell| !cell.is_empty() && cell.as_str() != PLACEHOLDER)
        .count();
    filled >= MIN_INFORMATIVE_CELLS
}

pub fn clean(payload: &[u8], keep_all: bool) -> CleanedMatrix {
    let columns = transpose(parse_rows(payload));
    let total = columns.len();
    let kept: Vec<Column> = if keep_all {
        columns
    } else {
        columns.into_iter().filter(is_informative).collect()
    };
    debug!(total, kept = kept.len(), "filtered columns");

    let ordered = order_columns(kept);
    let rows = ordered.first().map(|c| c.cells.len() + 1).unwrap_or(0);
    CleanedMatrix {
        text: render(&ordered),
        columns: ordered.len(),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(header: &str, cells: &[&str]) -> Column {
        Column::new(header, cells.iter().map(|c| c.to_string()).collect())
    }

    #[test]
    fn placeholder_only_column_is_dropped() {
        assert!(!is_informative(&column("col_a", &["", "", "live"])));
    }

    #[test]
    fn header_counts_toward_threshold() {
        assert!(is_informative(&column("col_a", &["x", "", "live"])));
        assert!(!is_informative(&column("", &["x", "", ""])));
    }

    #[test]
    fn datetime_columns_are_dropped() {
        assert!(!is_informative(&column("created_datetime", &["2019", "2020"])));
    }

    #[test]
    fn parse_strips_carriage_returns() {
        let rows = parse_rows(b"a\tb\r\n1\t2\r\n");
        assert_eq!(rows, vec![vec!["a", "b"], vec!["1", "2"]]);
    }

    #[test]
    fn trailing_empty_cells_survive() {
        let rows = parse_rows(b"a\tb\tc\n1\t\t\n");
        let columns = transpose(rows);
        assert_eq!(columns.len(), 3);
        assert_eq!(columns[2].cells, vec![""]);
    }

    #[test]
    fn short_rows_are_padded() {
        let columns = transpose(parse_rows(b"a\tb\n1\n"));
        assert_eq!(columns[1].cells, vec![""]);
    }

    #[test]
    fn clean_filters_and_orders() {
        let payload = b"state\tcreated_datetime\tfile_id\tempty\n\
            released\t2020-01-01\tabc\t\n\
            released\t2020-01-02\tdef\tlive\n";
        let cleaned = clean(payload, false);
        assert_eq!(cleaned.text, "file_id\tstate\nabc\treleased\ndef\treleased");
        assert_eq!(cleaned.columns, 2);
        assert_eq!(cleaned.rows, 3);
    }

    #[test]
    fn keep_all_retains_every_column() {
        let payload = b"empty\tfile_id\n\tabc\n";
        let cleaned = clean(payload, true);
        assert_eq!(cleaned.text, "file_id\tempty\nabc\t");
    }

    #[test]
    fn short_middle_row_keeps_other_rows() {
        let cleaned = clean(b"a\tb\tc\nx\ty\tz\nq\n", true);
        assert_eq!(cleaned.text, "a\tb\tc\nx\ty\tz\nq\t\t");
        assert_eq!(cleaned.columns, 3);
        assert_eq!(cleaned.rows, 3);
    }

    #[test]
    fn keep_all_skips_datetime_and_placeholder_filtering() {
        let payload = b"created_datetime\tstatus\tfile_id\n2019\tlive\tabc\n2020\t\tdef\n";
        let cleaned = clean(payload, true);
        assert_eq!(cleaned.columns, 3);
        let header = cleaned.text.lines().next().unwrap();
        assert!(header.split('\t').any(|h| h == "created_datetime"));
        assert!(header.split('\t').any(|h| h == "status"));

        let filtered = clean(payload, false);
        assert_eq!(filtered.text, "file_id\nabc\ndef");
    }

    #[test]
    fn nothing_left_renders_empty() {
        let cleaned = clean(b"a\tb\n\t\n", false);
        assert_eq!(cleaned.text, "");
        assert_eq!(cleaned.columns, 0);
        assert_eq!(cleaned.rows, 0);
    }

    #[test]
    fn cleaning_is_idempotent_with_keep_all() {
        let payload = b"cases_0_demographic_gender\tfile_name\tcases_0_samples_0_submitter_id\tcases_0_samples_0_sample_type\tfile_id\tupdated_datetime\n\
            female\ta.bam\tS1\tTumor\tid1\t2020\n\
            male\tb.bam\tS2\tNormal\tid2\t2021\n";
        let once = clean(payload, false);
        let twice = clean(once.text.as_bytes(), true);
        assert_eq!(once, twice);
    }
}

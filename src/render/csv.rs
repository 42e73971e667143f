//! CSV report rendering.
//!
//! The layout is fixed: an unquoted header, then one line per record with
//! every field wrapped in double quotes. Embedded quotes are written as is.

use crate::model::{format_number, DiscrepancyRecord};

/// Header line fields.
pub const CSV_HEADER: [&str; 9] = ["sht", "ltr", "num", "cCap", "rCap", "v1", "v2", "d", "abs"];

/// Line terminator of the current platform.
#[cfg(windows)]
pub const LINE_ENDING: &str = "\r\n";

/// Line terminator of the current platform.
#[cfg(not(windows))]
pub const LINE_ENDING: &str = "\n";

/// The fields of one record, in header order.
pub fn csv_fields(record: &DiscrepancyRecord) -> [String; 9] {
    [
        record.sheet_name().to_string(),
        record.column_letter().to_string(),
        record.row_number().to_string(),
        record.column_caption().to_string(),
        record.row_caption().to_string(),
        format_number(record.value1()),
        format_number(record.value2()),
        format_number(record.difference()),
        format_number(record.absolute_difference()),
    ]
}

/// Render records as CSV text, header included.
pub fn to_csv(records: &[DiscrepancyRecord]) -> String {
    let mut output = CSV_HEADER.join(",");
    output.push_str(LINE_ENDING);

    for record in records {
        let fields = csv_fields(record);
        let line: Vec<String> = fields.iter().map(|f| format!("\"{}\"", f)).collect();
        output.push_str(&line.join(","));
        output.push_str(LINE_ENDING);
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CanonicalRow, ColumnName, RawCell};

    fn record(key: RawCell, column: &str, v1: f64, v2: f64) -> DiscrepancyRecord {
        let row = CanonicalRow {
            id: 4,
            key,
            values: vec![v1],
        };
        DiscrepancyRecord::new("Sheet1", &ColumnName::from_raw(column), &row, v1, v2)
    }

    #[test]
    fn test_header_only() {
        assert_eq!(to_csv(&[]), format!("sht,ltr,num,cCap,rCap,v1,v2,d,abs{}", LINE_ENDING));
    }

    #[test]
    fn test_record_line() {
        let csv = to_csv(&[record(RawCell::text("Widgets"), "{B} - Revenue", 100.0, 99.5)]);
        let expected = format!(
            "sht,ltr,num,cCap,rCap,v1,v2,d,abs{nl}\"Sheet1\",\"B\",\"4\",\"Revenue\",\"Widgets\",\"100\",\"99.5\",\"0.5\",\"0.5\"{nl}",
            nl = LINE_ENDING
        );
        assert_eq!(csv, expected);
    }

    #[test]
    fn test_negative_difference() {
        let fields = csv_fields(&record(RawCell::Number(7.0), "{AA} - Q1", 1.0, 3.25));
        assert_eq!(fields[1], "AA");
        assert_eq!(fields[4], "7");
        assert_eq!(fields[7], "-2.25");
        assert_eq!(fields[8], "2.25");
    }

    #[test]
    fn test_exponent_notation() {
        let fields = csv_fields(&record(RawCell::text("k"), "{B} - V", 0.1 + 0.2, 0.3));
        assert_eq!(fields[5], "0.30000000000000004");
        assert_eq!(fields[6], "0.3");
        assert_eq!(fields[7], "5.551115123125783E-17");
        assert_eq!(fields[8], "5.551115123125783E-17");

        let fields = csv_fields(&record(RawCell::Number(1e16), "{B} - V", 1e16, 0.0));
        assert_eq!(fields[4], "1E+16");
        assert_eq!(fields[5], "1E+16");
        assert_eq!(fields[7], "1E+16");
    }

    #[test]
    fn test_quotes_are_not_escaped() {
        let csv = to_csv(&[record(RawCell::text("say \"hi\", ok"), "{B} - V", 1.0, 2.0)]);
        assert!(csv.contains(",\"say \"hi\", ok\","));
    }
}

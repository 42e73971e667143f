//! XLSX parser implementation.

use crate::container::{attribute_value, OoxmlContainer};
use crate::error::{Error, Result};
use crate::model::{letters_to_ordinal, parse_number, RawCell, RawTable, RawWorkbook};
use quick_xml::events::{BytesStart, Event};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

use super::shared_strings::SharedStrings;
use super::styles::{serial_to_date, Styles};

const WORKBOOK_PART: &str = "xl/workbook.xml";
const STYLES_PART: &str = "xl/styles.xml";

/// Sheet info from workbook.xml.
#[derive(Debug, Clone)]
struct SheetInfo {
    name: String,
    rel_id: String,
}

/// Parser for XLSX (Excel) workbooks.
pub struct XlsxParser {
    container: OoxmlContainer,
    shared_strings: SharedStrings,
    styles: Styles,
    sheets: Vec<SheetInfo>,
    relationships: HashMap<String, String>,
    source: String,
}

impl XlsxParser {
    /// Open an XLSX file for parsing. The file stem becomes the source label.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let container = OoxmlContainer::open(path)?;
        let source = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::from_container(container)?.with_source(source))
    }

    /// Create a parser from bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let container = OoxmlContainer::from_bytes(data)?;
        Self::from_container(container)
    }

    /// Set the label used to name the workbook in prompts and logs.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    fn from_container(container: OoxmlContainer) -> Result<Self> {
        let shared_strings = if container.exists("xl/sharedStrings.xml") {
            SharedStrings::parse(&container.read_xml("xl/sharedStrings.xml")?)?
        } else {
            SharedStrings::default()
        };

        let styles = if container.exists(STYLES_PART) {
            Styles::parse(&container.read_xml(STYLES_PART)?)?
        } else {
            Styles::default()
        };

        let relationships = container.read_relationships("xl/_rels/workbook.xml.rels")?;
        let sheets = Self::parse_workbook(&container)?;

        Ok(Self {
            container,
            shared_strings,
            styles,
            sheets,
            relationships,
            source: String::new(),
        })
    }

    /// Parse workbook.xml for sheet info.
    fn parse_workbook(container: &OoxmlContainer) -> Result<Vec<SheetInfo>> {
        let xml = container.read_xml(WORKBOOK_PART)?;
        let mut sheets = Vec::new();

        let mut reader = quick_xml::Reader::from_str(&xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Empty(e) | Event::Start(e) if e.name().as_ref() == b"sheet" => {
                    let name = attribute_value(&e, b"name").unwrap_or_default();
                    let rel_id = attribute_value(&e, b"r:id").unwrap_or_default();
                    if !name.is_empty() {
                        sheets.push(SheetInfo { name, rel_id });
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(sheets)
    }

    /// Decode every sheet into a raw table.
    pub fn parse(&self) -> Result<RawWorkbook> {
        let mut workbook = RawWorkbook::new(self.source.clone());

        for sheet in &self.sheets {
            let target = self.relationships.get(&sheet.rel_id).ok_or_else(|| {
                Error::MissingComponent(format!(
                    "relationship {} for sheet '{}'",
                    sheet.rel_id, sheet.name
                ))
            })?;
            let sheet_path = OoxmlContainer::resolve_path(WORKBOOK_PART, target);

            let xml = self.container.read_xml(&sheet_path)?;
            let table = self.parse_sheet(&sheet.name, &xml)?;
            debug!(
                sheet = %sheet.name,
                rows = table.row_count(),
                columns = table.column_count(),
                "decoded sheet"
            );
            workbook.add_sheet(table);
        }

        Ok(workbook)
    }

    /// Parse a worksheet XML into a raw table.
    fn parse_sheet(&self, name: &str, xml: &str) -> Result<RawTable> {
        let mut rows: Vec<Vec<RawCell>> = Vec::new();
        let mut reader = quick_xml::Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        let mut next_row = 0usize;
        let mut current_row: Option<usize> = None;
        let mut next_column = 0usize;
        let mut current_column = 0usize;
        let mut in_cell = false;
        let mut in_value = false;
        let mut current_cell_type: Option<String> = None;
        let mut current_cell_style: Option<usize> = None;
        let mut current_cell_value = String::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => match e.name().as_ref() {
                    b"row" => {
                        let row = row_reference(e).unwrap_or(next_row);
                        current_row = Some(row);
                        next_column = 0;
                    }
                    b"c" if current_row.is_some() => {
                        in_cell = true;
                        current_cell_value.clear();
                        current_cell_type = attribute_value(e, b"t");
                        current_cell_style = attribute_value(e, b"s").and_then(|s| s.parse().ok());
                        current_column = attribute_value(e, b"r")
                            .and_then(|r| column_from_reference(r.as_bytes()))
                            .unwrap_or(next_column);
                    }
                    b"v" | b"t" if in_cell => in_value = true,
                    _ => {}
                },
                Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                    b"row" => {
                        next_row = row_reference(e).unwrap_or(next_row) + 1;
                    }
                    b"c" if current_row.is_some() => {
                        // A styled but valueless cell still advances the column
                        let column = attribute_value(e, b"r")
                            .and_then(|r| column_from_reference(r.as_bytes()))
                            .unwrap_or(next_column);
                        next_column = column + 1;
                    }
                    _ => {}
                },
                Ok(Event::Text(ref e)) => {
                    if in_value {
                        let text = e.unescape().unwrap_or_default();
                        current_cell_value.push_str(&text);
                    }
                }
                Ok(Event::End(ref e)) => match e.name().as_ref() {
                    b"row" => {
                        if let Some(row) = current_row.take() {
                            next_row = row + 1;
                        }
                    }
                    b"c" if in_cell => {
                        let value = self.resolve_cell_value(
                            &current_cell_value,
                            current_cell_type.as_deref(),
                            current_cell_style,
                        );

                        if let Some(row) = current_row {
                            if !value.is_empty() {
                                place_cell(&mut rows, row, current_column, value);
                            }
                        }

                        next_column = current_column + 1;
                        in_cell = false;
                    }
                    b"v" | b"t" => in_value = false,
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(Error::XmlParse(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        Ok(RawTable::from_rows(name, rows))
    }

    /// Resolve a cell value based on its type and style.
    ///
    /// Numbers shown through a date or time format decode as ISO 8601 text.
    fn resolve_cell_value(
        &self,
        value: &str,
        cell_type: Option<&str>,
        style: Option<usize>,
    ) -> RawCell {
        match cell_type {
            Some("s") => match value.trim().parse::<usize>() {
                Ok(idx) => RawCell::text(self.shared_strings.get(idx).unwrap_or("")),
                Err(_) => RawCell::text(value),
            },
            Some("b") => RawCell::Bool(value.trim() == "1"),
            Some("e") => RawCell::Error(value.to_string()),
            Some("str") | Some("inlineStr") | Some("d") => RawCell::text(value),
            _ => {
                if value.is_empty() {
                    RawCell::Empty
                } else {
                    match parse_number(value) {
                        Some(number) if style.is_some_and(|s| self.styles.is_date_style(s)) => {
                            serial_to_date(number)
                                .map(RawCell::Text)
                                .unwrap_or(RawCell::Number(number))
                        }
                        Some(number) => RawCell::Number(number),
                        None => RawCell::text(value),
                    }
                }
            }
        }
    }

    /// Get the number of sheets.
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Get sheet names.
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }
}

/// Read the 1-based `r` attribute of a row element as a zero-based index.
fn row_reference(e: &BytesStart<'_>) -> Option<usize> {
    attribute_value(e, b"r")?
        .trim()
        .parse::<usize>()
        .ok()?
        .checked_sub(1)
}

/// Extract the zero-based column index from a cell reference like `AB12`.
fn column_from_reference(reference: &[u8]) -> Option<usize> {
    let letters: String = reference
        .iter()
        .take_while(|b| b.is_ascii_alphabetic())
        .map(|&b| b as char)
        .collect();
    letters_to_ordinal(&letters).map(|ordinal| ordinal - 1)
}

fn place_cell(rows: &mut Vec<Vec<RawCell>>, row: usize, column: usize, value: RawCell) {
    if rows.len() <= row {
        rows.resize(row + 1, Vec::new());
    }
    let cells = &mut rows[row];
    if cells.len() <= column {
        cells.resize(column + 1, RawCell::Empty);
    }
    cells[column] = value;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ColumnKey;
    use crate::normalize::normalize_sheet;
    use crate::resolve::SheetKeys;
    use crate::xlsx::fixtures;

    #[test]
    fn test_column_from_reference() {
        assert_eq!(column_from_reference(b"A1"), Some(0));
        assert_eq!(column_from_reference(b"AB12"), Some(27));
        assert_eq!(column_from_reference(b"12"), None);
    }

    #[test]
    fn test_parse_workbook() {
        let data = fixtures::workbook_bytes(&[
            (
                "Budget",
                vec![
                    vec!["Region", "Q1", "Q2"],
                    vec!["North", "10", "12.5"],
                    vec!["South", "", "null"],
                ],
            ),
            ("Empty", vec![]),
        ]);

        let parser = XlsxParser::from_bytes(data).unwrap().with_source("book");
        assert_eq!(parser.sheet_count(), 2);
        assert_eq!(parser.sheet_names(), vec!["Budget", "Empty"]);

        let workbook = parser.parse().unwrap();
        assert_eq!(workbook.source, "book");

        let budget = workbook.sheet("Budget").unwrap();
        assert_eq!(budget.row_count(), 3);
        assert_eq!(budget.column_count(), 3);
        assert_eq!(budget.cell(0, 0), Some(&RawCell::text("Region")));
        assert_eq!(budget.cell(1, 2), Some(&RawCell::Number(12.5)));
        assert_eq!(budget.cell(2, 1), Some(&RawCell::Empty));
        assert_eq!(budget.cell(2, 2), Some(&RawCell::text("null")));

        let empty = workbook.sheet("Empty").unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_sparse_cells_keep_position() {
        let xml = r#"<worksheet><sheetData>
            <row r="2"><c r="C2"><v>5</v></c></row>
            <row r="4"><c r="A4" t="inlineStr"><is><t>tail</t></is></c><c r="B4" s="1"/><c><v>7</v></c></row>
        </sheetData></worksheet>"#;

        let data = fixtures::workbook_bytes(&[("S", vec![])]);
        let parser = XlsxParser::from_bytes(data).unwrap();
        let table = parser.parse_sheet("S", xml).unwrap();

        assert_eq!(table.row_count(), 4);
        assert_eq!(table.column_count(), 3);
        assert!(table.row(0).unwrap().iter().all(RawCell::is_empty));
        assert_eq!(table.cell(1, 2), Some(&RawCell::Number(5.0)));
        assert_eq!(table.cell(3, 0), Some(&RawCell::text("tail")));
        assert_eq!(table.cell(3, 1), Some(&RawCell::Empty));
        assert_eq!(table.cell(3, 2), Some(&RawCell::Number(7.0)));
    }

    #[test]
    fn test_cell_types() {
        let data = fixtures::workbook_bytes(&[("S", vec![])]);
        let parser = XlsxParser::from_bytes(data).unwrap();

        assert_eq!(parser.resolve_cell_value("1", Some("b"), None), RawCell::Bool(true));
        assert_eq!(
            parser.resolve_cell_value("#N/A", Some("e"), None),
            RawCell::Error("#N/A".to_string())
        );
        assert_eq!(parser.resolve_cell_value("3.5", None, None), RawCell::Number(3.5));
        assert_eq!(parser.resolve_cell_value("", None, None), RawCell::Empty);
        assert_eq!(parser.resolve_cell_value("12", Some("str"), None), RawCell::text("12"));
    }

    #[test]
    fn test_date_styled_cells_decode_as_dates() {
        let data = fixtures::workbook_bytes(&[("S", vec![])]);
        let mut parser = XlsxParser::from_bytes(data).unwrap();
        parser.styles = Styles::parse(
            r#"<styleSheet><cellXfs count="2"><xf numFmtId="0"/><xf numFmtId="14"/></cellXfs></styleSheet>"#,
        )
        .unwrap();

        let xml = r#"<worksheet><sheetData>
            <row r="1"><c r="A1" t="inlineStr"><is><t>Region</t></is></c><c r="B1" t="inlineStr"><is><t>Q1</t></is></c></row>
            <row r="2"><c r="A2" t="inlineStr"><is><t>North</t></is></c><c r="B2" s="1"><v>45292</v></c></row>
            <row r="3"><c r="A3" t="inlineStr"><is><t>South</t></is></c><c r="B3" s="0"><v>45292</v></c></row>
        </sheetData></worksheet>"#;
        let table = parser.parse_sheet("S", xml).unwrap();

        assert_eq!(table.cell(1, 1), Some(&RawCell::text("2024-01-01")));
        assert_eq!(table.cell(2, 1), Some(&RawCell::Number(45292.0)));

        // The date row fails the numeric check and is pruned
        let keys = SheetKeys::new(ColumnKey::parse("A").unwrap(), 0);
        let canonical = normalize_sheet(&table, &keys).unwrap();
        let ids: Vec<u32> = canonical.rows().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3]);
    }

    #[test]
    fn test_styles_part_is_loaded() {
        use std::io::{Cursor, Read, Write};
        use zip::write::SimpleFileOptions;

        let data = fixtures::workbook_bytes(&[("S", vec![vec!["1"]])]);
        let mut source = zip::ZipArchive::new(Cursor::new(data)).unwrap();
        let mut buffer = Vec::new();
        {
            let mut zip = zip::ZipWriter::new(Cursor::new(&mut buffer));
            for idx in 0..source.len() {
                let mut entry = source.by_index(idx).unwrap();
                let mut bytes = Vec::new();
                entry.read_to_end(&mut bytes).unwrap();
                zip.start_file(entry.name().to_string(), SimpleFileOptions::default())
                    .unwrap();
                zip.write_all(&bytes).unwrap();
            }
            zip.start_file("xl/styles.xml", SimpleFileOptions::default())
                .unwrap();
            zip.write_all(br#"<styleSheet><cellXfs><xf numFmtId="0"/><xf numFmtId="22"/></cellXfs></styleSheet>"#)
                .unwrap();
            zip.finish().unwrap();
        }

        let parser = XlsxParser::from_bytes(buffer).unwrap();
        assert!(parser.styles.is_date_style(1));
        assert!(!parser.styles.is_date_style(0));
    }

    #[test]
    fn test_missing_workbook_part() {
        use std::io::{Cursor, Write};
        use zip::write::SimpleFileOptions;

        let mut buffer = Vec::new();
        {
            let mut zip = zip::ZipWriter::new(Cursor::new(&mut buffer));
            zip.start_file("[Content_Types].xml", SimpleFileOptions::default())
                .unwrap();
            zip.write_all(b"<Types/>").unwrap();
            zip.finish().unwrap();
        }

        let result = XlsxParser::from_bytes(buffer);
        assert!(matches!(result, Err(Error::MissingComponent(_))));
    }

    #[test]
    fn test_malformed_sheet_is_fatal() {
        let data = fixtures::workbook_bytes(&[("S", vec![])]);
        let parser = XlsxParser::from_bytes(data).unwrap();
        let result = parser.parse_sheet("S", "<worksheet><sheetData><row></sheetData>");
        assert!(matches!(result, Err(Error::XmlParse(_))));
    }
}

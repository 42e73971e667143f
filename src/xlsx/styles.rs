//! Number formats from xl/styles.xml, used to spot date-formatted cells.

use crate::container::attribute_value;
use crate::error::Result;
use chrono::{NaiveDate, TimeDelta};
use quick_xml::events::Event;
use std::collections::HashMap;

/// Built-in date and time formats: 14-22 and 45-47.
fn is_builtin_date_format(num_fmt_id: u32) -> bool {
    matches!(num_fmt_id, 14..=22 | 45..=47)
}

/// Cell formats of a workbook.
#[derive(Debug, Default)]
pub struct Styles {
    /// Custom formats: numFmtId -> formatCode
    num_fmts: HashMap<u32, String>,
    /// numFmtId of each `cellXfs` entry, indexed by the cell `s` attribute
    cell_xfs: Vec<u32>,
}

impl Styles {
    /// Parse xl/styles.xml.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut styles = Self::default();
        let mut reader = quick_xml::Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        let mut in_num_fmts = false;
        let mut in_cell_xfs = false;

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) if e.name().as_ref() == b"numFmts" => in_num_fmts = true,
                Event::Start(e) if e.name().as_ref() == b"cellXfs" => in_cell_xfs = true,
                Event::Start(e) | Event::Empty(e) => match e.name().as_ref() {
                    b"numFmt" if in_num_fmts => {
                        let id = attribute_value(&e, b"numFmtId").and_then(|v| v.parse().ok());
                        if let (Some(id), Some(code)) = (id, attribute_value(&e, b"formatCode")) {
                            styles.num_fmts.insert(id, code);
                        }
                    }
                    b"xf" if in_cell_xfs => {
                        let id = attribute_value(&e, b"numFmtId")
                            .and_then(|v| v.parse().ok())
                            .unwrap_or(0);
                        styles.cell_xfs.push(id);
                    }
                    _ => {}
                },
                Event::End(e) => match e.name().as_ref() {
                    b"numFmts" => in_num_fmts = false,
                    b"cellXfs" => in_cell_xfs = false,
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(styles)
    }

    /// The numFmtId applied by a cell style index.
    pub fn num_fmt_id(&self, style_index: usize) -> Option<u32> {
        self.cell_xfs.get(style_index).copied()
    }

    /// Whether a cell with this style index shows its number as a date or time.
    pub fn is_date_style(&self, style_index: usize) -> bool {
        self.num_fmt_id(style_index)
            .is_some_and(|id| self.is_date_format(id))
    }

    /// Whether a numFmtId is a date or time format.
    pub fn is_date_format(&self, num_fmt_id: u32) -> bool {
        is_builtin_date_format(num_fmt_id)
            || self
                .num_fmts
                .get(&num_fmt_id)
                .is_some_and(|code| is_date_format_code(code))
    }
}

/// A format code is a date or time format when a day, month, year, hour or
/// second placeholder appears outside of `[...]`, quotes and escapes.
fn is_date_format_code(code: &str) -> bool {
    let mut chars = code.chars();
    let mut in_bracket = false;
    let mut in_quote = false;

    while let Some(c) = chars.next() {
        match c {
            '"' => in_quote = !in_quote,
            _ if in_quote => {}
            '[' => in_bracket = true,
            ']' => in_bracket = false,
            _ if in_bracket => {}
            // Escaped literal, or the fill/padding character that follows
            '\\' | '_' | '*' => {
                chars.next();
            }
            'd' | 'D' | 'm' | 'M' | 'y' | 'Y' | 'h' | 'H' | 's' | 'S' => return true,
            _ => {}
        }
    }

    false
}

/// Render an OLE automation date serial (days since 1899-12-30) as ISO 8601.
///
/// Whole days render as `YYYY-MM-DD`; a time of day adds `THH:MM:SS`.
pub fn serial_to_date(serial: f64) -> Option<String> {
    if !serial.is_finite() {
        return None;
    }

    let days = TimeDelta::try_days(serial.trunc() as i64)?;
    let seconds = TimeDelta::try_seconds((serial.fract().abs() * 86_400.0).round() as i64)?;
    let moment = NaiveDate::from_ymd_opt(1899, 12, 30)?
        .and_hms_opt(0, 0, 0)?
        .checked_add_signed(days)?
        .checked_add_signed(seconds)?;

    if moment.time() == chrono::NaiveTime::MIN {
        Some(moment.format("%Y-%m-%d").to_string())
    } else {
        Some(moment.format("%Y-%m-%dT%H:%M:%S").to_string())
    }
}

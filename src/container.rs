//! ZIP container for Office Open XML workbooks.

use crate::error::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use std::collections::{BTreeMap, HashMap};
use std::io::{Cursor, Read};
use std::path::Path;

/// Decode XML bytes, honoring a UTF-8 or UTF-16 byte order mark.
///
/// Without a BOM the bytes are read as UTF-8, falling back to UTF-16 when
/// the zero-byte pattern of ASCII markup shows through.
pub fn decode_xml_bytes(bytes: &[u8]) -> Result<String> {
    match bytes {
        [0xEF, 0xBB, 0xBF, rest @ ..] => String::from_utf8(rest.to_vec())
            .map_err(|e| Error::InvalidData(format!("invalid UTF-8 in XML part: {}", e))),
        [0xFF, 0xFE, rest @ ..] => decode_utf16(rest, u16::from_le_bytes).map(|s| declare_utf8(&s)),
        [0xFE, 0xFF, rest @ ..] => decode_utf16(rest, u16::from_be_bytes).map(|s| declare_utf8(&s)),
        _ => match std::str::from_utf8(bytes) {
            Ok(text) => Ok(text.to_string()),
            Err(_) => match bytes {
                [_, 0, _, 0, ..] => decode_utf16(bytes, u16::from_le_bytes),
                [0, _, 0, _, ..] => decode_utf16(bytes, u16::from_be_bytes),
                _ => Ok(String::from_utf8_lossy(bytes).into_owned()),
            },
        },
    }
}

fn decode_utf16(bytes: &[u8], to_unit: fn([u8; 2]) -> u16) -> Result<String> {
    let units = bytes
        .chunks_exact(2)
        .map(|pair| to_unit([pair[0], pair[1]]));

    char::decode_utf16(units)
        .collect::<std::result::Result<String, _>>()
        .map_err(|e| Error::InvalidData(format!("invalid UTF-16 in XML part: {}", e)))
}

/// Rewrite a UTF-16 encoding declaration once the text is a Rust string,
/// so the XML reader does not try to decode it again.
fn declare_utf8(content: &str) -> String {
    let Some(end) = content.strip_prefix("<?xml").and(content.find("?>")) else {
        return content.to_string();
    };
    let (declaration, body) = content.split_at(end);
    let declaration = declaration
        .replacen("UTF-16", "UTF-8", 1)
        .replacen("utf-16", "UTF-8", 1);
    format!("{}{}", declaration, body)
}

/// Read an attribute of an element, unescaped.
pub(crate) fn attribute_value(element: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    element
        .attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key)
        .map(|a| {
            a.unescape_value()
                .map(|v| v.into_owned())
                .unwrap_or_else(|_| String::from_utf8_lossy(&a.value).into_owned())
        })
}

/// The parts of an OOXML package, read fully into memory.
///
/// The archive (and the file it came from) is released as soon as the
/// package is loaded; parts are looked up by their path inside the ZIP.
pub struct OoxmlContainer {
    parts: BTreeMap<String, Vec<u8>>,
}

impl OoxmlContainer {
    /// Load a package from a file.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use xlcompare::container::OoxmlContainer;
    ///
    /// let container = OoxmlContainer::open("budget.xlsx")?;
    /// assert!(container.exists("xl/workbook.xml"));
    /// # Ok::<(), xlcompare::Error>(())
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_bytes(std::fs::read(path.as_ref())?)
    }

    /// Load a package from bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let mut archive = zip::ZipArchive::new(Cursor::new(data))?;
        let mut parts = BTreeMap::new();

        for idx in 0..archive.len() {
            let mut entry = archive.by_index(idx)?;
            if entry.is_dir() {
                continue;
            }
            let mut bytes = Vec::with_capacity(entry.size() as usize);
            entry.read_to_end(&mut bytes)?;
            parts.insert(entry.name().to_string(), bytes);
        }

        Ok(Self { parts })
    }

    /// Read an XML part as a string.
    pub fn read_xml(&self, path: &str) -> Result<String> {
        let bytes = self
            .parts
            .get(path)
            .ok_or_else(|| Error::MissingComponent(path.to_string()))?;
        decode_xml_bytes(bytes)
    }

    /// Check if a part exists.
    pub fn exists(&self, path: &str) -> bool {
        self.parts.contains_key(path)
    }

    /// Paths of all parts, sorted.
    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.parts.keys().map(String::as_str)
    }

    /// Read a relationships part into a map from relationship id to target.
    ///
    /// A missing part yields an empty map.
    pub fn read_relationships(&self, rels_path: &str) -> Result<HashMap<String, String>> {
        let mut rels = HashMap::new();
        if !self.exists(rels_path) {
            return Ok(rels);
        }

        let content = self.read_xml(rels_path)?;
        let mut reader = quick_xml::Reader::from_str(&content);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Empty(e) | Event::Start(e) if e.name().as_ref() == b"Relationship" => {
                    if let (Some(id), Some(target)) =
                        (attribute_value(&e, b"Id"), attribute_value(&e, b"Target"))
                    {
                        rels.insert(id, target);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(rels)
    }

    /// Resolve a relationship target against the part that references it.
    ///
    /// Targets starting with `/` are package-absolute.
    pub fn resolve_path(base: &str, target: &str) -> String {
        if let Some(absolute) = target.strip_prefix('/') {
            return absolute.to_string();
        }

        let mut segments: Vec<&str> = base.split('/').collect();
        segments.pop();
        for segment in target.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                name => segments.push(name),
            }
        }
        segments.join("/")
    }
}

impl std::fmt::Debug for OoxmlContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OoxmlContainer")
            .field("parts", &self.parts.len())
            .finish()
    }
}

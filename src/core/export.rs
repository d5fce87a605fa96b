//! Two-column iButton / MZone exports of a batch report.

use crate::domain::model::{BatchReport, ExportFormat, INVALID_PLACEHOLDER};
use crate::utils::error::Result;
use std::io::{Cursor, Write};
use zip::write::{FileOptions, ZipWriter};

pub const HEADER: [&str; 2] = ["iButton", "MZone"];
pub const DEFAULT_SHEET_NAME: &str = "Conversao iButton";
pub const DEFAULT_FILE_NAME: &str = "conversao_ibutton";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exporter {
    sheet_name: String,
    placeholder: String,
}

impl Default for Exporter {
    fn default() -> Self {
        Self::new(DEFAULT_SHEET_NAME, INVALID_PLACEHOLDER)
    }
}

impl Exporter {
    pub fn new(sheet_name: impl Into<String>, placeholder: impl Into<String>) -> Self {
        Self {
            sheet_name: sheet_name.into(),
            placeholder: placeholder.into(),
        }
    }

    /// Header row followed by one row per batch line, invalid lines included.
    pub fn table(&self, report: &BatchReport) -> Vec<[String; 2]> {
        let mut rows = Vec::with_capacity(report.len() + 1);
        rows.push(HEADER.map(|h| h.to_string()));
        rows.extend(
            report
                .rows()
                .iter()
                .map(|row| [row.normalized.clone(), row.display_value(&self.placeholder)]),
        );
        rows
    }

    pub fn render(&self, report: &BatchReport, format: ExportFormat) -> Result<Vec<u8>> {
        match format {
            ExportFormat::Csv => self.to_delimited(report, b','),
            ExportFormat::Tsv => self.to_delimited(report, b'\t'),
            ExportFormat::Xlsx => self.to_xlsx(report),
        }
    }

    pub fn to_delimited(&self, report: &BatchReport, delimiter: u8) -> Result<Vec<u8>> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_writer(Vec::new());

        for row in self.table(report) {
            writer.write_record(&row)?;
        }

        writer
            .into_inner()
            .map_err(|e| std::io::Error::other(e.to_string()).into())
    }

    /// Single-sheet Office Open XML workbook with inline string cells.
    pub fn to_xlsx(&self, report: &BatchReport) -> Result<Vec<u8>> {
        let sheet_xml = self.sheet_xml(report);
        let workbook_xml = format!(
            concat!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
                r#"<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" "#,
                r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
                r#"<sheets><sheet name="{}" sheetId="1" r:id="rId1"/></sheets></workbook>"#
            ),
            escape_xml(&self.sheet_name)
        );

        let parts: [(&str, &str); 5] = [
            ("[Content_Types].xml", CONTENT_TYPES_XML),
            ("_rels/.rels", ROOT_RELS_XML),
            ("xl/workbook.xml", &workbook_xml),
            ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS_XML),
            ("xl/worksheets/sheet1.xml", &sheet_xml),
        ];

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in parts {
            zip.start_file::<_, ()>(name, FileOptions::default())?;
            zip.write_all(content.as_bytes())?;
        }
        let cursor = zip.finish()?;

        tracing::debug!("Workbook built with {} data rows", report.len());
        Ok(cursor.into_inner())
    }

    fn sheet_xml(&self, report: &BatchReport) -> String {
        let mut xml = String::from(concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
            "<sheetData>"
        ));

        for (idx, row) in self.table(report).iter().enumerate() {
            let r = idx + 1;
            xml.push_str(&format!(r#"<row r="{}">"#, r));
            for (col, value) in ["A", "B"].iter().zip(row.iter()) {
                xml.push_str(&format!(
                    r#"<c r="{}{}" t="inlineStr"><is><t>{}</t></is></c>"#,
                    col,
                    r,
                    escape_cell_text(value)
                ));
            }
            xml.push_str("</row>");
        }

        xml.push_str("</sheetData></worksheet>");
        xml
    }

    /// Plain text for copying: one `code → value` line per batch row.
    pub fn clipboard_text(&self, report: &BatchReport) -> String {
        report
            .rows()
            .iter()
            .map(|row| {
                format!(
                    "{} → {}",
                    row.normalized,
                    row.display_value(&self.placeholder)
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Export path: `<output_path>/<file_name>.<extension>`.
pub fn output_file(output_path: &str, file_name: &str, format: ExportFormat) -> String {
    format!(
        "{}/{}.{}",
        output_path.trim_end_matches('/'),
        file_name,
        format.extension()
    )
}

/// Characters allowed by the XML 1.0 `Char` production.
fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..
    )
}

/// Attribute-safe text. Characters XML cannot carry are dropped.
fn escape_xml(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars().filter(|c| is_xml_char(*c)) {
        push_escaped(&mut out, c);
    }
    out
}

/// Cell text. Characters XML cannot carry become `_xHHHH_`, and a literal
/// `_x` is written as `_x005F_x` so it is not read back as an escape.
fn escape_cell_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        if !is_xml_char(c) {
            out.push_str(&format!("_x{:04X}_", c as u32));
        } else if c == '_' && chars.peek() == Some(&'x') {
            out.push_str("_x005F_");
        } else {
            push_escaped(&mut out, c);
        }
    }
    out
}

fn push_escaped(out: &mut String, c: char) {
    match c {
        '&' => out.push_str("&amp;"),
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        '"' => out.push_str("&quot;"),
        '\'' => out.push_str("&apos;"),
        c => out.push(c),
    }
}

const CONTENT_TYPES_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
    r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
    r#"<Default Extension="xml" ContentType="application/xml"/>"#,
    r#"<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>"#,
    r#"<Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
    "</Types>"
);

const ROOT_RELS_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>"#,
    "</Relationships>"
);

const WORKBOOK_RELS_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>"#,
    "</Relationships>"
);

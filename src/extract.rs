use crate::{
  error::FormatError,
  models::{RawRow, SourceFormat},
};
use calamine::{open_workbook_auto, Data, Reader};
use std::{collections::BTreeMap, io::Write};
use tempfile::NamedTempFile;

/// Result of reading one attachment: the ordered non-blank rows keyed by
/// normalized column name, the format that was actually parsed, and any
/// worksheets beyond the first (which are not converted).
#[derive(Debug)]
pub struct Extraction {
  pub rows: Vec<RawRow>,
  pub resolved_format: SourceFormat,
  pub extra_sheets: Vec<String>,
}

pub fn extract_rows(bytes: &[u8], format: SourceFormat) -> Result<Extraction, FormatError> {
  match format {
    SourceFormat::Xlsx => extract_workbook(bytes),
    SourceFormat::Csv => extract_delimited(bytes),
    SourceFormat::Auto => match sniff_format(bytes)? {
      SourceFormat::Xlsx => extract_workbook(bytes),
      _ => extract_delimited(bytes),
    },
  }
}

/// ZIP containers (xlsx/ods) and OLE compound files (legacy xls) are
/// recognized by magic bytes; anything else with embedded NUL bytes is
/// rejected as non-tabular, and the rest is treated as delimited text.
fn sniff_format(bytes: &[u8]) -> Result<SourceFormat, FormatError> {
  const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
  const ZIP_EMPTY_MAGIC: &[u8] = b"PK\x05\x06";
  const OLE_MAGIC: &[u8] = &[0xd0, 0xcf, 0x11, 0xe0, 0xa1, 0xb1, 0x1a, 0xe1];

  if bytes.starts_with(ZIP_MAGIC)
    || bytes.starts_with(ZIP_EMPTY_MAGIC)
    || bytes.starts_with(OLE_MAGIC)
  {
    return Ok(SourceFormat::Xlsx);
  }
  if bytes.iter().take(4096).any(|byte| *byte == 0) {
    return Err(FormatError::new(
      "attachment does not look like tabular data (binary content without a known spreadsheet signature)",
    ));
  }
  Ok(SourceFormat::Csv)
}

fn extract_workbook(bytes: &[u8]) -> Result<Extraction, FormatError> {
  // calamine opens by path, so the attachment bytes go through a temp file.
  let mut temp_file = NamedTempFile::new()
    .map_err(|err| FormatError::new(format!("could not stage attachment: {err}")))?;
  temp_file
    .write_all(bytes)
    .map_err(|err| FormatError::new(format!("could not stage attachment: {err}")))?;

  let mut workbook = open_workbook_auto(temp_file.path())
    .map_err(|err| FormatError::new(format!("attachment is not a readable workbook: {err}")))?;
  let sheet_names = workbook.sheet_names().to_vec();
  let Some(first_sheet) = sheet_names.first().cloned() else {
    return Ok(Extraction {
      rows: Vec::new(),
      resolved_format: SourceFormat::Xlsx,
      extra_sheets: Vec::new(),
    });
  };

  let range = workbook
    .worksheet_range(&first_sheet)
    .map_err(|err| FormatError::new(format!("worksheet '{first_sheet}' could not be read: {err}")))?;
  let grid = range
    .rows()
    .map(|row| row.iter().map(cell_text).collect::<Vec<_>>())
    .collect::<Vec<_>>();

  Ok(Extraction {
    rows: rows_from_grid(grid),
    resolved_format: SourceFormat::Xlsx,
    extra_sheets: sheet_names.into_iter().skip(1).collect(),
  })
}

fn extract_delimited(bytes: &[u8]) -> Result<Extraction, FormatError> {
  let delimiter = sniff_delimiter(bytes);
  let mut reader = csv::ReaderBuilder::new()
    .has_headers(false)
    .flexible(true)
    .trim(csv::Trim::All)
    .delimiter(delimiter)
    .from_reader(bytes);

  let mut grid = Vec::new();
  for record in reader.records() {
    let record = record
      .map_err(|err| FormatError::new(format!("attachment is not readable as delimited text: {err}")))?;
    grid.push(
      record
        .iter()
        .map(|cell| {
          let trimmed = cell.trim();
          if trimmed.is_empty() {
            None
          } else {
            Some(trimmed.to_string())
          }
        })
        .collect::<Vec<_>>(),
    );
  }

  Ok(Extraction {
    rows: rows_from_grid(grid),
    resolved_format: SourceFormat::Csv,
    extra_sheets: Vec::new(),
  })
}

fn sniff_delimiter(bytes: &[u8]) -> u8 {
  let first_line_end = bytes
    .iter()
    .position(|byte| *byte == b'\n')
    .unwrap_or(bytes.len());
  let first_line = &bytes[..first_line_end];
  if first_line.contains(&b'\t') && !first_line.contains(&b',') {
    b'\t'
  } else {
    b','
  }
}

/// Shared header/row assembly over an already-textualized grid. The first
/// non-blank row is the header row; fully blank rows are skipped silently
/// (they are not test cases and never become anomalies).
fn rows_from_grid(grid: Vec<Vec<Option<String>>>) -> Vec<RawRow> {
  let mut grid_rows = grid.into_iter().enumerate();
  let headers = loop {
    match grid_rows.next() {
      Some((_, cells)) if cells.iter().all(Option::is_none) => continue,
      Some((_, cells)) => {
        break cells
          .iter()
          .enumerate()
          .map(|(col_index, cell)| match cell {
            Some(text) => canonical_column_name(text),
            None => format!("column_{}", col_index + 1),
          })
          .collect::<Vec<_>>();
      }
      None => return Vec::new(),
    }
  };

  let mut rows = Vec::new();
  for (grid_index, cells) in grid_rows {
    if cells.iter().all(Option::is_none) {
      continue;
    }
    let mut mapped: BTreeMap<String, Option<String>> = BTreeMap::new();
    for (col_index, cell) in cells.into_iter().enumerate() {
      let Some(name) = headers.get(col_index) else {
        // Merged-cell bleed can push text past the last header; there is no
        // column to attach it to, so it stays unaddressable.
        continue;
      };
      match mapped.get(name) {
        Some(Some(_)) => {}
        _ => {
          mapped.insert(name.clone(), cell);
        }
      }
    }
    rows.push(RawRow {
      row_index: grid_index + 1,
      cells: mapped,
    });
  }
  rows
}

/// Normalizes a header cell and resolves known synonyms to the canonical
/// TestCase field names downstream stages expect. Unrecognized headers keep
/// their normalized text so the Field Mapper can report them.
pub fn canonical_column_name(header: &str) -> String {
  let normalized = normalize_header(header);
  match normalized.as_str() {
    "id" | "test case id" | "testcase id" | "tc id" | "case id" | "test id" => "id".to_string(),
    "title" | "test case title" | "test case name" | "test title" | "name" | "summary" => {
      "title".to_string()
    }
    "steps" | "test steps" | "step" | "action" | "actions" | "procedure"
    | "test procedure" => "steps".to_string(),
    "expected result" | "expected results" | "expected" | "expected outcome"
    | "expected behavior" | "expected behaviour" => "expected_result".to_string(),
    "preconditions" | "precondition" | "pre conditions" | "prerequisites"
    | "pre requisites" | "setup" => "preconditions".to_string(),
    "priority" | "importance" => "priority".to_string(),
    "created by" | "author" | "owner" | "designed by" | "tester" => "created_by".to_string(),
    "created date" | "date created" | "creation date" | "created on" => {
      "created_date".to_string()
    }
    _ => normalized,
  }
}

fn normalize_header(header: &str) -> String {
  header
    .trim()
    .trim_end_matches(':')
    .to_lowercase()
    .replace(['_', '-'], " ")
    .split_whitespace()
    .collect::<Vec<_>>()
    .join(" ")
}

fn cell_text(value: &Data) -> Option<String> {
  let text = match value {
    Data::Empty | Data::Error(_) => return None,
    Data::String(v) => v.trim().to_string(),
    Data::Float(v) => {
      // Ids like "1001" come back from calamine as floats; render them
      // without a trailing ".0".
      if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", *v as i64)
      } else {
        v.to_string()
      }
    }
    Data::Int(v) => v.to_string(),
    Data::Bool(v) => v.to_string(),
    Data::DateTime(v) => v.to_string(),
    Data::DateTimeIso(v) => v.to_string(),
    Data::DurationIso(v) => v.to_string(),
  };
  if text.is_empty() {
    None
  } else {
    Some(text)
  }
}

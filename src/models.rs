use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

pub const DEFAULT_CREATED_BY: &str = "unknown";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TestCase {
  pub id: String,
  pub title: String,
  pub steps: Vec<String>,
  pub expected_result: String,
  pub preconditions: String,
  pub metadata: CaseMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CaseMetadata {
  pub priority: Priority,
  pub created_by: String,
  pub created_date: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Priority {
  High,
  Medium,
  Low,
}

impl Priority {
  pub fn parse(value: &str) -> Option<Self> {
    match value.trim().to_ascii_lowercase().as_str() {
      "high" => Some(Priority::High),
      "medium" => Some(Priority::Medium),
      "low" => Some(Priority::Low),
      _ => None,
    }
  }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
  Warning,
  Error,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceReference {
  pub row_index: usize,
  pub source_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnomalyLogEntry {
  pub source_reference: SourceReference,
  pub severity: Severity,
  pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConversionSummary {
  pub total_rows_seen: usize,
  pub accepted_count: usize,
  pub error_count: usize,
  pub warning_count: usize,
  pub success_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConversionOutput {
  pub test_cases: Vec<TestCase>,
  pub error_log: Vec<AnomalyLogEntry>,
  pub summary: ConversionSummary,
}

/// One row as extracted from the attachment, keyed by normalized column name.
/// `row_index` is the 1-based row number in the source document.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
  pub row_index: usize,
  pub cells: BTreeMap<String, Option<String>>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SourceFormat {
  Xlsx,
  Csv,
  Auto,
}

impl SourceFormat {
  pub fn parse(value: &str) -> Option<Self> {
    match value.trim().to_ascii_lowercase().as_str() {
      "xlsx" | "xls" | "ods" | "workbook" => Some(SourceFormat::Xlsx),
      "csv" | "tsv" => Some(SourceFormat::Csv),
      "auto" => Some(SourceFormat::Auto),
      _ => None,
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertJsonRequest {
  pub file_base64: String,
  pub file_name: Option<String>,
  pub format: Option<SourceFormat>,
  pub run_date: Option<NaiveDate>,
  pub include_document_base64: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionRunInfo {
  pub id: Uuid,
  pub converted_at: DateTime<Utc>,
  pub source_format: SourceFormat,
  pub attachment_sha256: String,
  pub file_name: Option<String>,
  pub extra_sheets: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertResponse {
  pub run: ConversionRunInfo,
  #[serde(flatten)]
  pub output: ConversionOutput,
  /// Canonical serialized output document, present when the caller asked for
  /// `include_document_base64`; byte-identical across re-runs of the same
  /// attachment with the same run date.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub document_base64: Option<String>,
}

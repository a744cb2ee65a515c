use crate::{
  emit::to_json_bytes,
  error::ApiError,
  models::{
    ConversionRunInfo, ConvertJsonRequest, ConvertResponse, SourceFormat,
  },
  pipeline::ConversionRun,
};
use axum::{
  extract::Multipart,
  routing::{get, post},
  Json, Router,
};
use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine as _};
use chrono::{NaiveDate, Utc};
use serde_json::json;
use sha2::{Digest, Sha256};
use uuid::Uuid;

pub fn create_router() -> Router {
  Router::new()
    .route("/health", get(health))
    .route("/v1/schema", get(get_schema))
    .route("/v1/conversions", post(convert_attachment))
    .route("/v1/conversions/run-json", post(convert_attachment_json))
}

async fn health() -> Json<serde_json::Value> {
  Json(json!({
    "status": "ok",
    "service": "testcase-core-rs"
  }))
}

async fn convert_attachment(
  mut multipart: Multipart,
) -> Result<Json<ConvertResponse>, ApiError> {
  let mut maybe_file_name: Option<String> = None;
  let mut maybe_bytes: Option<Vec<u8>> = None;
  let mut format_raw: Option<String> = None;
  let mut run_date_raw: Option<String> = None;
  let mut include_document_base64_raw: Option<String> = None;

  while let Some(field) = multipart.next_field().await.map_err(ApiError::internal)? {
    let name = field.name().unwrap_or_default().to_string();
    match name.as_str() {
      "file" => {
        let file_name = field.file_name().map(|value| value.to_string());
        let bytes = field.bytes().await.map_err(ApiError::internal)?;
        maybe_file_name = file_name;
        maybe_bytes = Some(bytes.to_vec());
      }
      "format" => {
        format_raw = Some(field.text().await.map_err(ApiError::internal)?);
      }
      "run_date" => {
        run_date_raw = Some(field.text().await.map_err(ApiError::internal)?);
      }
      "include_document_base64" => {
        include_document_base64_raw =
          Some(field.text().await.map_err(ApiError::internal)?);
      }
      _ => {}
    }
  }

  let bytes = maybe_bytes
    .ok_or_else(|| ApiError::BadRequest("No attachment file was provided.".to_string()))?;
  let format = parse_source_format(format_raw)?.unwrap_or(SourceFormat::Auto);
  let run_date = parse_run_date(run_date_raw)?.unwrap_or_else(|| Utc::now().date_naive());
  let include_document_base64 =
    parse_optional_bool(include_document_base64_raw, "include_document_base64")?
      .unwrap_or(false);

  run_conversion(&bytes, maybe_file_name, format, run_date, include_document_base64)
    .map(Json)
}

async fn convert_attachment_json(
  Json(payload): Json<ConvertJsonRequest>,
) -> Result<Json<ConvertResponse>, ApiError> {
  let bytes = BASE64_STANDARD.decode(payload.file_base64.trim()).map_err(|error| {
    ApiError::BadRequest(format!("Field 'file_base64' is not valid base64: {error}"))
  })?;
  let format = payload.format.unwrap_or(SourceFormat::Auto);
  let run_date = payload.run_date.unwrap_or_else(|| Utc::now().date_naive());
  let include_document_base64 = payload.include_document_base64.unwrap_or(false);

  run_conversion(
    &bytes,
    payload.file_name,
    format,
    run_date,
    include_document_base64,
  )
  .map(Json)
}

fn run_conversion(
  bytes: &[u8],
  file_name: Option<String>,
  format: SourceFormat,
  run_date: NaiveDate,
  include_document_base64: bool,
) -> Result<ConvertResponse, ApiError> {
  let conversion = ConversionRun::new(run_date).convert(bytes, format)?;
  let document_base64 = if include_document_base64 {
    let document = to_json_bytes(&conversion.output).map_err(ApiError::internal)?;
    Some(BASE64_STANDARD.encode(document))
  } else {
    None
  };

  Ok(ConvertResponse {
    run: ConversionRunInfo {
      id: Uuid::new_v4(),
      converted_at: Utc::now(),
      source_format: conversion.resolved_format,
      attachment_sha256: attachment_digest(bytes),
      file_name,
      extra_sheets: conversion.extra_sheets,
    },
    output: conversion.output,
    document_base64,
  })
}

fn parse_optional_bool(
  raw: Option<String>,
  field_name: &str,
) -> Result<Option<bool>, ApiError> {
  let Some(raw) = raw else {
    return Ok(None);
  };
  match raw.trim().to_ascii_lowercase().as_str() {
    "" => Ok(None),
    "true" | "1" => Ok(Some(true)),
    "false" | "0" => Ok(Some(false)),
    other => Err(ApiError::BadRequest(format!(
      "Field '{field_name}' must be a boolean (got '{other}').",
    ))),
  }
}

fn attachment_digest(bytes: &[u8]) -> String {
  let mut hasher = Sha256::new();
  hasher.update(bytes);
  format!("{:x}", hasher.finalize())
}

fn parse_source_format(raw: Option<String>) -> Result<Option<SourceFormat>, ApiError> {
  let Some(raw) = raw else {
    return Ok(None);
  };
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    return Ok(None);
  }
  SourceFormat::parse(trimmed).map(Some).ok_or_else(|| {
    ApiError::BadRequest(format!(
      "Field 'format' must be one of xlsx, csv, auto (got '{trimmed}').",
    ))
  })
}

fn parse_run_date(raw: Option<String>) -> Result<Option<NaiveDate>, ApiError> {
  let Some(raw) = raw else {
    return Ok(None);
  };
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    return Ok(None);
  }
  NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
    .map(Some)
    .map_err(|_| {
      ApiError::BadRequest(format!(
        "Field 'run_date' must be an ISO-8601 date (got '{trimmed}').",
      ))
    })
}

/// Self-describing output schema for downstream consumers; they should never
/// need to re-parse the original attachment.
async fn get_schema() -> Json<serde_json::Value> {
  Json(json!({
    "service": "testcase-core-rs",
    "output": {
      "test_cases": [{
        "id": "string, unique within a run",
        "title": "string, non-empty",
        "steps": ["string, ordered execution steps"],
        "expected_result": "string, non-empty",
        "preconditions": "string, may be empty",
        "metadata": {
          "priority": "High | Medium | Low (default Medium)",
          "created_by": "string (default 'unknown')",
          "created_date": "ISO-8601 date (default run date)"
        }
      }],
      "error_log": [{
        "source_reference": { "row_index": "int, 1-based", "source_id": "string | null" },
        "severity": "warning | error",
        "reason": "string"
      }],
      "summary": {
        "total_rows_seen": "int",
        "accepted_count": "int",
        "error_count": "int",
        "warning_count": "int",
        "success_rate": "float, accepted_count / total_rows_seen (0 when empty)"
      }
    }
  }))
}

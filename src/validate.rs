use crate::{
  anomaly::AnomalyLog,
  mapper::MappedRow,
  models::{CaseMetadata, Priority, SourceReference, TestCase, DEFAULT_CREATED_BY},
};
use chrono::NaiveDate;
use std::collections::HashSet;

/// Applies the row acceptance rules in order: required fields, duplicate id,
/// optional-field defaulting, metadata coercion. Errors exclude the row and
/// return `None`; warnings keep it usable with documented defaults.
pub fn validate_row(
  mapped: MappedRow,
  seen_ids: &mut HashSet<String>,
  run_date: NaiveDate,
  log: &mut AnomalyLog,
) -> Option<TestCase> {
  let reference = SourceReference {
    row_index: mapped.row_index,
    source_id: mapped.id.clone(),
  };

  let mut missing = Vec::new();
  if mapped.id.is_none() {
    missing.push("id");
  }
  if mapped.title.is_none() {
    missing.push("title");
  }
  if mapped.steps.is_empty() {
    missing.push("steps");
  }
  if mapped.expected_result.is_none() {
    missing.push("expected_result");
  }
  if !missing.is_empty() {
    log.error(
      reference,
      format!("missing required field(s): {}", missing.join(", ")),
    );
    return None;
  }

  // The checks above guarantee these slots are populated.
  let id = mapped.id.clone()?;
  let title = mapped.title?;
  let expected_result = mapped.expected_result?;

  if !seen_ids.insert(id.clone()) {
    log.error(reference, format!("duplicate id '{id}' (first occurrence wins)"));
    return None;
  }

  for column in &mapped.unmapped {
    log.warning(reference.clone(), format!("unmapped column '{column}' ignored"));
  }

  let preconditions = match mapped.preconditions {
    Some(value) => value,
    None => {
      log.warning(
        reference.clone(),
        "missing preconditions; defaulted to empty string",
      );
      String::new()
    }
  };

  let priority = match mapped.priority {
    Some(value) => match Priority::parse(&value) {
      Some(priority) => priority,
      None => {
        log.warning(
          reference.clone(),
          format!("unrecognized priority '{value}'; defaulted to Medium"),
        );
        Priority::Medium
      }
    },
    None => {
      log.warning(reference.clone(), "missing priority; defaulted to Medium");
      Priority::Medium
    }
  };

  let created_by = match mapped.created_by {
    Some(value) => value,
    None => {
      log.warning(
        reference.clone(),
        format!("missing created_by; defaulted to '{DEFAULT_CREATED_BY}'"),
      );
      DEFAULT_CREATED_BY.to_string()
    }
  };

  let created_date = match mapped.created_date {
    Some(value) => match NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d") {
      Ok(date) => date.to_string(),
      Err(_) => {
        log.warning(
          reference.clone(),
          format!("unparseable created_date '{value}'; defaulted to run date"),
        );
        run_date.to_string()
      }
    },
    None => {
      log.warning(reference, "missing created_date; defaulted to run date");
      run_date.to_string()
    }
  };

  Some(TestCase {
    id,
    title,
    steps: mapped.steps,
    expected_result,
    preconditions,
    metadata: CaseMetadata {
      priority,
      created_by,
      created_date,
    },
  })
}

use crate::models::RawRow;
use regex::Regex;

const CANONICAL_COLUMNS: [&str; 8] = [
  "id",
  "title",
  "steps",
  "expected_result",
  "preconditions",
  "priority",
  "created_by",
  "created_date",
];

/// One raw row slotted into the canonical TestCase fields. Slots stay `None`
/// when the source had no usable value; `unmapped` lists populated columns
/// that matched no canonical field.
#[derive(Debug, Clone, PartialEq)]
pub struct MappedRow {
  pub row_index: usize,
  pub id: Option<String>,
  pub title: Option<String>,
  pub steps: Vec<String>,
  pub expected_result: Option<String>,
  pub preconditions: Option<String>,
  pub priority: Option<String>,
  pub created_by: Option<String>,
  pub created_date: Option<String>,
  pub unmapped: Vec<String>,
}

pub fn map_row(raw: &RawRow) -> MappedRow {
  let slot = |name: &str| -> Option<String> {
    raw
      .cells
      .get(name)
      .and_then(|value| value.clone())
      .filter(|value| !value.trim().is_empty())
  };

  let unmapped = raw
    .cells
    .iter()
    .filter(|(name, value)| {
      value.is_some() && !CANONICAL_COLUMNS.contains(&name.as_str())
    })
    .map(|(name, _)| name.clone())
    .collect();

  MappedRow {
    row_index: raw.row_index,
    id: slot("id"),
    title: slot("title"),
    steps: slot("steps").map(|cell| split_steps(&cell)).unwrap_or_default(),
    expected_result: slot("expected_result"),
    preconditions: slot("preconditions"),
    priority: slot("priority"),
    created_by: slot("created_by"),
    created_date: slot("created_date"),
    unmapped,
  }
}

/// Splits a free-text steps cell into an ordered step list. Recognizes
/// leading numbering ("1.", "2)"), bullet markers, and plain newlines; when
/// nothing matches the whole cell becomes a single step. Splitting is
/// best-effort and never fails.
pub fn split_steps(cell: &str) -> Vec<String> {
  let trimmed = cell.trim();
  if trimmed.is_empty() {
    return Vec::new();
  }

  let lines: Vec<&str> = trimmed
    .lines()
    .map(str::trim)
    .filter(|line| !line.is_empty())
    .collect();
  if lines.len() > 1 {
    let steps: Vec<String> = lines
      .iter()
      .map(|line| strip_step_marker(line))
      .filter(|step| !step.is_empty())
      .collect();
    if !steps.is_empty() {
      return steps;
    }
    return vec![trimmed.to_string()];
  }

  if let Ok(re) = Regex::new(r"\s*\d{1,3}\s*[.)]\s+") {
    let steps: Vec<String> = re
      .split(trimmed)
      .map(str::trim)
      .filter(|step| !step.is_empty())
      .map(ToString::to_string)
      .collect();
    if steps.len() > 1 {
      return steps;
    }
  }

  let single = strip_step_marker(trimmed);
  if single.is_empty() {
    vec![trimmed.to_string()]
  } else {
    vec![single]
  }
}

fn strip_step_marker(line: &str) -> String {
  let stripped = Regex::new(r"^\s*(?:\d{1,3}\s*[.):-]|[-*•])\s*")
    .ok()
    .map(|re| re.replace(line, "").to_string())
    .unwrap_or_else(|| line.to_string());
  stripped.trim().to_string()
}

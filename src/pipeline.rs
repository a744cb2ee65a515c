use crate::{
  anomaly::AnomalyLog,
  emit::emit,
  error::FormatError,
  extract::extract_rows,
  mapper::map_row,
  models::{ConversionOutput, SourceFormat},
  validate::validate_row,
};
use chrono::NaiveDate;
use std::collections::HashSet;

/// The full conversion document plus extractor-level context the HTTP layer
/// reports alongside it.
#[derive(Debug)]
pub struct Conversion {
  pub output: ConversionOutput,
  pub resolved_format: SourceFormat,
  pub extra_sheets: Vec<String>,
}

/// One conversion run over one attachment. Owns the duplicate-id set and the
/// anomaly log, so independent runs share no state. Consumed by `convert`;
/// a rejected row stays rejected for the run and a fixed source document
/// means a fresh run.
#[derive(Debug)]
pub struct ConversionRun {
  run_date: NaiveDate,
  seen_ids: HashSet<String>,
  log: AnomalyLog,
}

impl ConversionRun {
  pub fn new(run_date: NaiveDate) -> Self {
    Self {
      run_date,
      seen_ids: HashSet::new(),
      log: AnomalyLog::new(),
    }
  }

  pub fn convert(
    mut self,
    bytes: &[u8],
    format: SourceFormat,
  ) -> Result<Conversion, FormatError> {
    let extraction = extract_rows(bytes, format)?;
    let total_rows_seen = extraction.rows.len();

    let mut test_cases = Vec::new();
    for raw in &extraction.rows {
      let mapped = map_row(raw);
      if let Some(case) =
        validate_row(mapped, &mut self.seen_ids, self.run_date, &mut self.log)
      {
        test_cases.push(case);
      }
    }

    tracing::info!(
      total_rows_seen,
      accepted = test_cases.len(),
      anomalies = self.log.entries().len(),
      "conversion run complete"
    );

    Ok(Conversion {
      output: emit(test_cases, self.log, total_rows_seen),
      resolved_format: extraction.resolved_format,
      extra_sheets: extraction.extra_sheets,
    })
  }
}

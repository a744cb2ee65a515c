use crate::{
  anomaly::AnomalyLog,
  models::{ConversionOutput, ConversionSummary, TestCase},
};

/// Assembles the final output document. Pure: the same accepted list and log
/// always produce the same document, so re-emission is byte-identical.
pub fn emit(
  test_cases: Vec<TestCase>,
  log: AnomalyLog,
  total_rows_seen: usize,
) -> ConversionOutput {
  let accepted_count = test_cases.len();
  let error_count = log.error_count();
  let warning_count = log.warning_count();
  let success_rate = if total_rows_seen == 0 {
    0.0
  } else {
    accepted_count as f64 / total_rows_seen as f64
  };

  ConversionOutput {
    test_cases,
    error_log: log.into_entries(),
    summary: ConversionSummary {
      total_rows_seen,
      accepted_count,
      error_count,
      warning_count,
      success_rate,
    },
  }
}

pub fn to_json_bytes(output: &ConversionOutput) -> serde_json::Result<Vec<u8>> {
  serde_json::to_vec_pretty(output)
}

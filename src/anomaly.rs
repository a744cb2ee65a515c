use crate::models::{AnomalyLogEntry, Severity, SourceReference};

/// Append-only anomaly accumulator for one conversion run. Entries are never
/// removed or mutated after being appended; counts are derived on demand.
#[derive(Debug, Default)]
pub struct AnomalyLog {
  entries: Vec<AnomalyLogEntry>,
}

impl AnomalyLog {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn warning(&mut self, source_reference: SourceReference, reason: impl Into<String>) {
    self.entries.push(AnomalyLogEntry {
      source_reference,
      severity: Severity::Warning,
      reason: reason.into(),
    });
  }

  pub fn error(&mut self, source_reference: SourceReference, reason: impl Into<String>) {
    self.entries.push(AnomalyLogEntry {
      source_reference,
      severity: Severity::Error,
      reason: reason.into(),
    });
  }

  pub fn entries(&self) -> &[AnomalyLogEntry] {
    &self.entries
  }

  pub fn error_count(&self) -> usize {
    self
      .entries
      .iter()
      .filter(|entry| entry.severity == Severity::Error)
      .count()
  }

  pub fn warning_count(&self) -> usize {
    self
      .entries
      .iter()
      .filter(|entry| entry.severity == Severity::Warning)
      .count()
  }

  pub fn into_entries(self) -> Vec<AnomalyLogEntry> {
    self.entries
  }
}

#[cfg(test)]
mod tests {
  use super::AnomalyLog;
  use crate::models::{Severity, SourceReference};

  fn reference(row_index: usize) -> SourceReference {
    SourceReference {
      row_index,
      source_id: None,
    }
  }

  #[test]
  fn should_keep_entries_in_append_order() {
    let mut log = AnomalyLog::new();
    log.warning(reference(2), "missing preconditions");
    log.error(reference(3), "missing required field(s): title");
    log.warning(reference(4), "unrecognized priority");

    let entries = log.entries();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].source_reference.row_index, 2);
    assert_eq!(entries[1].severity, Severity::Error);
    assert_eq!(entries[2].source_reference.row_index, 4);
  }

  #[test]
  fn should_derive_counts_by_severity() {
    let mut log = AnomalyLog::new();
    log.warning(reference(2), "a");
    log.warning(reference(2), "b");
    log.error(reference(3), "c");

    assert_eq!(log.warning_count(), 2);
    assert_eq!(log.error_count(), 1);
  }
}

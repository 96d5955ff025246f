use std::collections::HashMap;
use std::sync::mpsc;

use super::filter::{average_by_supplier, filter_records, EmployeeFilter};
use super::types::{Evaluation, EvaluationError, EvaluationRecord, ValidationError};
use crate::scoring::WeightConfig;

/// Change notification sent to subscribers after a successful mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    Appended { index: usize },
    Cleared { removed: usize },
}

/// Append-only evaluation table for one session.
///
/// Records keep insertion order and duplicates are allowed: re-evaluating a
/// supplier is a valid new entry. Mutation requires `&mut self`, so a host
/// sharing the store across threads must wrap it in a `Mutex`.
#[derive(Debug, Default)]
pub struct EvaluationStore {
    records: Vec<EvaluationRecord>,
    subscribers: Vec<mpsc::Sender<StoreEvent>>,
}

impl EvaluationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Receive a [`StoreEvent`] for every subsequent append or clear
    pub fn subscribe(&mut self) -> mpsc::Receiver<StoreEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    /// Append a scored record. Rejected records leave the store untouched.
    pub fn append(&mut self, record: EvaluationRecord) -> Result<(), ValidationError> {
        record.evaluation().validate()?;
        self.records.push(record);
        let index = self.records.len() - 1;
        tracing::debug!(index, "evaluation appended");
        self.notify(StoreEvent::Appended { index });
        Ok(())
    }

    /// Validate, score and append a submission in one step.
    ///
    /// Field problems surface as validation errors before any scoring is done.
    pub fn submit(
        &mut self,
        evaluation: Evaluation,
        weights: &WeightConfig,
    ) -> Result<&EvaluationRecord, EvaluationError> {
        evaluation.validate()?;
        let record = EvaluationRecord::from_evaluation(evaluation, weights)?;
        self.append(record)?;
        Ok(&self.records[self.records.len() - 1])
    }

    pub fn all(&self) -> &[EvaluationRecord] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&EvaluationRecord> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records for one employee, or every record for the `"ALL"` sentinel
    pub fn filter_by_employee(&self, name: &str) -> Vec<&EvaluationRecord> {
        self.filter(&EmployeeFilter::parse(name))
    }

    pub fn filter(&self, filter: &EmployeeFilter) -> Vec<&EvaluationRecord> {
        filter_records(&self.records, filter)
    }

    /// Distinct employee names in first-seen order
    pub fn employees(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for record in &self.records {
            if !names.contains(&record.employee()) {
                names.push(record.employee());
            }
        }
        names
    }

    /// Remove every record. Calling it on an empty store is a no-op.
    pub fn clear(&mut self) {
        let removed = self.records.len();
        self.records.clear();
        tracing::debug!(removed, "evaluation store cleared");
        self.notify(StoreEvent::Cleared { removed });
    }

    /// Mean final score per distinct supplier. Order is unspecified.
    pub fn aggregate_by_supplier(&self) -> HashMap<String, f64> {
        average_by_supplier(&self.records)
    }

    fn notify(&mut self, event: StoreEvent) {
        // Drop subscribers whose receiver is gone
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

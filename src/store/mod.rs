pub mod filter;
pub mod session;
pub mod types;

pub use filter::{average_by_supplier, filter_records, EmployeeFilter, ALL_EMPLOYEES};
pub use session::{EvaluationStore, StoreEvent};
pub use types::{Evaluation, EvaluationError, EvaluationRecord, ValidationError};

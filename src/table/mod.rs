mod loader;
mod types;

pub use loader::{load_reference, load_submission, SubmissionFormat};
pub use types::{Cell, PatientKey, ReferenceTable, Table};

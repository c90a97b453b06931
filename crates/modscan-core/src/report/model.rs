use serde::{Deserialize, Serialize};

use crate::ledger::model::Module;

/// Everything a report is rendered from.
///
/// This is also the JSON contract and the template context: `executable`,
/// `size` and `modules`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Path of the inspected executable as given by the caller.
    pub executable: String,
    /// File size in bytes.
    pub size: u64,
    /// Top-level records in ledger order, after the replace policy.
    pub modules: Vec<Module>,
}

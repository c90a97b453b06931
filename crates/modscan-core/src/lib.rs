pub mod error;
pub mod exe;
pub mod ledger;
pub mod report;

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::InspectError;
use crate::exe::read::read_build_info;
use crate::ledger::parse::parse_ledger;
use crate::ledger::replace::{ReplacePolicy, apply_replace_policy};
use crate::report::model::Report;

/// Knobs for a single inspection run.
#[derive(Debug, Clone, Copy, Default)]
pub struct InspectOptions {
    pub replace_policy: ReplacePolicy,
}

/// Inspect an executable and build the report of the modules linked into it.
///
/// Pipeline: read embedded build info, reject an empty ledger, parse it,
/// apply the replace policy, then stat the file for its size. Any failure
/// aborts the run.
pub fn inspect(path: &Path, options: &InspectOptions) -> Result<Report, InspectError> {
    let info = read_build_info(path).map_err(|source| InspectError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    if info.module_info.is_empty() {
        return Err(InspectError::NoModuleInfo {
            path: path.to_path_buf(),
        });
    }

    let mut modules = parse_ledger(&info.module_info)?;
    apply_replace_policy(&mut modules, options.replace_policy);

    let size = fs::metadata(path)
        .map_err(|source| InspectError::Stat {
            path: path.to_path_buf(),
            source,
        })?
        .len();

    debug!(
        executable = %path.display(),
        toolchain = %info.toolchain_version,
        modules = modules.len(),
        size,
        "inspection complete"
    );

    Ok(Report {
        executable: path.display().to_string(),
        size,
        modules,
    })
}

//! Build-info ledger parsing.
//!
//! The ledger is the tab-delimited text a toolchain embeds in an executable:
//!
//! ```text
//! path    example.com/cmd/tool
//! mod     example.com/cmd/tool    (devel)
//! dep     github.com/foo/bar      v1.2.3  h1:AAA=
//! =>      github.com/foo/bar2     v0.0.0-x        h1:BBB=
//! ```
//!
//! Only `dep` and `=>` lines produce records; a `=>` line overrides the
//! dependency directly above it.

use tracing::{debug, trace};

use crate::error::LedgerError;
use crate::ledger::model::Module;

const DEP_MARKER: &str = "dep";
const REPLACE_MARKER: &str = "=>";

/// Parse a raw ledger into top-level module records in ledger order.
///
/// Fails on the first line with an unexpected field count or on a
/// replacement that has no dependency to attach to. No partial result is
/// returned.
pub fn parse_ledger(raw: &str) -> Result<Vec<Module>, LedgerError> {
    let mut modules: Vec<Module> = Vec::new();
    let mut last: Option<usize> = None;

    for line in raw.trim().split('\n') {
        let fields: Vec<&str> = line.split('\t').collect();

        let marker = fields[0];
        if marker != DEP_MARKER && marker != REPLACE_MARKER {
            trace!(line, "skipping non-dependency ledger line");
            continue;
        }

        let module = parse_fields(&fields, line)?;

        if marker == REPLACE_MARKER {
            let parent = last
                .and_then(|idx| modules.get_mut(idx))
                .ok_or_else(|| LedgerError::OrphanReplacement {
                    line: line.to_string(),
                })?;
            parent.replacement = Some(Box::new(module));
        } else {
            modules.push(module);
            last = Some(modules.len() - 1);
        }
    }

    debug!(count = modules.len(), "parsed build-info ledger");

    Ok(modules)
}

/// `marker path version [hash]`; the hash column is absent for some
/// module kinds and becomes an empty string.
fn parse_fields(fields: &[&str], line: &str) -> Result<Module, LedgerError> {
    match fields {
        [_, path, version] => Ok(Module::new(*path, *version, "")),
        [_, path, version, hash] => Ok(Module::new(*path, *version, *hash)),
        _ => Err(LedgerError::UnexpectedFormat {
            line: line.to_string(),
        }),
    }
}

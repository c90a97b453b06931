//! Replacement policy.
//!
//! A parsed record may carry the override that the build applied to it.
//! Reports either show the effective module in place of the original
//! (`Overwrite`) or keep the override nested under the original (`Nest`).

use crate::ledger::model::Module;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReplacePolicy {
    /// The replacement's path, version and hash overwrite the original.
    #[default]
    Overwrite,
    /// The replacement stays attached as a nested record.
    Nest,
}

impl From<bool> for ReplacePolicy {
    fn from(overwrite: bool) -> Self {
        if overwrite {
            ReplacePolicy::Overwrite
        } else {
            ReplacePolicy::Nest
        }
    }
}

/// Apply `policy` to every top-level record in place.
///
/// Records without a replacement are left unchanged under either policy.
pub fn apply_replace_policy(modules: &mut [Module], policy: ReplacePolicy) {
    if policy == ReplacePolicy::Nest {
        return;
    }

    for module in modules.iter_mut() {
        if let Some(replacement) = module.replacement.take() {
            let Module {
                path,
                version,
                hash,
                ..
            } = *replacement;
            module.path = path;
            module.version = version;
            module.hash = hash;
        }
    }
}

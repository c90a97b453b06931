use std::fmt;

use serde::{Deserialize, Serialize};

/// One dependency entry recorded in an executable's build-info ledger.
///
/// Fields may be empty depending on what the toolchain embedded: a
/// replacement commonly has no `path` (same path, different version),
/// and some module kinds carry no `hash`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    /// Import path, such as "github.com/fatih/color".
    pub path: String,
    /// Version tag, possibly a pseudo-version. Opaque to this crate.
    pub version: String,
    /// Algorithm-prefixed content digest, such as "h1:...".
    pub hash: String,
    /// Override recorded by a `=>` line directly after this dependency.
    #[serde(
        rename = "replace",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub replacement: Option<Box<Module>>,
}

impl Module {
    pub fn new(
        path: impl Into<String>,
        version: impl Into<String>,
        hash: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            version: version.into(),
            hash: hash.into(),
            replacement: None,
        }
    }

    pub fn with_replacement(mut self, replacement: Module) -> Self {
        self.replacement = Some(Box::new(replacement));
        self
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.path, self.version)
    }
}

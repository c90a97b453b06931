use std::path::PathBuf;

use thiserror::Error;

/// Failure to turn the raw build-info ledger into module records.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("unexpected raw dependency format: {line}")]
    UnexpectedFormat { line: String },

    #[error("replacement without a preceding dependency: {line}")]
    OrphanReplacement { line: String },
}

/// Failure to extract the raw build-info blob from an executable.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("not a recognized executable format: {0}")]
    UnsupportedFormat(String),

    #[error("not a Go executable: no build information found")]
    NotFound,

    #[error("malformed build information: {0}")]
    Malformed(String),
}

/// Failure while producing the rendered report.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to open output template {}", path.display())]
    TemplateLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse the output template")]
    TemplateSyntax(#[source] minijinja::Error),

    #[error("failed to execute template")]
    TemplateExecute(#[source] minijinja::Error),

    #[error("failed to output module info as JSON")]
    Json(#[from] serde_json::Error),

    #[error("failed to write output")]
    Io(#[from] std::io::Error),
}

/// Any failure of the inspection pipeline before rendering.
#[derive(Debug, Error)]
pub enum InspectError {
    #[error("error reading {:?}", path.display().to_string())]
    Read {
        path: PathBuf,
        #[source]
        source: ReadError,
    },

    #[error(
        "{} has no dependency information: it was either compiled without Go modules or has no dependencies",
        path.display()
    )]
    NoModuleInfo { path: PathBuf },

    #[error("error parsing dependencies")]
    Ledger(#[from] LedgerError),

    #[error("error stating file {}", path.display())]
    Stat {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

//! Report rendering: plain `path version` lines, JSON, or a user template.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use minijinja::Environment;

use crate::error::RenderError;
use crate::report::model::Report;

/// Output mode, chosen once before rendering.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RenderMode {
    #[default]
    Plain,
    Json,
    /// Template text, already loaded when it came from a file.
    Template(String),
}

impl RenderMode {
    /// Resolve the output flags into a single mode.
    ///
    /// A non-empty `template_file` is read and its contents replace the
    /// inline `template` entirely. The resulting template text wins when it
    /// is non-empty; otherwise JSON when `json` is set, else plain lines.
    pub fn select(
        json: bool,
        template: Option<String>,
        template_file: Option<PathBuf>,
    ) -> Result<Self, RenderError> {
        let text = match template_file.filter(|p| !p.as_os_str().is_empty()) {
            Some(path) => load_template(path)?,
            None => template.unwrap_or_default(),
        };

        let mode = if !text.is_empty() {
            RenderMode::Template(text)
        } else if json {
            RenderMode::Json
        } else {
            RenderMode::Plain
        };
        Ok(mode)
    }
}

/// Render `report` to `out` according to `mode`.
pub fn render<W: Write>(mode: &RenderMode, report: &Report, mut out: W) -> Result<(), RenderError> {
    match mode {
        RenderMode::Plain => out.write_all(render_text(report).as_bytes())?,
        RenderMode::Json => {
            let json = serde_json::to_string(report)?;
            writeln!(out, "{json}")?;
        }
        RenderMode::Template(text) => render_template(text, report, &mut out)?,
    }
    out.flush()?;
    Ok(())
}

/// One `path version` line per top-level record.
pub fn render_text(report: &Report) -> String {
    let mut out = String::new();
    for m in &report.modules {
        out.push_str(&format!("{} {}\n", m.path, m.version));
    }
    out
}

fn load_template(path: PathBuf) -> Result<String, RenderError> {
    fs::read_to_string(&path).map_err(|source| RenderError::TemplateLoad { path, source })
}

/// Compile `template` and execute it against `report`, writing to `out`.
///
/// Looking up an attribute of an undefined value fails the render; an
/// undefined value on its own prints as nothing.
pub fn render_template<W: Write>(template: &str, report: &Report, out: W) -> Result<(), RenderError> {
    let mut env = Environment::new();
    env.set_keep_trailing_newline(true);

    let tmpl = env
        .template_from_str(template)
        .map_err(RenderError::TemplateSyntax)?;
    tmpl.render_to_write(report, out)
        .map_err(RenderError::TemplateExecute)?;
    Ok(())
}

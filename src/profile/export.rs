//! Reading the template, merging and writing the finished profile

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::synth::{self, SynthesisError};
use super::template::{self, TemplateDocument, TemplateShapeError, LISTENER_PATH};
use crate::capture::LogStore;
use crate::http::MessageCodec;
use crate::selection::SelectionState;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to read template {path}: {source}")]
    ReadTemplate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Template {path} is not valid JSON: {source}")]
    ParseTemplate {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Synthesis(#[from] SynthesisError),
    #[error("{source} in {path}")]
    Shape {
        path: PathBuf,
        #[source]
        source: TemplateShapeError,
    },
    #[error("Failed to serialize profile: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("Failed to write profile {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// What an export wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub output: PathBuf,
    /// Listener keys that were replaced
    pub fields: Vec<String>,
    pub bytes_written: usize,
}

/// Load a template document from disk.
pub fn read_template(path: &Path) -> Result<TemplateDocument, ExportError> {
    let bytes = fs::read(path).map_err(|source| ExportError::ReadTemplate {
        path: path.to_path_buf(),
        source,
    })?;
    TemplateDocument::from_slice(&bytes).map_err(|source| ExportError::ParseTemplate {
        path: path.to_path_buf(),
        source,
    })
}

/// Synthesize the selection, merge it into the template at `template_path`
/// and write the result to `output_path`.
///
/// The output file is only opened once the whole document has been built, so
/// any failure leaves an existing file at `output_path` untouched.
pub fn export_profile(
    store: &LogStore,
    selection: &SelectionState,
    codec: &impl MessageCodec,
    template_path: &Path,
    output_path: &Path,
) -> Result<ExportSummary, ExportError> {
    let document = read_template(template_path)?;
    let profile = synth::build(selection, store, codec)?;
    let fields: Vec<String> = profile.overlay().keys().cloned().collect();

    let merged = template::merge(document, &LISTENER_PATH, &profile).map_err(|source| {
        ExportError::Shape {
            path: template_path.to_path_buf(),
            source,
        }
    })?;
    let bytes = merged.to_pretty_bytes().map_err(ExportError::Serialize)?;

    fs::write(output_path, &bytes).map_err(|source| ExportError::Write {
        path: output_path.to_path_buf(),
        source,
    })?;

    tracing::info!(
        template = %template_path.display(),
        output = %output_path.display(),
        fields = ?fields,
        "Wrote profile"
    );

    Ok(ExportSummary {
        output: output_path.to_path_buf(),
        fields,
        bytes_written: bytes.len(),
    })
}

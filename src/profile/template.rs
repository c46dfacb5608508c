//! Listener template documents and the overlay merge
//!
//! Templates are kept as an untyped [`serde_json::Value`] tree so keys the
//! profile builder does not know about round-trip unchanged (and, with
//! `preserve_order`, in their original order). Only the object at
//! [`LISTENER_PATH`] is ever written to.

use serde_json::{Map, Value};
use thiserror::Error;

use super::synth::SynthesizedProfile;

/// Location of the listener object that receives synthesized fields.
pub const LISTENER_PATH: [&str; 2] = ["listeners", "templateListener"];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateShapeError {
    #[error("Template does not contain a '{segment}' object (expected at '{path}')")]
    Missing { segment: String, path: String },
    #[error("Template '{path}' is not an object")]
    NotObject { segment: String, path: String },
}

impl TemplateShapeError {
    /// The path segment that could not be resolved.
    pub fn segment(&self) -> &str {
        match self {
            TemplateShapeError::Missing { segment, .. }
            | TemplateShapeError::NotObject { segment, .. } => segment,
        }
    }
}

fn not_object(path: &[&str]) -> TemplateShapeError {
    match path.last() {
        Some(segment) => TemplateShapeError::NotObject {
            segment: segment.to_string(),
            path: path.join("."),
        },
        None => TemplateShapeError::NotObject {
            segment: "$".to_string(),
            path: "$".to_string(),
        },
    }
}

/// A template document of arbitrary shape.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateDocument {
    root: Value,
}

impl TemplateDocument {
    pub fn new(root: Value) -> Self {
        Self { root }
    }

    pub fn from_slice(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes).map(Self::new)
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    pub fn into_value(self) -> Value {
        self.root
    }

    /// Follow `path` through nested objects.
    pub fn get(&self, path: &[&str]) -> Option<&Value> {
        path.iter()
            .try_fold(&self.root, |node, segment| node.as_object()?.get(*segment))
    }

    /// The object at `path`, failing if a segment is absent or not an object.
    pub fn object_at_mut(
        &mut self,
        path: &[&str],
    ) -> Result<&mut Map<String, Value>, TemplateShapeError> {
        let mut node = &mut self.root;

        for (depth, segment) in path.iter().enumerate() {
            let parent = &path[..depth];
            node = node
                .as_object_mut()
                .ok_or_else(|| not_object(parent))?
                .get_mut(*segment)
                .ok_or_else(|| TemplateShapeError::Missing {
                    segment: segment.to_string(),
                    path: path[..=depth].join("."),
                })?;
        }

        node.as_object_mut().ok_or_else(|| not_object(path))
    }

    /// Replace the keys of the object at `path` with `fields`, leaving every
    /// other key in the document as it was.
    pub fn apply(
        &mut self,
        path: &[&str],
        fields: &Map<String, Value>,
    ) -> Result<(), TemplateShapeError> {
        let target = self.object_at_mut(path)?;
        for (key, value) in fields {
            target.insert(key.clone(), value.clone());
        }
        Ok(())
    }

    /// Pretty-printed JSON with 2-space indentation.
    pub fn to_pretty_bytes(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec_pretty(&self.root)
    }
}

/// Merge the populated fields of `profile` into the object at `path`.
///
/// Absent fields keep whatever the template had. On a shape error the
/// template is dropped and nothing is returned.
pub fn merge(
    mut template: TemplateDocument,
    path: &[&str],
    profile: &SynthesizedProfile,
) -> Result<TemplateDocument, TemplateShapeError> {
    let overlay = profile.overlay();
    template.apply(path, &overlay)?;
    tracing::debug!(
        path = %path.join("."),
        keys = ?overlay.keys().collect::<Vec<_>>(),
        "Merged profile into template"
    );
    Ok(template)
}

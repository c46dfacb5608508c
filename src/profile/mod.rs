//! Profile synthesis and template merging

pub mod export;
pub mod synth;
pub mod template;

pub use export::{export_profile, read_template, ExportError, ExportSummary};
pub use synth::{build, Role, SynthesisError, SynthesizedProfile};
pub use template::{merge, TemplateDocument, TemplateShapeError, LISTENER_PATH};

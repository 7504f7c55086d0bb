//! Artifact templates: the per-kind registry and the code synthesizer.

pub mod embedded;
pub mod registry;
pub mod synthesizer;

pub use registry::{ArtifactKind, TemplateRegistry};
pub use synthesizer::{synthesize_model, synthesize_route, synthesize_sdk_fn};

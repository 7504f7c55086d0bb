//! Data-model stub generation: one guarded `<identify>-model.js` per record.

use std::path::Path;

use tracing::{info, warn};

use crate::core::error::Result;
use crate::core::spec::{self, ModelSpec};
use crate::core::templates::{TemplateRegistry, synthesize_model};
use crate::core::writer::{self, WriteOutcome};
use crate::generators::{GenerationSummary, ensure_abs_dir};

/// Target filename of a data-model stub
pub fn model_stub_filename(model: &ModelSpec) -> String {
    format!("{}-model.js", model.identify)
}

/// Generate model stubs for every selected record in the spec directory
pub async fn generate_models(spec_dir: &Path, only: &[String]) -> Result<GenerationSummary> {
    ensure_abs_dir(spec_dir, "spec directory")?;
    info!(path = %spec_dir.display(), "generating model stubs");

    let manifest = spec::load_manifest(spec_dir).await?;
    let models = spec::validated_models(&manifest, only);
    let registry = TemplateRegistry::new()?;

    let mut summary = GenerationSummary::default();
    for model in &models {
        let target = spec_dir.join(model_stub_filename(model));
        let outcome = match synthesize_model(&registry, model) {
            Ok(content) => writer::write_guarded(&target, &content).await,
            Err(e) => Err(e),
        };
        match outcome {
            Ok(WriteOutcome::Written) => {
                info!(record = %model.identify, path = %target.display(), "wrote model stub");
                summary.written += 1;
            }
            Ok(WriteOutcome::SkippedSentinel) => {
                info!(record = %model.identify, "sentinel present, stub preserved");
                summary.skipped += 1;
            }
            Err(e) => {
                warn!(record = %model.identify, error = %e, "model stub generation failed");
                summary.failed += 1;
            }
        }
    }

    info!(
        written = summary.written,
        skipped = summary.skipped,
        failed = summary.failed,
        "model stub generation finished"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_generates_model_stub() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(spec::SPEC_MANIFEST),
            r#"
models:
  - identify: user
    connection: default
    shardKey: id
    attributes:
      id:
        type: integer
        primaryKey: true
      firstName: string
"#,
        )
        .unwrap();

        let summary = generate_models(dir.path(), &[]).await.unwrap();
        assert_eq!(summary.written, 1);

        let stub = std::fs::read_to_string(dir.path().join("user-model.js")).unwrap();
        assert!(stub.contains("class UserModel extends OrmModel {"));
        assert!(stub.contains("this.identifyKey = 'id';"));
        assert!(!stub.contains("shardKey"));
    }

    #[tokio::test]
    async fn test_sentinel_preserves_model_stub() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(spec::SPEC_MANIFEST),
            r#"
models:
  - identify: user
    connection: default
    shardKey: id
    attributes:
      id: integer
"#,
        )
        .unwrap();
        let target = dir.path().join("user-model.js");
        let edited = "/* noCompile */\nmodule.exports = {};\n";
        std::fs::write(&target, edited).unwrap();

        let summary = generate_models(dir.path(), &[]).await.unwrap();
        assert_eq!(summary.skipped, 1);
        assert_eq!(std::fs::read_to_string(&target).unwrap(), edited);
    }
}

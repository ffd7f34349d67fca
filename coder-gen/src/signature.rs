//! Signature manifest export.

use std::{fs, io, path::Path, sync::Arc};

use codergen_ir::{Module, ModuleSignature};
use serde::{Deserialize, Serialize};

/// Current manifest format version.
pub const MANIFEST_VERSION: u32 = 1;

/// Structural signatures of every module in a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureManifest {
    pub version: u32,
    pub modules: Vec<ModuleSignature>,
}

impl SignatureManifest {
    /// Manifest for `modules`, sorted by module name.
    pub fn from_modules(modules: &[Arc<Module>]) -> Self {
        let mut modules: Vec<ModuleSignature> =
            modules.iter().map(|m| ModuleSignature::from(m.as_ref())).collect();
        modules.sort_by(|a, b| a.module.cmp(&b.module));
        Self {
            version: MANIFEST_VERSION,
            modules,
        }
    }

    /// Pretty JSON with a trailing newline.
    pub fn to_json(&self) -> serde_json::Result<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }
}

/// Write the signature manifest for `modules` to `path`.
pub fn export_signatures(path: &Path, modules: &[Arc<Module>]) -> io::Result<()> {
    let json = SignatureManifest::from_modules(modules).to_json()?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, json)?;
    tracing::info!(path = %path.display(), modules = modules.len(), "wrote signatures");
    Ok(())
}

#[cfg(test)]
mod tests {
    use codergen_ir::{FieldType, StructDecl};
    use tempfile::TempDir;

    use super::*;

    fn modules() -> Vec<Arc<Module>> {
        vec![
            Arc::new(
                Module::builder("shapes", "shapes.rs")
                    .add_struct(StructDecl::new("Point").field("x", FieldType::I32))
                    .finish(),
            ),
            Arc::new(
                Module::builder("net", "net.rs")
                    .add_struct(StructDecl::new("Packet").field("body", FieldType::Bytes))
                    .finish(),
            ),
        ]
    }

    #[test]
    fn test_manifest_is_sorted_and_versioned() {
        let manifest = SignatureManifest::from_modules(&modules());
        assert_eq!(manifest.version, MANIFEST_VERSION);
        let names: Vec<_> = manifest.modules.iter().map(|m| m.module.as_str()).collect();
        assert_eq!(names, vec!["net", "shapes"]);
    }

    #[test]
    fn test_export_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out/signatures.json");

        export_signatures(&path, &modules()).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.ends_with("}\n"));
        let manifest: SignatureManifest = serde_json::from_str(&text).unwrap();
        assert_eq!(manifest, SignatureManifest::from_modules(&modules()));
    }

    #[test]
    fn test_export_into_missing_file_location_fails() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("blocker"), "").unwrap();

        let err = export_signatures(&dir.path().join("blocker/signatures.json"), &modules());
        assert!(err.is_err());
    }
}

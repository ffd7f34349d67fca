//! Structural signatures of scanned modules.

use serde::{Deserialize, Serialize};

use crate::{Module, StructDecl};

/// Exposed shape of one module: its structs and their field shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleSignature {
    pub module: String,
    pub structs: Vec<StructSignature>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructSignature {
    pub name: String,
    pub fields: Vec<FieldSignature>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSignature {
    pub name: String,
    pub shape: String,
}

impl From<&StructDecl> for StructSignature {
    fn from(decl: &StructDecl) -> Self {
        Self {
            name: decl.name.clone(),
            fields: decl
                .fields
                .iter()
                .map(|f| FieldSignature {
                    name: f.name.clone(),
                    shape: f.ty.shape(),
                })
                .collect(),
        }
    }
}

impl From<&Module> for ModuleSignature {
    fn from(module: &Module) -> Self {
        Self {
            module: module.name().to_string(),
            structs: module.structs().iter().map(StructSignature::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FieldType;

    #[test]
    fn test_signature_from_module() {
        let module = Module::builder("net::packet", "net/packet.rs")
            .add_struct(
                StructDecl::new("Packet")
                    .field("id", FieldType::U64)
                    .field("payload", FieldType::Bytes)
                    .field("tags", FieldType::List(Box::new(FieldType::String))),
            )
            .finish();

        let sig = ModuleSignature::from(&module);
        assert_eq!(sig.module, "net::packet");
        assert_eq!(sig.structs.len(), 1);
        let shapes: Vec<_> = sig.structs[0].fields.iter().map(|f| f.shape.as_str()).collect();
        assert_eq!(shapes, vec!["u64", "bytes", "[]string"]);
    }
}

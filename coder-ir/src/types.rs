//! Struct and field declarations.

use std::fmt;

/// A declared data structure that coders are generated for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructDecl {
    /// Struct name as written in the source.
    pub name: String,
    /// Doc comment lines, without the `///` prefix.
    pub docs: Vec<String>,
    /// Named fields in declaration order.
    pub fields: Vec<FieldDecl>,
}

impl StructDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            docs: Vec::new(),
            fields: Vec::new(),
        }
    }

    /// Add a field (builder style, mostly used by tests).
    pub fn field(mut self, name: impl Into<String>, ty: FieldType) -> Self {
        self.fields.push(FieldDecl {
            name: name.into(),
            ty,
            docs: Vec::new(),
        });
        self
    }

    /// Add a doc line.
    pub fn doc(mut self, line: impl Into<String>) -> Self {
        self.docs.push(line.into());
        self
    }
}

/// A named field of a [`StructDecl`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    pub name: String,
    pub ty: FieldType,
    pub docs: Vec<String>,
}

/// Field shape, reduced to what the wire format can express.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    String,
    /// `Vec<u8>`, encoded as a length-prefixed blob rather than a list.
    Bytes,
    List(Box<FieldType>),
    Option(Box<FieldType>),
    /// Another declared struct, referenced by name.
    Named(String),
    /// A shape no back-end can encode; carries the source text of the type.
    ///
    /// The scanner keeps these instead of failing so the error is reported
    /// per generation task.
    Unsupported(String),
}

impl FieldType {
    /// Stable textual shape used in signatures (e.g. `u32`, `[]string`, `?Point`).
    pub fn shape(&self) -> String {
        match self {
            FieldType::List(inner) => format!("[]{}", inner.shape()),
            FieldType::Option(inner) => format!("?{}", inner.shape()),
            FieldType::Named(name) => name.clone(),
            FieldType::Unsupported(text) => format!("!{}", text),
            primitive => primitive.primitive_name().unwrap_or_default().to_string(),
        }
    }

    /// Name of a primitive shape, `None` for composite ones.
    pub fn primitive_name(&self) -> Option<&'static str> {
        let name = match self {
            FieldType::Bool => "bool",
            FieldType::I8 => "i8",
            FieldType::I16 => "i16",
            FieldType::I32 => "i32",
            FieldType::I64 => "i64",
            FieldType::U8 => "u8",
            FieldType::U16 => "u16",
            FieldType::U32 => "u32",
            FieldType::U64 => "u64",
            FieldType::F32 => "f32",
            FieldType::F64 => "f64",
            FieldType::String => "string",
            FieldType::Bytes => "bytes",
            _ => return None,
        };
        Some(name)
    }

    /// Look up a primitive from its Rust spelling (`u32`, `String`, ...).
    pub fn from_rust_primitive(name: &str) -> Option<Self> {
        let ty = match name {
            "bool" => FieldType::Bool,
            "i8" => FieldType::I8,
            "i16" => FieldType::I16,
            "i32" => FieldType::I32,
            "i64" => FieldType::I64,
            "u8" => FieldType::U8,
            "u16" => FieldType::U16,
            "u32" => FieldType::U32,
            "u64" => FieldType::U64,
            "f32" => FieldType::F32,
            "f64" => FieldType::F64,
            "String" => FieldType::String,
            _ => return None,
        };
        Some(ty)
    }

    /// Returns the first unsupported shape nested in this type, if any.
    pub fn find_unsupported(&self) -> Option<&str> {
        match self {
            FieldType::Unsupported(text) => Some(text),
            FieldType::List(inner) | FieldType::Option(inner) => inner.find_unsupported(),
            _ => None,
        }
    }

    /// Returns the struct name this type refers to, looking through containers.
    pub fn named(&self) -> Option<&str> {
        match self {
            FieldType::Named(name) => Some(name),
            FieldType::List(inner) | FieldType::Option(inner) => inner.named(),
            _ => None,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.shape())
    }
}

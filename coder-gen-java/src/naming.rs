//! Java-specific naming conventions.

use codergen_core::{is_identifier, to_camel_case};

/// Words that cannot be used as Java identifiers.
pub const JAVA_KEYWORDS: &[&str] = &[
    "abstract",
    "assert",
    "boolean",
    "break",
    "byte",
    "case",
    "catch",
    "char",
    "class",
    "const",
    "continue",
    "default",
    "do",
    "double",
    "else",
    "enum",
    "extends",
    "false",
    "final",
    "finally",
    "float",
    "for",
    "goto",
    "if",
    "implements",
    "import",
    "instanceof",
    "int",
    "interface",
    "long",
    "native",
    "new",
    "null",
    "package",
    "private",
    "protected",
    "public",
    "return",
    "short",
    "static",
    "strictfp",
    "super",
    "switch",
    "synchronized",
    "this",
    "throw",
    "throws",
    "transient",
    "true",
    "try",
    "void",
    "volatile",
    "while",
];

fn is_keyword(name: &str) -> bool {
    JAVA_KEYWORDS.contains(&name)
}

/// Java field name for a Rust field: camelCase, keywords suffixed with `_`.
pub fn field_name(name: &str) -> String {
    let name = to_camel_case(name.strip_prefix("r#").unwrap_or(name));
    if is_keyword(&name) {
        format!("{}_", name)
    } else {
        name
    }
}

/// Whether `name` is a dotted Java package name (`com.example.shapes`).
pub fn is_package_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .split('.')
            .all(|segment| is_identifier(segment) && !is_keyword(segment))
}

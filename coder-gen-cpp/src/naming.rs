//! C++-specific naming conventions.

use codergen_core::is_identifier;

/// Reserved words that cannot name a field or namespace.
pub const CPP_KEYWORDS: &[&str] = &[
    "alignas", "alignof", "and", "asm", "auto", "bitand", "bitor", "bool", "break", "case",
    "catch", "char", "class", "compl", "concept", "const", "consteval", "constexpr", "continue",
    "decltype", "default", "delete", "do", "double", "else", "enum", "explicit", "export",
    "extern", "false", "float", "for", "friend", "goto", "if", "inline", "int", "long",
    "mutable", "namespace", "new", "noexcept", "not", "nullptr", "operator", "or", "private",
    "protected", "public", "register", "requires", "return", "short", "signed", "sizeof",
    "static", "struct", "switch", "template", "this", "throw", "true", "try", "typedef",
    "typeid", "typename", "union", "unsigned", "using", "virtual", "void", "volatile", "while",
    "xor",
];

fn is_keyword(name: &str) -> bool {
    CPP_KEYWORDS.contains(&name)
}

/// C++ member name for a Rust field; keywords get a trailing `_`.
pub fn field_name(name: &str) -> String {
    let name = name.strip_prefix("r#").unwrap_or(name);
    if is_keyword(name) {
        format!("{}_", name)
    } else {
        name.to_string()
    }
}

/// Whether `name` is a `::`-separated C++ namespace.
pub fn is_namespace(name: &str) -> bool {
    !name.is_empty()
        && name
            .split("::")
            .all(|segment| is_identifier(segment) && !is_keyword(segment))
}

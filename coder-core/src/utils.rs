//! Shared utility functions for code generation.

fn is_word_separator(c: char) -> bool {
    matches!(c, '_' | '-' | ':' | '.' | '/')
}

/// Convert a string to PascalCase (e.g., "hello_world" -> "HelloWorld")
///
/// Module paths work too: "shapes::geometry" -> "ShapesGeometry".
pub fn to_pascal_case(s: &str) -> String {
    s.split(is_word_separator)
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                None => String::new(),
                Some(c) => c.to_uppercase().chain(chars).collect(),
            }
        })
        .collect()
}

/// Convert a string to camelCase (e.g., "hello_world" -> "helloWorld")
pub fn to_camel_case(s: &str) -> String {
    let pascal = to_pascal_case(s);
    let mut chars = pascal.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => c.to_lowercase().chain(chars).collect(),
    }
}

/// Whether `s` is a plain ASCII identifier (`[A-Za-z_][A-Za-z0-9_]*`).
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_pascal_case() {
        assert_eq!(to_pascal_case("hello"), "Hello");
        assert_eq!(to_pascal_case("hello_world"), "HelloWorld");
        assert_eq!(to_pascal_case("foo_bar_baz"), "FooBarBaz");
        assert_eq!(to_pascal_case("hElLo"), "HElLo");
        assert_eq!(to_pascal_case("shapes::geometry"), "ShapesGeometry");
        assert_eq!(to_pascal_case(""), "");
    }

    #[test]
    fn test_to_camel_case() {
        assert_eq!(to_camel_case("display_name"), "displayName");
        assert_eq!(to_camel_case("id"), "id");
        assert_eq!(to_camel_case(""), "");
    }

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("shapes"));
        assert!(is_identifier("_private2"));
        assert!(!is_identifier("2d"));
        assert!(!is_identifier("com.example"));
        assert!(!is_identifier(""));
    }
}

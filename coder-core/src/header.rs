//! Header lines placed at the top of every generated file.

/// Marker on the first line of every generated file.
///
/// The scanner uses it to skip its own output.
pub const GENERATED_MARKER: &str = "Code generated by coder";

/// Header for one generated file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    module: String,
    copyright: Option<String>,
}

impl Header {
    /// Header for a file generated from `module`.
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            copyright: None,
        }
    }

    pub fn with_copyright(mut self, copyright: Option<String>) -> Self {
        self.copyright = copyright;
        self
    }

    /// Header lines without comment syntax.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![format!(
            "{} from {}. DO NOT EDIT.",
            GENERATED_MARKER, self.module
        )];
        if let Some(copyright) = &self.copyright {
            lines.extend(copyright.lines().map(str::to_string));
        }
        lines
    }

    /// Render as line comments with the given prefix (e.g. `//`), followed by a blank line.
    pub fn render(&self, prefix: &str) -> String {
        let mut out = String::new();
        for line in self.lines() {
            out.push_str(prefix);
            if !line.is_empty() {
                out.push(' ');
                out.push_str(&line);
            }
            out.push('\n');
        }
        out.push('\n');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_render() {
        let header = Header::new("shapes::geometry");
        assert_eq!(
            header.render("//"),
            "// Code generated by coder from shapes::geometry. DO NOT EDIT.\n\n"
        );
    }

    #[test]
    fn test_header_with_copyright() {
        let header = Header::new("net").with_copyright(Some("Copyright (C) 2026 Example".into()));
        let rendered = header.render("//");
        assert!(rendered.starts_with("// Code generated by coder from net."));
        assert!(rendered.contains("// Copyright (C) 2026 Example\n"));
    }
}

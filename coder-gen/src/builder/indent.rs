/// One level of indentation in generated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Indent(&'static str);

impl Indent {
    pub const RUST: Self = Self("    ");
    pub const JAVA: Self = Self("    ");
    /// Google C++ style.
    pub const CPP: Self = Self("  ");

    /// Indentation of `width` spaces, capped at eight.
    pub fn spaces(width: usize) -> Self {
        const EIGHT: &str = "        ";
        Self(&EIGHT[..width.min(EIGHT.len())])
    }

    pub fn unit(&self) -> &'static str {
        self.0
    }

    /// Width of one level, in columns.
    pub fn width(&self) -> usize {
        self.0.len()
    }
}

impl Default for Indent {
    fn default() -> Self {
        Self::RUST
    }
}

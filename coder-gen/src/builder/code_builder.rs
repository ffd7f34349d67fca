use super::Indent;

/// Line-oriented writer for generated source.
///
/// Back-ends chain the consuming methods for fixed preambles and switch to
/// the `push_*` methods inside loops:
///
/// ```
/// use codergen_gen::CodeBuilder;
///
/// let mut builder = CodeBuilder::cpp().line("namespace shapes {");
/// for name in ["Point", "Line"] {
///     builder.push_open(&format!("struct {} {{", name)).push_close("};");
/// }
/// let code = builder.line("}  // namespace shapes").build();
///
/// assert!(code.contains("struct Line {\n};\n"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CodeBuilder {
    indent: Indent,
    depth: usize,
    out: String,
}

impl CodeBuilder {
    pub fn new(indent: Indent) -> Self {
        Self {
            indent,
            depth: 0,
            out: String::new(),
        }
    }

    pub fn rust() -> Self {
        Self::new(Indent::RUST)
    }

    pub fn java() -> Self {
        Self::new(Indent::JAVA)
    }

    pub fn cpp() -> Self {
        Self::new(Indent::CPP)
    }

    /// Append `text` as one line at the current depth.
    ///
    /// An empty line is written without indentation.
    pub fn push_line(&mut self, text: &str) -> &mut Self {
        if !text.is_empty() {
            self.pad();
            self.out.push_str(text);
        }
        self.out.push('\n');
        self
    }

    pub fn push_blank(&mut self) -> &mut Self {
        self.push_line("")
    }

    pub fn push_indent(&mut self) -> &mut Self {
        self.depth += 1;
        self
    }

    pub fn push_dedent(&mut self) -> &mut Self {
        self.depth = self.depth.saturating_sub(1);
        self
    }

    /// Append a comment line such as `// text` or ` * text`.
    pub fn push_doc(&mut self, prefix: &str, text: &str) -> &mut Self {
        if text.is_empty() {
            self.push_line(prefix)
        } else {
            self.push_line(&format!("{} {}", prefix, text))
        }
    }

    /// Write `header` and indent what follows.
    pub fn push_open(&mut self, header: &str) -> &mut Self {
        self.push_line(header).push_indent()
    }

    /// Dedent and write `close`.
    pub fn push_close(&mut self, close: &str) -> &mut Self {
        self.push_dedent().push_line(close)
    }

    pub fn line(mut self, text: &str) -> Self {
        self.push_line(text);
        self
    }

    pub fn blank(mut self) -> Self {
        self.push_blank();
        self
    }

    /// Append `text` verbatim, without indentation or a trailing newline.
    pub fn raw(mut self, text: &str) -> Self {
        self.out.push_str(text);
        self
    }

    pub fn indent(mut self) -> Self {
        self.push_indent();
        self
    }

    /// Apply `f` only when `condition` holds.
    pub fn when<F>(self, condition: bool, f: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        if condition { f(self) } else { self }
    }

    pub fn build(self) -> String {
        self.out
    }

    fn pad(&mut self) {
        for _ in 0..self.depth {
            self.out.push_str(self.indent.unit());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_close_nesting() {
        let mut builder = CodeBuilder::rust();
        builder
            .push_open("impl Encode for Point {")
            .push_open("fn encode(&self, e: &mut Encoder) {")
            .push_line("e.put_i32(self.x);")
            .push_close("}")
            .push_close("}");

        assert_eq!(
            builder.build(),
            "impl Encode for Point {\n    fn encode(&self, e: &mut Encoder) {\n        e.put_i32(self.x);\n    }\n}\n"
        );
    }

    #[test]
    fn test_blank_lines_carry_no_indent() {
        let code = CodeBuilder::cpp()
            .indent()
            .line("int32_t x;")
            .blank()
            .line("int32_t y;")
            .build();
        assert_eq!(code, "  int32_t x;\n\n  int32_t y;\n");
    }

    #[test]
    fn test_doc_lines() {
        let mut builder = CodeBuilder::java().indent();
        builder
            .push_line("/**")
            .push_doc(" *", "Keep-alive probe.")
            .push_doc(" *", "")
            .push_line(" */");
        assert_eq!(
            builder.build(),
            "    /**\n     * Keep-alive probe.\n     *\n     */\n"
        );
    }

    #[test]
    fn test_raw_and_when() {
        let code = CodeBuilder::java()
            .raw("// header\n\n")
            .when(false, |b| b.line("import java.util.List;"))
            .when(true, |b| b.line("import java.io.DataInput;"))
            .build();
        assert_eq!(code, "// header\n\nimport java.io.DataInput;\n");
    }

    #[test]
    fn test_dedent_stops_at_zero() {
        let mut builder = CodeBuilder::cpp();
        builder.push_dedent().push_close("}");
        assert_eq!(builder.build(), "}\n");
    }
}

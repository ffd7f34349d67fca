use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Result type for scanner operations (boxed to reduce size on stack)
pub type Result<T> = std::result::Result<T, Box<Error>>;

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("failed to read '{path}'")]
    #[diagnostic(code(coder::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no such file or directory '{path}'")]
    #[diagnostic(
        code(coder::not_found),
        help("pass a file, a directory, or 'dir/...' to scan recursively")
    )]
    NotFound { path: PathBuf },

    #[error("failed to parse '{path}'")]
    #[diagnostic(code(coder::parse_error))]
    Parse {
        path: PathBuf,
        #[source_code]
        src: NamedSource<String>,
        #[label("{message}")]
        span: Option<SourceSpan>,
        message: String,
    },

    #[error("invalid directive '{text}' in '{path}'")]
    #[diagnostic(
        code(coder::invalid_directive),
        help("directives look like '//! coder: java.package = com.example' or '//! coder: cpp'")
    )]
    InvalidDirective { path: PathBuf, text: String },

    #[error("tuple struct '{name}' in '{path}' cannot derive Codec")]
    #[diagnostic(code(coder::tuple_struct), help("give the fields of '{name}' names"))]
    TupleStruct { path: PathBuf, name: String },

    #[error("module '{name}' is declared by both '{first}' and '{second}'")]
    #[diagnostic(code(coder::duplicate_module))]
    DuplicateModule {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },
}

impl Error {
    /// Create a parse error from a syn error, pointing at its location in `src`.
    pub(crate) fn parse(path: impl Into<PathBuf>, src: &str, err: syn::Error) -> Box<Self> {
        let path = path.into();
        let start = err.span().start();
        let span =
            offset_of(src, start.line, start.column).map(|offset| SourceSpan::from((offset, 1)));
        Box::new(Error::Parse {
            src: NamedSource::new(path.display().to_string(), src.to_string()),
            path,
            span,
            message: err.to_string(),
        })
    }
}

/// Byte offset of a 1-based line and 0-based char column.
fn offset_of(src: &str, line: usize, column: usize) -> Option<usize> {
    if line == 0 {
        return None;
    }
    let mut offset = 0;
    for (i, text) in src.split_inclusive('\n').enumerate() {
        if i + 1 == line {
            let within = text
                .char_indices()
                .nth(column)
                .map(|(idx, _)| idx)
                .unwrap_or(text.len());
            return Some(offset + within);
        }
        offset += text.len();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_of() {
        let src = "ab\ncde\nf";
        assert_eq!(offset_of(src, 1, 0), Some(0));
        assert_eq!(offset_of(src, 2, 1), Some(4));
        assert_eq!(offset_of(src, 3, 0), Some(7));
        assert_eq!(offset_of(src, 9, 0), None);
    }

    #[test]
    fn test_parse_error_has_span() {
        let src = "struct {";
        let err = syn::parse_file(src).unwrap_err();
        let err = Error::parse("broken.rs", src, err);
        match *err {
            Error::Parse { span, .. } => assert!(span.is_some()),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}

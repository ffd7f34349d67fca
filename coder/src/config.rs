//! `coder.toml` loading.
//!
//! Every key is optional. Command-line flags override the file.

use std::{
    io,
    path::{Path, PathBuf},
    str::FromStr,
};

use miette::{Diagnostic, NamedSource, SourceSpan};
use serde::Deserialize;
use thiserror::Error;

/// Configuration file looked up when `--config` is not given.
pub const DEFAULT_CONFIG: &str = "coder.toml";

/// Result type for configuration loading (boxed to reduce size on stack)
pub type Result<T> = std::result::Result<T, Box<ConfigError>>;

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read '{path}'")]
    #[diagnostic(code(coder::config_io))]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {filename}")]
    #[diagnostic(code(coder::config_parse))]
    Parse {
        filename: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("parse error here")]
        span: Option<SourceSpan>,
        #[source]
        source: toml::de::Error,
    },

    #[error("'generate.workers' must be at least 1")]
    #[diagnostic(
        code(coder::config_workers),
        help("remove the key to use the default worker count")
    )]
    ZeroWorkers,
}

/// Parsed `coder.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub generate: GenerateSection,
    #[serde(default)]
    pub java: OutputSection,
    #[serde(default)]
    pub cpp: OutputSection,
}

/// `[generate]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerateSection {
    /// Generate native Rust coders (default `true`).
    pub rust: Option<bool>,
    /// Root for Rust output; next to each source file when unset.
    pub rust_out: Option<PathBuf>,
    pub workers: Option<usize>,
    /// Signature manifest written after a clean run.
    pub signatures: Option<PathBuf>,
    pub copyright: Option<String>,
}

/// `[java]` and `[cpp]` sections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSection {
    /// Output root; the back-end is disabled when unset.
    pub out: Option<PathBuf>,
}

impl FromStr for Config {
    type Err = Box<ConfigError>;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_str_with_filename(s, DEFAULT_CONFIG)
    }
}

impl Config {
    /// Load `path`.
    ///
    /// A missing file yields the defaults unless `required` is set.
    pub fn open(path: &Path, required: bool) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound && !required => {
                tracing::debug!(path = %path.display(), "no configuration file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(Box::new(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                }));
            }
        };
        Self::from_str_with_filename(&content, &path.display().to_string())
    }

    /// Parse with a custom filename for error reporting.
    pub fn from_str_with_filename(content: &str, filename: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|source| {
            Box::new(ConfigError::Parse {
                filename: filename.to_string(),
                src: NamedSource::new(filename, content.to_string()),
                span: source.span().map(SourceSpan::from),
                source,
            })
        })?;
        if config.generate.workers == Some(0) {
            return Err(Box::new(ConfigError::ZeroWorkers));
        }
        Ok(config)
    }
}

//! Scan operation - source discovery.

use std::sync::Arc;

use codergen_ir::Module;
use codergen_scan::{Result, Scanner};

/// Pattern scanned when none is given.
pub const DEFAULT_PATTERN: &str = "./...";

/// Scan `patterns` relative to the working directory.
pub fn scan(patterns: &[String]) -> Result<Vec<Arc<Module>>> {
    let mut scanner = Scanner::new(".");
    if patterns.is_empty() {
        scanner.scan(DEFAULT_PATTERN)?;
    }
    for pattern in patterns {
        scanner.scan(pattern)?;
    }

    let modules = scanner.process()?;
    tracing::debug!(
        files = scanner.files().count(),
        modules = modules.len(),
        "scan complete"
    );
    Ok(modules.into_iter().map(Arc::new).collect())
}

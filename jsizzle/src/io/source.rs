//! Reading script files for batch runs.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

/// Read a script file as UTF-8 text.
pub fn read_source(path: &Path) -> Result<String> {
    let source =
        fs::read_to_string(path).with_context(|| format!("couldn't open file {}", path.display()))?;
    debug!(path = %path.display(), bytes = source.len(), "read script");
    Ok(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_existing_file() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("hello.js");
        fs::write(&path, "console.log('hi')").expect("write");
        assert_eq!(read_source(&path).expect("read"), "console.log('hi')");
    }

    #[test]
    fn missing_file_names_path() {
        let temp = tempfile::tempdir().expect("tempdir");
        let err = read_source(&temp.path().join("nope.js")).expect_err("missing");
        let rendered = format!("{err:#}");
        assert!(rendered.contains("nope.js"), "got {rendered}");
    }
}

//! Atomic build file writes.
//!
//! The new content goes to a temporary file beside the destination, is
//! synced, then renamed over it. A failed run leaves any previous build file
//! untouched.

use crate::runner::{NinjaContent, RunnerError};
use camino::Utf8Path;
use std::io::{self, Write};
use tempfile::Builder;
use tracing::info;

/// Atomically replace the file at `path` with `content`.
///
/// The parent directory must already exist; it is never created.
///
/// # Errors
///
/// Returns [`RunnerError::UnwritableOutput`] if the temporary file cannot be
/// created, written or synced, or if the final rename fails.
pub fn write_ninja_file(path: &Utf8Path, content: &NinjaContent) -> Result<(), RunnerError> {
    let unwritable = |source: io::Error| RunnerError::UnwritableOutput {
        path: path.to_owned(),
        source,
    };
    let parent = path
        .parent()
        .filter(|p| !p.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));

    let mut tmp = Builder::new()
        .prefix(".build.")
        .suffix(".ninja.tmp")
        .tempfile_in(parent)
        .map_err(unwritable)?;
    {
        let handle = tmp.as_file_mut();
        handle
            .write_all(content.as_str().as_bytes())
            .map_err(unwritable)?;
        handle.flush().map_err(unwritable)?;
        // Temporary files start out private to the owner.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            handle
                .set_permissions(std::fs::Permissions::from_mode(0o644))
                .map_err(unwritable)?;
        }
        handle.sync_all().map_err(unwritable)?;
    }
    tmp.persist(path).map_err(|err| unwritable(err.error))?;
    info!("Wrote Ninja file to {path}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use rstest::rstest;
    use std::fs;
    use tempfile::TempDir;

    fn utf8_dir(dir: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf8 temp dir")
    }

    #[rstest]
    fn writes_new_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = utf8_dir(&dir).join("build.ninja");
        write_ninja_file(&path, &NinjaContent::new("rule a\n".to_owned())).expect("write");
        assert_eq!(fs::read_to_string(&path).expect("read"), "rule a\n");
    }

    #[rstest]
    fn replaces_existing_file_without_leftovers() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = utf8_dir(&dir).join("build.ninja");
        fs::write(&path, "old\n").expect("seed");
        write_ninja_file(&path, &NinjaContent::new("new\n".to_owned())).expect("write");
        assert_eq!(fs::read_to_string(&path).expect("read"), "new\n");
        let entries = fs::read_dir(dir.path()).expect("list").count();
        assert_eq!(entries, 1, "temporary file left behind");
    }

    #[cfg(unix)]
    #[rstest]
    fn output_is_world_readable() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().expect("temp dir");
        let path = utf8_dir(&dir).join("build.ninja");
        write_ninja_file(&path, &NinjaContent::new(String::new())).expect("write");
        let mode = fs::metadata(&path).expect("metadata").permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }

    #[rstest]
    fn missing_parent_is_unwritable() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = utf8_dir(&dir).join("missing").join("build.ninja");
        let err = write_ninja_file(&path, &NinjaContent::new(String::new()))
            .expect_err("missing parent");
        match err {
            RunnerError::UnwritableOutput { path: failed, .. } => assert_eq!(failed, path),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!path.exists());
    }
}

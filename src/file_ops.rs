//! File-level import/export of the database: a raw byte-for-byte copy with
//! no format translation. Callers must run the disconnect protocol first so
//! no worker holds the file while it is replaced or read.

use std::path::Path;

use tracing::info;

use crate::db::sidecar_paths;
use crate::{AppError, AppResult};

/// Copy the database file to a user-chosen destination.
pub fn export_data(db_path: &Path, dest: &Path) -> AppResult<()> {
    let bytes = std::fs::copy(db_path, dest)
        .map_err(|e| AppError::from(e).with_context("path", db_path.display().to_string()))?;
    info!(
        target: "pocketbook",
        event = "data_exported",
        dest = %dest.display(),
        bytes
    );
    Ok(())
}

/// Replace the database file with a user-chosen source file. Stale WAL
/// sidecars from the previous database must not survive the swap.
pub fn import_data(src: &Path, db_path: &Path) -> AppResult<()> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| AppError::from(e).with_context("path", parent.display().to_string()))?;
    }

    for sidecar in sidecar_paths(db_path) {
        match std::fs::remove_file(&sidecar) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(AppError::from(e).with_context("path", sidecar.display().to_string()))
            }
        }
    }

    let bytes = std::fs::copy(src, db_path)
        .map_err(|e| AppError::from(e).with_context("path", src.display().to_string()))?;
    info!(
        target: "pocketbook",
        event = "data_imported",
        src = %src.display(),
        bytes
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_and_import_copy_bytes_exactly() {
        let dir = tempfile::tempdir().expect("tempdir");
        let db_path = dir.path().join("core.db");
        let exported = dir.path().join("backup.db");
        std::fs::write(&db_path, b"not really sqlite").unwrap();

        export_data(&db_path, &exported).unwrap();
        assert_eq!(std::fs::read(&exported).unwrap(), b"not really sqlite");

        std::fs::write(&exported, b"replacement").unwrap();
        import_data(&exported, &db_path).unwrap();
        assert_eq!(std::fs::read(&db_path).unwrap(), b"replacement");
    }

    #[test]
    fn import_clears_stale_sidecars() {
        let dir = tempfile::tempdir().expect("tempdir");
        let db_path = dir.path().join("core.db");
        let src = dir.path().join("incoming.db");
        std::fs::write(&db_path, b"old").unwrap();
        std::fs::write(dir.path().join("core.db-wal"), b"wal").unwrap();
        std::fs::write(dir.path().join("core.db-shm"), b"shm").unwrap();
        std::fs::write(&src, b"new").unwrap();

        import_data(&src, &db_path).unwrap();

        assert_eq!(std::fs::read(&db_path).unwrap(), b"new");
        assert!(!dir.path().join("core.db-wal").exists());
        assert!(!dir.path().join("core.db-shm").exists());
    }
}

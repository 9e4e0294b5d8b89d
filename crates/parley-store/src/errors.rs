//! Store-specific constructors for `ParleyError`

use parley_core::errors::ParleyError;

pub use parley_core::errors::Result;

/// Create a migration error
pub fn migration_error(migration_id: &str, reason: &str) -> ParleyError {
    ParleyError::Persistence {
        message: format!("Migration {} failed: {}", migration_id, reason),
    }
}

/// Create a checksum mismatch error for an already-applied migration
pub fn checksum_mismatch(migration_id: &str, expected: &str, actual: &str) -> ParleyError {
    ParleyError::Persistence {
        message: format!(
            "Checksum mismatch for migration {}: expected {}, got {}",
            migration_id, expected, actual
        ),
    }
}

/// Create a database error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> ParleyError {
    ParleyError::Persistence {
        message: err.to_string(),
    }
}

/// A row that cannot be turned back into a domain value
pub fn corrupt_row(table: &str, id: &str, reason: impl std::fmt::Display) -> ParleyError {
    ParleyError::Persistence {
        message: format!("corrupt {} row {}: {}", table, id, reason),
    }
}

/// Create a storage error from a filesystem failure
pub fn io_error(op: &str, err: std::io::Error) -> ParleyError {
    ParleyError::Storage {
        op: op.to_string(),
        message: err.to_string(),
    }
}

/// An asset path that would escape its disk
pub fn invalid_asset_path(path: &str) -> ParleyError {
    ParleyError::Storage {
        op: "resolve_asset_path".to_string(),
        message: format!("path '{}' escapes its disk", path),
    }
}

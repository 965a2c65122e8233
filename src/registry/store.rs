//! SQLite-backed implementation of the folder registry
//!
//! Folders are rows keyed by their encoded path; cascade delete is a prefix
//! match over stored paths. The prefix predicate compares an exact substring
//! instead of using `LIKE`, so names containing `%` or `_` can never widen
//! a delete. Uniqueness checks and inserts run inside one IMMEDIATE
//! transaction, which is what keeps two concurrent creates from both
//! passing the "not exists" check.

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, Connection, TransactionBehavior};

use crate::core::config;
use crate::core::config::validation::MAX_NAME_LENGTH;
use crate::registry::{migrations, FileKind, FileRef, FolderListing, FolderPath, RegistryError, RegistryStats};

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConnection = PooledConnection<SqliteConnectionManager>;

/// SQL predicate matching a folder path or any of its descendants.
/// Bound once as ?1; wildcard-safe (no LIKE against user-supplied text).
const SUBTREE_FOLDERS: &str = "path = ?1 OR substr(path, 1, length(?1) + 1) = ?1 || '/'";
const SUBTREE_FILES: &str = "folder_path = ?1 OR substr(folder_path, 1, length(?1) + 1) = ?1 || '/'";

/// Create a new database connection pool and run schema migrations
///
/// Every pooled connection gets a busy timeout and WAL journaling, so
/// concurrent mutations queue instead of failing fast.
pub fn create_pool(database_path: &str) -> anyhow::Result<DbPool> {
    let manager = SqliteConnectionManager::file(database_path).with_init(|conn| {
        conn.busy_timeout(config::db::busy_timeout())?;
        conn.query_row("PRAGMA journal_mode=WAL", [], |_| Ok(()))?;
        Ok(())
    });
    let pool = Pool::builder().max_size(config::db::POOL_MAX_SIZE).build(manager)?;

    let mut conn = pool.get()?;
    migrations::run_migrations(&mut conn)?;

    Ok(pool)
}

/// Path-addressed CRUD over the folder/file hierarchy
#[derive(Clone)]
pub struct FolderRegistry {
    pool: DbPool,
}

impl FolderRegistry {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Opens (or creates) the registry database at the given path
    pub fn open(database_path: &str) -> anyhow::Result<Self> {
        Ok(Self::new(create_pool(database_path)?))
    }

    fn conn(&self) -> Result<DbConnection, RegistryError> {
        Ok(self.pool.get()?)
    }

    /// Lists the direct children of a folder, sorted by name
    pub fn list_children(&self, path: &FolderPath) -> Result<FolderListing, RegistryError> {
        let conn = self.conn()?;
        if !folder_exists(&conn, path)? {
            return Err(RegistryError::FolderNotFound(path.to_string()));
        }

        let mut stmt = conn.prepare("SELECT name FROM folders WHERE parent_path = ?1 ORDER BY name")?;
        let subfolders = stmt
            .query_map([path.encode()], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        let mut stmt =
            conn.prepare("SELECT filename, file_id, kind FROM files WHERE folder_path = ?1 ORDER BY filename")?;
        let files = stmt
            .query_map([path.encode()], |row| {
                Ok(FileRef {
                    filename: row.get(0)?,
                    file_id: row.get(1)?,
                    kind: FileKind::from_str_lossy(&row.get::<_, String>(2)?),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(FolderListing { subfolders, files })
    }

    /// Creates an empty folder under `parent`
    ///
    /// The parent-exists check and the insert share one IMMEDIATE
    /// transaction; a sibling collision surfaces as `AlreadyExists` via the
    /// primary-key constraint, never as a double insert.
    pub fn create_folder(&self, parent: &FolderPath, name: &str) -> Result<FolderPath, RegistryError> {
        let child = parent.child(name)?;

        let mut conn = self.conn()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        if !folder_exists(&tx, parent)? {
            return Err(RegistryError::FolderNotFound(parent.to_string()));
        }

        match tx.execute(
            "INSERT INTO folders (path, parent_path, name) VALUES (?1, ?2, ?3)",
            params![child.encode(), parent.encode(), name],
        ) {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => {
                return Err(RegistryError::AlreadyExists(name.to_string()));
            }
            Err(e) => return Err(e.into()),
        }

        tx.commit()?;
        log::info!("Created folder {}", child);
        Ok(child)
    }

    /// Deletes the named folder together with its entire subtree
    ///
    /// Descendant folders and files go in the same transaction: either the
    /// whole subtree is gone or nothing changed.
    pub fn delete_folder(&self, parent: &FolderPath, name: &str) -> Result<(), RegistryError> {
        let target = parent.child(name)?;
        let encoded = target.encode();

        let mut conn = self.conn()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        tx.execute(&format!("DELETE FROM files WHERE {}", SUBTREE_FILES), [&encoded])?;
        let removed = tx.execute(&format!("DELETE FROM folders WHERE {}", SUBTREE_FOLDERS), [&encoded])?;
        if removed == 0 {
            // Dropping the transaction rolls back the file sweep
            return Err(RegistryError::FolderNotFound(target.to_string()));
        }

        tx.commit()?;
        log::info!("Deleted folder {} ({} folder rows)", target, removed);
        Ok(())
    }

    /// Adds a file reference to a folder, overwriting a same-named entry
    ///
    /// Upsert by design: re-uploading under an existing name replaces the
    /// handle (last write wins). Empty or oversized filenames are replaced
    /// by a deterministic fallback derived from the file id, so two unnamed
    /// uploads never collide silently. Returns the filename actually stored.
    pub fn add_file(
        &self,
        folder: &FolderPath,
        filename: &str,
        file_id: &str,
        kind: FileKind,
    ) -> Result<String, RegistryError> {
        let stored_name = normalize_filename(filename, file_id, kind);

        let mut conn = self.conn()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        if !folder_exists(&tx, folder)? {
            return Err(RegistryError::FolderNotFound(folder.to_string()));
        }

        tx.execute(
            "INSERT INTO files (folder_path, filename, file_id, kind) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(folder_path, filename)
             DO UPDATE SET file_id = excluded.file_id, kind = excluded.kind",
            params![folder.encode(), stored_name, file_id, kind.as_str()],
        )?;

        tx.commit()?;
        log::info!("Stored file '{}' in {}", stored_name, folder);
        Ok(stored_name)
    }

    /// Removes one file reference
    ///
    /// Fails with `NotFound` if the file is already gone, so callers can
    /// tell "already gone" from "gone now".
    pub fn delete_file(&self, folder: &FolderPath, filename: &str) -> Result<(), RegistryError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        if !folder_exists(&tx, folder)? {
            return Err(RegistryError::FolderNotFound(folder.to_string()));
        }

        let removed = tx.execute(
            "DELETE FROM files WHERE folder_path = ?1 AND filename = ?2",
            params![folder.encode(), filename],
        )?;
        if removed == 0 {
            return Err(RegistryError::FileNotFound(filename.to_string()));
        }

        tx.commit()?;
        log::info!("Deleted file '{}' from {}", filename, folder);
        Ok(())
    }

    /// Resolves a file reference for sending
    pub fn resolve_file(&self, folder: &FolderPath, filename: &str) -> Result<FileRef, RegistryError> {
        let conn = self.conn()?;
        if !folder_exists(&conn, folder)? {
            return Err(RegistryError::FolderNotFound(folder.to_string()));
        }

        let mut stmt =
            conn.prepare("SELECT filename, file_id, kind FROM files WHERE folder_path = ?1 AND filename = ?2")?;
        let mut rows = stmt.query(params![folder.encode(), filename])?;

        match rows.next()? {
            Some(row) => Ok(FileRef {
                filename: row.get(0)?,
                file_id: row.get(1)?,
                kind: FileKind::from_str_lossy(&row.get::<_, String>(2)?),
            }),
            None => Err(RegistryError::FileNotFound(filename.to_string())),
        }
    }

    /// Aggregate counts across the whole tree (root excluded)
    pub fn stats(&self) -> Result<RegistryStats, RegistryError> {
        let conn = self.conn()?;
        let folders: i64 = conn.query_row("SELECT COUNT(*) FROM folders", [], |row| row.get(0))?;
        let files: i64 = conn.query_row("SELECT COUNT(*) FROM files", [], |row| row.get(0))?;
        Ok(RegistryStats {
            folders: folders as u64,
            files: files as u64,
        })
    }
}

/// Checks that a path resolves to an existing folder.
/// The root exists by definition and is never stored.
fn folder_exists(conn: &Connection, path: &FolderPath) -> Result<bool, rusqlite::Error> {
    if path.is_root() {
        return Ok(true);
    }
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM folders WHERE path = ?1", [path.encode()], |row| {
        row.get(0)
    })?;
    Ok(count > 0)
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(err, rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation)
}

/// Produces the filename actually stored for an upload
///
/// Strips the path delimiter and control characters, truncates to the name
/// bound, and falls back to `{kind}_{id-digest}{ext}` when nothing usable
/// remains. The fallback depends only on the file id and kind, so it is
/// stable across retries of the same upload.
pub fn normalize_filename(raw: &str, file_id: &str, kind: FileKind) -> String {
    let cleaned: String = raw
        .trim()
        .chars()
        .map(|c| if c == '/' || c.is_control() { '_' } else { c })
        .collect();

    if cleaned.is_empty() {
        let digest: String = file_id.chars().filter(|c| c.is_ascii_alphanumeric()).take(10).collect();
        let digest = if digest.is_empty() { "file".to_string() } else { digest };
        return format!("{}_{}{}", kind.as_str(), digest, kind.default_extension());
    }

    if cleaned.chars().count() > MAX_NAME_LENGTH {
        cleaned.chars().take(MAX_NAME_LENGTH).collect()
    } else {
        cleaned
    }
}

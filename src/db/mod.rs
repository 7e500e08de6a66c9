mod schema;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Context;
use rusqlite::functions::FunctionFlags;
use rusqlite::{params_from_iter, Connection, Row};

use crate::error::{PlanetError, Result};
use crate::models::Planet;
use crate::query::{fold_case, Predicate, FOLD_FUNCTION};

/// Persistence contract for planets.
///
/// Reads report absence as `Ok(None)`; only [`PlanetStore::delete_by_id`]
/// treats a missing row as an error.
pub trait PlanetStore: Send + Sync {
    /// Insert a planet and return it with its assigned id.
    fn save(&self, planet: Planet) -> Result<Planet>;

    fn find_by_id(&self, id: i64) -> Result<Option<Planet>>;

    fn find_by_name(&self, name: &str) -> Result<Option<Planet>>;

    /// Every planet matching the predicate, in insertion order.
    fn find_all(&self, predicate: &Predicate) -> Result<Vec<Planet>>;

    fn delete_by_id(&self, id: i64) -> Result<()>;
}

/// SQLite-backed planet store. Clones share one connection.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open(path: PathBuf) -> anyhow::Result<Self> {
        let parent = path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Database path has no parent directory"))?;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
        let conn = Connection::open(&path)
            .with_context(|| format!("Failed to open database at {}", path.display()))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Self::from_connection(conn)
    }

    pub fn open_default() -> anyhow::Result<Self> {
        let dirs = directories::ProjectDirs::from("", "", "planet-api")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        let db_path = dirs.data_dir().join("planets.db");
        Self::open(db_path)
    }

    pub fn open_memory() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> anyhow::Result<Self> {
        register_functions(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn migrate(&self) -> anyhow::Result<()> {
        let conn = self.conn.lock().expect("database lock poisoned");
        schema::run_migrations(&conn)
    }
}

impl PlanetStore for Database {
    fn save(&self, planet: Planet) -> Result<Planet> {
        planet.validate()?;

        let conn = self.conn.lock().expect("database lock poisoned");
        conn.execute(
            "INSERT INTO planets (name, climate, terrain) VALUES (?, ?, ?)",
            (&planet.name, &planet.climate, &planet.terrain),
        )
        .map_err(|e| constraint_error(e, &planet))?;

        Ok(Planet {
            id: Some(conn.last_insert_rowid()),
            ..planet
        })
    }

    fn find_by_id(&self, id: i64) -> Result<Option<Planet>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt =
            conn.prepare("SELECT id, name, climate, terrain FROM planets WHERE id = ?")?;

        let mut rows = stmt.query([id])?;
        match rows.next()? {
            Some(row) => Ok(Some(planet_from_row(row)?)),
            None => Ok(None),
        }
    }

    fn find_by_name(&self, name: &str) -> Result<Option<Planet>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt =
            conn.prepare("SELECT id, name, climate, terrain FROM planets WHERE name = ?")?;

        let mut rows = stmt.query([name])?;
        match rows.next()? {
            Some(row) => Ok(Some(planet_from_row(row)?)),
            None => Ok(None),
        }
    }

    fn find_all(&self, predicate: &Predicate) -> Result<Vec<Planet>> {
        let (clause, params) = predicate.to_sql();
        let sql = if clause.is_empty() {
            "SELECT id, name, climate, terrain FROM planets ORDER BY id".to_string()
        } else {
            format!(
                "SELECT id, name, climate, terrain FROM planets WHERE {} ORDER BY id",
                clause
            )
        };

        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(&sql)?;
        let planets = stmt
            .query_map(params_from_iter(params.iter()), planet_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(planets)
    }

    fn delete_by_id(&self, id: i64) -> Result<()> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let rows = conn.execute("DELETE FROM planets WHERE id = ?", [id])?;
        if rows == 0 {
            return Err(PlanetError::NotFound(id));
        }
        Ok(())
    }
}

/// Install the SQL functions that rendered predicates rely on.
fn register_functions(conn: &Connection) -> anyhow::Result<()> {
    conn.create_scalar_function(
        FOLD_FUNCTION,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let value: String = ctx.get(0)?;
            Ok(fold_case(&value))
        },
    )
    .with_context(|| format!("Failed to register SQL function {}", FOLD_FUNCTION))
}

fn planet_from_row(row: &Row<'_>) -> rusqlite::Result<Planet> {
    Ok(Planet {
        id: Some(row.get(0)?),
        name: row.get(1)?,
        climate: row.get(2)?,
        terrain: row.get(3)?,
    })
}

/// Translate table constraint failures on insert into domain errors.
fn constraint_error(err: rusqlite::Error, planet: &Planet) -> PlanetError {
    if let rusqlite::Error::SqliteFailure(failure, _) = &err {
        match failure.extended_code {
            rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE => {
                return PlanetError::DuplicateName(planet.name.clone());
            }
            rusqlite::ffi::SQLITE_CONSTRAINT_CHECK | rusqlite::ffi::SQLITE_CONSTRAINT_NOTNULL => {
                return PlanetError::Validation(failure.to_string());
            }
            _ => {}
        }
    }
    PlanetError::Database(err)
}

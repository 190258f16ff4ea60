//! SQLite file behind the snapshot slot.
//!
//! # Responsibility
//! - Hand out connections whose `kv_slots` table is ready to use.
//! - Bring older slot files up to the layout this build writes.
//!
//! # Invariants
//! - The slot layout version lives in `PRAGMA user_version`.
//! - A file written by a newer build is refused untouched, never downgraded.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;
pub mod schema;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The slot file was laid out by a newer build.
    SchemaFromNewerBuild { found: u32, known: u32 },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::SchemaFromNewerBuild { found, known } => write!(
                f,
                "slot store at schema v{found} was written by a newer daytask \
                 (this build knows up to v{known})"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::SchemaFromNewerBuild { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

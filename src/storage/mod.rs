//! Storage layer for commitments-cli
//!
//! Commitment data goes through the [`CommitmentStore`] contract, which has a
//! JSON-file, a SQLite and a mirrored implementation. Account data (users,
//! admin credentials, session, activity) always lives in JSON files in the
//! data directory.

pub mod activity;
pub mod file_io;
pub mod local;
pub mod mirrored;
pub mod session;
pub mod sqlite;
pub mod users;

pub use activity::ActivityRepository;
pub use file_io::{read_json, write_json_atomic};
pub use local::JsonStore;
pub use mirrored::MirroredStore;
pub use session::{AdminRepository, SessionRepository};
pub use sqlite::SqliteStore;
pub use users::UserRepository;

use tracing::debug;

use crate::config::{AppPaths, StorageBackend};
use crate::error::CommitmentResult;
use crate::models::{Header, Record, UserId};

/// Persistence contract for one user's commitment data
pub trait CommitmentStore {
    /// Backend name shown in logs and `config`
    fn name(&self) -> &'static str;

    /// The saved header, or the default header for the current year
    fn load_header(&self) -> CommitmentResult<Header>;
    fn save_header(&self, header: &Header) -> CommitmentResult<()>;

    fn load_records(&self) -> CommitmentResult<Vec<Record>>;
    /// Replace every stored record with `records`
    fn save_records(&self, records: &[Record]) -> CommitmentResult<()>;

    /// Remove the header and all records; the prefill preference survives
    fn clear_all(&self) -> CommitmentResult<()>;

    /// Defaults to `true` when never saved
    fn load_prefill_enabled(&self) -> CommitmentResult<bool>;
    fn save_prefill_enabled(&self, enabled: bool) -> CommitmentResult<()>;
}

/// Open the configured backend for `user_id`
pub fn open_store(
    backend: StorageBackend,
    paths: &AppPaths,
    user_id: UserId,
) -> CommitmentResult<Box<dyn CommitmentStore>> {
    debug!(%backend, user = %user_id, "opening commitment store");
    let store: Box<dyn CommitmentStore> = match backend {
        StorageBackend::Local => Box::new(JsonStore::new(paths.user_dir(user_id))),
        StorageBackend::Sqlite => Box::new(SqliteStore::open(&paths.database_file(), user_id)?),
        StorageBackend::Mirrored => Box::new(MirroredStore::new(
            Box::new(JsonStore::new(paths.user_dir(user_id))),
            Box::new(SqliteStore::open(&paths.database_file(), user_id)?),
        )),
    };
    Ok(store)
}

/// Account repositories shared by every command
pub struct Storage {
    paths: AppPaths,
    pub users: UserRepository,
    pub admin: AdminRepository,
    pub session: SessionRepository,
    pub activity: ActivityRepository,
}

impl Storage {
    pub fn new(paths: AppPaths) -> CommitmentResult<Self> {
        paths.ensure_directories()?;

        Ok(Self {
            users: UserRepository::new(paths.users_file()),
            admin: AdminRepository::new(paths.admin_file()),
            session: SessionRepository::new(paths.session_file()),
            activity: ActivityRepository::new(paths.activity_file()),
            paths,
        })
    }

    pub fn paths(&self) -> &AppPaths {
        &self.paths
    }

    pub fn load_all(&self) -> CommitmentResult<()> {
        self.users.load()?;
        self.activity.load()?;
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }
}

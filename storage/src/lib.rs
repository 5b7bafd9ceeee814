//! Storage crate: club persistence on SQLite.
//!
//! ## Modules
//!
//! - [`error`] – Storage error types
//! - [`models`] – Member, Event, registration and message records
//! - [`member_repo`] – MemberRepository (identity resolution, profile, listings)
//! - [`event_repo`] – EventRepository
//! - [`registration_repo`] – RegistrationRepository (capacity-checked registration)
//! - [`message_repo`] – MessageRepository (chat log)
//! - [`stats_repo`] – StatsRepository (dashboard aggregates)
//! - [`sqlite_pool`] – SqlitePoolManager
//! - [`schema`] – table definitions

mod error;
mod event_repo;
mod member_repo;
mod message_repo;
mod models;
mod registration_repo;
mod schema;
mod sqlite_pool;
mod stats_repo;

pub use error::StorageError;
pub use event_repo::EventRepository;
pub use member_repo::{ChatIdentity, MemberRepository};
pub use message_repo::MessageRepository;
pub use models::{
    ClubStats, Event, EventWithCount, Member, MemberEvent, MemberProfile, MemberStatus,
    MemberSummary, MessageRecord, MessageSender, MessageView, NewEvent, NewMember, NewMessage,
    RegistrationOutcome, RegistrationStatus,
};
pub use registration_repo::RegistrationRepository;
pub use schema::init_schema;
pub use sqlite_pool::SqlitePoolManager;
pub use stats_repo::StatsRepository;

/// All repositories over one shared pool. Cloning is cheap; every clone uses the same pool.
#[derive(Clone)]
pub struct Storage {
    pub members: MemberRepository,
    pub events: EventRepository,
    pub registrations: RegistrationRepository,
    pub messages: MessageRepository,
    pub stats: StatsRepository,
    pool_manager: SqlitePoolManager,
}

impl Storage {
    /// Opens the database at `database_url` and creates the schema if needed.
    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let pool_manager = SqlitePoolManager::new(database_url).await?;
        init_schema(pool_manager.pool()).await?;
        Ok(Self::with_pool_manager(pool_manager))
    }

    pub fn with_pool_manager(pool_manager: SqlitePoolManager) -> Self {
        Self {
            members: MemberRepository::new(pool_manager.clone()),
            events: EventRepository::new(pool_manager.clone()),
            registrations: RegistrationRepository::new(pool_manager.clone()),
            messages: MessageRepository::new(pool_manager.clone()),
            stats: StatsRepository::new(pool_manager.clone()),
            pool_manager,
        }
    }

    /// Round-trips `SELECT 1`; used by the health endpoint.
    pub async fn ping(&self) -> Result<(), StorageError> {
        sqlx::query("SELECT 1")
            .execute(self.pool_manager.pool())
            .await?;
        Ok(())
    }
}

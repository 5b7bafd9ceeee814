//! Command dispatcher: parses the text and runs the matching command against storage.
//!
//! Every invocation re-reads state from the store. Business rejections (already registered, full,
//! unknown member) are ordinary replies; only store faults surface as errors.

use crate::command::{self, Command};
use crate::replies;
use async_trait::async_trait;
use chrono::{Local, NaiveDate, Utc};
use club_core::{ClubError, Handler, HandlerResponse, Message, Result};
use storage::{ChatIdentity, RegistrationOutcome, Storage, StorageError};
use tracing::{info, instrument};

/// Number of events shown by `/events`.
pub const UPCOMING_EVENTS_LIMIT: i64 = 5;

fn db_error(e: StorageError) -> ClubError {
    ClubError::Database(e.to_string())
}

/// Replies to recognized commands and stays silent (Continue) for plain text.
#[derive(Clone)]
pub struct CommandHandler {
    storage: Storage,
}

impl CommandHandler {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    /// Runs `command` for the sender of `message` and returns the reply text.
    pub async fn execute(&self, command: Command, message: &Message) -> Result<String> {
        match command {
            Command::Start => self.start(message).await,
            Command::Help => Ok(replies::HELP.to_string()),
            Command::ListEvents => self.list_events().await,
            Command::Register(event_id) => self.register(message, event_id).await,
            Command::MyEvents => self.my_events(message).await,
            Command::Profile => self.profile(message).await,
            Command::MalformedRegister => Ok(replies::MALFORMED_REGISTER.to_string()),
            Command::Unknown => Ok(replies::UNKNOWN_COMMAND.to_string()),
        }
    }

    async fn start(&self, message: &Message) -> Result<String> {
        let display_name = message.user.display_name();
        let identity = ChatIdentity {
            telegram_id: message.user.id,
            display_name: &display_name,
            username: message.user.username.as_deref(),
        };
        let (_, created) = self
            .storage
            .members
            .resolve(&identity, Self::today())
            .await
            .map_err(db_error)?;

        let name = message.user.greeting_name();
        Ok(if created {
            replies::welcome(name)
        } else {
            replies::welcome_back(name)
        })
    }

    async fn list_events(&self) -> Result<String> {
        let events = self
            .storage
            .events
            .list_upcoming(Self::today(), UPCOMING_EVENTS_LIMIT)
            .await
            .map_err(db_error)?;
        Ok(replies::upcoming_events(&events))
    }

    async fn register(&self, message: &Message, event_id: i64) -> Result<String> {
        let Some(member) = self
            .storage
            .members
            .find_by_telegram_id(message.user.id)
            .await
            .map_err(db_error)?
        else {
            return Ok(replies::START_FIRST.to_string());
        };

        let outcome = self
            .storage
            .registrations
            .register(event_id, member.id, Utc::now())
            .await
            .map_err(db_error)?;

        Ok(match outcome {
            RegistrationOutcome::Registered => replies::REGISTERED,
            RegistrationOutcome::AlreadyRegistered => replies::ALREADY_REGISTERED,
            RegistrationOutcome::Full => replies::EVENT_FULL,
            RegistrationOutcome::EventNotFound => replies::EVENT_NOT_FOUND,
        }
        .to_string())
    }

    async fn my_events(&self, message: &Message) -> Result<String> {
        let Some(member) = self
            .storage
            .members
            .find_by_telegram_id(message.user.id)
            .await
            .map_err(db_error)?
        else {
            return Ok(replies::START_FIRST.to_string());
        };

        let events = self
            .storage
            .registrations
            .list_upcoming_for_member(member.id, Self::today())
            .await
            .map_err(db_error)?;
        Ok(replies::my_events(&events))
    }

    async fn profile(&self, message: &Message) -> Result<String> {
        let profile = self
            .storage
            .members
            .profile(message.user.id, Self::today())
            .await
            .map_err(db_error)?;
        Ok(match profile {
            Some(profile) => replies::profile(&profile),
            None => replies::PROFILE_NOT_FOUND.to_string(),
        })
    }
}

#[async_trait]
impl Handler for CommandHandler {
    fn name(&self) -> &'static str {
        "command"
    }

    #[instrument(skip(self, message))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        let Some(command) = command::parse(&message.content) else {
            return Ok(HandlerResponse::Continue);
        };

        info!(
            user_id = message.user.id,
            chat_id = message.chat.id,
            command = ?command,
            "step: CommandHandler dispatching"
        );

        let reply = self.execute(command, message).await?;
        Ok(HandlerResponse::Reply(reply))
    }
}

//! Shared application state handed to every route.

use club_bot::ClubBot;
use club_core::Notifier;
use std::sync::Arc;
use storage::Storage;

#[derive(Clone)]
pub struct AppState {
    pub storage: Storage,
    /// Outbound delivery; `None` when no bot token is configured.
    pub notifier: Option<Arc<dyn Notifier>>,
    /// Present exactly when `notifier` is.
    pub bot: Option<ClubBot>,
}

impl AppState {
    pub fn new(storage: Storage, notifier: Option<Arc<dyn Notifier>>) -> Self {
        let bot = notifier
            .as_ref()
            .map(|notifier| ClubBot::new(&storage, Arc::clone(notifier)));
        Self {
            storage,
            notifier,
            bot,
        }
    }
}

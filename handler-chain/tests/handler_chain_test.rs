//! Integration tests for [`handler_chain::HandlerChain`].
//!
//! Covers: phase ordering across handlers, a `before` stopping the chain, Reply ending the handle
//! phase and reaching earlier handlers' `after`, silent chains ending in Continue, and handler errors.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use club_core::{Chat, ClubError, Handler, HandlerResponse, Message, User};
use handler_chain::HandlerChain;

fn create_test_message(content: &str) -> Message {
    Message {
        id: "1001".to_string(),
        content: content.to_string(),
        user: User {
            id: 42,
            username: Some("anna_p".to_string()),
            first_name: Some("Anna".to_string()),
            last_name: None,
        },
        chat: Chat {
            id: 42,
            chat_type: "private".to_string(),
        },
        created_at: Utc::now(),
    }
}

/// Records every phase it sees into a shared journal.
struct JournalHandler {
    name: &'static str,
    journal: Arc<Mutex<Vec<String>>>,
    reply: Option<&'static str>,
}

impl JournalHandler {
    fn new(name: &'static str, journal: Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            name,
            journal,
            reply: None,
        }
    }

    fn replying(mut self, reply: &'static str) -> Self {
        self.reply = Some(reply);
        self
    }
}

#[async_trait::async_trait]
impl Handler for JournalHandler {
    async fn before(&self, _message: &Message) -> club_core::Result<bool> {
        self.journal.lock().unwrap().push(format!("before:{}", self.name));
        Ok(true)
    }

    async fn handle(&self, _message: &Message) -> club_core::Result<HandlerResponse> {
        self.journal.lock().unwrap().push(format!("handle:{}", self.name));
        Ok(match self.reply {
            Some(text) => HandlerResponse::Reply(text.to_string()),
            None => HandlerResponse::Continue,
        })
    }

    async fn after(&self, _message: &Message, response: &HandlerResponse) -> club_core::Result<()> {
        let tag = response.reply_text().unwrap_or("-");
        self.journal
            .lock()
            .unwrap()
            .push(format!("after:{}:{}", self.name, tag));
        Ok(())
    }
}

/// **Test: phases run before (in order) → handle (until Reply) → after (reverse).**
#[tokio::test]
async fn test_phase_order_with_reply() {
    let journal = Arc::new(Mutex::new(Vec::new()));
    let chain = HandlerChain::new()
        .add_handler(Arc::new(JournalHandler::new("log", journal.clone())))
        .add_handler(Arc::new(
            JournalHandler::new("command", journal.clone()).replying("Привет"),
        ))
        .add_handler(Arc::new(JournalHandler::new("unreached", journal.clone())));

    let result = chain.handle(&create_test_message("/start")).await.unwrap();

    assert_eq!(result, HandlerResponse::Reply("Привет".to_string()));
    assert_eq!(
        *journal.lock().unwrap(),
        vec![
            "before:log",
            "before:command",
            "before:unreached",
            "handle:log",
            "handle:command",
            "after:unreached:Привет",
            "after:command:Привет",
            "after:log:Привет",
        ]
    );
}

/// **Test: no handler claims the message; the chain ends with Continue and after still runs.**
#[tokio::test]
async fn test_silent_chain_returns_continue() {
    let journal = Arc::new(Mutex::new(Vec::new()));
    let chain = HandlerChain::new()
        .add_handler(Arc::new(JournalHandler::new("log", journal.clone())))
        .add_handler(Arc::new(JournalHandler::new("command", journal.clone())));

    let result = chain.handle(&create_test_message("hello")).await.unwrap();

    assert_eq!(result, HandlerResponse::Continue);
    let journal = journal.lock().unwrap();
    assert_eq!(journal.last().map(String::as_str), Some("after:log:-"));
}

/// **Test: a before returning false stops the chain; handle and after are skipped.**
#[tokio::test]
async fn test_before_false_stops_chain() {
    struct Gate;

    #[async_trait::async_trait]
    impl Handler for Gate {
        async fn before(&self, _message: &Message) -> club_core::Result<bool> {
            Ok(false)
        }
    }

    let journal = Arc::new(Mutex::new(Vec::new()));
    let chain = HandlerChain::new()
        .add_handler(Arc::new(Gate))
        .add_handler(Arc::new(JournalHandler::new("command", journal.clone())));

    let result = chain.handle(&create_test_message("/help")).await.unwrap();

    assert_eq!(result, HandlerResponse::Stop);
    assert!(journal.lock().unwrap().is_empty());
}

/// **Test: an error in handle propagates and no after callback runs.**
#[tokio::test]
async fn test_handle_error_propagates() {
    struct Failing;

    #[async_trait::async_trait]
    impl Handler for Failing {
        async fn handle(&self, _message: &Message) -> club_core::Result<HandlerResponse> {
            Err(ClubError::Database("connection reset".to_string()))
        }
    }

    let after_count = Arc::new(AtomicUsize::new(0));

    struct CountAfter(Arc<AtomicUsize>);

    #[async_trait::async_trait]
    impl Handler for CountAfter {
        async fn after(&self, _message: &Message, _response: &HandlerResponse) -> club_core::Result<()> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    let chain = HandlerChain::new()
        .add_handler(Arc::new(CountAfter(after_count.clone())))
        .add_handler(Arc::new(Failing));

    let err = chain.handle(&create_test_message("/events")).await.unwrap_err();

    assert!(matches!(err, ClubError::Database(_)));
    assert_eq!(after_count.load(Ordering::SeqCst), 0);
}

#[test]
fn test_empty_chain() {
    let chain = HandlerChain::new();
    assert!(chain.is_empty());
    assert_eq!(chain.len(), 0);
}

struct UnnamedHandler;

#[async_trait::async_trait]
impl Handler for UnnamedHandler {}

struct NamedHandler;

#[async_trait::async_trait]
impl Handler for NamedHandler {
    fn name(&self) -> &'static str {
        "named"
    }
}

/// **Test: handler names resolve through the trait object to the concrete handler.**
#[test]
fn test_handler_name_through_trait_object() {
    let unnamed: Arc<dyn Handler> = Arc::new(UnnamedHandler);
    let named: Arc<dyn Handler> = Arc::new(NamedHandler);

    assert!(unnamed.name().ends_with("UnnamedHandler"));
    assert_eq!(named.name(), "named");
}

//! Command parser: maps inbound text to a [`Command`].
//!
//! Only the first whitespace-separated token is inspected. A `@botname` suffix is stripped so
//! group-chat forms like `/events@club_bot` resolve the same way as `/events`.

/// A recognized bot command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    ListEvents,
    Register(i64),
    MyEvents,
    Profile,
    /// `/register` without a positive numeric event id.
    MalformedRegister,
    /// Starts with `/` but matches no command.
    Unknown,
}

const REGISTER_PREFIX: &str = "register";

/// Parses `text` into a command. Returns `None` for text that is not a command at all
/// (no leading `/`), which the bot leaves unanswered.
pub fn parse(text: &str) -> Option<Command> {
    let token = text.split_whitespace().next()?;
    let keyword = token.strip_prefix('/')?;
    let keyword = keyword.split('@').next().unwrap_or(keyword);

    let command = match keyword {
        "start" => Command::Start,
        "help" => Command::Help,
        "events" => Command::ListEvents,
        "myevents" => Command::MyEvents,
        "profile" => Command::Profile,
        other => match other.strip_prefix(REGISTER_PREFIX) {
            Some(rest) => parse_register_argument(rest),
            None => Command::Unknown,
        },
    };
    Some(command)
}

fn parse_register_argument(rest: &str) -> Command {
    match rest.strip_prefix('_').map(str::parse::<i64>) {
        Some(Ok(event_id)) if event_id > 0 => Command::Register(event_id),
        _ => Command::MalformedRegister,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keywords() {
        assert_eq!(parse("/start"), Some(Command::Start));
        assert_eq!(parse("/help"), Some(Command::Help));
        assert_eq!(parse("/events"), Some(Command::ListEvents));
        assert_eq!(parse("/myevents"), Some(Command::MyEvents));
        assert_eq!(parse("/profile"), Some(Command::Profile));
    }

    #[test]
    fn test_parse_strips_bot_suffix_and_arguments() {
        assert_eq!(parse("/events@club_bot"), Some(Command::ListEvents));
        assert_eq!(parse("  /start ref_abc"), Some(Command::Start));
        assert_eq!(parse("/register_12@club_bot"), Some(Command::Register(12)));
    }

    #[test]
    fn test_parse_register() {
        assert_eq!(parse("/register_7"), Some(Command::Register(7)));
        assert_eq!(parse("/register_abc"), Some(Command::MalformedRegister));
        assert_eq!(parse("/register_"), Some(Command::MalformedRegister));
        assert_eq!(parse("/register"), Some(Command::MalformedRegister));
        assert_eq!(parse("/register_0"), Some(Command::MalformedRegister));
        assert_eq!(parse("/register_-3"), Some(Command::MalformedRegister));
        assert_eq!(parse("/register_99999999999999999999"), Some(Command::MalformedRegister));
    }

    #[test]
    fn test_parse_unknown_and_plain_text() {
        assert_eq!(parse("/weather"), Some(Command::Unknown));
        assert_eq!(parse("/"), Some(Command::Unknown));
        assert_eq!(parse("hello"), None);
        assert_eq!(parse(""), None);
        assert_eq!(parse("   "), None);
    }
}

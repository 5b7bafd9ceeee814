//! Record types mapped from store rows.

mod event;
mod member;
mod message_record;
mod registration;
mod stats;

pub use event::{Event, EventWithCount, NewEvent};
pub use member::{Member, MemberProfile, MemberStatus, MemberSummary, NewMember};
pub use message_record::{MessageRecord, MessageSender, MessageView, NewMessage};
pub use registration::{MemberEvent, RegistrationOutcome, RegistrationStatus};
pub use stats::ClubStats;

/// Splits a `GROUP_CONCAT` column into a sorted, de-duplicated list.
pub(crate) fn split_formats(raw: Option<String>) -> Vec<String> {
    let mut formats: Vec<String> = raw
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(str::to_string)
        .collect();
    formats.sort();
    formats.dedup();
    formats
}

#[cfg(test)]
mod tests {
    use super::split_formats;

    #[test]
    fn test_split_formats() {
        assert!(split_formats(None).is_empty());
        assert_eq!(
            split_formats(Some("mixed,hot,mixed".to_string())),
            vec!["hot".to_string(), "mixed".to_string()]
        );
    }
}

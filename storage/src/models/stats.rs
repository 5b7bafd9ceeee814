//! Aggregate statistics for the admin dashboard.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClubStats {
    pub total_members: i64,
    pub active_members: i64,
    pub events_this_month: i64,
    /// Rounded percentage of past registrations marked attended; 0 when there are none.
    pub attendance: i64,
}

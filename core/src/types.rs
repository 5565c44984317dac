//! Domain records produced and consumed by the mapper.
//!
//! # Design
//! Vendor responses are loose field bags with inconsistent names. These types
//! are the stable shape they are translated into. Every text field is a
//! `String` and is empty when the vendor omitted it. Hours stay strings
//! exactly as the vendor formatted them (`"5.50"`); nothing here parses or
//! rounds them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{MaconomyError, Result};

/// Opaque session token issued by login.
///
/// Never empty. The id is carried into envelopes byte for byte.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Session(String);

impl Session {
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(MaconomyError::MissingSession);
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Session {
    type Error = MaconomyError;

    fn try_from(id: String) -> Result<Self> {
        Self::new(id)
    }
}

impl From<Session> for String {
    fn from(session: Session) -> Self {
        session.0
    }
}

/// Result of a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginInfo {
    pub session_id: String,
    pub employee_name: String,
    pub employee_number: String,
    pub company: String,
}

impl LoginInfo {
    /// The session to pass into every subsequent call.
    pub fn session(&self) -> Result<Session> {
        Session::new(self.session_id.clone())
    }
}

/// One date's worth of hours within a timesheet line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyEntry {
    pub date: String,
    pub description: String,
    pub hours: String,
}

/// A timesheet line: one project/task pair across the days of a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimesheetLine {
    /// Instance key of the persisted line, empty for a line not yet created.
    pub key: String,
    pub name: String,
    pub project_id: String,
    pub task: String,
    pub task_description: String,
    pub entry_text: String,
    pub customer: String,
    /// In the order the server returned them, which follows the period's days.
    pub daily_entries: Vec<DailyEntry>,
}

impl TimesheetLine {
    pub fn is_saved(&self) -> bool {
        !self.key.is_empty()
    }
}

/// Total hours recorded on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTotal {
    pub date: String,
    pub hours: String,
}

/// A contiguous date range of timesheet data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub start_date: String,
    pub end_date: String,
    /// Read-only: submission happens in the vendor UI.
    pub submitted: bool,
    pub lines: Vec<TimesheetLine>,
    pub daily_totals: Vec<DailyTotal>,
}

/// A period as listed by `gettimesheetperiods`, without its lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodSummary {
    pub start_date: String,
    pub end_date: String,
    pub submitted: bool,
}

/// One hit of a project or task search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub key: String,
    pub display_name: String,
}

/// Which vendor search to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchKind {
    /// Projects the employee recently booked time on.
    RecentlyUsedProjects,
    /// Tasks belonging to the given project number.
    TasksForProject(String),
}

/// Input for creating or updating one day of a timesheet line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveEntry {
    pub date: NaiveDate,
    pub task: String,
    /// Sent verbatim, e.g. `"5.5"`.
    pub hours: String,
    pub project_id: String,
    pub text: String,
    pub daily_description: String,
    /// `None` (or empty) creates a new line.
    pub line_key: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_rejects_blank_ids() {
        assert!(matches!(Session::new(""), Err(MaconomyError::MissingSession)));
        assert!(matches!(Session::new("   "), Err(MaconomyError::MissingSession)));
    }

    #[test]
    fn session_keeps_id_verbatim() {
        let session = Session::new(" 0Ab-9 ").unwrap();
        assert_eq!(session.as_str(), " 0Ab-9 ");
    }

    #[test]
    fn session_deserializes_through_validation() {
        let ok: Session = serde_json::from_str(r#""abc""#).unwrap();
        assert_eq!(ok.as_str(), "abc");
        assert!(serde_json::from_str::<Session>(r#""""#).is_err());
    }

    #[test]
    fn login_info_session_requires_id() {
        let info = LoginInfo {
            session_id: String::new(),
            employee_name: "Demo".to_string(),
            employee_number: "1001".to_string(),
            company: "Acme".to_string(),
        };
        assert!(info.session().is_err());
    }

    #[test]
    fn unsaved_line_has_empty_key() {
        let line = TimesheetLine {
            key: String::new(),
            name: String::new(),
            project_id: "1095123".to_string(),
            task: "9202".to_string(),
            task_description: String::new(),
            entry_text: String::new(),
            customer: String::new(),
            daily_entries: Vec::new(),
        };
        assert!(!line.is_saved());
    }
}

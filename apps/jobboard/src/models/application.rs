use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use tracing::warn;

use crate::models::wire;

/// Recruiter-driven status of a candidate's application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ApplicationStatus {
    #[default]
    Submitted,
    UnderReview,
    Shortlisted,
    Rejected,
    Hired,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 5] = [
        ApplicationStatus::Submitted,
        ApplicationStatus::UnderReview,
        ApplicationStatus::Shortlisted,
        ApplicationStatus::Rejected,
        ApplicationStatus::Hired,
    ];

    /// Wire spelling, also used for display.
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Submitted => "Submitted",
            ApplicationStatus::UnderReview => "Under Review",
            ApplicationStatus::Shortlisted => "Shortlisted",
            ApplicationStatus::Rejected => "Rejected",
            ApplicationStatus::Hired => "Hired",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphabetic())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "submitted" => Ok(ApplicationStatus::Submitted),
            "underreview" => Ok(ApplicationStatus::UnderReview),
            "shortlisted" => Ok(ApplicationStatus::Shortlisted),
            "rejected" => Ok(ApplicationStatus::Rejected),
            "hired" => Ok(ApplicationStatus::Hired),
            _ => Err(format!("unknown application status '{s}'")),
        }
    }
}

impl Serialize for ApplicationStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ApplicationStatus {
    /// Unknown statuses read as `Submitted` so the application itself is kept.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<Value>::deserialize(deserializer)?;
        let Some(text) = raw.as_ref().and_then(Value::as_str) else {
            if raw.as_ref().is_some_and(|v| !v.is_null()) {
                warn!(status = ?raw, "Non-text application status, reading as Submitted");
            }
            return Ok(ApplicationStatus::default());
        };
        Ok(text.parse().unwrap_or_else(|e: String| {
            warn!(error = %e, "Reading application status as Submitted");
            ApplicationStatus::default()
        }))
    }
}

/// One candidate's application to one job posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "WireApplication")]
pub struct Application {
    #[serde(with = "wire::id")]
    pub id_candidate: String,
    #[serde(with = "wire::id")]
    pub id_post: String,
    pub name: String,
    pub resume_link: Option<String>,
    pub cover_letter: Option<String>,
    pub status: ApplicationStatus,
    /// `None` when the server's value is missing or unparsable.
    #[serde(with = "wire::millis")]
    pub date_submit: Option<DateTime<Utc>>,
}

/// Applicant rows name the candidate `idCandidate` or `idUser` depending on the endpoint.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireApplication {
    #[serde(default, deserialize_with = "wire::opt_id::deserialize")]
    id_candidate: Option<String>,
    #[serde(default, deserialize_with = "wire::opt_id::deserialize")]
    id_user: Option<String>,
    #[serde(default, deserialize_with = "wire::opt_id::deserialize")]
    id_post: Option<String>,
    #[serde(default, deserialize_with = "wire::nullable")]
    name: String,
    #[serde(default)]
    resume_link: Option<String>,
    #[serde(default)]
    cover_letter: Option<String>,
    #[serde(default)]
    status: ApplicationStatus,
    #[serde(default, with = "wire::millis")]
    date_submit: Option<DateTime<Utc>>,
}

impl TryFrom<WireApplication> for Application {
    type Error = String;

    fn try_from(raw: WireApplication) -> Result<Self, Self::Error> {
        let id_candidate = raw
            .id_candidate
            .or(raw.id_user)
            .ok_or_else(|| "application has neither idCandidate nor idUser".to_string())?;
        Ok(Application {
            id_candidate,
            id_post: raw.id_post.unwrap_or_default(),
            name: raw.name,
            resume_link: raw.resume_link,
            cover_letter: raw.cover_letter,
            status: raw.status,
            date_submit: raw.date_submit,
        })
    }
}

/// Outcome of submitting an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    /// The server answered 2xx but did not confirm the application.
    Failed,
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};

use crate::errors::{ApiError, ApiResult};
use crate::models::wire;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum JobStatus {
    #[default]
    Open,
    Closed,
}

impl<'de> Deserialize<'de> for JobStatus {
    /// The backend mixes `"Open"` and `"open"`; anything unrecognised counts as open.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        Ok(match raw.trim().to_ascii_lowercase().as_str() {
            "closed" | "close" => JobStatus::Closed,
            _ => JobStatus::Open,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Salary {
    #[serde(default, with = "wire::amount")]
    pub min: Option<f64>,
    #[serde(default, with = "wire::amount")]
    pub max: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(default, with = "wire::opt_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// A job posting as returned by the post service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPosting {
    #[serde(with = "wire::id")]
    pub id: String,
    #[serde(default, deserialize_with = "wire::nullable")]
    pub title: String,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub employment_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "wire::nullable")]
    pub requirements: Vec<String>,
    #[serde(default, deserialize_with = "wire::nullable")]
    pub salary: Salary,
    #[serde(default, deserialize_with = "wire::nullable")]
    pub location: Location,
    #[serde(default, with = "wire::millis")]
    pub post_date: Option<DateTime<Utc>>,
    #[serde(default, with = "wire::millis")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: JobStatus,
    #[serde(default, deserialize_with = "wire::nullable")]
    pub category: Category,
    #[serde(default, deserialize_with = "wire::nullable")]
    pub number_applicant: u32,
    /// Set by the detail endpoint when the signed-in candidate already applied.
    #[serde(default, deserialize_with = "wire::nullable")]
    pub is_applied: bool,
}

/// Sort order accepted by the job listing endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Recruiter-entered job form. `requirements` is the raw comma-separated text field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobDraft {
    pub title: String,
    pub category: Category,
    pub description: String,
    /// Required level ("Intern", "Junior", ...).
    pub education: String,
    pub employment_type: String,
    pub company_name: Option<String>,
    pub location: Location,
    pub salary: Salary,
    pub requirements: String,
    pub due_date: Option<DateTime<Utc>>,
}

impl JobDraft {
    /// Client-side form checks run before any network call.
    pub fn validate(&self) -> ApiResult<()> {
        if self.title.trim().is_empty() {
            return Err(ApiError::Validation("Job title is required".to_string()));
        }
        if let (Some(min), Some(max)) = (self.salary.min, self.salary.max) {
            if min < 0.0 || max < 0.0 {
                return Err(ApiError::Validation(
                    "Salary cannot be negative".to_string(),
                ));
            }
            if min > max {
                return Err(ApiError::Validation(
                    "Minimum salary cannot exceed maximum salary".to_string(),
                ));
            }
        }
        Ok(())
    }

    pub fn requirement_list(&self) -> Vec<String> {
        normalize_requirements(&self.requirements)
    }

    /// Builds the create/update request body.
    pub fn to_wire(&self, existing_id: Option<&str>, now: DateTime<Utc>) -> Value {
        json!({
            "id": existing_id,
            "title": self.title.trim(),
            "category": {
                "id": self.category.id,
                "name": self.category.name,
            },
            "description": self.description,
            "dueDate": self.due_date.map(|d| d.timestamp_millis().to_string()),
            "education": self.education,
            "employmentType": self.employment_type,
            "company": self.company_name,
            "location": {
                "city": self.location.city,
                "address": self.location.address,
            },
            "postDate": now.timestamp_millis(),
            "postedBy": Value::Null,
            "requirements": self.requirement_list(),
            "salary": {
                "min": self.salary.min,
                "max": self.salary.max,
                "currency": self.salary.currency,
            },
            "status": JobStatus::Open,
        })
    }
}

impl From<&JobPosting> for JobDraft {
    /// Pre-fills the edit form from an existing posting.
    fn from(job: &JobPosting) -> Self {
        JobDraft {
            title: job.title.clone(),
            category: job.category.clone(),
            description: job.description.clone().unwrap_or_default(),
            education: String::new(),
            employment_type: job.employment_type.clone().unwrap_or_default(),
            company_name: job.company_name.clone(),
            location: job.location.clone(),
            salary: job.salary.clone(),
            requirements: job.requirements.join(","),
            due_date: job.due_date,
        }
    }
}

/// Splits a comma-separated requirements field into trimmed, non-empty entries, in order.
pub fn normalize_requirements(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

//! Presentation fallbacks. The only place where absent or unparsable values
//! turn into display text; repositories hand back `Option`s untouched.

use chrono::{DateTime, Utc};

use crate::models::{Application, JobPosting, Location, Salary, UserProfile};

pub const MISSING: &str = "-";
pub const UNKNOWN_DATE: &str = "Invalid date";
pub const NEGOTIABLE: &str = "Negotiable";

pub fn text_or_dash(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => MISSING.to_string(),
    }
}

/// Whole amount with `,` thousands separators: `1234567.4` → `"1,234,567"`.
pub fn format_amount(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if rounded < 0 {
        grouped.insert(0, '-');
    }
    grouped
}

pub fn format_salary(salary: &Salary) -> String {
    let positive = |v: Option<f64>| v.filter(|a| *a > 0.0);
    let currency = salary
        .currency
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(|c| format!(" {c}"))
        .unwrap_or_default();

    match (positive(salary.min), positive(salary.max)) {
        (Some(min), Some(max)) => {
            format!("{} - {}{currency}", format_amount(min), format_amount(max))
        }
        (Some(min), None) => format!("From {}{currency}", format_amount(min)),
        (None, Some(max)) => format!("Up to {}{currency}", format_amount(max)),
        (None, None) => NEGOTIABLE.to_string(),
    }
}

pub fn format_location(location: &Location) -> String {
    let city = text_or_dash(location.city.as_deref());
    match location.address.as_deref().map(str::trim) {
        Some(address) if !address.is_empty() => format!("{city} {address}"),
        _ => city,
    }
}

pub fn format_date(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| UNKNOWN_DATE.to_string())
}

pub fn gender_label(code: Option<&str>) -> String {
    match code.map(|c| c.trim().to_ascii_lowercase()).as_deref() {
        Some("male") | Some("m") => "Male".to_string(),
        Some("female") | Some("f") => "Female".to_string(),
        Some("") | None => MISSING.to_string(),
        Some(_) => "Other".to_string(),
    }
}

/// One row in a job list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobCard {
    pub id: String,
    pub title: String,
    pub company: String,
    pub employment_type: String,
    pub salary: String,
    pub location: String,
    pub applicants: String,
    pub due_date: String,
}

impl From<&JobPosting> for JobCard {
    fn from(job: &JobPosting) -> Self {
        JobCard {
            id: job.id.clone(),
            title: text_or_dash(Some(&job.title)),
            company: text_or_dash(job.company_name.as_deref()),
            employment_type: text_or_dash(job.employment_type.as_deref()),
            salary: format_salary(&job.salary),
            location: format_location(&job.location),
            applicants: job.number_applicant.to_string(),
            due_date: format_date(job.due_date),
        }
    }
}

/// One row in a recruiter's applicant list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicantRow {
    pub candidate_id: String,
    pub name: String,
    pub status: String,
    pub submitted: String,
    pub resume_link: Option<String>,
    pub cover_letter: String,
}

impl From<&Application> for ApplicantRow {
    fn from(app: &Application) -> Self {
        ApplicantRow {
            candidate_id: app.id_candidate.clone(),
            name: text_or_dash(Some(&app.name)),
            status: app.status.to_string(),
            submitted: format_date(app.date_submit),
            resume_link: app
                .resume_link
                .clone()
                .filter(|link| !link.trim().is_empty()),
            cover_letter: text_or_dash(app.cover_letter.as_deref()),
        }
    }
}

/// Header block of the profile screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileSummary {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub gender: String,
    pub skills: Vec<String>,
}

impl From<&UserProfile> for ProfileSummary {
    fn from(profile: &UserProfile) -> Self {
        ProfileSummary {
            name: text_or_dash(Some(&profile.name)),
            email: text_or_dash(profile.email.as_deref()),
            phone: text_or_dash(profile.phone.as_deref()),
            gender: gender_label(profile.gender.as_deref()),
            skills: profile
                .skills
                .iter()
                .map(|s| s.title.trim())
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}

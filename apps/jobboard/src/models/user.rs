use serde::{Deserialize, Serialize};

use crate::models::wire;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "WireEducation")]
pub struct Education {
    #[serde(rename = "_id", with = "wire::opt_id")]
    pub id: Option<String>,
    pub school: Option<String>,
    pub major: Option<String>,
    pub duration: Option<String>,
    pub description: Option<String>,
}

#[derive(Deserialize)]
struct WireEducation {
    #[serde(default, rename = "_id", deserialize_with = "wire::opt_id::deserialize")]
    mongo_id: Option<String>,
    #[serde(default, deserialize_with = "wire::opt_id::deserialize")]
    id: Option<String>,
    #[serde(default)]
    school: Option<String>,
    #[serde(default)]
    major: Option<String>,
    #[serde(default)]
    duration: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

impl From<WireEducation> for Education {
    fn from(raw: WireEducation) -> Self {
        Education {
            id: raw.mongo_id.or(raw.id),
            school: raw.school,
            major: raw.major,
            duration: raw.duration,
            description: raw.description,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    #[serde(default, deserialize_with = "wire::nullable")]
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experience {
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A user's profile as served by the user service. Mutated only by its owner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "WireProfile")]
pub struct UserProfile {
    #[serde(with = "wire::id")]
    pub user_id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Raw gender code (`"male"`, `"female"`, ...).
    pub gender: Option<String>,
    pub education: Vec<Education>,
    pub skills: Vec<Skill>,
    pub experience: Vec<Experience>,
}

/// Profiles carry the owner as `userId`, `_id` or `id`, sometimes several at once.
/// `userId` wins, then `_id`, then `id`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireProfile {
    #[serde(default, deserialize_with = "wire::opt_id::deserialize")]
    user_id: Option<String>,
    #[serde(default, rename = "_id", deserialize_with = "wire::opt_id::deserialize")]
    mongo_id: Option<String>,
    #[serde(default, deserialize_with = "wire::opt_id::deserialize")]
    id: Option<String>,
    name: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    gender: Option<String>,
    #[serde(default, deserialize_with = "wire::nullable")]
    education: Vec<Education>,
    #[serde(default, deserialize_with = "wire::nullable")]
    skills: Vec<Skill>,
    #[serde(default, deserialize_with = "wire::nullable")]
    experience: Vec<Experience>,
}

impl From<WireProfile> for UserProfile {
    fn from(raw: WireProfile) -> Self {
        UserProfile {
            user_id: raw.user_id.or(raw.mongo_id).or(raw.id).unwrap_or_default(),
            name: raw.name,
            email: raw.email,
            phone: raw.phone,
            gender: raw.gender,
            education: raw.education,
            skills: raw.skills,
            experience: raw.experience,
        }
    }
}

/// Partial profile update; only the fields that are set are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub education: Option<Vec<Education>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<Skill>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<Vec<Experience>>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self == &ProfileUpdate::default()
    }
}

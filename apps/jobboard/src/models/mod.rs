pub mod account;
pub mod application;
pub mod job;
pub mod user;
pub mod wire;

pub use account::{Account, Role};
pub use application::{Application, ApplicationStatus, ApplyOutcome};
pub use job::{Category, JobDraft, JobPosting, JobStatus, Location, Salary, SortOrder};
pub use user::{Education, Experience, ProfileUpdate, Skill, UserProfile};

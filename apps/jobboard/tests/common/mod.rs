#![allow(dead_code)]

//! In-process fake of the three backend services, served with axum on a random port.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use axum::extract::{Multipart, Path, Query, Request, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use jobboard::config::Config;
use jobboard::http_client::AuthPolicy;
use jobboard::AppState;

pub const TOKEN: &str = "Bearer test-token";
pub const CANDIDATE_ID: &str = "u-1";
pub const RECRUITER_ID: &str = "u-2";

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Upload {
    pub fields: HashMap<String, String>,
    pub file_name: Option<String>,
    pub file_type: Option<String>,
    pub file_len: usize,
}

#[derive(Default)]
pub struct Backend {
    pub jobs: Vec<Value>,
    pub applicants: HashMap<String, Vec<Value>>,
    pub applied: Vec<Value>,
    pub profiles: HashMap<String, Value>,
    /// email -> (password, account)
    pub accounts: HashMap<String, (String, Value)>,
    pub requests: Vec<RecordedRequest>,
    pub uploads: Vec<Upload>,
    /// Forced replies keyed by request path.
    pub overrides: HashMap<String, (u16, Value)>,
    /// Artificial latency for job searches, keyed by search query.
    pub search_delays: HashMap<String, Duration>,
    pub next_id: u64,
}

pub type Shared = Arc<Mutex<Backend>>;

impl Backend {
    pub fn seeded() -> Self {
        let mut backend = Backend {
            next_id: 100,
            ..Backend::default()
        };

        backend.jobs = vec![
            job_json("1", "Backend Engineer", &["Rust", "SQL"]),
            job_json("2", "React Developer", &["React", "TypeScript"]),
            job_json("3", "Data Analyst", &["Python"]),
        ];

        backend.applicants.insert(
            "1".to_string(),
            vec![
                json!({"idCandidate": "c-1", "idPost": "1", "name": "Lan", "status": "Submitted",
                       "resumeLink": "https://cdn.example.com/c-1.pdf", "dateSubmit": "1714521600000"}),
                json!({"idCandidate": "c-2", "idPost": "1", "name": "Minh", "status": "Under Review",
                       "dateSubmit": "1714608000000"}),
                json!({"idCandidate": "c-3", "idPost": "1", "name": "Hoa", "status": "Submitted",
                       "dateSubmit": "not-a-timestamp"}),
            ],
        );

        backend.accounts.insert(
            "candidate@example.com".to_string(),
            (
                "secret".to_string(),
                json!({"userId": CANDIDATE_ID, "role": "candidate", "email": "candidate@example.com"}),
            ),
        );
        backend.accounts.insert(
            "recruiter@example.com".to_string(),
            (
                "secret".to_string(),
                json!({"userId": RECRUITER_ID, "role": "recruiter", "email": "recruiter@example.com"}),
            ),
        );

        backend.profiles.insert(
            CANDIDATE_ID.to_string(),
            json!({
                "_id": CANDIDATE_ID,
                "name": "Lan Nguyen",
                "email": "candidate@example.com",
                "phone": "0901234567",
                "gender": "female",
                "education": [{"_id": "e-1", "school": "HUST", "major": "Computer Science"}],
                "skills": [{"title": "Rust"}, {"title": "SQL"}],
                "experience": []
            }),
        );

        backend
    }
}

pub fn job_json(id: &str, title: &str, requirements: &[&str]) -> Value {
    json!({
        "id": id,
        "title": title,
        "companyName": "Acme",
        "employmentType": "Full-time",
        "description": format!("{title} wanted"),
        "requirements": requirements,
        "salary": {"min": 1000, "max": 2000, "currency": "USD"},
        "location": {"city": "Hanoi", "address": "1 Trang Tien"},
        "postDate": 1714521600000_i64,
        "dueDate": "1717200000000",
        "status": "Open",
        "category": {"id": "1", "name": "IT"},
        "numberApplicant": 0
    })
}

pub struct FakeServer {
    pub base_url: String,
    pub backend: Shared,
}

impl FakeServer {
    pub fn backend(&self) -> MutexGuard<'_, Backend> {
        self.backend.lock().unwrap()
    }

    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.backend()
            .requests
            .iter()
            .filter(|r| r.path == path)
            .cloned()
            .collect()
    }

    pub fn request_count(&self) -> usize {
        self.backend().requests.len()
    }
}

pub async fn spawn(backend: Backend) -> FakeServer {
    let shared: Shared = Arc::new(Mutex::new(backend));

    let app = Router::new()
        .route("/api/auth", post(login))
        .route("/api/user/register", post(register))
        .route("/api/user/profile/:user_id", get(get_profile).put(update_profile))
        .route("/post-service/all-jobs", get(all_jobs))
        .route("/post-service/job/detail/:id", get(job_detail))
        .route("/post-service/job/opened", get(opened_jobs))
        .route("/post-service/job/add", post(add_job))
        .route("/post-service/job/update", put(update_job))
        .route("/post-service/job/delete", axum::routing::delete(delete_job))
        .route("/post-service/jobs-applied", get(applied_jobs))
        .route("/post-service/jobs-applied/apply", post(apply))
        .route("/post-service/jobs-applied/editStatus", post(edit_status))
        .route("/post-service/candidate-applied", get(candidates))
        .layer(middleware::from_fn_with_state(shared.clone(), record))
        .with_state(shared.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    FakeServer {
        base_url: format!("http://{addr}"),
        backend: shared,
    }
}

/// Fake server plus a client wired to it.
pub struct Harness {
    pub server: FakeServer,
    pub state: AppState,
}

impl Harness {
    pub async fn new(policy: AuthPolicy) -> Self {
        Self::with_backend(Backend::seeded(), policy).await
    }

    pub async fn with_backend(backend: Backend, policy: AuthPolicy) -> Self {
        let server = spawn(backend).await;
        let mut config = Config::single_host(&server.base_url);
        config.auth_policy = policy;
        let state = AppState::from_config(config).unwrap();
        Harness { server, state }
    }

    pub fn sign_in_as(&self, user_id: &str) {
        self.state.session.set_session(TOKEN, user_id);
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Middleware and handlers
// ────────────────────────────────────────────────────────────────────────────

async fn record(State(backend): State<Shared>, req: Request, next: Next) -> Response {
    let recorded = {
        let header_str = |name: header::HeaderName| {
            req.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        RecordedRequest {
            method: req.method().to_string(),
            path: req.uri().path().to_string(),
            query: req.uri().query().map(str::to_string),
            authorization: header_str(header::AUTHORIZATION),
            content_type: header_str(header::CONTENT_TYPE),
        }
    };

    let forced = {
        let mut backend = backend.lock().unwrap();
        let forced = backend.overrides.get(&recorded.path).cloned();
        backend.requests.push(recorded);
        forced
    };

    match forced {
        Some((status, body)) => reply(status, body),
        None => next.run(req).await,
    }
}

fn reply(status: u16, body: Value) -> Response {
    let status = StatusCode::from_u16(status).unwrap();
    if body.is_null() {
        return status.into_response();
    }
    (status, Json(body)).into_response()
}

fn check_auth(headers: &HeaderMap) -> Result<(), Response> {
    match headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        Some(TOKEN) => Ok(()),
        _ => Err(reply(401, json!({"message": "Unauthorized"}))),
    }
}

#[derive(Deserialize)]
struct Credentials {
    email: String,
    password: String,
}

async fn login(State(backend): State<Shared>, Json(creds): Json<Credentials>) -> Response {
    let backend = backend.lock().unwrap();
    match backend.accounts.get(&creds.email) {
        Some((password, account)) if *password == creds.password => (
            [(header::AUTHORIZATION, TOKEN)],
            Json(json!({"account": account})),
        )
            .into_response(),
        _ => reply(401, json!({"message": "Invalid email or password"})),
    }
}

async fn register(State(backend): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut backend = backend.lock().unwrap();
    let email = body["email"].as_str().unwrap_or_default().to_string();
    if backend.accounts.contains_key(&email) {
        return reply(409, json!({"message": "Email already registered"}));
    }
    let user_id = format!("u-{}", backend.next_id);
    backend.next_id += 1;
    let password = body["password"].as_str().unwrap_or_default().to_string();
    backend.accounts.insert(
        email.clone(),
        (password, json!({"userId": user_id, "role": "candidate", "email": email})),
    );
    reply(201, json!({"message": "Registered"}))
}

async fn get_profile(
    State(backend): State<Shared>,
    headers: HeaderMap,
    Path(user_id): Path<String>,
) -> Response {
    if let Err(r) = check_auth(&headers) {
        return r;
    }
    match backend.lock().unwrap().profiles.get(&user_id) {
        Some(profile) => reply(200, profile.clone()),
        None => reply(404, json!({"message": "User not found"})),
    }
}

async fn update_profile(
    State(backend): State<Shared>,
    headers: HeaderMap,
    Path(user_id): Path<String>,
    Json(update): Json<Value>,
) -> Response {
    if let Err(r) = check_auth(&headers) {
        return r;
    }
    let mut backend = backend.lock().unwrap();
    let Some(profile) = backend.profiles.get_mut(&user_id) else {
        return reply(404, json!({"message": "User not found"}));
    };
    if let (Some(target), Some(fields)) = (profile.as_object_mut(), update.as_object()) {
        for (k, v) in fields {
            target.insert(k.clone(), v.clone());
        }
    }
    reply(200, profile.clone())
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct JobSearch {
    sort_order: Option<String>,
    search_query: Option<String>,
}

async fn all_jobs(State(backend): State<Shared>, Query(search): Query<JobSearch>) -> Response {
    let needle = search.search_query.unwrap_or_default().to_lowercase();
    let (delay, mut jobs) = {
        let backend = backend.lock().unwrap();
        let delay = backend.search_delays.get(&needle).copied();
        let jobs: Vec<Value> = backend
            .jobs
            .iter()
            .filter(|j| {
                j["title"]
                    .as_str()
                    .unwrap_or_default()
                    .to_lowercase()
                    .contains(&needle)
            })
            .cloned()
            .collect();
        (delay, jobs)
    };

    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    jobs.sort_by(|a, b| {
        a["title"]
            .as_str()
            .unwrap_or_default()
            .cmp(b["title"].as_str().unwrap_or_default())
    });
    if search.sort_order.as_deref() == Some("desc") {
        jobs.reverse();
    }
    reply(200, json!({"data": jobs}))
}

async fn job_detail(State(backend): State<Shared>, Path(id): Path<String>) -> Response {
    let backend = backend.lock().unwrap();
    match backend.jobs.iter().find(|j| j["id"] == json!(id)) {
        Some(job) => reply(200, json!({"data": job})),
        None => reply(404, json!({"message": "Job not found"})),
    }
}

async fn opened_jobs(State(backend): State<Shared>, headers: HeaderMap) -> Response {
    if let Err(r) = check_auth(&headers) {
        return r;
    }
    let backend = backend.lock().unwrap();
    let open: Vec<Value> = backend
        .jobs
        .iter()
        .filter(|j| j["status"].as_str().unwrap_or_default().eq_ignore_ascii_case("open"))
        .cloned()
        .collect();
    reply(200, json!({"data": open}))
}

async fn add_job(
    State(backend): State<Shared>,
    headers: HeaderMap,
    Json(mut job): Json<Value>,
) -> Response {
    if let Err(r) = check_auth(&headers) {
        return r;
    }
    let mut backend = backend.lock().unwrap();
    let id = backend.next_id.to_string();
    backend.next_id += 1;
    job["id"] = json!(id);
    job["numberApplicant"] = json!(0);
    backend.jobs.push(job.clone());
    reply(201, json!({"data": job}))
}

async fn update_job(
    State(backend): State<Shared>,
    headers: HeaderMap,
    Json(job): Json<Value>,
) -> Response {
    if let Err(r) = check_auth(&headers) {
        return r;
    }
    let mut backend = backend.lock().unwrap();
    match backend.jobs.iter_mut().find(|j| j["id"] == job["id"]) {
        Some(existing) => {
            *existing = job.clone();
            reply(200, json!({"data": job}))
        }
        None => reply(404, json!({"message": "Job not found"})),
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PostQuery {
    id_post: String,
}

async fn delete_job(
    State(backend): State<Shared>,
    headers: HeaderMap,
    Query(q): Query<PostQuery>,
) -> Response {
    if let Err(r) = check_auth(&headers) {
        return r;
    }
    let mut backend = backend.lock().unwrap();
    let before = backend.jobs.len();
    backend.jobs.retain(|j| j["id"] != json!(q.id_post));
    if backend.jobs.len() == before {
        return reply(404, json!({"message": "Job not found"}));
    }
    reply(200, json!({"success": true}))
}

async fn applied_jobs(State(backend): State<Shared>, headers: HeaderMap) -> Response {
    if let Err(r) = check_auth(&headers) {
        return r;
    }
    reply(200, json!({"data": backend.lock().unwrap().applied}))
}

async fn apply(State(backend): State<Shared>, headers: HeaderMap, mut multipart: Multipart) -> Response {
    if let Err(r) = check_auth(&headers) {
        return r;
    }

    let mut upload = Upload::default();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        if field.file_name().is_some() {
            upload.file_name = field.file_name().map(str::to_string);
            upload.file_type = field.content_type().map(str::to_string);
            upload.file_len = field.bytes().await.unwrap().len();
        } else {
            upload.fields.insert(name, field.text().await.unwrap());
        }
    }

    let id_post = upload.fields.get("idPost").cloned().unwrap_or_default();
    let mut backend = backend.lock().unwrap();
    let job = backend.jobs.iter().find(|j| j["id"] == json!(id_post)).cloned();
    backend.uploads.push(upload);

    match job {
        Some(mut job) => {
            job["isApplied"] = json!(true);
            backend.applied.push(job.clone());
            if let Some(stored) = backend.jobs.iter_mut().find(|j| j["id"] == json!(id_post)) {
                stored["isApplied"] = json!(true);
            }
            reply(200, json!({"data": {"idPost": id_post, "status": "Submitted"}}))
        }
        None => reply(404, json!({"message": "Job not found"})),
    }
}

async fn edit_status(
    State(backend): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(r) = check_auth(&headers) {
        return r;
    }
    let id_post = body["idPost"].as_str().unwrap_or_default().to_string();
    let mut backend = backend.lock().unwrap();
    let target = backend
        .applicants
        .get_mut(&id_post)
        .and_then(|apps| apps.iter_mut().find(|a| a["idCandidate"] == body["idCandidate"]));
    match target {
        Some(app) => {
            app["status"] = body["status"].clone();
            reply(200, json!({"data": app.clone()}))
        }
        None => reply(404, json!({"message": "Application not found"})),
    }
}

async fn candidates(
    State(backend): State<Shared>,
    headers: HeaderMap,
    Query(q): Query<PostQuery>,
) -> Response {
    if let Err(r) = check_auth(&headers) {
        return r;
    }
    let apps = backend
        .lock()
        .unwrap()
        .applicants
        .get(&q.id_post)
        .cloned()
        .unwrap_or_default();
    reply(200, json!({"data": apps}))
}

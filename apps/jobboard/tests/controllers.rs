mod common;

use std::time::Duration;

use serde_json::json;

use common::{Backend, Harness, CANDIDATE_ID, RECRUITER_ID};
use jobboard::http_client::{AuthPolicy, FilePart};
use jobboard::models::{ApplicationStatus, ApplyOutcome, ProfileUpdate, SortOrder};
use jobboard::views::{
    AppliedJobsController, CandidateManagerController, JobBoardController, JobDetailController,
    JobEditorController, PostManagerController, ProfileController, ViewController, ViewState,
};

#[tokio::test]
async fn test_job_board_mount_and_filter() {
    let h = Harness::new(AuthPolicy::Strict).await;
    let board = JobBoardController::new(h.state.jobs.clone());

    board.on_mount().await;
    assert_eq!(board.cards().len(), 3);

    board.apply_filter("analyst", SortOrder::Desc).await;
    let cards = board.cards();
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].title, "Data Analyst");
    assert_eq!(cards[0].salary, "1,000 - 2,000 USD");
    assert_eq!(board.query().search, "analyst");
}

#[tokio::test]
async fn test_job_board_query_set_before_mount_fetches_once() {
    let h = Harness::new(AuthPolicy::Strict).await;
    let board = JobBoardController::new(h.state.jobs.clone());

    board.set_query(" react ", SortOrder::Asc);
    board.on_mount().await;

    let sent = h.server.requests_to("/post-service/all-jobs");
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].query.as_deref(), Some("sortOrder=asc&searchQuery=react"));
    assert_eq!(board.cards().len(), 1);
}

#[tokio::test]
async fn test_job_board_favorites_stay_local() {
    let h = Harness::new(AuthPolicy::Strict).await;
    let board = JobBoardController::new(h.state.jobs.clone());

    assert!(board.toggle_favorite("1"));
    assert!(board.is_favorite("1"));
    assert!(!board.toggle_favorite("1"));
    assert!(!board.is_favorite("1"));
    assert_eq!(h.server.request_count(), 0);
}

#[tokio::test]
async fn test_overlapping_searches_last_arrival_wins() {
    let mut backend = Backend::seeded();
    backend
        .search_delays
        .insert("engineer".into(), Duration::from_millis(300));
    let h = Harness::with_backend(backend, AuthPolicy::Strict).await;
    let board = JobBoardController::new(h.state.jobs.clone());
    board.on_mount().await;

    let slow = board.apply_filter("engineer", SortOrder::Asc);
    let fast = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        board.apply_filter("react", SortOrder::Asc).await;
        // The fast result lands first.
        assert_eq!(board.cards()[0].title, "React Developer");
    };
    tokio::join!(slow, fast);

    let cards = board.cards();
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].title, "Backend Engineer");
}

#[tokio::test]
async fn test_result_after_unmount_is_dropped() {
    let mut backend = Backend::seeded();
    backend
        .search_delays
        .insert(String::new(), Duration::from_millis(200));
    let h = Harness::with_backend(backend, AuthPolicy::Strict).await;
    let board = JobBoardController::new(h.state.jobs.clone());

    let mount = board.on_mount();
    let leave = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        board.on_unmount();
    };
    tokio::join!(mount, leave);

    assert!(board.cards().is_empty());
    assert!(board.view().state().is_loading());

    // Refreshing while unmounted does nothing.
    let before = h.server.request_count();
    board.on_focus().await;
    assert_eq!(h.server.request_count(), before);
}

#[tokio::test]
async fn test_focus_refetches() {
    let h = Harness::new(AuthPolicy::Strict).await;
    let board = JobBoardController::new(h.state.jobs.clone());
    board.on_mount().await;

    h.server.backend().jobs.pop();
    board.on_focus().await;

    assert_eq!(board.cards().len(), 2);
    assert_eq!(h.server.requests_to("/post-service/all-jobs").len(), 2);
}

#[tokio::test]
async fn test_job_detail_missing_is_failed_then_retried() {
    let h = Harness::new(AuthPolicy::Strict).await;
    let detail = JobDetailController::new(h.state.jobs.clone(), h.state.applications.clone(), "9");

    detail.on_mount().await;
    assert_eq!(
        detail.view().state(),
        ViewState::Failed("Job 9 is no longer available".to_string())
    );

    h.server
        .backend()
        .jobs
        .push(common::job_json("9", "Late Posting", &[]));
    detail.refresh().await;
    assert_eq!(detail.card().map(|c| c.title), Some("Late Posting".to_string()));
}

#[tokio::test]
async fn test_apply_refetches_job_detail() {
    let h = Harness::new(AuthPolicy::Strict).await;
    h.sign_in_as(CANDIDATE_ID);
    let detail = JobDetailController::new(h.state.jobs.clone(), h.state.applications.clone(), "1");
    detail.on_mount().await;
    assert!(!detail.is_applied());
    assert_eq!(detail.posted_on(), "01/05/2024");

    let outcome = detail
        .apply(Some(FilePart::pdf("cv.pdf", b"%PDF".to_vec())), "Hello")
        .await
        .unwrap();

    assert_eq!(outcome, ApplyOutcome::Applied);
    assert!(detail.is_applied());
    assert_eq!(detail.view().notice().as_deref(), Some("Application submitted"));
    assert_eq!(h.server.requests_to("/post-service/job/detail/1").len(), 2);
}

#[tokio::test]
async fn test_apply_without_resume_keeps_job_and_sets_notice() {
    let h = Harness::new(AuthPolicy::Strict).await;
    h.sign_in_as(CANDIDATE_ID);
    let detail = JobDetailController::new(h.state.jobs.clone(), h.state.applications.clone(), "1");
    detail.on_mount().await;

    assert!(detail.apply(None, "").await.is_err());

    assert_eq!(detail.card().map(|c| c.id), Some("1".to_string()));
    assert_eq!(detail.view().notice().as_deref(), Some("Please attach your resume"));
    assert_eq!(h.server.requests_to("/post-service/job/detail/1").len(), 1);
}

#[tokio::test]
async fn test_applied_jobs_signed_out_fails_without_request() {
    let h = Harness::new(AuthPolicy::Strict).await;
    let applied = AppliedJobsController::new(h.state.applications.clone());

    applied.on_mount().await;

    assert_eq!(
        applied.view().state(),
        ViewState::Failed("Please sign in again".to_string())
    );
    assert_eq!(h.server.request_count(), 0);
}

#[tokio::test]
async fn test_post_manager_delete_refetches() {
    let h = Harness::new(AuthPolicy::Strict).await;
    h.sign_in_as(RECRUITER_ID);
    let posts = PostManagerController::new(h.state.jobs.clone());
    posts.on_mount().await;
    assert_eq!(posts.cards().len(), 3);

    posts.delete("2").await.unwrap();

    let ids: Vec<_> = posts.cards().into_iter().map(|c| c.id).collect();
    assert_eq!(ids, ["1", "3"]);
    assert_eq!(posts.view().notice().as_deref(), Some("Job deleted"));
    assert_eq!(h.server.requests_to("/post-service/job/opened").len(), 2);
}

#[tokio::test]
async fn test_post_manager_declined_delete_keeps_list() {
    let mut backend = Backend::seeded();
    backend.overrides.insert(
        "/post-service/job/delete".into(),
        (200, json!({"success": false, "message": "Job has applicants"})),
    );
    let h = Harness::with_backend(backend, AuthPolicy::Strict).await;
    h.sign_in_as(RECRUITER_ID);
    let posts = PostManagerController::new(h.state.jobs.clone());
    posts.on_mount().await;

    assert!(posts.delete("1").await.is_err());

    assert_eq!(posts.cards().len(), 3);
    assert_eq!(posts.view().notice().as_deref(), Some("Job has applicants"));
    assert_eq!(h.server.requests_to("/post-service/job/opened").len(), 1);
}

#[tokio::test]
async fn test_candidate_manager_status_change_refetches() {
    let h = Harness::new(AuthPolicy::Strict).await;
    h.sign_in_as(RECRUITER_ID);
    let job = h.state.jobs.get_job_detail("1").await.unwrap();
    let manager = CandidateManagerController::new(h.state.applications.clone(), job);
    manager.on_mount().await;

    let rows = manager.rows();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[2].submitted, "Invalid date");
    assert_eq!(rows[1].cover_letter, "-");

    manager
        .change_status("c-1", ApplicationStatus::Shortlisted)
        .await
        .unwrap();

    let rows = manager.rows();
    assert_eq!(rows[0].status, "Shortlisted");
    assert_eq!(rows[1].status, "Under Review");
    assert_eq!(rows[2].status, "Submitted");
    assert_eq!(
        manager.view().notice().as_deref(),
        Some("Status changed to Shortlisted")
    );
    assert_eq!(h.server.requests_to("/post-service/candidate-applied").len(), 2);
}

#[tokio::test]
async fn test_job_editor_create_clears_form() {
    let h = Harness::new(AuthPolicy::Strict).await;
    h.sign_in_as(RECRUITER_ID);
    let editor = JobEditorController::create(h.state.jobs.clone());
    editor.on_mount().await;
    assert!(h.server.request_count() == 0);

    editor.update_draft(|d| {
        d.title = "Platform Engineer".into();
        d.requirements = "Rust, Kubernetes".into();
    });
    let saved = editor.submit().await.unwrap();

    assert_eq!(saved.requirements, ["Rust", "Kubernetes"]);
    assert_eq!(editor.view().data().map(|j| j.id), Some(saved.id));
    assert!(editor.draft().title.is_empty());
    assert_eq!(editor.view().notice().as_deref(), Some("Job posted"));
}

#[tokio::test]
async fn test_job_editor_keeps_dirty_form_on_reload() {
    let h = Harness::new(AuthPolicy::Strict).await;
    h.sign_in_as(RECRUITER_ID);
    let existing = h.state.jobs.get_job_detail("2").await.unwrap();
    let editor = JobEditorController::edit(h.state.jobs.clone(), &existing);
    assert!(editor.is_editing());
    assert_eq!(editor.draft().requirements, "React,TypeScript");

    editor.on_mount().await;
    editor.update_draft(|d| d.title = "React Lead".into());
    editor.on_focus().await;
    assert_eq!(editor.draft().title, "React Lead");

    let saved = editor.submit().await.unwrap();
    assert_eq!(saved.id, "2");
    assert_eq!(saved.title, "React Lead");
    assert_eq!(editor.view().notice().as_deref(), Some("Job posting updated"));
}

#[tokio::test]
async fn test_job_editor_validation_failure_keeps_form() {
    let h = Harness::new(AuthPolicy::Strict).await;
    h.sign_in_as(RECRUITER_ID);
    let editor = JobEditorController::create(h.state.jobs.clone());
    editor.on_mount().await;
    editor.update_draft(|d| d.description = "No title yet".into());

    assert!(editor.submit().await.is_err());

    assert_eq!(editor.draft().description, "No title yet");
    assert_eq!(editor.view().notice().as_deref(), Some("Job title is required"));
    assert_eq!(h.server.request_count(), 0);
}

#[tokio::test]
async fn test_profile_update_refetches_and_logout_clears() {
    let h = Harness::new(AuthPolicy::Strict).await;
    h.sign_in_as(CANDIDATE_ID);
    let profile = ProfileController::new(h.state.profile.clone(), h.state.session.clone());
    profile.on_mount().await;

    let summary = profile.summary().unwrap();
    assert_eq!(summary.gender, "Female");
    assert_eq!(summary.skills, ["Rust", "SQL"]);

    let update = ProfileUpdate {
        name: Some("Lan N.".into()),
        ..ProfileUpdate::default()
    };
    profile.update(&update).await.unwrap();
    assert_eq!(profile.summary().map(|s| s.name), Some("Lan N.".to_string()));
    assert_eq!(h.server.requests_to("/api/user/profile/u-1").len(), 3);

    profile.logout();
    assert!(!h.state.session.is_authenticated());
    assert!(profile.summary().is_none());
}

#[tokio::test]
async fn test_profile_signed_out_is_failed() {
    let h = Harness::new(AuthPolicy::Strict).await;
    let profile = ProfileController::new(h.state.profile.clone(), h.state.session.clone());

    profile.on_mount().await;

    assert_eq!(
        profile.view().state(),
        ViewState::Failed("Please sign in again".to_string())
    );
    assert_eq!(h.server.request_count(), 0);
}

#[tokio::test]
async fn test_profile_without_user_fails_under_forward_policy() {
    let h = Harness::new(AuthPolicy::Forward).await;
    let profile = ProfileController::new(h.state.profile.clone(), h.state.session.clone());

    profile.on_mount().await;

    assert_eq!(
        profile.view().state(),
        ViewState::Failed("Please sign in again".to_string())
    );
    assert_eq!(h.server.request_count(), 0);
}

#[tokio::test]
async fn test_successful_refetch_clears_earlier_failure_notice() {
    let h = Harness::new(AuthPolicy::Strict).await;
    let detail = JobDetailController::new(h.state.jobs.clone(), h.state.applications.clone(), "1");
    detail.on_mount().await;

    h.server
        .backend()
        .overrides
        .insert("/post-service/job/detail/1".into(), (500, json!({"message": "down"})));
    detail.on_focus().await;
    assert_eq!(detail.card().map(|c| c.id), Some("1".to_string()));
    assert_eq!(detail.view().notice().as_deref(), Some("down"));

    h.server.backend().overrides.clear();
    detail.on_focus().await;
    assert!(detail.view().notice().is_none());
}

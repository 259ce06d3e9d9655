use anyhow::{bail, Result};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use jobboard::config::{Config, Credentials};
use jobboard::models::SortOrder;
use jobboard::views::present::JobCard;
use jobboard::views::{
    AppliedJobsController, JobBoardController, JobDetailController, ProfileController,
    ViewController, ViewState,
};
use jobboard::AppState;

const USAGE: &str = "usage: jobboard [jobs [search] | job <id> | applied | profile]";

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting job board client v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Services: auth={} users={} posts={} (auth policy {:?})",
        config.auth_service_url, config.user_service_url, config.post_service_url, config.auth_policy
    );

    let state = AppState::from_config(config)?;

    if let Some(credentials) = Credentials::from_env()? {
        let account = state
            .auth
            .login(&credentials.email, &credentials.password, credentials.role)
            .await?;
        info!("Signed in as {} ({})", account.user_id, credentials.role);
    } else {
        warn!("JOBBOARD_EMAIL/JOBBOARD_PASSWORD not set, continuing signed out");
    }

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = args.first().map(String::as_str).unwrap_or("jobs");

    match command {
        "jobs" => {
            let board = JobBoardController::new(state.jobs.clone());
            let search = args.get(1).map(String::as_str).unwrap_or("");
            board.set_query(search, SortOrder::Asc);
            board.on_mount().await;
            print_cards(&board.cards());
        }
        "job" => {
            let Some(job_id) = args.get(1) else {
                bail!(USAGE);
            };
            let detail =
                JobDetailController::new(state.jobs.clone(), state.applications.clone(), job_id);
            detail.on_mount().await;
            match detail.view().state() {
                ViewState::Ready(job) => {
                    print_cards(&[JobCard::from(&job)]);
                    println!("Posted: {}", detail.posted_on());
                    for requirement in &job.requirements {
                        println!("  - {requirement}");
                    }
                    if let Some(description) = job.description.as_deref() {
                        println!("\n{description}");
                    }
                }
                ViewState::Failed(message) => bail!("{message}"),
                _ => bail!("job {job_id} did not load"),
            }
        }
        "applied" => {
            let applied = AppliedJobsController::new(state.applications.clone());
            applied.on_mount().await;
            if let ViewState::Failed(message) = applied.view().state() {
                bail!("{message}");
            }
            print_cards(&applied.cards());
        }
        "profile" => {
            let profile = ProfileController::new(state.profile.clone(), state.session.clone());
            profile.on_mount().await;
            match profile.summary() {
                Some(summary) => {
                    println!("{} <{}>", summary.name, summary.email);
                    println!("Phone: {}  Gender: {}", summary.phone, summary.gender);
                    println!("Skills: {}", summary.skills.join(", "));
                }
                None => {
                    let reason = match profile.view().state() {
                        ViewState::Failed(message) => message,
                        _ => profile
                            .view()
                            .notice()
                            .unwrap_or_else(|| "profile unavailable".to_string()),
                    };
                    bail!("{reason}");
                }
            }
        }
        _ => bail!(USAGE),
    }

    Ok(())
}

fn print_cards(cards: &[JobCard]) {
    if cards.is_empty() {
        println!("No jobs found.");
        return;
    }
    for card in cards {
        println!(
            "[{}] {} | {} | {} | {} | {} | due {}",
            card.id,
            card.title,
            card.company,
            card.employment_type,
            card.salary,
            card.location,
            card.due_date
        );
    }
}

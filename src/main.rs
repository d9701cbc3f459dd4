use std::env;
use std::sync::Arc;

use jobboard_client::{
    config::{get_config, init_config},
    derivation::ActiveFilter,
    dto::job_dto::JobCriteria,
    identity::JwtIdentityProvider,
    models::JobState,
    Identity, JobBoardClient, RestDataService, Role, Session,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = env::var("JOBBOARD_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn criteria_from_args() -> anyhow::Result<JobCriteria> {
    let mut args = env::args().skip(1);
    let mut criteria = JobCriteria {
        search_query: args.next(),
        location: args.next(),
        company_id: None,
    };
    if let Some(raw) = args.next() {
        criteria.company_id = Some(raw.parse()?);
    }
    Ok(criteria)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    init_config()?;
    let config = get_config()?;

    let user_id = env::var("JOBBOARD_USER_ID")
        .map_err(|_| anyhow::anyhow!("JOBBOARD_USER_ID must be set"))?;
    let role = match env::var("JOBBOARD_USER_ROLE") {
        Ok(raw) if !raw.is_empty() => Some(raw.parse::<Role>()?),
        _ => None,
    };

    let provider = Arc::new(JwtIdentityProvider::from_config(config));
    provider.sign_in(Identity::new(user_id, role));
    let session = Session::start(provider.clone())?;

    let service = Arc::new(RestDataService::from_config(config)?);
    let client = JobBoardClient::from_config(config, service, session);

    let criteria = criteria_from_args()?;
    info!(?criteria, policy = %config.settlement, "querying jobs");
    let jobs = client.jobs(criteria.clone());
    let settlement = jobs.trigger(()).await;

    let state = jobs.state();
    info!(?settlement, "job query settled");
    if let Some(failure) = &state.error {
        warn!(kind = ?failure.kind, "job query failed: {}", failure);
    }

    let mut listing = client.job_listing();
    listing.set_criteria(criteria);
    listing.set_state_filter(ActiveFilter::Only(JobState::Open));
    let view = listing.view(state.result.as_deref());

    info!(
        open = view.counts.get(JobState::Open),
        closed = view.counts.get(JobState::Closed),
        page = view.page.number,
        total_pages = view.page.total_pages,
        "jobs fetched"
    );
    for job in &view.page.items {
        info!(
            id = job.id,
            location = job.location.as_deref().unwrap_or("-"),
            applicants = job.applicant_count(),
            "{}",
            job.title
        );
    }

    client.sign_out();
    provider.sign_out();
    Ok(())
}

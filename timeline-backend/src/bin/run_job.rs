// src/bin/run_job.rs
//
// cron などの外部スケジューラ向けに、通知ジョブを1回だけ実行する。
//
//   run-job timeline.notify_15min_to_class
//   run-job timeline.notify_study_sometimes

use std::env;
use std::process::ExitCode;
use timeline_backend::config::AppConfig;
use timeline_backend::logging::init_tracing;
use timeline_backend::tasks::scheduler::run_job_once;
use timeline_backend::{build_job_scheduler, connect_database};

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let Some(job_name) = env::args().nth(1) else {
        eprintln!("usage: run-job <job-name>");
        return ExitCode::from(2);
    };

    match run(&job_name).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(job = %job_name, error = %e, "run-job failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(job_name: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;
    let db_pool = connect_database(&config).await?;
    let scheduler = build_job_scheduler(&config, db_pool)?;

    let Some(job) = scheduler.find(job_name) else {
        return Err(format!(
            "unknown job '{}' (available: {})",
            job_name,
            scheduler.job_names().join(", ")
        )
        .into());
    };

    run_job_once(job.as_ref()).await?;
    Ok(())
}

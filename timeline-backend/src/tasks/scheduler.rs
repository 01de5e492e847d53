// src/tasks/scheduler.rs

//! tokio::time::interval ベースの定期実行。
//!
//! ジョブごとに独立したタスクで回す。前回の実行が間隔を超えた場合は次の tick を
//! 遅らせるので、同じジョブがプロセス内で重なって走ることはない。

use crate::error::AppResult;
use crate::log_with_context;
use crate::tasks::PeriodicJob;
use chrono::Utc;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

struct ScheduledJob {
    job: Arc<dyn PeriodicJob>,
    every: Duration,
}

#[derive(Default)]
pub struct JobScheduler {
    jobs: Vec<ScheduledJob>,
}

impl JobScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// 間隔 0 は tokio の interval が受け付けないので登録しない
    pub fn register(&mut self, job: Arc<dyn PeriodicJob>, every: Duration) {
        if every.is_zero() {
            warn!(job = job.name(), "Zero interval, job not scheduled");
            return;
        }
        self.jobs.push(ScheduledJob { job, every });
    }

    pub fn job_names(&self) -> Vec<&'static str> {
        self.jobs.iter().map(|scheduled| scheduled.job.name()).collect()
    }

    pub fn find(&self, name: &str) -> Option<Arc<dyn PeriodicJob>> {
        self.jobs
            .iter()
            .find(|scheduled| scheduled.job.name() == name)
            .map(|scheduled| scheduled.job.clone())
    }

    /// 登録済みジョブをバックグラウンドで開始
    pub fn spawn(self) -> Vec<JoinHandle<()>> {
        self.jobs
            .into_iter()
            .map(|scheduled| tokio::spawn(run_every(scheduled.job, scheduled.every)))
            .collect()
    }
}

/// ジョブを1回実行し、所要時間と結果をログに出す
pub async fn run_job_once(job: &dyn PeriodicJob) -> AppResult<()> {
    let started = Instant::now();
    log_with_context!(tracing::Level::DEBUG, "Job started", "job" => job.name());

    let result = job.run(Utc::now()).await;
    let duration_ms = started.elapsed().as_millis();

    match &result {
        Ok(()) => log_with_context!(
            tracing::Level::INFO,
            "Job finished",
            "job" => job.name(),
            "duration_ms" => duration_ms,
        ),
        Err(e) => log_with_context!(
            tracing::Level::ERROR,
            "Job failed",
            "job" => job.name(),
            "duration_ms" => duration_ms,
            "error" => e,
        ),
    }

    result
}

async fn run_every(job: Arc<dyn PeriodicJob>, every: Duration) {
    info!(job = job.name(), every_secs = every.as_secs(), "⏰ Job scheduled");

    let mut interval = tokio::time::interval(every);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;
        // 失敗は次の tick で再試行（フラグ未更新のクラスが再度対象になる）
        let _ = run_job_once(job.as_ref()).await;
    }
}

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::future::Future;
use std::io::ErrorKind;

use chrono::{DateTime, Local};
use futures::stream::FuturesUnordered;
use tracing::Instrument;
use tokio::task::JoinHandle;
use serde::{Serialize, Deserialize};

use crate::state::ArcShared;
use crate::error::{self, Context};
use crate::path::{self, Kind};

mod session;

// sec  min   hour    day of month   month   day of week   year
// 0    0     *       *              *       *             *

/// every hour on the hour
const SESSION_CLEANUP: &str = "0 0 * * * * *";

/// last completed run of a job, kept on disk so a restart knows whether
/// a scheduled run was missed
#[derive(Debug, Default, Serialize, Deserialize)]
struct RunRecord {
    last_run: Option<DateTime<Local>>
}

impl RunRecord {
    fn load(file: &Path) -> error::Result<Self> {
        match std::fs::read(file) {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .context(format!("invalid job record: \"{}\"", file.display())),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(RunRecord::default()),
            Err(err) => Err(err.into()),
        }
    }

    async fn save(&self, file: &Path) -> error::Result<()> {
        let bytes = serde_json::to_vec(self)
            .context("failed to serialize job record")?;

        tokio::fs::write(file, bytes)
            .await
            .context(format!("failed to write job record: \"{}\"", file.display()))
    }
}

/// a named task run on a cron schedule
struct Job<F> {
    state: ArcShared,
    schedule: cron::Schedule,
    record: RunRecord,
    record_file: PathBuf,
    runner: F,
}

impl<F, T> Job<F>
where
    T: Future<Output = error::Result<()>>,
    F: Fn(ArcShared) -> T,
{
    /// runs the task and records the time it finished. a failed run is
    /// logged and does not stop the schedule
    async fn run(&mut self) -> error::Result<()> {
        if let Err(err) = (self.runner)(Arc::clone(&self.state)).await {
            tracing::error!("job failed: {err}");

            return Ok(());
        }

        let finished = Local::now();

        tracing::debug!("job finished {finished}");

        self.record.last_run = Some(finished);
        self.record.save(&self.record_file).await
    }

    /// true if a scheduled time passed between the last run and now
    fn missed_run(&self, now: &DateTime<Local>) -> bool {
        let Some(last_run) = self.record.last_run else {
            return true;
        };

        self.schedule.after(&last_run)
            .next()
            .map_or(false, |scheduled| scheduled <= *now)
    }

    async fn start(mut self) -> error::Result<()> {
        if self.missed_run(&Local::now()) {
            tracing::info!("job missed or never ran. running now");

            self.run().await?;
        }

        let schedule = self.schedule.clone();

        for next in schedule.upcoming(Local) {
            let Ok(wait) = (next - Local::now()).to_std() else {
                continue;
            };

            tracing::debug!("next run at {next}");

            tokio::time::sleep(wait).await;

            tracing::info!("running job");

            self.run().await?;
        }

        tracing::info!("job schedule exhausted");

        Ok(())
    }
}

fn jobs_dir(data: &Path) -> error::Result<PathBuf> {
    let dir = data.join("jobs");

    match path::kind(&dir)? {
        Kind::Dir => Ok(dir),
        Kind::Missing => {
            std::fs::create_dir(&dir)
                .context("failed to create jobs directory")?;

            Ok(dir)
        }
        _ => Err(error::Error::new()
            .message("jobs data directory is not a directory"))
    }
}

fn spawn_job<F, T>(
    dir: &Path,
    state: &ArcShared,
    name: &'static str,
    crontab: &'static str,
    runner: F
) -> error::Result<JoinHandle<()>>
where
    T: Future<Output = error::Result<()>> + Send,
    F: Fn(ArcShared) -> T + Send + Sync + 'static,
{
    let record_file = dir.join(format!("{name}.json"));
    let job = Job {
        state: Arc::clone(state),
        schedule: cron::Schedule::from_str(crontab)?,
        record: RunRecord::load(&record_file)?,
        record_file,
        runner,
    };

    Ok(tokio::spawn(async move {
        let span = tracing::info_span!("job", name = name);

        if let Err(err) = job.start().instrument(span).await {
            tracing::error!("job {name} stopped: {err}");
        }
    }))
}

pub fn background(state: &ArcShared, data: &Path) -> error::Result<FuturesUnordered<JoinHandle<()>>> {
    let dir = jobs_dir(data)?;
    let waiter = FuturesUnordered::new();

    waiter.push(spawn_job(&dir, state, "session_cleanup", SESSION_CLEANUP, session::cleanup)?);

    Ok(waiter)
}

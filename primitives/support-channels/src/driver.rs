//! Execution driver: authenticate, list, select, then report or act.
//!
//! Every directory call is awaited one at a time in a fixed order. The first
//! failure ends the run; actions that already succeeded are left in place.

use std::io::Write;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tracing::info;

use crate::channel::{Identity, RunMode};
use crate::directory::{ChannelDirectory, DirectoryError, fetch_all_channels};
use crate::error::{Action, RunError};
use crate::selector::{Selection, SelectionPolicy, select};

/// Pause between joining and marking as read, so membership can propagate.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(5);

const SEPARATOR: &str = "--------------------";

/// Everything a run needs besides the directory client.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub mode: RunMode,
    pub dry_run: bool,
    pub policy: SelectionPolicy,
    pub settle_delay: Duration,
}

impl RunConfig {
    pub fn new(mode: RunMode) -> Self {
        Self {
            mode,
            dry_run: false,
            policy: SelectionPolicy::default(),
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }
}

/// Result of one mutating call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOutcome {
    pub name: String,
    pub action: Action,
    pub succeeded: bool,
    pub error: Option<String>,
}

/// Summary of a run that reached `Done`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub mode: RunMode,
    pub dry_run: bool,
    pub identity: Identity,
    pub selection: Selection,
    pub outcomes: Vec<ExecutionOutcome>,
}

pub struct Driver<D, W> {
    directory: D,
    config: RunConfig,
    out: W,
    outcomes: Vec<ExecutionOutcome>,
}

impl<D, W> Driver<D, W>
where
    D: ChannelDirectory,
    W: Write,
{
    pub fn new(directory: D, config: RunConfig, out: W) -> Self {
        Self {
            directory,
            config,
            out,
            outcomes: Vec::new(),
        }
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    /// Outcomes recorded so far, including the failed call of an aborted run.
    pub fn outcomes(&self) -> &[ExecutionOutcome] {
        &self.outcomes
    }

    pub async fn run(&mut self) -> Result<RunReport, RunError> {
        let identity = self.directory.authenticate().await.map_err(RunError::Auth)?;
        info!(
            user = %identity.user,
            user_id = %identity.user_id,
            team = %identity.team,
            team_id = %identity.team_id,
            "authenticated"
        );
        writeln!(
            self.out,
            "Logged in as: {} ({})\n\tTeam: {} ({})",
            identity.user, identity.user_id, identity.team, identity.team_id
        )?;

        let channels = fetch_all_channels(&self.directory)
            .await
            .map_err(RunError::List)?;
        info!(count = channels.len(), "listed channels");

        let mode = self.config.mode;
        let selection = select(&channels, mode, &self.config.policy);
        info!(
            mode = ?mode,
            selected = selection.names.len(),
            unreachable = selection.unreachable.len(),
            "selected channels"
        );

        writeln!(self.out, "\n{SEPARATOR}")?;

        if selection.is_empty() {
            writeln!(
                self.out,
                "There are no support channels left for you to {}.",
                mode.infinitive()
            )?;
            if mode == RunMode::Leave && !selection.unreachable.is_empty() {
                self.print_manual_leave(&selection)?;
            }
            return Ok(self.report(identity, selection));
        }

        writeln!(
            self.out,
            "You will be {} the following channels:",
            mode.progressive()
        )?;
        for name in &selection.names {
            writeln!(self.out, "{name}")?;
        }

        if self.config.dry_run {
            writeln!(self.out, "\n{SEPARATOR}")?;
            if mode == RunMode::Leave {
                self.print_manual_leave(&selection)?;
                writeln!(self.out)?;
            }
            let performed = match mode {
                RunMode::Join => "joins",
                RunMode::Leave => "exits",
            };
            writeln!(self.out, "Dry run only, no {performed} were performed.")?;
            return Ok(self.report(identity, selection));
        }

        match mode {
            RunMode::Join => {
                self.join_all(&selection).await?;
                self.mark_all_read(&selection).await?;
            }
            RunMode::Leave => {
                writeln!(self.out, "\n{SEPARATOR}")?;
                self.leave_all(&selection).await?;
                writeln!(self.out, "\n{SEPARATOR}")?;
                self.print_manual_leave(&selection)?;
            }
        }

        writeln!(self.out, "\n{SEPARATOR}")?;
        writeln!(self.out, "Done!\n")?;
        Ok(self.report(identity, selection))
    }

    async fn join_all(&mut self, selection: &Selection) -> Result<(), RunError> {
        for (name, id) in &selection.ids {
            let result = self.directory.join_channel(name, id).await;
            self.record(name, Action::Join, result)?;
            writeln!(self.out, "Joined {name}")?;
        }
        Ok(())
    }

    async fn leave_all(&mut self, selection: &Selection) -> Result<(), RunError> {
        for (name, id) in &selection.ids {
            let result = self.directory.leave_channel(id).await;
            self.record(name, Action::Leave, result)?;
            writeln!(self.out, "Left {name}")?;
        }
        Ok(())
    }

    async fn mark_all_read(&mut self, selection: &Selection) -> Result<(), RunError> {
        writeln!(self.out, "\n{SEPARATOR}")?;
        writeln!(self.out, "Marking all the joined channels as read.")?;
        tokio::time::sleep(self.config.settle_delay).await;

        let ts = unix_timestamp();
        writeln!(self.out, "{ts}")?;
        for (name, id) in &selection.ids {
            let result = self.directory.mark_read(id, &ts).await;
            self.record(name, Action::MarkRead, result)?;
            writeln!(self.out, "{name} is marked as read.")?;
        }
        Ok(())
    }

    /// Records the outcome of one call and turns a failure into the run error.
    fn record(
        &mut self,
        name: &str,
        action: Action,
        result: Result<(), DirectoryError>,
    ) -> Result<(), RunError> {
        match result {
            Ok(()) => {
                self.outcomes.push(ExecutionOutcome {
                    name: name.to_string(),
                    action,
                    succeeded: true,
                    error: None,
                });
                Ok(())
            }
            Err(source) => {
                self.outcomes.push(ExecutionOutcome {
                    name: name.to_string(),
                    action,
                    succeeded: false,
                    error: Some(source.to_string()),
                });
                writeln!(self.out, "Failed to {action} {name}: {source}")?;
                Err(RunError::Action {
                    action,
                    channel: name.to_string(),
                    source,
                })
            }
        }
    }

    fn print_manual_leave(&mut self, selection: &Selection) -> Result<(), RunError> {
        writeln!(self.out, "The following shared channels must be left manually:")?;
        for name in &selection.unreachable {
            writeln!(self.out, "{name}")?;
        }
        Ok(())
    }

    fn report(&self, identity: Identity, selection: Selection) -> RunReport {
        RunReport {
            mode: self.config.mode,
            dry_run: self.config.dry_run,
            identity,
            selection,
            outcomes: self.outcomes.clone(),
        }
    }
}

/// Current time as whole Unix seconds, the read-cursor format Slack accepts.
fn unix_timestamp() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
        .to_string()
}

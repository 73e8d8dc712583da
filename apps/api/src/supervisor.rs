//! Worker process supervision
//!
//! Scaling across cores is done by replicating the whole server process: one
//! worker per slot, each with its own memory, caches, and loaders. The
//! supervisor owns the slots, watches each worker's exit status, and respawns a
//! replacement after a short delay so the worker count stays constant.
//!
//! Workers are spawned with `kill_on_drop`, so dropping the supervisor
//! handle tears the whole tree down.

use std::sync::Arc;
use std::time::Duration;

use quill_shared_config::{parse_env, ConfigError, ConfigResult};
use tokio::process::Command;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Supervisor configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct SupervisorConfig {
    /// Number of worker slots (default: available parallelism)
    pub worker_count: usize,
    /// Pause before respawning an exited worker
    pub restart_delay: Duration,
}

impl SupervisorConfig {
    /// Load configuration from `WORKER_COUNT` and `RESTART_DELAY_MS`
    pub fn from_env() -> ConfigResult<Self> {
        let worker_count: usize = parse_env("WORKER_COUNT", default_worker_count())?;
        if worker_count == 0 {
            return Err(ConfigError::InvalidValue(
                "WORKER_COUNT".to_string(),
                "must be at least 1".to_string(),
            ));
        }
        let restart_delay_ms: u64 = parse_env("RESTART_DELAY_MS", 1_000)?;

        Ok(Self {
            worker_count,
            restart_delay: Duration::from_millis(restart_delay_ms),
        })
    }
}

fn default_worker_count() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Lifecycle notification emitted by a worker slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerEvent {
    /// A worker process came up in the slot
    Started { slot: usize, pid: Option<u32> },
    /// The slot's worker process exited; a respawn follows
    Exited { slot: usize, success: bool },
}

type CommandFactory = dyn Fn(usize) -> Command + Send + Sync;

/// Spawns and restarts one worker process per slot
pub struct Supervisor {
    config: SupervisorConfig,
    factory: Arc<CommandFactory>,
}

/// Running supervisor: event stream plus the slot tasks
///
/// Dropping the handle aborts every slot task, which in turn kills the
/// worker processes it spawned.
pub struct SupervisorHandle {
    /// Lifecycle events from all slots, in arrival order
    pub events: mpsc::UnboundedReceiver<WorkerEvent>,
    tasks: Vec<JoinHandle<()>>,
}

impl Drop for SupervisorHandle {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

impl Supervisor {
    /// Create a supervisor over a command factory
    ///
    /// The factory builds the command for a slot; it is called again on
    /// every respawn.
    pub fn new(
        config: SupervisorConfig,
        factory: impl Fn(usize) -> Command + Send + Sync + 'static,
    ) -> Self {
        Self {
            config,
            factory: Arc::new(factory),
        }
    }

    /// Spawn all worker slots and return a handle observing them
    pub fn start(&self) -> SupervisorHandle {
        let (tx, rx) = mpsc::unbounded_channel();

        let tasks = (0..self.config.worker_count)
            .map(|slot| {
                tokio::spawn(run_slot(
                    slot,
                    Arc::clone(&self.factory),
                    self.config.restart_delay,
                    tx.clone(),
                ))
            })
            .collect();

        SupervisorHandle { events: rx, tasks }
    }

    /// Run until a shutdown signal arrives, then kill all workers
    pub async fn run(self) -> anyhow::Result<()> {
        let mut handle = self.start();
        let mut shutdown = std::pin::pin!(tokio::signal::ctrl_c());

        loop {
            tokio::select! {
                result = &mut shutdown => {
                    result?;
                    tracing::info!("shutdown signal received, stopping workers");
                    break;
                }
                event = handle.events.recv() => {
                    // Slots log their own lifecycle; just keep draining
                    if event.is_none() {
                        break;
                    }
                }
            }
        }

        Ok(())
    }
}

/// One slot's life: spawn, wait, report, pause, repeat.
async fn run_slot(
    slot: usize,
    factory: Arc<CommandFactory>,
    restart_delay: Duration,
    events: mpsc::UnboundedSender<WorkerEvent>,
) {
    loop {
        let mut command = factory(slot);
        command.kill_on_drop(true);

        match command.spawn() {
            Ok(mut child) => {
                let pid = child.id();
                tracing::info!(slot, pid, "worker started");
                let _ = events.send(WorkerEvent::Started { slot, pid });

                match child.wait().await {
                    Ok(status) => {
                        let success = status.success();
                        if success {
                            tracing::info!(slot, "worker exited cleanly");
                        } else {
                            tracing::warn!(slot, %status, "worker exited abnormally");
                        }
                        let _ = events.send(WorkerEvent::Exited { slot, success });
                    }
                    Err(e) => {
                        tracing::error!(slot, error = %e, "failed waiting on worker");
                        let _ = events.send(WorkerEvent::Exited {
                            slot,
                            success: false,
                        });
                    }
                }
            }
            Err(e) => {
                tracing::error!(slot, error = %e, "failed to spawn worker");
            }
        }

        tokio::time::sleep(restart_delay).await;
    }
}

//! Command: persist the desired state and run every provisioning step.
use std::sync::mpsc;
use std::sync::Arc;

use anyhow::{Context as _, Result};

use crate::cli::GlobalOpts;
use crate::logging::{Log, Logger};
use crate::progress::{ChannelLog, ChannelSink, ProgressSink};
use crate::tasks::{self, Context, Task};

/// Printed once the worker has finished and the summary is out.
pub const COMPLETION_MARKER: &str = "provisioning finished";

/// Run the provision command.
///
/// # Errors
///
/// Returns an error if the home directory cannot be resolved, the desired
/// state cannot be saved, or any step failed.
pub fn run(global: &GlobalOpts, log: &Arc<Logger>) -> Result<()> {
    let setup = super::CommandSetup::init(global, log)?;

    let state = setup.state.load();
    setup
        .state
        .save(&state)
        .context("saving desired state")?;
    log.info(&format!(
        "saved desired state to {}",
        setup.state.state_file().display()
    ));

    run_on_worker(
        tasks::all_provision_tasks(),
        |worker_log, sink| setup.context(state, worker_log, sink),
        log,
    )
}

/// Run `tasks` in order on a dedicated thread.
///
/// `make_ctx` receives the worker's log and progress sink, both of which
/// send over one channel. This thread replays that channel on `log` until
/// the worker reports it is finished, then prints the summary and the
/// completion marker.
///
/// # Errors
///
/// Returns an error if the worker could not be started or panicked, or if
/// any step failed.
pub fn run_on_worker<F>(tasks: Vec<Box<dyn Task>>, make_ctx: F, log: &Arc<Logger>) -> Result<()>
where
    F: FnOnce(Arc<dyn Log>, Arc<dyn ProgressSink>) -> Context,
{
    let (tx, rx) = mpsc::channel();
    let sink = ChannelSink::new(tx.clone());
    let results: Arc<dyn Log> = log.clone();
    let ctx = make_ctx(
        Arc::new(ChannelLog::new(tx, results)),
        Arc::new(sink.clone()),
    );

    let worker = std::thread::Builder::new()
        .name("provision".to_string())
        .spawn(move || {
            for task in &tasks {
                tasks::execute(task.as_ref(), &ctx);
            }
            sink.finish();
        })
        .context("starting provisioning worker")?;

    // Ends on Finished, or when every sender is gone if the worker died.
    for event in &rx {
        if !event.replay(log.as_ref()) {
            break;
        }
    }

    worker
        .join()
        .map_err(|_| anyhow::anyhow!("provisioning worker panicked"))?;

    log.print_summary();
    log.stage(COMPLETION_MARKER);

    let count = log.failure_count();
    if count > 0 {
        anyhow::bail!("{count} task(s) failed");
    }
    Ok(())
}

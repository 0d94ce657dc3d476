//! Command: regenerate the shell configuration without installing anything.
use std::sync::Arc;

use anyhow::Result;

use crate::cli::GlobalOpts;
use crate::logging::Logger;
use crate::progress::LogSink;
use crate::tasks::Task;
use crate::tasks::generate::GenerateConfiguration;

/// Run the apply command.
///
/// # Errors
///
/// Returns an error if the home directory cannot be resolved or generation
/// failed.
pub fn run(global: &GlobalOpts, log: &Arc<Logger>) -> Result<()> {
    let setup = super::CommandSetup::init(global, log)?;
    let state = setup.state.load();
    let ctx = setup.context(
        state,
        log.clone(),
        Arc::new(LogSink::new(log.clone())),
    );

    let tasks: Vec<Box<dyn Task>> = vec![Box::new(GenerateConfiguration)];
    super::run_tasks_to_completion(tasks.iter().map(Box::as_ref), &ctx, log)
}

//! Application startup and run orchestration

use super::cli::{Args, RunSettings};
use super::error::AppError;
use crate::core::cancellation::CancellationToken;
use crate::core::error_handling::{fatal_line, log_error_with_context};
use crate::core::logging::{flush_logging, init_logging};
use crate::core::shutdown::ShutdownCoordinator;
use crate::core::time::{SystemTimeProvider, TimeProvider};
use crate::core::version::long_version;
use crate::metrics::report::{self, RunSummary};
use crate::metrics::{Analytics, MetricsSink, RunShape};
use crate::queue::PriorityQueue;
use crate::worker::{WorkerContext, WorkerPool, WorkerReport};
use std::io::IsTerminal;
use std::process::ExitCode;
use std::sync::Arc;

/// Parse arguments, run the simulation and print the summary
pub fn startup() -> ExitCode {
    let mut args = Args::parse_styled();

    let config_result = args.load_config();
    let use_color = args
        .color
        .unwrap_or_else(|| std::io::stdout().is_terminal());
    colored::control::set_override(use_color);

    let logging_ready = match init_logging(
        args.log_level.as_deref(),
        args.log_format.unwrap_or_default(),
        args.effective_log_file().map(|path| path.as_path()),
        use_color,
    ) {
        Ok(()) => true,
        Err(e) => {
            eprintln!("Error: failed to initialise logging: {}", e);
            false
        }
    };

    let report_fatal = |error: &AppError, context: &str| {
        if logging_ready {
            log_error_with_context(error, context);
        } else {
            eprintln!("FATAL: {}", fatal_line(error, context));
        }
    };

    match config_result {
        Ok(Some(path)) => log::debug!("Loaded configuration from {}", path.display()),
        Ok(None) => log::debug!("No configuration file found"),
        Err(e) => {
            report_fatal(&e, "Configuration loading");
            flush_logging();
            return ExitCode::FAILURE;
        }
    }

    let settings = match args.validate() {
        Ok(settings) => settings,
        Err(e) => {
            report_fatal(&AppError::from(e), "Argument validation");
            flush_logging();
            return ExitCode::FAILURE;
        }
    };

    log::info!("prioflow {} starting", long_version());
    log::debug!("Run settings: {:?}", settings);

    let exit_code = match run(&settings) {
        Ok(summary) => match report::render(&summary, settings.summary_format, use_color) {
            Ok(text) => {
                println!("{}", text);
                ExitCode::SUCCESS
            }
            Err(e) => {
                report_fatal(&AppError::from(e), "Summary rendering");
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            report_fatal(&e, "Simulation run");
            ExitCode::FAILURE
        }
    };

    flush_logging();
    exit_code
}

/// Run one simulation to completion and collect its summary
///
/// Blocks until the run time elapses, a termination signal arrives or a
/// worker fails, then joins every worker before returning.
pub fn run(settings: &RunSettings) -> Result<RunSummary, AppError> {
    let clock: Arc<dyn TimeProvider> = Arc::new(SystemTimeProvider);
    let token = CancellationToken::new();
    let queue = PriorityQueue::new(settings.queue_capacity, token.clone())?;

    let analytics = Arc::new(Analytics::with_clock(
        RunShape {
            producers: settings.workers.producers,
            consumers: settings.workers.consumers,
            queue_capacity: settings.queue_capacity,
        },
        clock.clone(),
    ));
    let sink: Arc<dyn MetricsSink> = analytics.clone();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let started_at = clock.system_time();
    let pool = WorkerPool::spawn(
        &settings.workers,
        WorkerContext {
            queue: queue.clone(),
            sink,
            clock: clock.clone(),
        },
    )?;
    log::info!(
        "Started {} workers on a queue of {} for {}s",
        pool.len(),
        queue.capacity(),
        settings.run_time.as_secs()
    );

    let (coordinator, shutdown_rx) = ShutdownCoordinator::new(token);
    let reason = runtime.block_on(coordinator.run_until(settings.run_time, shutdown_rx));

    let reports = join_workers(&runtime, pool)?;
    let finished_at = clock.system_time();
    for worker in &reports {
        log::debug!(
            "{} processed {} items, blocked {} times",
            worker.name(),
            worker.processed,
            worker.blocked
        );
    }
    log::info!(
        "All workers stopped ({}); {} items left in the queue",
        reason,
        queue.size()
    );

    Ok(RunSummary::new(
        long_version(),
        started_at,
        finished_at,
        reason.to_string(),
        analytics.snapshot(),
    ))
}

/// Join every worker while `runtime` keeps serving the signal handlers
///
/// A second signal during a slow teardown can still force the exit.
fn join_workers(
    runtime: &tokio::runtime::Runtime,
    pool: WorkerPool,
) -> Result<Vec<WorkerReport>, AppError> {
    let reports = runtime.block_on(tokio::task::spawn_blocking(move || pool.join()))??;
    Ok(reports)
}

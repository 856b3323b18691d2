pub mod generate;
pub mod probe;
pub mod scan;
pub mod server;

use rangerng_core::GenerationError;

/// Exit statuses, from BSD `sysexits.h`.
pub const EX_USAGE: i32 = 64;
pub const EX_UNAVAILABLE: i32 = 69;
pub const EX_OSERR: i32 = 71;
pub const EX_TEMPFAIL: i32 = 75;

/// Set up `env_logger`: `warn` unless `RUST_LOG` says otherwise, `debug` with `--verbose`.
pub fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.format_timestamp(None).init();
}

/// Process exit status for a failed draw.
pub fn exit_code_for(err: &GenerationError) -> i32 {
    match err {
        GenerationError::InvalidRange { .. } => EX_USAGE,
        GenerationError::SourceUnavailable { .. } => EX_UNAVAILABLE,
        GenerationError::HardwareRandomExhausted { .. } => EX_TEMPFAIL,
        GenerationError::ContextAcquisitionFailed { .. }
        | GenerationError::RandomGenerationFailed { .. }
        | GenerationError::AllocationFailed { .. } => EX_OSERR,
    }
}

/// Print the error and exit with its mapped status.
pub fn fail(err: &GenerationError) -> ! {
    log::debug!("exiting on {err:?}");
    eprintln!("Error: {err}");
    if err.is_transient() {
        eprintln!("  (transient failure, retrying may succeed)");
    }
    std::process::exit(exit_code_for(err));
}

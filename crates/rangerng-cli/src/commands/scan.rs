use rangerng_core::{
    BackendId, PlatformInfo, Range, all_sources, capabilities, platform_info, source_for,
};
use serde::Serialize;

#[derive(Serialize)]
struct ScanReport {
    platform: PlatformInfo,
    backends: Vec<BackendStatus>,
    self_test: Option<i64>,
}

#[derive(Serialize)]
struct BackendStatus {
    name: BackendId,
    label: &'static str,
    description: &'static str,
    supported: bool,
}

pub fn run(json: bool) {
    let caps = capabilities();
    log::debug!("capabilities: {caps:?}");
    let backends: Vec<BackendStatus> = all_sources()
        .iter()
        .map(|s| {
            let info = s.info();
            BackendStatus {
                name: info.id,
                label: info.label,
                description: info.description,
                supported: caps.get(info.id),
            }
        })
        .collect();

    // The OS pool is always present, so a failed draw here is worth reporting.
    let self_test = match Range::new(1, 6).and_then(|die| {
        source_for(BackendId::OsPool).raw().map(|raw| die.map(raw))
    }) {
        Ok(v) => Some(v),
        Err(e) => {
            log::warn!("os_pool self-test failed: {e}");
            None
        }
    };

    let report = ScanReport {
        platform: platform_info(),
        backends,
        self_test,
    };

    if json {
        match serde_json::to_string_pretty(&report) {
            Ok(s) => println!("{s}"),
            Err(e) => {
                eprintln!("Error: failed to encode report: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    let info = &report.platform;
    println!("Platform: {} {} ({})", info.system, info.machine, info.family);
    println!();

    let n_supported = report.backends.iter().filter(|b| b.supported).count();
    println!(
        "{n_supported} of {} backend(s) supported:\n",
        report.backends.len()
    );
    for b in &report.backends {
        let mark = if b.supported { "\u{2705}" } else { "\u{274C}" };
        println!(
            "  {mark} {:<12} {:<18} {}",
            b.name.as_str(),
            b.label,
            b.description
        );
    }

    println!();
    match report.self_test {
        Some(v) => println!("Self-test: os_pool rolled a {v} on a d6"),
        None => println!("Self-test: os_pool draw FAILED (run with --verbose)"),
    }
}

use std::time::Instant;

use rangerng_core::{BackendId, Range, source_for};

pub fn run(backend: BackendId) {
    let src = source_for(backend);
    let info = src.info();
    println!("Probing: {} ({})", info.label, info.id);
    println!("  {}", info.description);
    println!("  Platform:     {}", info.platform);
    if !info.requirements.is_empty() {
        let reqs: Vec<String> = info.requirements.iter().map(|r| r.to_string()).collect();
        println!("  Requires:     {}", reqs.join(", "));
    }
    println!();

    if !src.is_available() {
        println!("  Supported:    no");
        std::process::exit(super::EX_UNAVAILABLE);
    }
    println!("  Supported:    yes");

    let t0 = Instant::now();
    let raw = match src.raw() {
        Ok(raw) => raw,
        Err(e) => super::fail(&e),
    };
    let elapsed = t0.elapsed();

    println!("  Raw draw:     0x{raw:016X}");
    if let Ok(die) = Range::new(1, 6) {
        println!("  As a d6:      {}", die.map(raw));
    }
    println!("  Time:         {:.1}µs", elapsed.as_secs_f64() * 1e6);
}

use rangerng_core::{BackendId, generate_many};
use serde::Serialize;

pub struct GenerateCommandConfig {
    pub backend: BackendId,
    pub min: i64,
    pub max: i64,
    pub count: usize,
    pub json: bool,
}

#[derive(Serialize)]
struct GenerateOutput<'a> {
    backend: BackendId,
    min: i64,
    max: i64,
    values: &'a [i64],
}

pub fn run(cfg: GenerateCommandConfig) {
    let count = cfg.count.max(1);
    log::debug!(
        "drawing {count} value(s) in [{}, {}] from {}",
        cfg.min,
        cfg.max,
        cfg.backend
    );

    let values = match generate_many(cfg.backend, cfg.min, cfg.max, count) {
        Ok(v) => v,
        Err(e) => super::fail(&e),
    };

    if cfg.json {
        let out = GenerateOutput {
            backend: cfg.backend,
            min: cfg.min,
            max: cfg.max,
            values: &values,
        };
        match serde_json::to_string_pretty(&out) {
            Ok(s) => println!("{s}"),
            Err(e) => {
                eprintln!("Error: failed to encode output: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    for v in values {
        println!("{v}");
    }
}

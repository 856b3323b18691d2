use rangerng_core::Generator;

pub fn run(host: &str, port: u16) {
    let generator = Generator::new();

    let base = format!("http://{host}:{port}");
    let supported: Vec<String> = generator
        .supported()
        .iter()
        .map(|b| b.to_string())
        .collect();

    println!("rangerng server v{}", rangerng_core::VERSION);
    println!("   {base}");
    println!("   backends supported: {}", supported.join(", "));
    println!();
    println!("   Endpoints:");
    println!("     GET /                 API index (try: curl {base})");
    println!("     GET /api/v1/random    Uniform integers in [min, max]");
    println!("     GET /backends         List all backends with support status");
    println!("     GET /health           Health check");
    println!();
    println!("   Query params for /api/v1/random:");
    println!("     backend=os_pool|crypto_api|hardware  (default: os_pool)");
    println!("     min=N max=N           Inclusive bounds (default: 1..100)");
    println!(
        "     count=N               Values to return (1-{}, default: 1)",
        rangerng_server::MAX_COUNT
    );
    println!();
    println!("   Examples:");
    println!("     curl '{base}/api/v1/random?min=1&max=6'");
    println!("     curl '{base}/api/v1/random?backend=hardware&min=0&max=255&count=16'");
    println!();

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: failed to start runtime: {e}");
            std::process::exit(super::EX_OSERR);
        }
    };
    if let Err(e) = rt.block_on(rangerng_server::run_server(generator, host, port)) {
        log::error!("server stopped: {e}");
        eprintln!("Error: {e}");
        std::process::exit(super::EX_OSERR);
    }
}

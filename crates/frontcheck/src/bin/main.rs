//! Frontcheck CLI

use clap::Parser;
use frontcheck::{Args, EXIT_USAGE};

#[tokio::main]
async fn main() {
    // Parse command-line arguments (clap exits with code 2 on usage errors)
    let args = Args::parse();

    let config = match frontcheck::load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e:#}");
            std::process::exit(EXIT_USAGE);
        }
    };

    // Logs go to stderr so reports on stdout stay machine-readable
    env_logger::Builder::new()
        .filter_level(frontcheck::log_level(args.verbose, &config))
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .init();

    log::debug!("Frontcheck v{}", env!("CARGO_PKG_VERSION"));
    log::debug!(
        "Schema: {} | fallback: {} | max frontmatter lines: {}",
        config.default_schema,
        config.yaml_fallback,
        config.max_frontmatter_lines
    );

    let mut stdout = std::io::stdout().lock();
    let code = match frontcheck::run(&args, config, &mut stdout).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            EXIT_USAGE
        }
    };

    std::process::exit(code);
}

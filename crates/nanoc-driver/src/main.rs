use clap::Parser;
use nanoc_driver::cli::Cli;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.quiet { "warn" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_env("NANOC_LOG").unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(std::io::stderr)
        .init();

    match nanoc_driver::run(&cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("nanoc: {e:#}");
            std::process::exit(1);
        }
    }
}

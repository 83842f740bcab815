use tracing_subscriber::EnvFilter;

fn main() {
    // Default to warnings only; `vt --debug` raises the crate to debug.
    let filter = if std::env::args().any(|a| a == "--debug") {
        EnvFilter::new("warn,vocabtree=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = vocabtree::cli::run() {
        eprintln!("error: {:#}", err);
        std::process::exit(1);
    }
}

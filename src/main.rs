use tracing_subscriber::EnvFilter;

fn main() -> std::io::Result<()> {
    // stdout carries the UCI protocol, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    thorn_chess::uci::uci_top::run_stdio_loop()
}

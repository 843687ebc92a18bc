use tracing::Level;

/// Installs the global `tracing` subscriber, writing to stderr
///
/// Reports and tables go to files, so stderr only carries progress and
/// diagnostics such as lines that could not be parsed.
pub fn init(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

mod app;
mod cli;
mod logger;

use std::io;
use std::process;

use tiny_regex::Error;

// Usage: tiny-regex <subject> <pattern>
fn main() {
    let cfg = cli::parse_args();
    if let Err(err) = logger::Logger::init(cfg.log_level()) {
        eprintln!("failed to install logger: {err}");
    }

    let mut stdout = io::stdout().lock();
    if let Err(err) = app::run(&cfg, &mut stdout) {
        eprintln!("{err:#}");
        if let Some(Error::InvalidPattern) = err.downcast_ref::<Error>() {
            eprintln!("{}", cli::usage());
        }
        process::exit(1);
    }
}

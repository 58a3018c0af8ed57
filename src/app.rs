use std::io::Write;

use anyhow::{Context, Result};
use tiny_regex::regex::{Compiler, Error, match_full};

use crate::cli::Config;

/// Compiles the pattern, matches it and writes the report to `out`.
///
/// An invalid pattern comes back as [`Error::InvalidPattern`] so the caller
/// can print usage.
pub fn run(cfg: &Config, out: &mut impl Write) -> Result<()> {
    let regex = match Compiler::new()
        .capacity(cfg.capacity)
        .soft_fail(cfg.soft_fail)
        .compile(cfg.pattern.as_bytes())
    {
        Ok(regex) => regex,
        Err(Error::InvalidPattern) => return Err(Error::InvalidPattern.into()),
        Err(err) => {
            return Err(err).with_context(|| format!("failed to compile `{}`", cfg.pattern));
        }
    };

    if cfg.dump {
        write!(out, "{regex}")?;
    }

    let matched = match_full(&regex, cfg.subject.as_bytes());
    log::info!("`{}` against {:?}: {matched}", cfg.pattern, cfg.subject);
    writeln!(out, "{matched}")?;

    if !cfg.no_usage {
        let region = regex.region();
        writeln!(out, "\n{}/{} bytes used", region.used(), region.capacity())?;
    }
    Ok(())
}

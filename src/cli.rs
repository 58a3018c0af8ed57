use clap::{CommandFactory, Parser};

use tiny_regex::regex::DEFAULT_CAPACITY;

/// Reports whether PATTERN matches the whole of SUBJECT.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Text to match against
    #[arg(value_name = "SUBJECT")]
    pub subject: String,

    /// Pattern to compile
    #[arg(value_name = "PATTERN")]
    pub pattern: String,

    /// Size of the token region in bytes
    #[arg(long, value_name = "BYTES", default_value_t = DEFAULT_CAPACITY)]
    pub capacity: usize,

    /// Print the compiled tree before the result
    #[arg(long)]
    pub dump: bool,

    /// Don't print the region usage summary
    #[arg(long)]
    pub no_usage: bool,

    /// Report an exhausted region as an error instead of aborting
    #[arg(long)]
    pub soft_fail: bool,

    /// Log more (repeat for more detail)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

pub fn parse_args() -> Config {
    Config::parse()
}

pub fn usage() -> String {
    Config::command().render_usage().to_string()
}

impl Config {
    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        Config::try_parse_from(std::iter::once("tiny-regex").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn takes_subject_then_pattern() {
        let cfg = parse(&["aaa", "a*"]);
        assert_eq!(cfg.subject, "aaa");
        assert_eq!(cfg.pattern, "a*");
        assert_eq!(cfg.capacity, DEFAULT_CAPACITY);
        assert!(!cfg.dump && !cfg.no_usage && !cfg.soft_fail);
    }

    #[test]
    fn reads_flags() {
        let cfg = parse(&["--dump", "--capacity", "128", "-vv", "x", "y"]);
        assert!(cfg.dump);
        assert_eq!(cfg.capacity, 128);
        assert_eq!(cfg.log_level(), log::LevelFilter::Debug);
    }

    #[test]
    fn needs_both_arguments() {
        assert!(Config::try_parse_from(["tiny-regex", "only-subject"]).is_err());
    }

    #[test]
    fn usage_names_the_arguments() {
        let text = usage();
        assert!(text.contains("SUBJECT"));
        assert!(text.contains("PATTERN"));
    }
}

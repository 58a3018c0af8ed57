use log::Log;

/// Writes every record to stderr. Filtering is left to `log::set_max_level`.
#[derive(Debug)]
pub struct Logger(());

const LOGGER: &Logger = &Logger(());

impl Logger {
    pub fn init(level: log::LevelFilter) -> Result<(), log::SetLoggerError> {
        log::set_logger(LOGGER)?;
        log::set_max_level(level);
        Ok(())
    }
}

impl Log for Logger {
    fn enabled(&self, _: &log::Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &log::Record<'_>) {
        match (record.file(), record.line()) {
            (Some(file), Some(line)) => eprintln!(
                "{}|{}|{}:{}: {}",
                record.level(),
                record.target(),
                file,
                line,
                record.args()
            ),
            _ => eprintln!("{}|{}: {}", record.level(), record.target(), record.args()),
        }
    }

    fn flush(&self) {}
}

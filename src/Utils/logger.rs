use chrono::Local;
use log::info;
use simplelog::*;
use std::fs::File;

/// starts terminal logging (and optionally a timestamped log file) for the given level.
/// Initializing twice is harmless: the second call just returns `false`.
pub fn init_logger(loglevel: LevelFilter, log_to_file: bool) -> bool {
    if loglevel == LevelFilter::Off {
        return false;
    }
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        loglevel,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if log_to_file {
        let date_and_time = Local::now().format("%Y-%m-%d_%H-%M-%S");
        let name = format!("solve_log_{}.txt", date_and_time);
        if let Ok(file) = File::create(&name) {
            loggers.push(WriteLogger::new(loglevel, Config::default(), file));
        }
    }
    match CombinedLogger::init(loggers) {
        Ok(()) => {
            info!("logger started with level {}", loglevel);
            true
        }
        Err(_) => false,
    }
}

use chrono::Utc;
use log::LevelFilter;
use std::env;
use std::sync::Once;

const LOG_FILE: &str = "log.txt";
const NO_LOGS_ENV: &str = "CCY_SWAP_NO_LOGS";

pub fn init_logger() {
    init_logger_file_named(LOG_FILE)
}

pub fn init_logger_file_named(log_file: &str) {
    if env::var(NO_LOGS_ENV).is_ok() {
        return;
    }

    static INIT_LOGGER: Once = Once::new();

    INIT_LOGGER.call_once(|| {
        let _ = fern::Dispatch::new()
            .format(|out, message, record| {
                out.finish(format_args!(
                    "[{}][{}][{}] {}",
                    Utc::now().format("%Y-%m-%d %H:%M:%S,%3f"),
                    record.level(),
                    record.target(),
                    message
                ))
            })
            .chain(
                fern::Dispatch::new()
                    .level(LevelFilter::Warn)
                    .chain(std::io::stdout()),
            )
            .chain(
                fern::Dispatch::new()
                    .level(LevelFilter::Trace)
                    .level_for("actix_server", LevelFilter::Warn)
                    .level_for("actix_http", LevelFilter::Warn)
                    .level_for("hyper", LevelFilter::Warn)
                    .level_for("mio", LevelFilter::Warn)
                    .chain(
                        std::fs::OpenOptions::new()
                            .write(true)
                            .create(true)
                            .truncate(true)
                            .open(log_file)
                            .expect("Unable to open log file"),
                    ),
            )
            .apply()
            .expect("Unable to set up logger");
    })
}

/// Prints a user facing line and keeps it in the log
pub fn print_info(msg: impl AsRef<str>) {
    let msg = msg.as_ref();
    println!("{}", msg);
    log::info!("{}", msg);
}

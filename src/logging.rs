use std::{
    fmt::Write as _,
    fs::{self, OpenOptions},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    thread,
};

use chrono::{format::DelayedFormat, Local};
use crossbeam_channel::{unbounded, Sender};
use once_cell::sync::Lazy;

/// 寫檔前的緩衝上限
const LINE_BUFFER_SIZE: usize = 2048;

static LOGGER: Lazy<Logger> = Lazy::new(|| Logger::new("default"));

/// File logger with one background writer per level.
///
/// Each level owns an unbounded channel; the receiving thread batches
/// lines and flushes when the channel drains or the buffer fills up.
pub struct Logger {
    info_writer: Sender<String>,
    warn_writer: Sender<String>,
    error_writer: Sender<String>,
    debug_writer: Sender<String>,
}

impl Logger {
    pub(crate) fn new(log_name: &str) -> Self {
        Logger {
            info_writer: Self::create_writer(&format!("{}_info", log_name)),
            warn_writer: Self::create_writer(&format!("{}_warn", log_name)),
            error_writer: Self::create_writer(&format!("{}_error", log_name)),
            debug_writer: Self::create_writer(&format!("{}_debug", log_name)),
        }
    }

    pub(crate) fn info(&self, log: String) {
        self.send(log, &self.info_writer);
    }

    pub(crate) fn warn(&self, log: String) {
        self.send(log, &self.warn_writer);
    }

    pub(crate) fn error(&self, log: String) {
        self.send(log, &self.error_writer);
    }

    pub(crate) fn debug(&self, log: String) {
        self.send(log, &self.debug_writer);
    }

    fn send(&self, msg: String, writer: &Sender<String>) {
        if let Err(why) = writer.send(msg) {
            error_console(why.to_string());
        }
    }

    fn create_writer(log_name: &str) -> Sender<String> {
        let (tx, rx) = unbounded::<String>();
        let log_path = match Self::get_log_path(log_name) {
            Some(path) => path,
            None => {
                error_console(format!("Failed to create log directory for {}", log_name));
                return tx;
            }
        };

        // 寫入檔案的操作使用另一個線程處理
        thread::spawn(move || {
            let file = match OpenOptions::new().create(true).append(true).open(&log_path) {
                Ok(file) => file,
                Err(why) => {
                    error_console(format!(
                        "Failed to open log file {:?} because {:?}",
                        log_path, why
                    ));
                    return;
                }
            };

            let mut writer = BufWriter::new(file);
            let mut line = String::with_capacity(LINE_BUFFER_SIZE);

            for received in &rx {
                if writeln!(
                    &mut line,
                    "{} {}",
                    Local::now().format("%F %X%.6f"),
                    received
                )
                .is_err()
                {
                    continue;
                }

                if rx.is_empty() || line.len() >= LINE_BUFFER_SIZE {
                    if let Err(why) = writer.write_all(line.as_bytes()) {
                        error_console(format!(
                            "Failed to write to log file. because:{:#?}\r\nmsg:{}",
                            why, line
                        ));
                    }

                    if let Err(why) = writer.flush() {
                        error_console(format!("Failed to flush log file. because:{:#?}", why));
                    }

                    line.clear();
                }
            }
        });

        tx
    }

    fn get_log_path(name: &str) -> Option<PathBuf> {
        let path = Path::new("log");

        if !path.exists() {
            fs::create_dir_all(path).ok()?;
        }

        let mut log_path = PathBuf::from(path);
        log_path.push(format!("{}_{}.log", Local::now().format("%Y-%m-%d"), name));

        Some(log_path)
    }
}

pub fn info_file_async(log: String) {
    LOGGER.info(log);
}

pub fn warn_file_async(log: String) {
    LOGGER.warn(log);
}

pub fn error_file_async(log: String) {
    LOGGER.error(log);
}

pub fn debug_file_async(log: String) {
    LOGGER.debug(log);
}

pub fn error_console(log: String) {
    eprintln!(
        "{} Error {}",
        DelayedFormat::to_string(&Local::now().format("%Y-%m-%d %H:%M:%S.%3f")),
        log
    );
}

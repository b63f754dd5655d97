use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::{mpsc, Mutex, OnceLock};

use chrono::Local;

static LOGGER: OnceLock<Mutex<Logger>> = OnceLock::new();

struct Logger {
    file: File,
    sink: Option<mpsc::Sender<String>>,
}

/// Initialize the global logger. Clears the log file.
pub fn init(log_dir: &Path) {
    fs::create_dir_all(log_dir).ok();
    let log_path = log_dir.join("app.log");
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&log_path)
        .expect("failed to open log file");

    LOGGER.set(Mutex::new(Logger { file, sink: None })).ok();
}

/// Attach a channel that receives every formatted log line. This is the
/// observability sink: a front-end or harness drains it; the core never
/// reads it back.
pub fn set_sink(tx: mpsc::Sender<String>) {
    if let Some(logger) = LOGGER.get() {
        let mut l = logger.lock().unwrap();
        l.sink = Some(tx);
    }
}

fn write_log(level: &str, component: &str, msg: &str) {
    let ts = Local::now().format("%H:%M:%S").to_string();
    let line = if component.is_empty() {
        format!("[{ts}] [{level}] {msg}")
    } else {
        format!("[{ts}] [{level}] [{component}] {msg}")
    };

    if let Some(logger) = LOGGER.get() {
        let mut l = logger.lock().unwrap();
        writeln!(l.file, "{line}").ok();
        if let Some(tx) = &l.sink {
            tx.send(line).ok();
        }
    }
}

pub fn info(msg: &str) {
    write_log("INFO", "", msg);
}

pub fn warn(msg: &str) {
    write_log("WARN", "", msg);
}

pub fn error(msg: &str) {
    write_log("ERROR", "", msg);
}

/// Log tagged with a component header.
pub fn info_p(component: &str, msg: &str) {
    write_log("INFO", component, msg);
}

pub fn warn_p(component: &str, msg: &str) {
    write_log("WARN", component, msg);
}

pub fn error_p(component: &str, msg: &str) {
    write_log("ERROR", component, msg);
}

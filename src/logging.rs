// src/logging.rs
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use chrono::Local;
use env_logger::{Builder, Env, Target};

pub const LOG_FILE: &str = "download.log";

/// Copies every log line to stderr and, when available, the append-only log file.
struct Tee {
    file: Option<File>,
}

impl Write for Tee {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stderr().write_all(buf)?;
        if let Some(file) = self.file.as_mut() {
            file.write_all(buf)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()?;
        if let Some(file) = self.file.as_mut() {
            file.flush()?;
        }
        Ok(())
    }
}

fn format_line(level: log::Level, message: &std::fmt::Arguments) -> String {
    format!(
        "{} {} {}: {}",
        env!("CARGO_PKG_NAME"),
        Local::now().format("%Y-%m-%d %H:%M:%S"),
        level.as_str().to_lowercase(),
        message
    )
}

/// Console + `download.log`, `info` unless RUST_LOG says otherwise.
pub fn init(log_path: &Path) {
    let file = match OpenOptions::new().create(true).append(true).open(log_path) {
        Ok(file) => Some(file),
        Err(e) => {
            eprintln!("Could not open {}: {} (logging to console only)", log_path.display(), e);
            None
        }
    };

    Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| writeln!(buf, "{}", format_line(record.level(), record.args())))
        .target(Target::Pipe(Box::new(Tee { file })))
        .init();
}

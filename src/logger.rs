use log::{LevelFilter, Record};
use env_logger::Builder;
use std::io::{self, Write};
use chrono::{DateTime, Local};

/// Installs the process logger at `Info`; `RUST_LOG` overrides the level.
/// Safe to call more than once.
pub fn init() {
    init_with(LevelFilter::Info);
}

pub fn init_with(level: LevelFilter) {
    let installed = Builder::new()
        .format(|buf, record| write_line(buf, Local::now(), record))
        .filter(None, level)
        .parse_default_env()
        .try_init();

    if installed.is_ok() {
        log::debug!("Logger initialized at {}", level);
    }
}

/// `2024-05-01 09:30:00 WARN  cache: message`, with the target cut down to
/// its last path segment.
fn write_line<W: Write>(out: &mut W, now: DateTime<Local>, record: &Record) -> io::Result<()> {
    let module = record.target().rsplit("::").next().unwrap_or_default();
    writeln!(
        out,
        "{} {:<5} {}: {}",
        now.format("%Y-%m-%d %H:%M:%S"),
        record.level(),
        module,
        record.args()
    )
}

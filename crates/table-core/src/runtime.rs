#![cfg(feature = "server")]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;
use std::time::Instant;

static SHUTDOWN: AtomicBool = AtomicBool::new(false);
static DEADLINE: OnceLock<Instant> = OnceLock::new();

/// Initialize the dual-sink logger: terminal at Info, a timestamped file under `logs/`
/// at Debug. Call once, before anything else, from the binary's `main`.
pub fn log() {
    let _ = std::fs::create_dir_all("logs");
    let stamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    let path = format!("logs/table-{stamp}.log");
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path);
    let mut loggers: Vec<Box<dyn simplelog::SharedLogger>> = vec![simplelog::TermLogger::new(
        log::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )];
    match file {
        Ok(file) => loggers.push(simplelog::WriteLogger::new(
            log::LevelFilter::Debug,
            simplelog::Config::default(),
            file,
        )),
        Err(e) => eprintln!("could not open log file {path}: {e}"),
    }
    if simplelog::CombinedLogger::init(loggers).is_err() {
        // already initialized (e.g. called twice, or by a test harness) - not fatal.
    }
}

/// Hard shutdown: a bare ctrl-c exits the process immediately. Spawn once at startup.
pub fn kys() {
    tokio::spawn(async {
        let _ = tokio::signal::ctrl_c().await;
        log::warn!("received ctrl-c, exiting immediately");
        std::process::exit(0);
    });
}

/// Soft shutdown: typing "Q" on stdin, or an optional `TABLE_SHUTDOWN_AFTER_SECS` deadline,
/// flips a process-wide flag that `interrupted()` callers poll between mutations so an
/// in-flight hand finishes (and its snapshot write completes) before the accept loop stops.
pub fn brb() {
    if let Ok(secs) = std::env::var("TABLE_SHUTDOWN_AFTER_SECS") {
        if let Some(duration) = parse_duration(&secs) {
            let _ = DEADLINE.set(Instant::now() + duration);
        }
    }
    tokio::spawn(async {
        let mut line = String::new();
        loop {
            line.clear();
            if std::io::stdin().read_line(&mut line).is_err() {
                return;
            }
            if line.trim().eq_ignore_ascii_case("q") {
                log::info!("soft shutdown requested via stdin");
                SHUTDOWN.store(true, Ordering::SeqCst);
                return;
            }
        }
    });
}

pub fn interrupted() -> bool {
    if SHUTDOWN.load(Ordering::SeqCst) {
        return true;
    }
    if let Some(deadline) = DEADLINE.get() {
        if Instant::now() >= *deadline {
            return true;
        }
    }
    false
}

fn parse_duration(s: &str) -> Option<std::time::Duration> {
    s.trim().parse::<u64>().ok().map(std::time::Duration::from_secs)
}

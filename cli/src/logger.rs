use banner_core::paths;
use colored::*;
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex,
};

pub struct BannerLogger {
    quiet: bool,
    verbose: bool,
    log_file: Mutex<Option<File>>,
    target_colors: Mutex<HashMap<String, usize>>,
    next_color_index: AtomicUsize,
}

impl BannerLogger {
    pub fn new(quiet: bool, verbose: bool) -> Self {
        let log_file = paths::log_file_path().and_then(|path| {
            OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&path)
                .map_err(|e| eprintln!("Warning: Failed to open log file at {:?}: {}", path, e))
                .ok()
        });

        Self {
            quiet,
            verbose,
            log_file: Mutex::new(log_file),
            target_colors: Mutex::new(HashMap::new()),
            next_color_index: AtomicUsize::new(0),
        }
    }

    fn color_for_target(&self, target: &str) -> ColoredString {
        let colors: &[fn(&str) -> ColoredString] = &[
            |s| s.green(),
            |s| s.yellow(),
            |s| s.blue(),
            |s| s.magenta(),
            |s| s.cyan(),
        ];

        let color_index = {
            let mut target_colors = self
                .target_colors
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            *target_colors.entry(target.to_string()).or_insert_with(|| {
                self.next_color_index.fetch_add(1, Ordering::SeqCst) % colors.len()
            })
        };

        colors[color_index](target)
    }

    fn level_tag(level: Level) -> &'static str {
        match level {
            Level::Error => "[E]",
            Level::Warn => "[W]",
            Level::Info => "[I]",
            Level::Debug => "[D]",
            Level::Trace => "[T]",
        }
    }

    fn short_target<'a>(record: &'a Record) -> &'a str {
        record
            .target()
            .rsplit("::")
            .next()
            .unwrap_or(record.target())
    }

    fn format_log(&self, record: &Record) -> String {
        let tag = Self::level_tag(record.level());
        let target = self.color_for_target(Self::short_target(record)).dimmed();

        match record.level() {
            Level::Error => format!("{tag} [{target}] {}", record.args())
                .red()
                .bold()
                .to_string(),
            Level::Warn => format!("{tag} [{target}] {}", record.args())
                .yellow()
                .bold()
                .to_string(),
            level => {
                let colored_tag = match level {
                    Level::Info => tag.green().bold(),
                    Level::Debug => tag.blue().bold(),
                    _ => tag.white().bold(),
                };
                format!("{colored_tag} [{target}] {}", record.args())
            }
        }
    }

    fn format_log_plain(&self, record: &Record) -> String {
        format!(
            "{} [{}] {}",
            Self::level_tag(record.level()),
            Self::short_target(record),
            record.args()
        )
    }
}

impl Log for BannerLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        if self.quiet {
            metadata.level() <= Level::Info
        } else if self.verbose {
            metadata.level() <= Level::Trace
        } else {
            metadata.level() <= Level::Debug
        }
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        println!("{}", self.format_log(record));

        if let Ok(mut file) = self.log_file.lock() {
            if let Some(file) = file.as_mut() {
                let _ = writeln!(file, "{}", self.format_log_plain(record));
            }
        }
    }

    fn flush(&self) {
        if let Ok(mut file) = self.log_file.lock() {
            if let Some(file) = file.as_mut() {
                let _ = file.flush();
            }
        }
    }
}

pub fn init_logger(quiet: bool, verbose: bool) -> Result<(), log::SetLoggerError> {
    let logger = BannerLogger::new(quiet, verbose);
    log::set_boxed_logger(Box::new(logger))?;
    log::set_max_level(LevelFilter::Trace);
    Ok(())
}

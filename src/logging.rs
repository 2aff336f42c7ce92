// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Partialscan Inc.

//! Structured logging setup

use slog::{o, Drain, Level, Logger};

/// Terminal drain filtered at `level`
pub fn new_drain(level: Level) -> slog::Fuse<slog::LevelFilter<slog::Fuse<slog_async::Async>>> {
    let decorator = slog_term::TermDecorator::new().stderr().build();
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();
    drain.filter_level(level).fuse()
}

/// Root logger writing to the terminal
pub fn terminal(level: Level) -> Logger {
    Logger::root(new_drain(level), o!("crate" => "partialscan"))
}

/// Root logger that drops every record
pub fn discard() -> Logger {
    Logger::root(slog::Discard, o!())
}

/// Map a `-v` count onto a level: info, debug, then trace
pub fn level_from_verbosity(verbose: u8) -> Level {
    match verbose {
        0 => Level::Info,
        1 => Level::Debug,
        _ => Level::Trace,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(level_from_verbosity(0), Level::Info);
        assert_eq!(level_from_verbosity(1), Level::Debug);
        assert_eq!(level_from_verbosity(5), Level::Trace);
    }

    #[test]
    fn test_discard_accepts_records() {
        let log = discard().new(o!("module" => "test"));
        slog::info!(log, "dropped"; "count" => 3);
    }
}

//! Console logging for applications which host the firefly renderer.
//!
//! The library itself only ever talks to the `log` facade. Hosts (and the
//! demo) call [setup] once to get the multiline console format.

use {
    anyhow::Result,
    flexi_logger::{DeferredNow, Logger, LoggerHandle, Record},
    regex::Regex,
    std::{
        fmt::Write as FmtWrite,
        sync::{Mutex, OnceLock, PoisonError},
    },
    textwrap::{termwidth, Options},
};

/// Keeps the logger alive for the life of the process. Only written while
/// holding [SETUP_LOCK].
static LOGGER_HANDLE: OnceLock<LoggerHandle> = OnceLock::new();
static SETUP_LOCK: Mutex<()> = Mutex::new(());

/// Matches the last wrapped line of a record so it can be closed with `┗`.
static LAST_LINE_MATCHER: OnceLock<Regex> = OnceLock::new();

/// Setup console logging for this application.
///
/// Adjust the level with RUST_LOG. Calling this more than once is harmless,
/// only the first call installs the logger.
pub fn setup() -> Result<()> {
    let _guard = SETUP_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    if LOGGER_HANDLE.get().is_some() {
        return Ok(());
    }

    let handle = Logger::try_with_env_or_str("info")?
        .format(multiline_format)
        .start()?;
    let _ = LOGGER_HANDLE.set(handle);

    log::info!(
        "Adjust the log level by setting RUST_LOG. By default RUST_LOG=info"
    );

    Ok(())
}

fn last_line_matcher() -> &'static Regex {
    LAST_LINE_MATCHER.get_or_init(|| {
        Regex::new(r"(┃)(.*)$").expect("the last-line pattern is valid")
    })
}

/// A multiline log format for flexi_logger.
///
/// Logs are automatically wrapped at terminal width and prefixed with unicode
/// so it's easy to tell where a big log statement begins and ends.
pub fn multiline_format(
    w: &mut dyn std::io::Write,
    now: &mut DeferredNow,
    record: &Record,
) -> Result<(), std::io::Error> {
    let size = termwidth().min(74);
    let wrap_options = Options::new(size)
        .initial_indent("┏ ")
        .subsequent_indent("┃ ");

    let mut full_line = String::new();
    writeln!(
        full_line,
        "{} [{}] [{}:{}]",
        record.level(),
        now.now().format("%H:%M:%S%.6f"),
        record.file().unwrap_or("<unnamed>"),
        record.line().unwrap_or(0),
    )
    .expect("unable to format first log line");

    write!(&mut full_line, "{}", &record.args())
        .expect("unable to format log!");

    let wrapped = textwrap::fill(&full_line, wrap_options);
    let formatted = close_last_line(&wrapped);

    writeln!(w, "{}", formatted)
}

/// Replace the `┃` marker on the final wrapped line with `┗`.
fn close_last_line(wrapped: &str) -> String {
    last_line_matcher().replace(wrapped, "┗$2").into_owned()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn closes_the_final_line_of_a_multiline_record() {
        let wrapped = "┏ INFO [..]\n┃ first\n┃ second";

        assert_eq!(close_last_line(wrapped), "┏ INFO [..]\n┃ first\n┗ second");
    }

    #[test]
    fn concurrent_setup_calls_all_succeed() {
        let callers: Vec<_> =
            (0..8).map(|_| std::thread::spawn(setup)).collect();

        for caller in callers {
            assert!(caller.join().unwrap().is_ok());
        }
        assert!(setup().is_ok());
        assert!(LOGGER_HANDLE.get().is_some());
    }

    #[test]
    fn single_line_records_are_left_alone() {
        assert_eq!(close_last_line("┏ INFO hello"), "┏ INFO hello");
    }
}

//! Subprocess output post-processing and serialized reporting.

use std::io::{self, Write};
use std::sync::OnceLock;

use parking_lot::Mutex;
use regex::Regex;

/// Matches the tool's "<n> warning(s) generated." summary line.
fn warning_summary_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\d+ warnings? generated\.$").expect("Invalid warning summary regex")
    })
}

/// Strips the tool's trailing warning-count summary from stderr.
///
/// Only the final line (after trimming a single trailing newline) is
/// considered, so a diagnostic that merely contains the phrase elsewhere
/// is left alone. stdout is never altered.
pub fn reconcile(stdout: String, stderr: String) -> (String, String) {
    let trimmed = stderr.strip_suffix('\n').unwrap_or(&stderr);
    let last = trimmed.rsplit('\n').next().unwrap_or(trimmed);
    if warning_summary_re().is_match(last) {
        let cut = trimmed.len() - last.len();
        let adjusted = trimmed[..cut].to_string();
        (stdout, adjusted)
    } else {
        (stdout, stderr)
    }
}

/// Serializes per-task report blocks onto the shared output streams.
///
/// One mutex guards both streams so that a task's command echo, stdout and
/// adjusted stderr land as a single contiguous block, never interleaved
/// with another worker's output.
pub struct Reporter {
    streams: Mutex<Streams>,
}

struct Streams {
    out: Box<dyn Write + Send>,
    err: Box<dyn Write + Send>,
}

impl Reporter {
    /// Reports to the process's stdout and stderr.
    pub fn console() -> Self {
        Self::from_writers(Box::new(io::stdout()), Box::new(io::stderr()))
    }

    /// Reports to arbitrary writers (used by tests to capture the stream).
    pub fn from_writers(out: Box<dyn Write + Send>, err: Box<dyn Write + Send>) -> Self {
        Self {
            streams: Mutex::new(Streams { out, err }),
        }
    }

    /// Emits one task's block atomically: the echoed command line, the full
    /// stdout, then the adjusted stderr.
    pub fn emit(&self, command_line: &str, stdout: &str, stderr: &str) -> io::Result<()> {
        let mut streams = self.streams.lock();
        writeln!(streams.out, "{}", command_line)?;
        streams.out.write_all(stdout.as_bytes())?;
        streams.out.flush()?;
        streams.err.write_all(stderr.as_bytes())?;
        streams.err.flush()
    }
}

//! Output handles for a single run.
//!
//! The sink owns the report and wordlist writers plus the stdout echo. Every
//! report line is written to both the report and the echo. Only file errors
//! are returned; the echo is best-effort and is dropped after its first
//! failure. Writers are flushed by [`ReportSink::finish`] and closed when the
//! sink is dropped, including on early returns.

use std::fs::File;
use std::io::{self, BufWriter, Stdout, Write};
use std::path::Path;
use tracing::debug;

/// Sink backed by the two output files and the process stdout.
pub type FileSink = ReportSink<BufWriter<File>, BufWriter<File>, Stdout>;

pub struct ReportSink<R: Write, W: Write, E: Write> {
    report: R,
    wordlist: W,
    echo: E,
    echo_failed: bool,
    wordlist_lines: usize,
}

impl FileSink {
    /// Create (or truncate) both output files.
    pub fn create(report: &Path, wordlist: &Path) -> io::Result<Self> {
        let report = BufWriter::new(File::create(report)?);
        let wordlist = BufWriter::new(File::create(wordlist)?);
        Ok(ReportSink::new(report, wordlist, io::stdout()))
    }
}

impl<R: Write, W: Write, E: Write> ReportSink<R, W, E> {
    pub fn new(report: R, wordlist: W, echo: E) -> Self {
        Self {
            report,
            wordlist,
            echo,
            echo_failed: false,
            wordlist_lines: 0,
        }
    }

    /// Append text to the report and echo it.
    pub fn write(&mut self, text: &str) -> io::Result<()> {
        self.report.write_all(text.as_bytes())?;
        if !self.echo_failed {
            if let Err(e) = self.echo.write_all(text.as_bytes()) {
                self.disable_echo(e);
            }
        }
        Ok(())
    }

    fn disable_echo(&mut self, e: io::Error) {
        debug!("Echo to stdout failed, continuing without it: {}", e);
        self.echo_failed = true;
    }

    /// Append one path to the wordlist.
    pub fn word(&mut self, path: &str) -> io::Result<()> {
        writeln!(self.wordlist, "{}", path)?;
        self.wordlist_lines += 1;
        Ok(())
    }

    pub fn wordlist_lines(&self) -> usize {
        self.wordlist_lines
    }

    /// Flush all writers.
    pub fn finish(&mut self) -> io::Result<()> {
        self.report.flush()?;
        self.wordlist.flush()?;
        if !self.echo_failed {
            if let Err(e) = self.echo.flush() {
                self.disable_echo(e);
            }
        }
        Ok(())
    }

    pub fn into_parts(self) -> (R, W, E) {
        (self.report, self.wordlist, self.echo)
    }
}

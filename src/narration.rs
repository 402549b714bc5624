// Copyright 2025 Cowboy AI, LLC.

//! Narration sinks for scenario transcripts
//!
//! The behaviour engine writes its transcript through a [`Narrator`]. The
//! console narrator prints it; the transcript recorder keeps it for
//! assertions.

use std::io::Write;
use std::sync::{Arc, RwLock};

/// Where transcript text goes
#[cfg_attr(test, mockall::automock)]
pub trait Narrator: Send + Sync {
    /// Write text without ending the line
    fn write(&self, fragment: &str);

    /// Write text and end the line
    fn write_line(&self, line: &str);
}

/// Narrator printing to standard output
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNarrator;

impl Narrator for ConsoleNarrator {
    fn write(&self, fragment: &str) {
        let mut stdout = std::io::stdout().lock();
        // A closed stdout must not fail the scenario.
        let _ = stdout.write_all(fragment.as_bytes());
        let _ = stdout.flush();
    }

    fn write_line(&self, line: &str) {
        let mut stdout = std::io::stdout().lock();
        let _ = writeln!(stdout, "{line}");
    }
}

#[derive(Debug, Default)]
struct Transcript {
    lines: Vec<String>,
    pending: String,
}

/// Narrator recording the transcript in memory
///
/// Clones share the same transcript, so a test can keep one handle and give
/// the other to the scenario.
#[derive(Debug, Clone, Default)]
pub struct TranscriptRecorder {
    transcript: Arc<RwLock<Transcript>>,
}

impl TranscriptRecorder {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Completed lines, in order
    pub fn lines(&self) -> Vec<String> {
        self.read(|t| t.lines.clone())
    }

    /// Text written since the last completed line
    pub fn pending(&self) -> String {
        self.read(|t| t.pending.clone())
    }

    /// Whole transcript as it would appear on the console
    pub fn text(&self) -> String {
        self.read(|t| {
            let mut text = t.lines.join("\n");
            if !t.lines.is_empty() {
                text.push('\n');
            }
            text.push_str(&t.pending);
            text
        })
    }

    /// Forget everything recorded so far
    pub fn clear(&self) {
        self.update(|t| *t = Transcript::default());
    }

    fn read<R>(&self, f: impl FnOnce(&Transcript) -> R) -> R {
        let guard = self
            .transcript
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&guard)
    }

    fn update(&self, f: impl FnOnce(&mut Transcript)) {
        let mut guard = self
            .transcript
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut guard)
    }
}

impl Narrator for TranscriptRecorder {
    fn write(&self, fragment: &str) {
        self.update(|t| t.pending.push_str(fragment));
    }

    fn write_line(&self, line: &str) {
        self.update(|t| {
            let mut full = std::mem::take(&mut t.pending);
            full.push_str(line);
            t.lines.push(full);
        });
    }
}

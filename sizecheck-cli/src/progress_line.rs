use std::io::{self, Stderr, Write};

use crossterm::{
    cursor::MoveToColumn,
    queue,
    style::Print,
    terminal::{Clear, ClearType},
    tty::IsTty,
};
use sizecheck_core::{ScanMessage, ScanPhase, ScanProgress, ScanState, format_count};

/// Single self-overwriting status line on stderr
pub struct ProgressLine {
    out: Stderr,
    enabled: bool,
    drawn: bool,
}

impl ProgressLine {
    /// Draws nothing unless `enabled` and stderr is a terminal
    pub fn new(enabled: bool) -> Self {
        let out = io::stderr();
        let enabled = enabled && out.is_tty();
        Self {
            out,
            enabled,
            drawn: false,
        }
    }

    pub fn update(&mut self, msg: &ScanMessage) -> io::Result<()> {
        match msg {
            ScanMessage::Phase(ScanState::Counting) => self.draw("Counting files and folders..."),
            ScanMessage::Phase(ScanState::Measuring) => self.draw("Scanning..."),
            ScanMessage::Progress(progress) => self.draw(&describe(progress)),
            ScanMessage::Cancelled => self.draw("Scan cancelled"),
            _ => Ok(()),
        }
    }

    /// Wipe the line so the report starts on a clean row
    pub fn finish(&mut self) -> io::Result<()> {
        if self.drawn {
            queue!(self.out, MoveToColumn(0), Clear(ClearType::CurrentLine))?;
            self.out.flush()?;
            self.drawn = false;
        }
        Ok(())
    }

    fn draw(&mut self, text: &str) -> io::Result<()> {
        if !self.enabled {
            return Ok(());
        }
        queue!(
            self.out,
            MoveToColumn(0),
            Clear(ClearType::CurrentLine),
            Print(text)
        )?;
        self.out.flush()?;
        self.drawn = true;
        Ok(())
    }
}

/// Status text for one progress update
pub fn describe(progress: &ScanProgress) -> String {
    match (progress.phase, progress.items_total) {
        (ScanPhase::Counting, _) => format!(
            "Counting: {} items found...",
            format_count(progress.items_done)
        ),
        (ScanPhase::Measuring, Some(total)) => format!(
            "Scanning... {}% ({}/{})",
            progress.percent(),
            format_count(progress.items_done),
            format_count(total)
        ),
        (ScanPhase::Measuring, None) => format!(
            "Scanning... {} items",
            format_count(progress.items_done)
        ),
    }
}

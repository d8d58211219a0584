//! Live terminal view.

use crossterm::{
    cursor::MoveTo,
    execute,
    terminal::{Clear, ClearType},
};
use std::io::{self, Stdout, Write};

use super::{stats_block, LinkStatus, TIME_FORMAT};
use crate::monitor::StatsSnapshot;

/// Full-screen redraw of the stats block plus a link-status line.
/// Not diffed; each refresh repaints everything and the last write wins.
pub struct TerminalDisplay {
    stdout: Stdout,
}

impl Default for TerminalDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalDisplay {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
        }
    }

    pub fn render(&mut self, snapshot: &StatsSnapshot, status: LinkStatus) -> io::Result<()> {
        execute!(self.stdout, MoveTo(0, 0), Clear(ClearType::All))?;

        write!(
            self.stdout,
            "linkwatch - connection monitor\n\n{}\n",
            stats_block(snapshot)
        )?;

        match status {
            LinkStatus::Up => writeln!(self.stdout, "Status: UP")?,
            LinkStatus::Down {
                since,
                failures,
                confirmed,
            } => {
                let tag = if confirmed { " (confirmed)" } else { "" };
                writeln!(
                    self.stdout,
                    "Status: DOWN{} since {}, {} failed checks",
                    tag,
                    since.format(TIME_FORMAT),
                    failures,
                )?;
            }
        }

        self.stdout.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_constructs_a_display() {
        let _ = TerminalDisplay::default();
    }
}

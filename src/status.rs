//! One-line terminal status display.
//!
//! The game never draws the board; it keeps a single status line up to date
//! (score, lines, level, status, next piece and where it came from). The
//! line is only rewritten when its text changes.

use std::io::{self, Stdout, Write};

use anyhow::Result;
use crossterm::{cursor, style::Print, terminal, QueueableCommand};

use streamer_tetris::core::GameSnapshot;
use streamer_tetris::types::GameStatus;

pub struct StatusLine {
    out: Stdout,
    last: Option<String>,
    feed_hint: bool,
}

impl StatusLine {
    /// `feed_hint` adds the room reclaim key to the help text.
    pub fn new(feed_hint: bool) -> Self {
        Self {
            out: io::stdout(),
            last: None,
            feed_hint,
        }
    }

    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.out.queue(cursor::Hide)?;
        self.out.queue(terminal::DisableLineWrap)?;
        self.out.flush()?;
        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        self.out.queue(Print("\r\n"))?;
        self.out.queue(terminal::EnableLineWrap)?;
        self.out.queue(cursor::Show)?;
        self.out.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    pub fn draw(&mut self, snapshot: &GameSnapshot) -> Result<()> {
        let line = compose(snapshot, self.feed_hint);
        if self.last.as_deref() == Some(line.as_str()) {
            return Ok(());
        }

        self.out.queue(cursor::MoveToColumn(0))?;
        self.out
            .queue(terminal::Clear(terminal::ClearType::CurrentLine))?;
        self.out.queue(Print(&line))?;
        self.out.flush()?;
        self.last = Some(line);
        Ok(())
    }
}

fn compose(snapshot: &GameSnapshot, feed_hint: bool) -> String {
    let hint = match snapshot.status {
        GameStatus::Ready => "enter: start",
        GameStatus::Playing => "p: pause",
        GameStatus::Paused => "p: resume",
        GameStatus::GameOver => "r: restart",
    };
    let claim = if feed_hint { "  c: claim room" } else { "" };
    format!("{}  [{}{}  q: quit]", snapshot.status_line(), hint, claim)
}

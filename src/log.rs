//! Structured event log: one JSON object per line.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::core::StageEvent;

#[derive(Serialize)]
struct Record<'a> {
    seq: u64,
    ms: u64,
    #[serde(flatten)]
    event: &'a StageEvent,
}

/// Appends [`StageEvent`]s to a writer, stamped with a sequence number and the
/// game clock in milliseconds.
pub struct EventLog<W: Write = BufWriter<File>> {
    out: W,
    seq: u64,
    buf: Vec<u8>,
}

impl EventLog<BufWriter<File>> {
    /// Open `path` for appending, creating it if needed.
    pub fn open(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("open event log {}", path.display()))?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> EventLog<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            seq: 0,
            buf: Vec::with_capacity(256),
        }
    }

    /// Number of records written so far.
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn record(&mut self, ms: u64, event: &StageEvent) -> Result<()> {
        self.buf.clear();
        serde_json::to_writer(
            &mut self.buf,
            &Record {
                seq: self.seq,
                ms,
                event,
            },
        )?;
        self.buf.push(b'\n');
        self.out.write_all(&self.buf)?;
        self.seq += 1;
        Ok(())
    }

    pub fn record_all<'a>(
        &mut self,
        ms: u64,
        events: impl IntoIterator<Item = &'a StageEvent>,
    ) -> Result<()> {
        for event in events {
            self.record(ms, event)?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

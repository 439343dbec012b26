//! Tail-follow line source for a growing log file.

use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncSeekExt, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

use crate::errors::{IngestError, Result};

/// A lazy, potentially endless sequence of text lines.
///
/// The seam between the pipeline and whatever feeds it lines; production
/// code uses [`LineFollower`], tests substitute an in-memory source.
#[async_trait]
pub trait LineSource: Send {
    /// Produce the next complete line, or `None` once the sequence ends.
    async fn next_line(&mut self) -> Option<String>;
}

/// Follows appended writes to a log file, starting from its current end.
///
/// Lines written before the follower is opened are never produced. When no
/// data is available the follower suspends until the filesystem watcher
/// signals a change (with a periodic re-check as fallback) and resumes as
/// lines arrive. Cancelling the supplied token ends the sequence promptly;
/// so does an unrecoverable read error.
pub struct LineFollower {
    path: PathBuf,
    reader: BufReader<File>,
    /// Byte offset of the next unread position, for truncation detection.
    pos: u64,
    /// Carry for a line whose terminating newline has not arrived yet.
    partial: String,
    wakeups: mpsc::UnboundedReceiver<()>,
    poll_interval: Duration,
    cancel: CancellationToken,
    // Held so the watch stays registered for the follower's lifetime.
    _watcher: RecommendedWatcher,
}

impl LineFollower {
    /// Open `path` positioned at its current end.
    ///
    /// `poll_interval` bounds how long an append can go unnoticed if the
    /// watcher misses it; `cancel` is the explicit stop signal.
    pub async fn open(
        path: impl AsRef<Path>,
        poll_interval: Duration,
        cancel: CancellationToken,
    ) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).await.map_err(|source| IngestError::Open {
            path: path.clone(),
            source,
        })?;
        let mut reader = BufReader::new(file);
        let pos = reader.seek(SeekFrom::End(0)).await?;

        let (tx, wakeups) = mpsc::unbounded_channel();
        let mut watcher =
            notify::recommended_watcher(move |result: notify::Result<notify::Event>| {
                if result.is_ok() {
                    let _ = tx.send(());
                }
            })
            .map_err(|source| IngestError::Watch {
                path: path.clone(),
                source,
            })?;
        watcher
            .watch(&path, RecursiveMode::NonRecursive)
            .map_err(|source| IngestError::Watch {
                path: path.clone(),
                source,
            })?;

        Ok(Self {
            path,
            reader,
            pos,
            partial: String::new(),
            wakeups,
            poll_interval,
            cancel,
            _watcher: watcher,
        })
    }

    /// Produce the next complete appended line, without its newline.
    ///
    /// Returns `None` when the follower is stopped or reading fails.
    pub async fn next_line(&mut self) -> Option<String> {
        let mut chunk = String::new();
        loop {
            if self.cancel.is_cancelled() {
                return None;
            }
            chunk.clear();
            match self.reader.read_line(&mut chunk).await {
                Ok(0) => {
                    if let Err(e) = self.wait_for_data().await {
                        error!(path = %self.path.display(), error = %e, "follow failed");
                        return None;
                    }
                }
                Ok(n) => {
                    self.pos += n as u64;
                    if chunk.ends_with('\n') {
                        let mut line = std::mem::take(&mut self.partial);
                        line.push_str(&chunk);
                        trim_line_ending(&mut line);
                        return Some(line);
                    }
                    // A write can land mid-line; hold the fragment until
                    // the rest of the line arrives.
                    self.partial.push_str(&chunk);
                }
                Err(e) => {
                    error!(path = %self.path.display(), error = %e, "read failed");
                    return None;
                }
            }
        }
    }

    /// At end of file: handle truncation, then suspend until the file
    /// changes, the poll interval elapses, or the follower is stopped.
    async fn wait_for_data(&mut self) -> Result<()> {
        let len = tokio::fs::metadata(&self.path).await?.len();
        if len < self.pos {
            warn!(path = %self.path.display(), "log file truncated, following from the start");
            self.pos = self.reader.seek(SeekFrom::Start(0)).await?;
            self.partial.clear();
            return Ok(());
        }
        tokio::select! {
            () = self.cancel.cancelled() => {}
            _ = self.wakeups.recv() => {}
            () = tokio::time::sleep(self.poll_interval) => {}
        }
        Ok(())
    }
}

#[async_trait]
impl LineSource for LineFollower {
    async fn next_line(&mut self) -> Option<String> {
        Self::next_line(self).await
    }
}

fn trim_line_ending(line: &mut String) {
    if line.ends_with('\n') {
        let _ = line.pop();
        if line.ends_with('\r') {
            let _ = line.pop();
        }
    }
}

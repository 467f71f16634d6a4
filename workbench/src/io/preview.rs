//! Preview surface for rendered project documents.
//!
//! The workspace hands a document to a [`PreviewSurface`] and moves on. The
//! blob-backed surface keeps each document behind a short-lived handle that is
//! released when the viewer consumes it or when it expires, whichever comes
//! first, so repeated runs cannot grow memory without bound.

use std::collections::BTreeMap;
use std::fmt;
use std::time::{Duration, Instant};

use tracing::{debug, info};

/// Renders document text in an isolated surface.
pub trait PreviewSurface {
    fn render(&mut self, html: &str);
}

/// Opaque reference to a rendered document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PreviewHandle(u64);

impl fmt::Display for PreviewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "blob:preview/{}", self.0)
    }
}

#[derive(Debug)]
struct LiveBlob {
    content: String,
    expires_at: Instant,
}

/// Handle registry with bounded lifetime and bounded count.
#[derive(Debug)]
pub struct BlobPreview {
    release_after: Duration,
    max_live: usize,
    next_handle: u64,
    live: BTreeMap<PreviewHandle, LiveBlob>,
    current: Option<PreviewHandle>,
}

impl BlobPreview {
    pub fn new(release_after: Duration, max_live: usize) -> Self {
        Self {
            release_after,
            max_live: max_live.max(1),
            next_handle: 1,
            live: BTreeMap::new(),
            current: None,
        }
    }

    /// Store `html` under a fresh handle at time `now` and make it current.
    pub fn render_at(&mut self, html: &str, now: Instant) -> PreviewHandle {
        self.sweep(now);

        let handle = PreviewHandle(self.next_handle);
        self.next_handle += 1;
        self.live.insert(
            handle,
            LiveBlob {
                content: html.to_string(),
                expires_at: now + self.release_after,
            },
        );
        while self.live.len() > self.max_live {
            if let Some((oldest, _)) = self.live.pop_first() {
                debug!(handle = %oldest, "preview handle evicted");
            }
        }
        self.current = Some(handle);
        info!(handle = %handle, bytes = html.len(), "preview rendered");
        handle
    }

    /// Release every handle whose timeout has passed. Returns how many were released.
    pub fn sweep(&mut self, now: Instant) -> usize {
        let before = self.live.len();
        self.live.retain(|handle, blob| {
            let keep = blob.expires_at > now;
            if !keep {
                debug!(handle = %handle, "preview handle expired");
            }
            keep
        });
        before - self.live.len()
    }

    /// The viewer finished reading `handle`; release it and return its content.
    pub fn consume(&mut self, handle: PreviewHandle) -> Option<String> {
        self.consume_at(handle, Instant::now())
    }

    /// Consume `handle` at time `now`. An expired handle is released unread.
    pub fn consume_at(&mut self, handle: PreviewHandle, now: Instant) -> Option<String> {
        let blob = self.live.remove(&handle)?;
        if blob.expires_at <= now {
            debug!(handle = %handle, "preview handle expired before it was consumed");
            return None;
        }
        debug!(handle = %handle, "preview handle consumed");
        Some(blob.content)
    }

    /// Most recently rendered handle, whether or not it is still live.
    pub fn current(&self) -> Option<PreviewHandle> {
        self.current
    }

    pub fn content(&self, handle: PreviewHandle) -> Option<&str> {
        self.content_at(handle, Instant::now())
    }

    /// Content of `handle` if it has not expired by `now`.
    pub fn content_at(&self, handle: PreviewHandle, now: Instant) -> Option<&str> {
        self.live
            .get(&handle)
            .filter(|blob| blob.expires_at > now)
            .map(|blob| blob.content.as_str())
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}

impl PreviewSurface for BlobPreview {
    fn render(&mut self, html: &str) {
        self.render_at(html, Instant::now());
    }
}

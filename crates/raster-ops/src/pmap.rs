//! Chunked parallel map coordinator.
//!
//! [`pmap_pixels`] splits an image into row-chunks, applies a pure
//! per-pixel transform to each chunk on its own worker thread, and
//! reassembles the results **strictly in chunk order**: chunk 2's result
//! is only consumed after chunk 1's has arrived and been merged, even
//! though chunks may finish computing out of order. Early completions
//! simply wait at the coordinator, so the output row order always
//! matches the input regardless of scheduling.
//!
//! Workers share no mutable state - each one reads only its own chunk
//! and a read-only closure, so no locking is needed. Every wait carries
//! an independent timeout; the first timeout anywhere converts the
//! overall result into [`PmapOutcome::TimedOut`]. Already-spawned
//! workers are not cancelled (fire and forget): they mutate nothing
//! shared and their results are simply discarded.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use raster_core::{Color, Image, PixelLayout};
//! use raster_ops::pmap::{pmap_pixels, PmapOutcome};
//!
//! let img = Image::filled(8, 8, PixelLayout::Gray, Color::gray(10)).unwrap();
//! let out = pmap_pixels(&img, |c| Color::gray(c.as_slice()[0] + 1), 4,
//!     Duration::from_secs(5)).unwrap();
//! match out {
//!     PmapOutcome::Done(done) => assert_eq!(done.pixel(0, 0).unwrap(), Color::gray(11)),
//!     PmapOutcome::TimedOut => unreachable!(),
//! }
//! ```

use crate::OpsResult;
use raster_core::{Color, Image};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;
#[allow(unused_imports)]
use tracing::{debug, trace};

/// Result of a parallel map run.
///
/// A timeout is a sentinel rather than an error: a partial parallel
/// result is itself meaningful to the caller, and the in-flight workers
/// are not owned resources requiring cleanup.
#[derive(Debug)]
pub enum PmapOutcome {
    /// All chunks arrived and were reassembled.
    Done(Image),
    /// Some chunk failed to arrive within its wait's timeout.
    TimedOut,
}

impl PmapOutcome {
    /// Returns `true` for [`PmapOutcome::TimedOut`].
    #[inline]
    pub fn is_timed_out(&self) -> bool {
        matches!(self, Self::TimedOut)
    }

    /// Returns the reassembled image, if any.
    pub fn into_image(self) -> Option<Image> {
        match self {
            Self::Done(img) => Some(img),
            Self::TimedOut => None,
        }
    }
}

/// Applies a pure per-pixel transform across `n` row-chunks concurrently.
///
/// See the [module docs](self) for the ordering and timeout contract.
///
/// # Errors
///
/// Propagates reassembly errors from [`Image::merge`]; a timeout is
/// reported through [`PmapOutcome::TimedOut`], not an error.
pub fn pmap_pixels<F>(img: &Image, f: F, n: usize, timeout: Duration) -> OpsResult<PmapOutcome>
where
    F: Fn(Color) -> Color + Send + Sync + 'static,
{
    let chunks = img.split_n(n);
    trace!(
        width = img.width(),
        height = img.height(),
        chunks = chunks.len(),
        "pmap_pixels"
    );
    let f = Arc::new(f);
    let mut receivers = Vec::with_capacity(chunks.len());
    for chunk in chunks {
        let (tx, rx) = mpsc::channel();
        let f = Arc::clone(&f);
        thread::spawn(move || {
            // The coordinator may already have given up; a dead receiver
            // just drops the result.
            let _ = tx.send(chunk.map_pixels(|c| (*f)(c)));
        });
        receivers.push(rx);
    }

    // Consume in chunk-index order: block on the next expected chunk,
    // never on the first available one.
    let mut parts = Vec::with_capacity(receivers.len());
    for (index, rx) in receivers.into_iter().enumerate() {
        match rx.recv_timeout(timeout) {
            Ok(part) => parts.push(part),
            Err(_) => {
                debug!(index, "chunk wait timed out");
                return Ok(PmapOutcome::TimedOut);
            }
        }
    }
    Ok(PmapOutcome::Done(Image::merge(&parts)?))
}

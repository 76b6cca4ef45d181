#![forbid(unsafe_code)]

//! Frame-aligned coalescing of recomputation requests.
//!
//! A [`FrameGate`] collapses any number of requests made between two frames
//! into a single unit of work. Requests carry a payload; a newer payload
//! supersedes the older one, so the work that eventually runs never sees
//! stale input.
//!
//! # Invariants
//!
//! 1. At most one request is pending at any time.
//! 2. [`FrameGate::take`] yields the pending payload at most once per frame.
//! 3. A superseded payload is dropped, never executed.
//! 4. [`FrameGate::cancel`] drops the pending payload without running it.

/// Single-slot frame coalescer.
#[derive(Debug, Clone)]
pub struct FrameGate<T> {
    pending: Option<T>,
    requested_total: u64,
    superseded_total: u64,
    ran_total: u64,
}

impl<T> Default for FrameGate<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FrameGate<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pending: None,
            requested_total: 0,
            superseded_total: 0,
            ran_total: 0,
        }
    }

    /// Request work for the next frame.
    ///
    /// Returns `true` if this request armed the gate (the host should ask
    /// for an animation frame) and `false` if it replaced a pending one.
    pub fn request(&mut self, payload: T) -> bool {
        self.requested_total += 1;
        let armed = self.pending.is_none();
        if !armed {
            self.superseded_total += 1;
        }
        self.pending = Some(payload);
        armed
    }

    /// Take the pending payload for this frame, if any.
    pub fn take(&mut self) -> Option<T> {
        let payload = self.pending.take();
        if payload.is_some() {
            self.ran_total += 1;
        }
        payload
    }

    /// Drop the pending payload.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    #[inline]
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    #[inline]
    #[must_use]
    pub fn peek(&self) -> Option<&T> {
        self.pending.as_ref()
    }

    /// Counters `(requested, superseded, ran)` for diagnostics.
    #[must_use]
    pub fn stats(&self) -> (u64, u64, u64) {
        (self.requested_total, self.superseded_total, self.ran_total)
    }
}

impl FrameGate<()> {
    /// Request payload-free work.
    pub fn poke(&mut self) -> bool {
        self.request(())
    }
}

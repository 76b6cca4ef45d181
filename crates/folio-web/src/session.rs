#![forbid(unsafe_code)]

//! Scroll session: the event adapter between a host page and the
//! decision components.
//!
//! The host forwards raw signals (scroll, resize, layout mutation, mount and
//! unmount) and drives two clocks: [`ScrollSession::on_frame`] once per
//! animation frame and [`ScrollSession::advance`] whenever a deadline from
//! [`ScrollSession::next_deadline`] passes. Every call returns the outputs it
//! produced; the session never touches the page itself.
//!
//! # Invariants
//!
//! 1. At most one tracker recomputation and one reveal pass per frame:
//!    signals between two frames coalesce into a single [`FrameGate`]
//!    request carrying the newest viewport.
//! 2. An [`SessionOutput::ActiveSection`] is emitted only on change.
//! 3. Section and target membership changes only through `mount_*` and
//!    `unmount_*`.
//!
//! # Failure Modes
//!
//! - Degenerate viewport samples (non-finite, zero height) are ignored.
//! - Unknown scopes on mount surface as
//!   [`FolioError::UnknownScope`](folio_core::FolioError::UnknownScope);
//!   evaluation itself never fails.

use folio_core::config::FolioConfig;
use folio_core::error::Result;
use folio_core::frame::FrameGate;
use folio_core::geometry::{GeometryProvider, Viewport};
use folio_core::id::{ScopeId, SectionId, TargetId};
use folio_core::logging::{debug, trace};
use folio_nav::link::{NavTarget, Navigator, active_href, navigate};
use folio_reveal::{RevealEvent, RevealScheduler, ScopeOptions};
use folio_spy::{FastScrollMonitor, Section, SectionRegistry, SectionTracker, SettleSchedule};
use serde::{Deserialize, Serialize};
use web_time::Duration;

/// Something the rendering layer should act on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SessionOutput {
    /// Highlight the navigation link for `section`.
    ActiveSection {
        section: SectionId,
        href: String,
        #[serde(with = "folio_core::serde_millis")]
        at: Duration,
    },
    /// Play a reveal transition.
    Reveal(RevealEvent),
    /// Toggle the advisory fast-scroll styling.
    FastScroll {
        active: bool,
        #[serde(with = "folio_core::serde_millis")]
        at: Duration,
    },
}

impl SessionOutput {
    /// Short label used in traces and logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ActiveSection { .. } => "active_section",
            Self::Reveal(_) => "reveal",
            Self::FastScroll { .. } => "fast_scroll",
        }
    }
}


/// Lifetime counters for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub frames: u64,
    pub passes: u64,
    pub coalesced: u64,
    pub outputs: u64,
}

/// Owns the registries and decision components of one page session.
#[derive(Debug, Clone)]
pub struct ScrollSession {
    config: FolioConfig,
    viewport: Viewport,
    sections: SectionRegistry,
    tracker: SectionTracker,
    reveal: RevealScheduler,
    fast_scroll: FastScrollMonitor,
    settle: SettleSchedule,
    gate: FrameGate<Viewport>,
    stats: SessionStats,
}

impl ScrollSession {
    /// Start a session for a viewport. Fails if `config` does not validate.
    pub fn new(config: FolioConfig, viewport: Viewport) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config, viewport))
    }

    /// Start a session with the default configuration.
    #[must_use]
    pub fn with_defaults(viewport: Viewport) -> Self {
        Self::build(FolioConfig::default(), viewport)
    }

    fn build(config: FolioConfig, viewport: Viewport) -> Self {
        Self {
            viewport: viewport.clamped(),
            sections: SectionRegistry::new(),
            tracker: SectionTracker::from_config(&config.spy),
            reveal: RevealScheduler::new(&config.reveal),
            fast_scroll: FastScrollMonitor::from_config(&config.spy),
            settle: SettleSchedule::from_config(&config.spy),
            gate: FrameGate::new(),
            stats: SessionStats::default(),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &FolioConfig {
        &self.config
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn active_section(&self) -> Option<&SectionId> {
        self.tracker.active()
    }

    #[must_use]
    pub fn sections(&self) -> &SectionRegistry {
        &self.sections
    }

    #[must_use]
    pub fn reveal(&self) -> &RevealScheduler {
        &self.reveal
    }

    #[must_use]
    pub fn is_fast_scrolling(&self) -> bool {
        self.fast_scroll.is_fast()
    }

    #[must_use]
    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Whether the host should request an animation frame.
    #[must_use]
    pub fn wants_frame(&self) -> bool {
        self.gate.is_pending()
    }

    /// Earliest time at which [`advance`](Self::advance) has work.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        [
            self.settle.next_deadline(),
            self.fast_scroll.clears_at(),
            self.reveal.next_deadline(),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    fn request_pass(&mut self) {
        if !self.gate.request(self.viewport) {
            self.stats.coalesced += 1;
        }
    }
}

// ---------------------------------------------------------------------------
// Membership
// ---------------------------------------------------------------------------

impl ScrollSession {
    /// Replace the section list with `slugs` in navigation order, then
    /// recompute now and at each settle delay.
    pub fn mount_sections<S: AsRef<str>>(&mut self, slugs: impl IntoIterator<Item = S>, now: Duration) {
        self.sections = SectionRegistry::from_slugs(slugs);
        debug!(message = "session.sections", count = self.sections.len());
        self.settle.start(now);
        self.request_pass();
    }

    /// Register one section, keeping the others.
    pub fn mount_section(&mut self, section: Section, now: Duration) {
        self.sections.register(section);
        self.settle.start(now);
        self.request_pass();
    }

    pub fn unmount_section(&mut self, id: &SectionId) -> bool {
        let removed = self.sections.deregister(id);
        if removed {
            self.request_pass();
        }
        removed
    }

    pub fn mount_scope(&mut self, scope: ScopeId, options: Option<ScopeOptions>) -> Result<()> {
        self.reveal.register_scope(scope, options)
    }

    pub fn unmount_scope(&mut self, scope: &ScopeId) -> bool {
        self.reveal.deregister_scope(scope)
    }

    pub fn mount_target(&mut self, scope: &ScopeId, target: TargetId) -> Result<()> {
        self.reveal.register_target(scope, target)?;
        self.request_pass();
        Ok(())
    }

    pub fn mount_target_with_thresholds(
        &mut self,
        scope: &ScopeId,
        target: TargetId,
        threshold_enter: f64,
        threshold_exit: f64,
    ) -> Result<()> {
        self.reveal
            .register_target_with_thresholds(scope, target, threshold_enter, threshold_exit)?;
        self.request_pass();
        Ok(())
    }

    pub fn unmount_target(&mut self, target: TargetId) -> bool {
        self.reveal.deregister_target(target)
    }
}

// ---------------------------------------------------------------------------
// Host signals
// ---------------------------------------------------------------------------

impl ScrollSession {
    /// A scroll event.
    pub fn on_scroll(&mut self, scroll_y: f64, now: Duration) -> Vec<SessionOutput> {
        let sample = Viewport::new(scroll_y, self.viewport.height);
        if sample.is_degenerate() {
            trace!(message = "session.skip", reason = "viewport", scroll_y);
            return Vec::new();
        }
        self.viewport = sample.clamped();
        let mut out = Vec::new();
        if let Some(active) = self.fast_scroll.observe(self.viewport.scroll_y, now) {
            out.push(SessionOutput::FastScroll { active, at: now });
        }
        self.request_pass();
        self.stats.outputs += out.len() as u64;
        out
    }

    /// A window resize.
    pub fn on_resize(&mut self, viewport_height: f64) {
        let sample = Viewport::new(self.viewport.scroll_y, viewport_height);
        if sample.is_degenerate() {
            trace!(message = "session.skip", reason = "viewport", viewport_height);
            return;
        }
        self.viewport = sample;
        self.request_pass();
    }

    /// Content moved without a scroll (fonts, images, DOM mutation).
    pub fn on_layout_change(&mut self) {
        self.request_pass();
    }

    /// One animation frame: run the coalesced tracker and reveal passes.
    pub fn on_frame<G: GeometryProvider + ?Sized>(&mut self, geometry: &G, now: Duration) -> Vec<SessionOutput> {
        self.stats.frames += 1;
        let Some(viewport) = self.gate.take() else {
            return Vec::new();
        };
        self.stats.passes += 1;

        let mut out = Vec::new();
        if let Some(section) = self.tracker.update(viewport, &self.sections, geometry) {
            out.push(SessionOutput::ActiveSection {
                href: active_href(&section),
                section,
                at: now,
            });
        }
        out.extend(
            self.reveal
                .evaluate_all(geometry, viewport.height, now)
                .into_iter()
                .map(SessionOutput::Reveal),
        );
        trace!(message = "session.frame", outputs = out.len(), scroll_y = viewport.scroll_y);
        self.stats.outputs += out.len() as u64;
        out
    }

    /// Advance timers: settle checkpoints, fast-scroll cool-down, staggered
    /// enters and the reveal safety fallback.
    ///
    /// Due reveals are checked against `geometry` at the newest viewport, so
    /// a target scrolled out of its window since the last pass is not
    /// revealed.
    pub fn advance<G: GeometryProvider + ?Sized>(&mut self, geometry: &G, now: Duration) -> Vec<SessionOutput> {
        if self.settle.poll(now) > 0 {
            self.request_pass();
        }
        let mut out = Vec::new();
        if let Some(active) = self.fast_scroll.tick(now) {
            out.push(SessionOutput::FastScroll { active, at: now });
        }
        out.extend(
            self.reveal
                .tick(geometry, self.viewport.height, now)
                .into_iter()
                .map(SessionOutput::Reveal),
        );
        self.stats.outputs += out.len() as u64;
        out
    }

    /// Follow a navigation link, scrolling below the fixed navigation bar.
    pub fn follow_link<G, N>(&self, target: &NavTarget, geometry: &G, navigator: &mut N) -> bool
    where
        G: GeometryProvider + ?Sized,
        N: Navigator + ?Sized,
    {
        navigate(target, geometry, self.config.nav.nav_height_px, navigator)
    }

    /// Drop every registration and pending timer.
    pub fn teardown(&mut self) {
        self.sections.clear();
        self.tracker.reset();
        self.reveal = RevealScheduler::new(&self.config.reveal);
        self.fast_scroll.reset();
        self.settle.cancel();
        self.gate.cancel();
    }
}

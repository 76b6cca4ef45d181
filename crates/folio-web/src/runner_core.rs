//! Platform-independent core of the wasm runner.
//!
//! Holds a [`ScrollSession`], the host-fed [`DocumentLayout`], the session
//! clock, and an output queue drained as JSON. The `wasm` module is a thin
//! `wasm-bindgen` shell over this type; native tests drive it directly.

use folio_core::clock::{Clock, LabClock};
use folio_core::config::FolioConfig;
use folio_core::geometry::{SectionGeometry, Viewport};
use folio_core::id::{ScopeId, SectionId, TargetId};
use folio_reveal::ScopeOptions;
use web_time::Duration;

use crate::layout::{DocumentLayout, TargetRect};
use crate::session::{ScrollSession, SessionOutput};

/// Result of one [`RunnerCore::frame`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameResult {
    /// A coalesced pass ran this frame.
    pub ran_pass: bool,
    /// Outputs queued by this call.
    pub outputs: usize,
}

pub struct RunnerCore {
    session: ScrollSession,
    layout: DocumentLayout,
    clock: LabClock,
    queue: Vec<SessionOutput>,
}

impl RunnerCore {
    pub fn new(viewport_height: f64) -> Self {
        Self::from_session(ScrollSession::with_defaults(Viewport::new(0.0, viewport_height)))
    }

    /// Build from a JSON-encoded [`FolioConfig`] (missing fields default).
    pub fn from_config_json(json: &str, viewport_height: f64) -> Result<Self, String> {
        let config: FolioConfig = serde_json::from_str(json).map_err(|e| e.to_string())?;
        Self::with_config(config, viewport_height).map_err(|e| e.to_string())
    }

    pub fn with_config(config: FolioConfig, viewport_height: f64) -> folio_core::Result<Self> {
        let session = ScrollSession::new(config, Viewport::new(0.0, viewport_height))?;
        Ok(Self::from_session(session))
    }

    fn from_session(session: ScrollSession) -> Self {
        Self {
            session,
            layout: DocumentLayout::new(),
            clock: LabClock::new(),
            queue: Vec::new(),
        }
    }

    pub fn session(&self) -> &ScrollSession {
        &self.session
    }

    // -- clock ----------------------------------------------------------

    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    pub fn now_ms(&self) -> f64 {
        self.now().as_secs_f64() * 1000.0
    }

    /// Set the session clock. Earlier times are ignored.
    pub fn set_time_ms(&mut self, ms: f64) {
        if let Some(at) = millis(ms) {
            self.clock.set(at);
        }
    }

    pub fn advance_time_ms(&mut self, dt_ms: f64) {
        if let Some(dt) = millis(dt_ms) {
            self.clock.advance(dt);
        }
    }

    // -- membership -----------------------------------------------------

    pub fn mount_sections(&mut self, slugs: &[String]) {
        self.session.mount_sections(slugs, self.now());
    }

    pub fn unmount_section(&mut self, slug: &str) -> bool {
        let id = SectionId::new(slug);
        self.layout.remove_section(&id);
        self.session.unmount_section(&id)
    }

    /// Mount a reveal scope; `options_json` is a JSON [`ScopeOptions`].
    pub fn mount_scope(&mut self, name: &str, options_json: Option<&str>) -> Result<(), String> {
        let options = options_json
            .map(serde_json::from_str::<ScopeOptions>)
            .transpose()
            .map_err(|e| e.to_string())?;
        self.session
            .mount_scope(ScopeId::new(name), options)
            .map_err(|e| e.to_string())
    }

    pub fn unmount_scope(&mut self, name: &str) -> bool {
        self.session.unmount_scope(&ScopeId::new(name))
    }

    pub fn mount_target(&mut self, scope: &str, id: u32) -> Result<(), String> {
        self.session
            .mount_target(&ScopeId::new(scope), TargetId(u64::from(id)))
            .map_err(|e| e.to_string())
    }

    pub fn unmount_target(&mut self, id: u32) -> bool {
        let id = TargetId(u64::from(id));
        self.layout.remove_target(id);
        self.session.unmount_target(id)
    }

    // -- geometry -------------------------------------------------------

    /// Record a section's document-space box.
    pub fn set_section_rect(&mut self, slug: &str, top: f64, height: f64) {
        self.layout.set_section(SectionId::new(slug), SectionGeometry::new(top, height));
    }

    /// Record a target's document-space box.
    pub fn set_target_rect(&mut self, id: u32, top: f64, height: f64, width: f64) {
        self.layout
            .set_target(TargetId(u64::from(id)), TargetRect::new(top, height, width));
    }

    // -- signals --------------------------------------------------------

    pub fn scroll(&mut self, scroll_y: f64) {
        let outputs = self.session.on_scroll(scroll_y, self.now());
        self.layout.set_scroll(self.session.viewport().scroll_y);
        self.queue.extend(outputs);
    }

    pub fn resize(&mut self, viewport_height: f64) {
        self.session.on_resize(viewport_height);
    }

    pub fn layout_changed(&mut self) {
        self.session.on_layout_change();
    }

    /// Run timers, then the coalesced frame pass.
    pub fn frame(&mut self) -> FrameResult {
        let before = self.queue.len();
        let timers = self.session.advance(&self.layout, self.now());
        self.queue.extend(timers);
        let ran_pass = self.session.wants_frame();
        let outputs = self.session.on_frame(&self.layout, self.now());
        self.queue.extend(outputs);
        FrameResult {
            ran_pass,
            outputs: self.queue.len() - before,
        }
    }

    pub fn wants_frame(&self) -> bool {
        self.session.wants_frame()
    }

    pub fn next_deadline_ms(&self) -> Option<f64> {
        self.session
            .next_deadline()
            .map(|d| d.as_secs_f64() * 1000.0)
    }

    pub fn active_section(&self) -> Option<String> {
        self.session.active_section().map(ToString::to_string)
    }

    // -- outputs --------------------------------------------------------

    pub fn take_outputs(&mut self) -> Vec<SessionOutput> {
        std::mem::take(&mut self.queue)
    }

    /// Drain queued outputs as a JSON array.
    pub fn take_outputs_json(&mut self) -> String {
        let outputs = self.take_outputs();
        serde_json::to_string(&outputs).unwrap_or_else(|_| "[]".to_owned())
    }

    pub fn teardown(&mut self) {
        self.session.teardown();
        self.layout.clear();
        self.queue.clear();
    }
}

fn millis(ms: f64) -> Option<Duration> {
    (ms.is_finite() && ms >= 0.0).then(|| Duration::from_secs_f64(ms / 1000.0))
}

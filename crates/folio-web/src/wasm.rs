//! `wasm-bindgen` exports.
//!
//! JavaScript owns the event listeners and `requestAnimationFrame`; it
//! forwards signals and measured rects here and applies the JSON outputs.

use folio_core::clock::{Clock, HostClock};
use js_sys::Array;
use wasm_bindgen::prelude::*;

use crate::runner_core::RunnerCore;

/// Scroll runner driven by the host page.
#[wasm_bindgen]
pub struct FolioRunner {
    core: RunnerCore,
    host: HostClock,
}

#[wasm_bindgen]
impl FolioRunner {
    /// Create a runner with the default configuration.
    #[wasm_bindgen(constructor)]
    pub fn new(viewport_height: f64) -> Self {
        Self {
            core: RunnerCore::new(viewport_height),
            host: HostClock::start(),
        }
    }

    /// Create a runner from a JSON configuration.
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(config_json: &str, viewport_height: f64) -> Result<FolioRunner, JsValue> {
        RunnerCore::from_config_json(config_json, viewport_height)
            .map(|core| Self {
                core,
                host: HostClock::start(),
            })
            .map_err(|e| JsValue::from_str(&e))
    }

    #[wasm_bindgen(js_name = setTime)]
    pub fn set_time(&mut self, ms: f64) {
        self.core.set_time_ms(ms);
    }

    /// Move the session clock to the time elapsed since construction.
    #[wasm_bindgen(js_name = syncTime)]
    pub fn sync_time(&mut self) {
        self.core.set_time_ms(self.host.now().as_secs_f64() * 1000.0);
    }

    #[wasm_bindgen(js_name = advanceTime)]
    pub fn advance_time(&mut self, dt_ms: f64) {
        self.core.advance_time_ms(dt_ms);
    }

    /// Replace the section list. `slugs` is an array of strings in
    /// navigation order.
    #[wasm_bindgen(js_name = mountSections)]
    pub fn mount_sections(&mut self, slugs: Array) {
        let slugs: Vec<String> = slugs.iter().filter_map(|v| v.as_string()).collect();
        self.core.mount_sections(&slugs);
    }

    #[wasm_bindgen(js_name = unmountSection)]
    pub fn unmount_section(&mut self, slug: &str) -> bool {
        self.core.unmount_section(slug)
    }

    #[wasm_bindgen(js_name = mountScope)]
    pub fn mount_scope(&mut self, name: &str, options_json: Option<String>) -> Result<(), JsValue> {
        self.core
            .mount_scope(name, options_json.as_deref())
            .map_err(|e| JsValue::from_str(&e))
    }

    #[wasm_bindgen(js_name = unmountScope)]
    pub fn unmount_scope(&mut self, name: &str) -> bool {
        self.core.unmount_scope(name)
    }

    #[wasm_bindgen(js_name = mountTarget)]
    pub fn mount_target(&mut self, scope: &str, id: u32) -> Result<(), JsValue> {
        self.core
            .mount_target(scope, id)
            .map_err(|e| JsValue::from_str(&e))
    }

    #[wasm_bindgen(js_name = unmountTarget)]
    pub fn unmount_target(&mut self, id: u32) -> bool {
        self.core.unmount_target(id)
    }

    #[wasm_bindgen(js_name = setSectionRect)]
    pub fn set_section_rect(&mut self, slug: &str, top: f64, height: f64) {
        self.core.set_section_rect(slug, top, height);
    }

    #[wasm_bindgen(js_name = setTargetRect)]
    pub fn set_target_rect(&mut self, id: u32, top: f64, height: f64, width: f64) {
        self.core.set_target_rect(id, top, height, width);
    }

    pub fn scroll(&mut self, scroll_y: f64) {
        self.core.scroll(scroll_y);
    }

    pub fn resize(&mut self, viewport_height: f64) {
        self.core.resize(viewport_height);
    }

    #[wasm_bindgen(js_name = layoutChanged)]
    pub fn layout_changed(&mut self) {
        self.core.layout_changed();
    }

    /// Run one frame. Returns the number of outputs queued.
    pub fn frame(&mut self) -> u32 {
        u32::try_from(self.core.frame().outputs).unwrap_or(u32::MAX)
    }

    #[wasm_bindgen(js_name = wantsFrame)]
    pub fn wants_frame(&self) -> bool {
        self.core.wants_frame()
    }

    #[wasm_bindgen(js_name = nextDeadline)]
    pub fn next_deadline(&self) -> Option<f64> {
        self.core.next_deadline_ms()
    }

    #[wasm_bindgen(js_name = activeSection)]
    pub fn active_section(&self) -> Option<String> {
        self.core.active_section()
    }

    /// Drain queued outputs as a JSON array string.
    #[wasm_bindgen(js_name = takeOutputs)]
    pub fn take_outputs(&mut self) -> String {
        self.core.take_outputs_json()
    }

    pub fn destroy(&mut self) {
        self.core.teardown();
    }
}

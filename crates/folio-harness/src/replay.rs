#![forbid(unsafe_code)]

//! Deterministic scenario replay.
//!
//! Mount phase at t = 0: sections, scopes and targets are registered and a
//! first frame runs. Then, per step: timers advance to the step time, the
//! action is applied, and a frame runs. Frames only do work when the session
//! has a coalesced pass pending, as in a browser where `requestAnimationFrame`
//! is only requested on demand.

use std::io::Write;

use folio_core::config::FolioConfig;
use folio_core::geometry::{GeometryProvider, SectionGeometry, Viewport};
use folio_core::id::{ScopeId, SectionId, TargetId};
use folio_core::logging::{debug, info};
use folio_reveal::RevealState;
use folio_web::{DocumentLayout, ScrollSession, SessionOutput, SessionStats, TargetRect};
use web_time::Duration;

use crate::error::Result;
use crate::scenario::{Action, Scenario};
use crate::trace::{TraceHeader, TraceRecord, TraceRecorder, TraceSummary};

/// Everything a replay produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayReport {
    pub scenario: String,
    pub records: Vec<TraceRecord>,
    pub final_active: Option<SectionId>,
    pub revealed: Vec<TargetId>,
    pub stats: SessionStats,
    /// Trace checksum when a recorder was attached.
    pub checksum: Option<String>,
}

impl ReplayReport {
    /// Active-section ids in emission order.
    #[must_use]
    pub fn active_sections(&self) -> Vec<&str> {
        self.records
            .iter()
            .filter_map(|r| match &r.output {
                SessionOutput::ActiveSection { section, .. } => Some(section.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Active section as of the end of `step`.
    #[must_use]
    pub fn active_at_step(&self, step: usize) -> Option<&str> {
        self.records.iter().rev().find_map(|r| match &r.output {
            SessionOutput::ActiveSection { section, .. } if r.step.is_none_or(|s| s <= step) => {
                Some(section.as_str())
            }
            _ => None,
        })
    }

    /// Reveal outputs as `(target, state, forced)`.
    #[must_use]
    pub fn reveals(&self) -> Vec<(u64, RevealState, bool)> {
        self.records
            .iter()
            .filter_map(|r| match &r.output {
                SessionOutput::Reveal(ev) => Some((ev.target.0, ev.state, ev.is_forced())),
                _ => None,
            })
            .collect()
    }
}

struct Run<'a, W: Write> {
    session: ScrollSession,
    layout: DocumentLayout,
    records: Vec<TraceRecord>,
    trace: Option<&'a mut TraceRecorder<W>>,
}

impl<W: Write> Run<'_, W> {
    fn emit(&mut self, step: Option<usize>, now: Duration, outputs: Vec<SessionOutput>) -> Result<()> {
        for output in outputs {
            let record = TraceRecord {
                seq: self.records.len() as u64,
                step,
                at_ms: now.as_millis() as u64,
                output,
            };
            if let Some(trace) = self.trace.as_deref_mut() {
                trace.record(&record)?;
            }
            self.records.push(record);
        }
        Ok(())
    }

    fn frame(&mut self, step: Option<usize>, now: Duration) -> Result<()> {
        if self.session.wants_frame() {
            let outputs = self.session.on_frame(&self.layout, now);
            self.emit(step, now, outputs)?;
        }
        Ok(())
    }

    fn apply(&mut self, step: usize, action: &Action, now: Duration) -> Result<()> {
        match action {
            Action::Scroll { y } => {
                let outputs = self.session.on_scroll(*y, now);
                self.layout.set_scroll(self.session.viewport().scroll_y);
                self.emit(Some(step), now, outputs)?;
            }
            Action::Resize { height } => self.session.on_resize(*height),
            Action::MoveSection { slug, top, height } => {
                self.layout
                    .set_section(SectionId::new(slug), SectionGeometry::new(*top, *height));
                self.session.on_layout_change();
            }
            Action::MoveTarget { id, top, height } => {
                let width = self
                    .layout
                    .target_bounds(TargetId(*id))
                    .map_or(600.0, |b| b.width);
                self.layout
                    .set_target(TargetId(*id), TargetRect::new(*top, *height, width));
                self.session.on_layout_change();
            }
            Action::UnmountSection { slug } => {
                let id = SectionId::new(slug);
                self.layout.remove_section(&id);
                self.session.unmount_section(&id);
            }
            Action::UnmountTarget { id } => {
                self.layout.remove_target(TargetId(*id));
                self.session.unmount_target(TargetId(*id));
            }
            Action::LayoutChange => self.session.on_layout_change(),
            Action::Wait => {}
        }
        Ok(())
    }
}

/// Replay `scenario` with its own configuration.
pub fn replay<W: Write>(scenario: &Scenario, trace: Option<&mut TraceRecorder<W>>) -> Result<ReplayReport> {
    replay_with(scenario, &scenario.config, trace)
}

/// Replay `scenario` under `config`.
pub fn replay_with<W: Write>(
    scenario: &Scenario,
    config: &FolioConfig,
    trace: Option<&mut TraceRecorder<W>>,
) -> Result<ReplayReport> {
    scenario.validate()?;
    info!(message = "replay.start", scenario = %scenario.name, steps = scenario.steps.len());

    let session = ScrollSession::new(config.clone(), Viewport::new(0.0, scenario.viewport_height))?;
    let mut run = Run {
        session,
        layout: scenario.layout(),
        records: Vec::new(),
        trace,
    };

    // Mount phase.
    let start = Duration::ZERO;
    run.session
        .mount_sections(scenario.sections.iter().map(|s| s.slug.as_str()), start);
    for scope in &scenario.scopes {
        let scope_id = ScopeId::new(&scope.name);
        run.session.mount_scope(scope_id.clone(), scope.options.clone())?;
        for target in &scope.targets {
            match target.thresholds {
                Some([enter, exit]) => run.session.mount_target_with_thresholds(
                    &scope_id,
                    TargetId(target.id),
                    enter,
                    exit,
                )?,
                None => run.session.mount_target(&scope_id, TargetId(target.id))?,
            }
        }
    }
    run.frame(None, start)?;

    for (index, step) in scenario.steps.iter().enumerate() {
        let now = Duration::from_millis(step.at_ms);
        let timers = run.session.advance(&run.layout, now);
        run.emit(Some(index), now, timers)?;
        run.apply(index, &step.action, now)?;
        run.frame(Some(index), now)?;
        debug!(message = "replay.step", index, at_ms = step.at_ms);
    }

    let final_active = run.session.active_section().cloned();
    let revealed: Vec<TargetId> = run
        .session
        .reveal()
        .scopes()
        .flat_map(|s| s.targets())
        .filter(|t| t.is_revealed())
        .map(|t| t.id)
        .collect();
    let stats = run.session.stats();

    let checksum = match run.trace {
        Some(trace) => {
            trace.finish(&TraceSummary {
                outputs: run.records.len() as u64,
                final_active: final_active.clone(),
                revealed: revealed.clone(),
                stats,
            })?;
            Some(trace.checksum())
        }
        None => None,
    };

    info!(
        message = "replay.done",
        scenario = %scenario.name,
        outputs = run.records.len(),
        final_active = ?final_active.as_ref().map(SectionId::as_str),
    );
    Ok(ReplayReport {
        scenario: scenario.name.clone(),
        records: run.records,
        final_active,
        revealed,
        stats,
        checksum,
    })
}

/// Header for a trace of `scenario` under `config`.
#[must_use]
pub fn trace_header<'a>(scenario: &'a Scenario, config: &'a FolioConfig) -> TraceHeader<'a> {
    TraceHeader {
        scenario: &scenario.name,
        viewport_height: scenario.viewport_height,
        config,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Sink;

    fn scenario(json: &str) -> Scenario {
        Scenario::from_json(json).unwrap()
    }

    #[test]
    fn empty_scenario_produces_nothing() {
        let s = scenario(r#"{"name": "empty", "viewport_height": 800}"#);
        let report = replay::<Sink>(&s, None).unwrap();
        assert!(report.records.is_empty());
        assert_eq!(report.final_active, None);
        assert_eq!(report.checksum, None);
    }

    #[test]
    fn unmounting_the_active_section_falls_back() {
        let s = scenario(
            r#"{"name": "unmount", "viewport_height": 900,
                "sections": [
                    {"slug": "a", "top": 0, "height": 1000},
                    {"slug": "b", "top": 1000, "height": 1000}],
                "steps": [
                    {"at_ms": 50, "action": "scroll", "y": 1200},
                    {"at_ms": 100, "action": "unmount_section", "slug": "b"}]}"#,
        );
        let report = replay::<Sink>(&s, None).unwrap();
        assert_eq!(report.active_sections(), ["a", "b", "a"]);
        assert_eq!(report.final_active, Some(SectionId::new("a")));
    }

    #[test]
    fn moved_section_is_picked_up_by_layout_change() {
        let s = scenario(
            r#"{"name": "move", "viewport_height": 900,
                "sections": [
                    {"slug": "a", "top": 0, "height": 1000},
                    {"slug": "b", "top": 1000, "height": 1000}],
                "steps": [
                    {"at_ms": 50, "action": "scroll", "y": 700},
                    {"at_ms": 60, "action": "move_section", "slug": "a", "top": 0, "height": 600},
                    {"at_ms": 60, "action": "move_section", "slug": "b", "top": 600, "height": 1000}]}"#,
        );
        let report = replay::<Sink>(&s, None).unwrap();
        // Probe 1000: inside a's window until a shrinks.
        assert_eq!(report.active_sections(), ["a", "b"]);
        assert_eq!(report.active_at_step(0), Some("a"));
    }
}

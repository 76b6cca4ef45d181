#![forbid(unsafe_code)]

//! Scripted page sessions.
//!
//! A scenario describes a page (viewport, sections, reveal scopes and their
//! targets, all in document coordinates) and a list of timed host signals.
//! Replaying it drives a [`ScrollSession`](folio_web::ScrollSession) exactly
//! as a browser would, minus the browser.
//!
//! ```json
//! {
//!   "name": "five-sections",
//!   "viewport_height": 900,
//!   "sections": [{ "slug": "home", "top": 0, "height": 1000 }],
//!   "steps": [{ "at_ms": 100, "action": "scroll", "y": 1050 }]
//! }
//! ```

use std::path::Path;

use folio_core::config::FolioConfig;
use folio_core::geometry::SectionGeometry;
use folio_core::id::{SectionId, TargetId};
use folio_reveal::ScopeOptions;
use folio_web::{DocumentLayout, TargetRect};
use serde::{Deserialize, Serialize};

use crate::error::{HarnessError, Result};

fn default_width() -> f64 {
    600.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionSpec {
    pub slug: String,
    pub top: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetSpec {
    pub id: u64,
    pub top: f64,
    pub height: f64,
    #[serde(default = "default_width")]
    pub width: f64,
    /// Per-target `[enter, exit]` thresholds.
    #[serde(default)]
    pub thresholds: Option<[f64; 2]>,
}

impl TargetSpec {
    #[must_use]
    pub fn rect(&self) -> TargetRect {
        TargetRect::new(self.top, self.height, self.width)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScopeSpec {
    pub name: String,
    #[serde(default)]
    pub options: Option<ScopeOptions>,
    #[serde(default)]
    pub targets: Vec<TargetSpec>,
}

/// A host signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Scroll { y: f64 },
    Resize { height: f64 },
    /// Re-measure a section (e.g. an image above it loaded).
    MoveSection { slug: String, top: f64, height: f64 },
    MoveTarget { id: u64, top: f64, height: f64 },
    UnmountSection { slug: String },
    UnmountTarget { id: u64 },
    LayoutChange,
    /// Let time pass; timers still fire.
    Wait,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub at_ms: u64,
    #[serde(flatten)]
    pub action: Action,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub viewport_height: f64,
    #[serde(default)]
    pub config: FolioConfig,
    #[serde(default)]
    pub sections: Vec<SectionSpec>,
    #[serde(default)]
    pub scopes: Vec<ScopeSpec>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Scenario {
    pub fn from_json(json: &str) -> Result<Self> {
        let scenario: Self = serde_json::from_str(json)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(HarnessError::MissingScenario {
                path: path.to_path_buf(),
            });
        }
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    /// Structural checks the session itself would not catch.
    pub fn validate(&self) -> Result<()> {
        if !self.viewport_height.is_finite() || self.viewport_height <= 0.0 {
            return Err(HarnessError::invalid("viewport_height must be positive"));
        }
        self.config.validate()?;
        if let Some(w) = self.steps.windows(2).find(|w| w[1].at_ms < w[0].at_ms) {
            return Err(HarnessError::invalid(format!(
                "steps out of order: {} ms after {} ms",
                w[1].at_ms, w[0].at_ms
            )));
        }
        let mut ids: Vec<u64> = self
            .scopes
            .iter()
            .flat_map(|s| s.targets.iter().map(|t| t.id))
            .collect();
        ids.sort_unstable();
        if let Some(w) = ids.windows(2).find(|w| w[0] == w[1]) {
            return Err(HarnessError::invalid(format!("duplicate target id {}", w[0])));
        }
        Ok(())
    }

    /// Initial document layout.
    #[must_use]
    pub fn layout(&self) -> DocumentLayout {
        let mut layout = DocumentLayout::new();
        for section in &self.sections {
            layout.set_section(
                SectionId::new(&section.slug),
                SectionGeometry::new(section.top, section.height),
            );
        }
        for target in self.scopes.iter().flat_map(|s| &s.targets) {
            layout.set_target(TargetId(target.id), target.rect());
        }
        layout
    }
}

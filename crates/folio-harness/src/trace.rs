#![forbid(unsafe_code)]

//! JSONL trace of a replay.
//!
//! Records, one JSON object per line:
//! - header (`event="trace_header"`)
//! - one line per session output (`event="output"`)
//! - summary (`event="trace_summary"`)
//!
//! Each output line is folded into an FNV-1a checksum chain so two traces
//! can be compared by their summary alone.

use std::fs::{File, OpenOptions, create_dir_all};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use folio_core::config::FolioConfig;
use folio_core::id::{SectionId, TargetId};
use folio_web::{SessionOutput, SessionStats};
use serde::Serialize;

pub const SCHEMA_VERSION: &str = "folio-trace-v1";

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

fn fnv1a64(seed: u64, bytes: &[u8]) -> u64 {
    bytes
        .iter()
        .fold(seed, |hash, b| (hash ^ u64::from(*b)).wrapping_mul(FNV_PRIME))
}

#[derive(Debug, Clone, Serialize)]
pub struct TraceHeader<'a> {
    pub scenario: &'a str,
    pub viewport_height: f64,
    pub config: &'a FolioConfig,
}

/// One session output at the step that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceRecord {
    pub seq: u64,
    /// Index of the scenario step, `None` for the mount phase.
    pub step: Option<usize>,
    pub at_ms: u64,
    pub output: SessionOutput,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceSummary {
    pub outputs: u64,
    pub final_active: Option<SectionId>,
    pub revealed: Vec<TargetId>,
    pub stats: SessionStats,
}

#[derive(Serialize)]
struct Line<'a, T> {
    event: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    schema_version: Option<&'static str>,
    #[serde(flatten)]
    body: &'a T,
    #[serde(skip_serializing_if = "Option::is_none")]
    checksum_chain: Option<String>,
}

/// Streaming trace writer.
pub struct TraceRecorder<W: Write> {
    writer: W,
    checksum_chain: u64,
    lines: u64,
    finished: bool,
}

impl TraceRecorder<BufWriter<File>> {
    /// Create (truncating) a trace file, including missing parent
    /// directories.
    pub fn create(path: &Path, header: &TraceHeader<'_>) -> io::Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;
        Self::new(BufWriter::new(file), header)
    }
}

impl<W: Write> TraceRecorder<W> {
    pub fn new(writer: W, header: &TraceHeader<'_>) -> io::Result<Self> {
        let mut recorder = Self {
            writer,
            checksum_chain: FNV_OFFSET,
            lines: 0,
            finished: false,
        };
        recorder.write_line(&Line {
            event: "trace_header",
            schema_version: Some(SCHEMA_VERSION),
            body: header,
            checksum_chain: None,
        })?;
        Ok(recorder)
    }

    pub fn record(&mut self, record: &TraceRecord) -> io::Result<()> {
        let line = self.write_line(&Line {
            event: "output",
            schema_version: None,
            body: record,
            checksum_chain: None,
        })?;
        self.checksum_chain = fnv1a64(self.checksum_chain, line.as_bytes());
        self.lines += 1;
        Ok(())
    }

    /// Write the summary and flush. Later calls are no-ops.
    pub fn finish(&mut self, summary: &TraceSummary) -> io::Result<()> {
        if self.finished {
            return Ok(());
        }
        self.write_line(&Line {
            event: "trace_summary",
            schema_version: None,
            body: summary,
            checksum_chain: Some(self.checksum()),
        })?;
        self.writer.flush()?;
        self.finished = true;
        Ok(())
    }

    /// Checksum chain over the output lines written so far.
    #[must_use]
    pub fn checksum(&self) -> String {
        format!("fnv1a64:{:016x}", self.checksum_chain)
    }

    #[must_use]
    pub fn lines(&self) -> u64 {
        self.lines
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_line<T: Serialize>(&mut self, line: &Line<'_, T>) -> io::Result<String> {
        let json = serde_json::to_string(line).map_err(io::Error::other)?;
        self.writer.write_all(json.as_bytes())?;
        self.writer.write_all(b"\n")?;
        Ok(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use web_time::Duration;

    fn header(config: &FolioConfig) -> TraceHeader<'_> {
        TraceHeader {
            scenario: "unit",
            viewport_height: 900.0,
            config,
        }
    }

    fn record(seq: u64, section: &str) -> TraceRecord {
        TraceRecord {
            seq,
            step: Some(0),
            at_ms: 16,
            output: SessionOutput::ActiveSection {
                section: SectionId::new(section),
                href: format!("#{section}"),
                at: Duration::from_millis(16),
            },
        }
    }

    fn summary() -> TraceSummary {
        TraceSummary {
            outputs: 1,
            final_active: Some(SectionId::new("home")),
            revealed: vec![TargetId(3)],
            stats: SessionStats::default(),
        }
    }

    #[test]
    fn writes_header_records_and_summary() {
        let config = FolioConfig::default();
        let mut rec = TraceRecorder::new(Vec::new(), &header(&config)).unwrap();
        rec.record(&record(0, "home")).unwrap();
        rec.finish(&summary()).unwrap();
        rec.finish(&summary()).unwrap();

        let text = String::from_utf8(rec.into_inner()).unwrap();
        let lines: Vec<serde_json::Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["event"], "trace_header");
        assert_eq!(lines[0]["schema_version"], SCHEMA_VERSION);
        assert_eq!(lines[1]["event"], "output");
        assert_eq!(lines[1]["output"]["kind"], "active_section");
        assert_eq!(lines[2]["event"], "trace_summary");
        assert_eq!(lines[2]["revealed"], serde_json::json!([3]));
        assert!(lines[2]["checksum_chain"].as_str().unwrap().starts_with("fnv1a64:"));
    }

    #[test]
    fn checksum_depends_on_content() {
        let config = FolioConfig::default();
        let mut a = TraceRecorder::new(io::sink(), &header(&config)).unwrap();
        let mut b = TraceRecorder::new(io::sink(), &header(&config)).unwrap();
        let mut c = TraceRecorder::new(io::sink(), &header(&config)).unwrap();
        a.record(&record(0, "home")).unwrap();
        b.record(&record(0, "home")).unwrap();
        c.record(&record(0, "about")).unwrap();
        assert_eq!(a.checksum(), b.checksum());
        assert_ne!(a.checksum(), c.checksum());
        assert_eq!(a.lines(), 1);
    }

    #[test]
    fn fnv_matches_reference_vector() {
        assert_eq!(fnv1a64(FNV_OFFSET, b""), 0xcbf2_9ce4_8422_2325);
        assert_eq!(fnv1a64(FNV_OFFSET, b"a"), 0xaf63_dc4c_8601_ec8c);
    }
}

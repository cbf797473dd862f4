//! JSONL document codec for sealed runs.
//!
//! A run crosses the process boundary as a single self-contained document:
//! a header line carrying run identity, then one step per line.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::trace::step::{AlgorithmFamily, Run, RunId, Step};

pub const RUN_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum RunJsonlLine {
    Header {
        schema_version: u32,
        run_id: RunId,
        family: AlgorithmFamily,
        created_at_ms: i64,
    },
    Step {
        step: Step,
    },
}

/// Write a sealed run as a JSONL document at `path`
pub fn write_jsonl_to_path(run: &Run, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    let header = RunJsonlLine::Header {
        schema_version: RUN_SCHEMA_VERSION,
        run_id: run.id,
        family: run.family,
        created_at_ms: run.created_at.timestamp_millis(),
    };
    writeln!(
        writer,
        "{}",
        serde_json::to_string(&header).map_err(io::Error::other)?
    )?;
    for step in &run.steps {
        let line = RunJsonlLine::Step { step: step.clone() };
        writeln!(
            writer,
            "{}",
            serde_json::to_string(&line).map_err(io::Error::other)?
        )?;
    }
    writer.flush()?;
    Ok(())
}

/// Read a run document back from `path`.
///
/// The header must be the first non-empty line; blank lines are skipped.
pub fn read_jsonl_from_path(path: &Path) -> io::Result<Run> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut header: Option<(u32, RunId, AlgorithmFamily, DateTime<Utc>)> = None;
    let mut steps = Vec::new();
    let mut seen_lines = 0usize;

    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let parsed: RunJsonlLine =
            serde_json::from_str(&line).map_err(|e| io::Error::other(format!("{e}")))?;
        match parsed {
            RunJsonlLine::Header {
                schema_version,
                run_id,
                family,
                created_at_ms,
            } => {
                if seen_lines != 0 {
                    return Err(io::Error::other("run header must be the first JSONL line"));
                }
                let created_at = Utc
                    .timestamp_millis_opt(created_at_ms)
                    .single()
                    .ok_or_else(|| io::Error::other("invalid created_at timestamp"))?;
                header = Some((schema_version, run_id, family, created_at));
            }
            RunJsonlLine::Step { step } => {
                if header.is_none() {
                    return Err(io::Error::other("step line before run header"));
                }
                steps.push(step);
            }
        }
        seen_lines += 1;
    }

    let (schema_version, run_id, family, created_at) =
        header.ok_or_else(|| io::Error::other("missing run header"))?;
    if schema_version > RUN_SCHEMA_VERSION {
        return Err(io::Error::other(format!(
            "unsupported run schema version {schema_version}"
        )));
    }

    Ok(Run {
        id: run_id,
        family,
        created_at,
        steps,
    })
}

// Copyright (c) 2025 CCNx PIT Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Deterministic replay of forwarding events against a [`PitTable`].
//!
//! A trace is a text file with one event per line:
//!
//! ```text
//! # default route
//! route / 0
//! interest /video/a.mpg 1 4000 17
//! interest /video/a.mpg 2
//! advance 100
//! content /video/a.mpg/seg0
//! print
//! ```
//!
//! Time only moves on `advance`, so a replay produces the same report on
//! every run. An `advance` that reaches the next multiple of the configured
//! sweep interval also sweeps expired entries, as a forwarder's timer would.

mod command;
mod error;

use std::fmt;
use std::io::{BufRead, Write};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::clock::{Clock, ManualClock, Timestamp};
use crate::config::TableConfig;
use crate::name::Name;
use crate::pit::{FaceId, Fib, Interest, PitError, PitTable, StaticFib};

pub use command::TraceCommand;
pub use error::{TraceError, TraceResult};

/// Counters accumulated over a replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraceReport {
    pub interests: usize,
    pub created: usize,
    pub aggregated: usize,
    pub duplicates: usize,
    pub refused: usize,
    pub satisfied: usize,
    pub unsolicited: usize,
    pub erased: usize,
    pub expired: usize,
}

impl fmt::Display for TraceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "interests={} created={} aggregated={} duplicates={} refused={} \
             satisfied={} unsolicited={} erased={} expired={}",
            self.interests,
            self.created,
            self.aggregated,
            self.duplicates,
            self.refused,
            self.satisfied,
            self.unsolicited,
            self.erased,
            self.expired,
        )
    }
}

/// Replays trace events against a table driven by a manual clock.
#[derive(Debug)]
pub struct TraceRunner {
    table: PitTable,
    fib: StaticFib,
    clock: Arc<ManualClock>,
    report: TraceReport,
    sweep_interval: u64,
    next_sweep: Timestamp,
}

impl TraceRunner {
    /// Creates a runner with an empty FIB and the clock at zero.
    pub fn new(config: &TableConfig) -> Self {
        let clock = Arc::new(ManualClock::default());
        let sweep_interval = config.sweep_interval_ms.max(1);
        Self {
            table: PitTable::from_config(config, clock.clone()),
            fib: StaticFib::new(),
            clock,
            report: TraceReport::default(),
            sweep_interval,
            next_sweep: Timestamp::from_millis(sweep_interval),
        }
    }

    pub fn table(&self) -> &PitTable {
        &self.table
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    pub fn report(&self) -> TraceReport {
        self.report
    }

    /// Replays every line of `input`, writing one report line per event to `out`.
    ///
    /// Stops at the first malformed line. Capacity refusals and unmatched
    /// content are reported and the replay continues.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> TraceResult<TraceReport> {
        for (index, line) in input.lines().enumerate() {
            let line_no = index + 1;
            if let Some(command) = TraceCommand::parse_line(line_no, &line?)? {
                self.apply(line_no, command, out)?;
            }
        }
        info!(report = %self.report, entries = self.table.len(), "Trace replay finished");
        Ok(self.report)
    }

    /// Applies a single event.
    pub fn apply<W: Write>(
        &mut self,
        line: usize,
        command: TraceCommand,
        out: &mut W,
    ) -> TraceResult<()> {
        debug!(line, ?command, "Applying trace event");
        match command {
            TraceCommand::Route { prefix, faces } => {
                self.fib
                    .add_route(&prefix, faces)
                    .map_err(|e| TraceError::Pit {
                        line,
                        source: e.into(),
                    })?;
            }
            TraceCommand::Interest {
                name,
                face,
                lifetime,
                nonce,
            } => self.on_interest(line, name, face, lifetime, nonce, out)?,
            TraceCommand::Content { name } => self.on_content(line, &name, out)?,
            TraceCommand::Erase { name } => {
                let id = self.table.lookup_by_interest(&name).map(|e| e.id());
                match id {
                    Some(id) => {
                        self.table
                            .erase(id)
                            .map_err(|source| TraceError::Pit { line, source })?;
                        self.report.erased += 1;
                        writeln!(out, "erased {name}")?;
                    }
                    None => writeln!(out, "erase-miss {name}")?,
                }
            }
            TraceCommand::Advance { by } => {
                let now = self.clock.advance(by);
                self.sweep_on_schedule(now, out)?;
            }
            TraceCommand::Sweep => {
                let removed = self.table.sweep_due();
                self.report.expired += removed;
                writeln!(out, "swept {removed} at {}", self.now())?;
            }
            TraceCommand::Print => self.table.print(out)?,
        }
        Ok(())
    }

    /// Runs one sweep once `now` reaches the scheduled boundary, then
    /// schedules the first boundary past `now`.
    fn sweep_on_schedule<W: Write>(&mut self, now: Timestamp, out: &mut W) -> TraceResult<()> {
        if now < self.next_sweep {
            return Ok(());
        }
        let removed = self.table.sweep_expired(now);
        self.report.expired += removed;
        writeln!(out, "auto-swept {removed} at {now}")?;

        let boundary = (now.ms_since_epoch / self.sweep_interval)
            .saturating_add(1)
            .saturating_mul(self.sweep_interval);
        self.next_sweep = Timestamp::from_millis(boundary);
        debug!(next_sweep = %self.next_sweep, "Scheduled expiry sweep");
        Ok(())
    }

    fn on_interest<W: Write>(
        &mut self,
        line: usize,
        name: Name,
        face: FaceId,
        lifetime: Option<Duration>,
        nonce: Option<u32>,
        out: &mut W,
    ) -> TraceResult<()> {
        self.report.interests += 1;

        if let Some(entry) = self.table.lookup_by_interest_mut(&name) {
            if let Some(n) = nonce.filter(|n| entry.has_nonce(*n)) {
                self.report.duplicates += 1;
                writeln!(out, "duplicate {name} nonce={n}")?;
                return Ok(());
            }
            entry.add_incoming(face, nonce);
            let id = entry.id();
            let expire_at = self
                .table
                .refresh(id, lifetime)
                .map_err(|source| TraceError::Pit { line, source })?;
            self.report.aggregated += 1;
            writeln!(out, "aggregated {name} in={face} expires={expire_at}")?;
            return Ok(());
        }

        if self.fib.longest_prefix_match(&name).is_none() {
            return Err(TraceError::NoRoute { line, name });
        }

        let mut interest = Interest::new(name, face);
        interest.nonce = nonce;
        interest.lifetime = lifetime;

        match self.table.create(&interest, &self.fib) {
            Ok(entry) => {
                let hops: Vec<FaceId> = entry
                    .route()
                    .next_hops
                    .iter()
                    .copied()
                    .filter(|hop| *hop != face)
                    .collect();
                for hop in &hops {
                    entry.add_outgoing(*hop);
                }
                self.report.created += 1;
                writeln!(
                    out,
                    "created {} in={face} out=[{}] expires={}",
                    entry.name(),
                    join(&hops),
                    entry.expire_at()
                )?;
            }
            Err(PitError::CapacityExceeded { max_size }) => {
                self.report.refused += 1;
                writeln!(out, "refused {} full={max_size}", interest.name)?;
            }
            Err(source) => return Err(TraceError::Pit { line, source }),
        }
        Ok(())
    }

    fn on_content<W: Write>(&mut self, line: usize, name: &Name, out: &mut W) -> TraceResult<()> {
        let matched = self
            .table
            .lookup_by_content(name)
            .map(|e| (e.id(), e.name().clone(), e.incoming_faces().collect::<Vec<_>>()));

        match matched {
            Some((id, prefix, faces)) => {
                self.table
                    .erase(id)
                    .map_err(|source| TraceError::Pit { line, source })?;
                self.report.satisfied += 1;
                writeln!(out, "satisfied {name} by {prefix} faces=[{}]", join(&faces))?;
            }
            None => {
                self.report.unsolicited += 1;
                writeln!(out, "unsolicited {name}")?;
            }
        }
        Ok(())
    }
}

fn join(faces: &[FaceId]) -> String {
    faces
        .iter()
        .map(|face| face.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pit::EvictionKind;

    fn replay(config: &TableConfig, trace: &str) -> (TraceRunner, String) {
        let mut runner = TraceRunner::new(config);
        let mut out = Vec::new();
        runner.run(trace.as_bytes(), &mut out).unwrap();
        (runner, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_interest_aggregation_and_satisfaction() {
        let trace = "\
route / 0
route /video 5 1
interest /video/a.mpg 1 4000 17
interest /video/a.mpg 2 4000 18
interest /video/a.mpg 3 4000 17
content /video/a.mpg/seg0
content /video/a.mpg/seg1
";
        let (runner, out) = replay(&TableConfig::default(), trace);
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(
            lines,
            vec![
                "created /video/a.mpg in=1 out=[5] expires=4000ms",
                "aggregated /video/a.mpg in=2 expires=4000ms",
                "duplicate /video/a.mpg nonce=17",
                "satisfied /video/a.mpg/seg0 by /video/a.mpg faces=[1,2]",
                "unsolicited /video/a.mpg/seg1",
            ]
        );
        let report = runner.report();
        assert_eq!(report.interests, 3);
        assert_eq!(report.created, 1);
        assert_eq!(report.aggregated, 1);
        assert_eq!(report.duplicates, 1);
        assert_eq!(report.satisfied, 1);
        assert_eq!(report.unsolicited, 1);
        assert!(runner.table().is_empty());
    }

    #[test]
    fn test_advance_and_sweep() {
        let trace = "\
route / 0
interest /a 1 100
interest /b 1 500
advance 100
sweep
interest /b 2 1000
advance 600
sweep
print
";
        let (runner, out) = replay(&TableConfig::default(), trace);
        assert!(out.contains("swept 1 at 100ms"));
        // /b was refreshed to 1100ms, so it survives the sweep at 700ms.
        assert!(out.contains("swept 0 at 700ms"));
        assert!(out.contains("/b\texpires=1100ms in=[1,2]"));
        assert_eq!(runner.report().expired, 1);
        assert_eq!(runner.table().len(), 1);
    }

    #[test]
    fn test_advance_sweeps_at_interval_boundaries() {
        let config = TableConfig {
            sweep_interval_ms: 250,
            ..TableConfig::default()
        };
        let trace = "\
route / 0
interest /a 1 100
interest /b 1 600
advance 200
advance 100
advance 100
advance 300
";
        let (runner, out) = replay(&config, trace);
        let lines: Vec<&str> = out.lines().collect();

        // No sweep at 200ms or 400ms; the boundaries are 250ms, 500ms and 750ms.
        assert_eq!(
            lines,
            vec![
                "created /a in=1 out=[0] expires=100ms",
                "created /b in=1 out=[0] expires=600ms",
                "auto-swept 1 at 300ms",
                "auto-swept 1 at 700ms",
            ]
        );
        assert_eq!(runner.report().expired, 2);
        assert!(runner.table().is_empty());
    }

    #[test]
    fn test_advance_past_several_boundaries_sweeps_once() {
        let config = TableConfig {
            sweep_interval_ms: 100,
            ..TableConfig::default()
        };
        let trace = "\
route / 0
interest /a 1 50
interest /b 1 150
interest /c 1 2000
advance 1000
advance 50
advance 50
";
        let (runner, out) = replay(&config, trace);
        assert_eq!(out.matches("auto-swept").count(), 2);
        assert!(out.contains("auto-swept 2 at 1000ms"));
        assert!(out.contains("auto-swept 0 at 1100ms"));
        assert_eq!(runner.report().expired, 2);
        assert_eq!(runner.table().len(), 1);
    }

    #[test]
    fn test_persistent_table_refuses_and_continues() {
        let config = TableConfig {
            max_size: 1,
            eviction: EvictionKind::Persistent,
            ..TableConfig::default()
        };
        let trace = "\
route / 0
interest /a 1
interest /b 1
erase /a
erase /a
interest /b 1
";
        let (runner, out) = replay(&config, trace);
        assert!(out.contains("refused /b full=1"));
        assert!(out.contains("erased /a"));
        assert!(out.contains("erase-miss /a"));
        assert_eq!(runner.report().refused, 1);
        assert_eq!(runner.report().created, 2);
        assert!(runner.table().lookup_by_interest(&Name::parse("/b").unwrap()).is_some());
    }

    #[test]
    fn test_missing_route_is_reported_not_panicked() {
        let mut runner = TraceRunner::new(&TableConfig::default());
        let err = runner
            .run("route /x 1\ninterest /y 2\n".as_bytes(), &mut Vec::new())
            .unwrap_err();
        assert!(matches!(err, TraceError::NoRoute { line: 2, .. }));
    }

    #[test]
    fn test_parse_error_stops_replay() {
        let mut runner = TraceRunner::new(&TableConfig::default());
        let err = runner
            .run("route / 0\nbogus\ninterest /a 1\n".as_bytes(), &mut Vec::new())
            .unwrap_err();
        assert!(matches!(err, TraceError::UnknownCommand { line: 2, .. }));
        assert!(runner.table().is_empty());
    }
}

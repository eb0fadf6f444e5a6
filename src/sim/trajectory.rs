//! Recorded simulation output

use std::io::{self, Write};

use crate::model::{Guard, SlipState};

/// One recorded point of the run
///
/// At an event time two samples share the same `t`: the left limit
/// before the reset and the right limit after it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub t: f64,
    pub velocity: f64,
    pub position: f64,
    pub state: SlipState,
}

/// One resolved guard crossing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventRecord {
    pub t: f64,
    pub guard: Guard,
    pub from: SlipState,
    pub to: SlipState,
}

/// Time history of a run: accepted samples plus the event log
#[derive(Debug, Clone, Default)]
pub struct Trajectory {
    samples: Vec<Sample>,
    events: Vec<EventRecord>,
}

impl Trajectory {
    pub(crate) fn push_sample(&mut self, sample: Sample) {
        self.samples.push(sample);
    }

    pub(crate) fn push_event(&mut self, event: EventRecord) {
        self.events.push(event);
    }

    /// All recorded samples in time order
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// All resolved events in time order
    pub fn events(&self) -> &[EventRecord] {
        &self.events
    }

    /// Number of recorded samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Last recorded sample
    pub fn last(&self) -> Option<&Sample> {
        self.samples.last()
    }

    pub fn times(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.t).collect()
    }

    pub fn velocities(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.velocity).collect()
    }

    pub fn positions(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.position).collect()
    }

    /// Interpolated `(velocity, position)` at time `t`
    ///
    /// Linear between neighboring samples; right-continuous at event
    /// times, where the duplicate samples hold both limits of the
    /// discontinuity. `None` outside the recorded range.
    pub fn at(&self, t: f64) -> Option<(f64, f64)> {
        let first = self.samples.first()?;
        let last = self.samples.last()?;
        if t < first.t || t > last.t {
            return None;
        }

        // First sample strictly past t; its left neighbor is the
        // latest sample at or before t, which at an event time is the
        // post-reset duplicate
        let idx = self.samples.partition_point(|s| s.t <= t);
        if idx == self.samples.len() {
            return Some((last.velocity, last.position));
        }

        let hi = &self.samples[idx];
        let lo = &self.samples[idx - 1];
        let span = hi.t - lo.t;
        if span <= 0.0 {
            return Some((hi.velocity, hi.position));
        }

        let w = (t - lo.t) / span;
        Some((
            lo.velocity + w * (hi.velocity - lo.velocity),
            lo.position + w * (hi.position - lo.position),
        ))
    }

    /// Save the trajectory to a CSV file
    ///
    /// Appends a `.csv` extension when missing.
    ///
    /// # CSV Format
    ///
    /// ```csv
    /// time [s],velocity,position,state
    /// 0.0,0.0,0.0,AtRest
    /// 0.001,0.0,0.0,AtRest
    /// ```
    pub fn save(&self, filename: &str) -> io::Result<()> {
        let filename = if filename.to_lowercase().ends_with(".csv") {
            filename.to_string()
        } else {
            format!("{}.csv", filename)
        };

        let file = std::fs::File::create(&filename)?;
        self.save_to_writer(file)
    }

    /// Save the trajectory to a writer
    ///
    /// Useful for testing or writing to something other than a file.
    pub fn save_to_writer<W: Write>(&self, writer: W) -> io::Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);

        wtr.write_record(["time [s]", "velocity", "position", "state"])?;

        for sample in &self.samples {
            wtr.write_record(&[
                sample.t.to_string(),
                sample.velocity.to_string(),
                sample.position.to_string(),
                sample.state.to_string(),
            ])?;
        }

        wtr.flush()?;
        Ok(())
    }
}

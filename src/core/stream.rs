use std::collections::BTreeMap;

use serde::Serialize;

use super::trace::{Coordinates, StationTrace};

/// Traces recorded by one instrument at a station (`NET.STA.LOC.BI`)
#[derive(Debug, Clone, Serialize)]
pub struct StationStream {
    id: String,
    traces: Vec<StationTrace>,
}

impl StationStream {
    pub(crate) fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            traces: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, trace: StationTrace) {
        self.traces.push(trace);
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn traces(&self) -> &[StationTrace] {
        &self.traces
    }

    pub fn traces_mut(&mut self) -> std::slice::IterMut<'_, StationTrace> {
        self.traces.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.traces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.traces.is_empty()
    }

    /// A stream passes when it has traces and none of them failed
    pub fn passed(&self) -> bool {
        !self.traces.is_empty() && self.traces.iter().all(StationTrace::passed)
    }

    pub fn coordinates(&self) -> Option<Coordinates> {
        self.traces.first().map(|tr| tr.stats.coordinates)
    }

    /// Trace indices keyed by instrument (`NET.STA.LOC.BI`)
    pub fn instrument_groups(&self) -> BTreeMap<String, Vec<usize>> {
        let mut groups: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for (i, trace) in self.traces.iter().enumerate() {
            groups
                .entry(trace.instrument_id())
                .or_default()
                .push(i);
        }
        groups
    }
}

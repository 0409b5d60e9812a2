//! Peak ground motions of the records that survived QC.

use serde::{Deserialize, Serialize};

use crate::core::{StreamCollection, Units};
use crate::dsp::integrate::cumulative_trapezoid;
use crate::dsp::stats::peak_abs;
use crate::report::write_csv;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeakMotion {
    pub stream_id: String,
    pub trace_id: String,
    /// Peak ground acceleration, in the units of the record
    pub pga: f64,
    /// Peak ground velocity from the integrated record
    pub pgv: f64,
}

/// PGA and PGV of every acceleration trace in a passed stream
pub fn peak_motions(collection: &StreamCollection) -> Vec<PeakMotion> {
    collection
        .passed_streams()
        .flat_map(|stream| {
            stream
                .traces()
                .iter()
                .filter(|trace| trace.stats.standard.units == Units::Acceleration)
                .map(move |trace| PeakMotion {
                    stream_id: stream.id().to_string(),
                    trace_id: trace.id(),
                    pga: peak_abs(&trace.data),
                    pgv: peak_abs(&cumulative_trapezoid(&trace.data, trace.stats.delta())),
                })
        })
        .collect()
}

pub fn to_csv(rows: &[PeakMotion]) -> Result<String, csv::Error> {
    write_csv(&["stream_id", "trace_id", "pga", "pgv"], rows)
}

pub mod free_field;
pub mod instrument;
pub mod max_amplitude;
pub mod max_traces;
pub mod nnet;
pub mod sample_rate;
pub mod snr;
pub mod sta_lta;
pub mod tail;
pub mod zero_crossings;

pub use free_field::FreeFieldCheck;
pub use instrument::InstrumentCheck;
pub use max_amplitude::MaxAmplitudeCheck;
pub use max_traces::MaxTracesCheck;
pub use nnet::NnetQaCheck;
pub use sample_rate::MinSampleRateCheck;
pub use snr::SnrCheck;
pub use sta_lta::StaLtaCheck;
pub use tail::TailCheck;
pub use zero_crossings::ZeroCrossingsCheck;

use anyhow::Result;

use crate::core::{Outcome, ScalarEvent, StationStream, StationTrace};
use crate::registry::{CheckMetadata, DescribeCheck};
use crate::windows::SignalWindows;

/// Read-only inputs shared by every check of a run
#[derive(Debug, Clone, Copy)]
pub struct CheckContext<'a> {
    pub event: &'a ScalarEvent,
}

impl CheckContext<'_> {
    /// Signal windows of `trace`, or the dependency failure to report when
    /// windowing did not succeed for this event
    pub fn windows<'t>(&self, trace: &'t StationTrace) -> Result<&'t SignalWindows, Outcome> {
        trace.parameters().signal_windows().map_err(|reason| {
            Outcome::dependency_failed(format!("{} (event {})", reason, self.event.id))
        })
    }
}

/// Base trait for all quality checks in the pipeline
pub trait Check: Send + Sync + std::fmt::Debug {
    /// Called once after the parameters are deserialized, before any stream
    /// is processed. Rejects inconsistent parameters and loads resources.
    fn prepare(&mut self) -> Result<()> {
        Ok(())
    }

    /// Decide on a single trace
    fn check_trace(&self, _trace: &StationTrace, _ctx: &CheckContext<'_>) -> Outcome {
        Outcome::skipped("check does not operate on single traces")
    }

    /// Decide on every trace of a stream; one outcome per trace, in order.
    /// Stream-level checks override this.
    fn check_stream(&self, stream: &StationStream, ctx: &CheckContext<'_>) -> Vec<Outcome> {
        stream
            .traces()
            .iter()
            .map(|trace| self.check_trace(trace, ctx))
            .collect()
    }
}

/// Metadata of the checks shipped with this crate
pub fn builtin_metadata() -> Vec<CheckMetadata> {
    vec![
        FreeFieldCheck::metadata(),
        MaxAmplitudeCheck::metadata(),
        MaxTracesCheck::metadata(),
        MinSampleRateCheck::metadata(),
        ZeroCrossingsCheck::metadata(),
        StaLtaCheck::metadata(),
        SnrCheck::metadata(),
        NnetQaCheck::metadata(),
        InstrumentCheck::metadata(),
        TailCheck::metadata(),
    ]
}

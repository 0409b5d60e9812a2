pub mod collection;
pub mod event;
pub mod outcome;
pub mod params;
pub mod state;
pub mod stream;
pub mod trace;

pub use collection::{RawTrace, StreamCollection};
pub use event::ScalarEvent;
pub use outcome::{Annotation, CheckRecord, Outcome, Verdict};
pub use params::{SnrSpectrum, TailRatios, TraceParameters};
pub use state::TraceState;
pub use stream::StationStream;
pub use trace::{Coordinates, StandardMetadata, StationTrace, TraceStats, Units};

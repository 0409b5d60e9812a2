pub mod pipeline;
pub mod pool;

pub use pipeline::{QcPipeline, WINDOWING};
pub use pool::PipelinePool;

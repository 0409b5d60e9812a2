use std::sync::Arc;

use anyhow::{Context, Result};
use log::info;
use tokio::sync::Semaphore;

use super::QcPipeline;
use crate::core::{ScalarEvent, StreamCollection};
use crate::report::QaReport;

/// Runs the streams of a collection concurrently on blocking workers.
///
/// Streams are independent, so each one is processed whole by a single
/// worker; at most `max_concurrent` run at the same time. The collection
/// comes back in its original stream order.
pub struct PipelinePool {
    pipeline: Arc<QcPipeline>,
    semaphore: Arc<Semaphore>,
    max_concurrent: usize,
}

impl PipelinePool {
    pub fn new(pipeline: Arc<QcPipeline>, max_concurrent: usize) -> Self {
        let max_concurrent = max_concurrent.max(1);
        Self {
            pipeline,
            semaphore: Arc::new(Semaphore::new(max_concurrent)),
            max_concurrent,
        }
    }

    /// Pool sized by the pipeline's own settings
    pub fn from_pipeline(pipeline: Arc<QcPipeline>) -> Self {
        let max_concurrent = pipeline.settings().max_concurrent;
        Self::new(pipeline, max_concurrent)
    }

    pub async fn run(
        &self,
        collection: StreamCollection,
        event: &ScalarEvent,
    ) -> Result<(StreamCollection, QaReport)> {
        info!(
            "Processing {} streams with up to {} workers",
            collection.len(),
            self.max_concurrent
        );

        let event = Arc::new(event.clone());
        let mut handles = Vec::with_capacity(collection.len());

        for mut stream in collection.into_streams() {
            // Blocks if max_concurrent streams are already running
            let permit = self
                .semaphore
                .clone()
                .acquire_owned()
                .await
                .context("worker pool closed")?;
            let pipeline = self.pipeline.clone();
            let event = event.clone();

            handles.push(tokio::task::spawn_blocking(move || {
                let _permit = permit;
                pipeline.process_stream(&mut stream, &event);
                stream
            }));
        }

        let mut streams = Vec::with_capacity(handles.len());
        for handle in handles {
            streams.push(handle.await.context("stream worker panicked")?);
        }

        let collection = StreamCollection::from_streams(streams);
        let report = self.pipeline.finish(&collection);
        Ok((collection, report))
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }
}

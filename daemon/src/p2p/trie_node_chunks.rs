// Trie Node Chunks Processor
//
// Single-consumer reassembly of large trie-node payloads split across
// network chunks. Producers hand chunk batches to `check_batch`; one worker
// task owns the chunk cache, stores arriving chunks, answers each caller
// synchronously and periodically re-requests the chunks still missing.

use std::time::Duration;

use log::{debug, warn};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::{interval_at, Instant};

use norn_common::batch::Batch;
use norn_common::crypto::Hasher;

use crate::config::MIN_CHUNK_REQUEST_INTERVAL;
use crate::core::error::ProcessError;
use crate::core::traits::RequestHandler;
use crate::p2p::chunk::ChunkSlab;
use crate::p2p::chunk_cache::Cacher;

/// Outcome of checking one inbound batch against the reassembly state.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CheckedChunkResult {
    pub is_chunk: bool,
    pub have_all_chunks: bool,
    pub complete_buffer: Option<Vec<u8>>,
}

struct CheckRequest {
    batch: Batch,
    response: oneshot::Sender<CheckedChunkResult>,
}

/// Argument DTO for the trie node chunks processor constructor.
pub struct TrieNodeChunksProcessorArgs<H, C, R> {
    pub hasher: H,
    pub chunks_cacher: C,
    pub request_interval: Duration,
    pub request_handler: R,
    pub topic: String,
    pub shard_id: u32,
}

pub struct TrieNodeChunksProcessor<H> {
    hasher: H,
    check_requests: mpsc::Sender<CheckRequest>,
    shutdown: watch::Sender<bool>,
}

impl<H: Hasher> TrieNodeChunksProcessor<H> {
    /// Validates the configuration and spawns the single worker task that
    /// owns the chunk cache.
    pub fn new<C, R>(args: TrieNodeChunksProcessorArgs<H, C, R>) -> Result<Self, ProcessError>
    where
        C: Cacher<ChunkSlab> + 'static,
        R: RequestHandler + 'static,
    {
        if args.request_interval < MIN_CHUNK_REQUEST_INTERVAL {
            return Err(ProcessError::InvalidRequestInterval(args.request_interval));
        }
        if args.topic.is_empty() {
            return Err(ProcessError::EmptyTopic);
        }

        // Capacity one: a producer blocks until the worker picks its request
        // up, serializing all cache mutation through the single consumer.
        let (check_tx, check_rx) = mpsc::channel(1);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let worker = ChunksWorker {
            cacher: args.chunks_cacher,
            request_handler: args.request_handler,
            request_interval: args.request_interval,
            topic: args.topic,
            shard_id: args.shard_id,
            shutdown: shutdown_rx,
        };
        tokio::spawn(worker.run(check_rx));

        Ok(Self {
            hasher: args.hasher,
            check_requests: check_tx,
            shutdown: shutdown_tx,
        })
    }

    /// Checks one inbound batch, storing its chunk when the batch is a valid
    /// chunk carrier. Exactly one caller per reference observes
    /// `have_all_chunks` with the assembled buffer: the one whose chunk
    /// completed the slab.
    ///
    /// Must not be called after `close`.
    pub async fn check_batch(&self, batch: &Batch) -> Result<CheckedChunkResult, ProcessError> {
        if batch.max_chunks < 2 {
            return Ok(CheckedChunkResult::default());
        }
        if batch.reference.len() != self.hasher.size() {
            return Err(ProcessError::IncompatibleReference {
                expected: self.hasher.size(),
                actual: batch.reference.len(),
            });
        }
        if batch.data.len() != 1 {
            return Ok(CheckedChunkResult::default());
        }

        let (response_tx, response_rx) = oneshot::channel();
        let request = CheckRequest {
            batch: batch.clone(),
            response: response_tx,
        };

        self.check_requests
            .send(request)
            .await
            .map_err(|_| ProcessError::ProcessorStopped)?;
        response_rx
            .await
            .map_err(|_| ProcessError::ProcessorStopped)
    }

    /// Stops the worker task. Idempotent.
    pub fn close(&self) {
        let _ = self.shutdown.send(true);
    }
}

struct ChunksWorker<C, R> {
    cacher: C,
    request_handler: R,
    request_interval: Duration,
    topic: String,
    shard_id: u32,
    shutdown: watch::Receiver<bool>,
}

impl<C, R> ChunksWorker<C, R>
where
    C: Cacher<ChunkSlab>,
    R: RequestHandler,
{
    async fn run(mut self, mut check_requests: mpsc::Receiver<CheckRequest>) {
        let mut shutdown = self.shutdown.clone();
        // First round of requests fires one full interval after start; chunk
        // arrivals never reset the schedule.
        let mut request_timer = interval_at(
            Instant::now() + self.request_interval,
            self.request_interval,
        );

        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    debug!("trie node chunks worker is stopping");
                    return;
                }
                Some(request) = check_requests.recv() => {
                    self.process_check_request(request);
                }
                _ = request_timer.tick() => {
                    self.request_missing_chunks().await;
                }
            }
        }
    }

    fn process_check_request(&mut self, request: CheckRequest) {
        let CheckRequest { batch, response } = request;

        let mut slab = self
            .cacher
            .remove(&batch.reference)
            .unwrap_or_else(|| ChunkSlab::new(batch.max_chunks));
        slab.put(
            batch.chunk_index,
            batch.data.into_iter().next().unwrap_or_default(),
        );

        let result = match slab.try_assemble() {
            Some(buffer) => CheckedChunkResult {
                is_chunk: true,
                have_all_chunks: true,
                complete_buffer: Some(buffer),
            },
            None => {
                let weight = slab.size();
                self.cacher.put(batch.reference, slab, weight);
                CheckedChunkResult {
                    is_chunk: true,
                    have_all_chunks: false,
                    complete_buffer: None,
                }
            }
        };

        if response.send(result).is_err() {
            warn!("chunk check caller went away before receiving its result");
        }
    }

    async fn request_missing_chunks(&mut self) {
        for reference in self.cacher.keys() {
            if *self.shutdown.borrow() {
                return;
            }

            let missing = match self.cacher.get(&reference) {
                Some(slab) => slab.missing_indices(),
                None => continue,
            };

            for chunk_index in missing {
                if *self.shutdown.borrow() {
                    return;
                }

                self.request_handler
                    .request_trie_node(self.shard_id, &reference, &self.topic, chunk_index)
                    .await;
            }
        }
    }
}

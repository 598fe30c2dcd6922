// Inbound request-message gate shared by the resolver topics: anti-flood
// accounting first, then throttling, then payload parsing.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use norn_common::marshal::Marshaller;

use crate::core::error::ProcessError;

pub type PeerId = String;

/// Raw message handed over by the network layer.
#[derive(Debug, Default, Clone)]
pub struct P2pMessage {
    pub data: Vec<u8>,
    pub peer: PeerId,
}

/// Kind of object a peer asks for on a resolver topic.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestDataType {
    #[default]
    Hash,
    HashArray,
    Nonce,
    Epoch,
}

/// Parsed resolver request envelope.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestData {
    pub request_type: RequestDataType,
    pub value: Vec<u8>,
    pub epoch: u32,
    pub chunk_index: u32,
}

/// Flood accounting for inbound peer traffic.
#[async_trait]
pub trait AntifloodHandler: Send + Sync {
    async fn can_process_message(
        &self,
        message: &P2pMessage,
        from_connected_peer: &PeerId,
    ) -> Result<(), ProcessError>;

    async fn can_process_messages_on_topic(
        &self,
        peer: &PeerId,
        topic: &str,
        num_messages: u32,
        total_size: u64,
    ) -> Result<(), ProcessError>;
}

/// Local concurrency limiter for message handling.
pub trait Throttler: Send + Sync {
    fn can_process(&self) -> bool;

    fn start_processing(&self);

    fn end_processing(&self);
}

pub struct MessageProcessor<A, T, M> {
    antiflood_handler: A,
    throttler: T,
    marshaller: M,
    topic: String,
}

impl<A, T, M> MessageProcessor<A, T, M>
where
    A: AntifloodHandler,
    T: Throttler,
    M: Marshaller,
{
    pub fn new(
        antiflood_handler: A,
        throttler: T,
        marshaller: M,
        topic: String,
    ) -> Result<Self, ProcessError> {
        if topic.is_empty() {
            return Err(ProcessError::EmptyTopic);
        }

        Ok(Self {
            antiflood_handler,
            throttler,
            marshaller,
            topic,
        })
    }

    /// Checks whether the message may be handled at all: per-message and
    /// per-topic flood accounting, then a local throttle slot.
    pub async fn can_process_message(
        &self,
        message: &P2pMessage,
        from_connected_peer: &PeerId,
    ) -> Result<(), ProcessError> {
        self.antiflood_handler
            .can_process_message(message, from_connected_peer)
            .await?;
        self.antiflood_handler
            .can_process_messages_on_topic(
                from_connected_peer,
                &self.topic,
                1,
                message.data.len() as u64,
            )
            .await?;

        if !self.throttler.can_process() {
            return Err(ProcessError::SystemBusy);
        }

        Ok(())
    }

    /// Unmarshals the request envelope carried by the message.
    pub fn parse_received_message(&self, message: &P2pMessage) -> Result<RequestData, ProcessError> {
        let request_data: RequestData = self.marshaller.unmarshal(&message.data)?;
        if request_data.value.is_empty() {
            return Err(ProcessError::EmptyRequestValue);
        }

        Ok(request_data)
    }

    /// Full inbound path: admission checks, then parsing inside a throttle
    /// slot.
    pub async fn process_message(
        &self,
        message: &P2pMessage,
        from_connected_peer: &PeerId,
    ) -> Result<RequestData, ProcessError> {
        self.can_process_message(message, from_connected_peer).await?;

        self.throttler.start_processing();
        let result = self.parse_received_message(message);
        self.throttler.end_processing();

        result
    }
}

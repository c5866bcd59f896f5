use std::collections::VecDeque;

use crate::types::{ChannelKind, ConnectionId};

/// One encoded message waiting to go out
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outgoing {
    pub targets: Vec<ConnectionId>,
    pub channel: ChannelKind,
    pub payload: Box<[u8]>,
}

impl Outgoing {
    pub fn new(targets: Vec<ConnectionId>, channel: ChannelKind, payload: Box<[u8]>) -> Self {
        Self {
            targets,
            channel,
            payload,
        }
    }
}

/// FIFO of pending messages
#[derive(Debug, Default)]
pub struct OutboundQueue {
    queue: VecDeque<Outgoing>,
}

impl OutboundQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages with no targets are dropped
    pub fn push(&mut self, outgoing: Outgoing) {
        if outgoing.targets.is_empty() {
            return;
        }
        self.queue.push_back(outgoing);
    }

    pub fn pop(&mut self) -> Option<Outgoing> {
        self.queue.pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Outgoing> {
        self.queue.iter()
    }

    pub fn drain(&mut self) -> Vec<Outgoing> {
        self.queue.drain(..).collect()
    }
}

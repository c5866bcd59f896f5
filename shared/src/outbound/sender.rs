use log::warn;

use crate::{
    outbound::queue::{OutboundQueue, Outgoing},
    transport::{PacketSender, SendError},
    types::ConnectionId,
};

/// What one [`OutboundSender::step`] achieved
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SendProgress {
    /// Nothing was queued
    Idle,
    /// A message finished going to every target it could reach
    Delivered,
    /// A target failed transiently; the next step retries it
    Retry { connection: ConnectionId, code: i32 },
}

struct InFlight {
    message: Outgoing,
    next_target: usize,
}

/// Drains an [`OutboundQueue`] one message at a time, resuming a message
/// at the target that failed transiently.
#[derive(Default)]
pub struct OutboundSender {
    in_flight: Option<InFlight>,
    delivered: u64,
    abandoned: u64,
}

impl OutboundSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` when no message is partially delivered
    pub fn is_idle(&self) -> bool {
        self.in_flight.is_none()
    }

    /// Number of successful per-target sends
    pub fn delivered(&self) -> u64 {
        self.delivered
    }

    /// Number of per-target deliveries given up after a fatal error
    pub fn abandoned(&self) -> u64 {
        self.abandoned
    }

    pub fn step(&mut self, queue: &mut OutboundQueue, transport: &dyn PacketSender) -> SendProgress {
        let mut in_flight = match self.in_flight.take() {
            Some(in_flight) => in_flight,
            None => match queue.pop() {
                Some(message) => InFlight {
                    message,
                    next_target: 0,
                },
                None => return SendProgress::Idle,
            },
        };

        while let Some(&connection) = in_flight.message.targets.get(in_flight.next_target) {
            let message = &in_flight.message;
            match transport.send(connection, message.channel, &message.payload) {
                Ok(()) => {
                    self.delivered += 1;
                }
                Err(SendError::Transient { code }) => {
                    warn!(
                        "Transient failure sending to connection {}: code {}, retrying",
                        connection, code
                    );
                    self.in_flight = Some(in_flight);
                    return SendProgress::Retry { connection, code };
                }
                Err(error) => {
                    warn!(
                        "Abandoning delivery to connection {}: {}",
                        connection, error
                    );
                    self.abandoned += 1;
                }
            }
            in_flight.next_target += 1;
        }

        SendProgress::Delivered
    }
}

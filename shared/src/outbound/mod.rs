mod queue;
mod sender;

pub use queue::{OutboundQueue, Outgoing};
pub use sender::{OutboundSender, SendProgress};

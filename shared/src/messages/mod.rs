mod error;
mod message;
mod message_kind;

pub use error::MessageError;
pub use message::Message;
pub use message_kind::MessageKind;

//! Domain model: messages and the erased view middleware sees.

pub mod envelope;
pub mod message;
pub mod type_name;

pub use self::envelope::Envelope;
pub use self::message::{Command, Notification};
pub use self::type_name::{short_name_of, short_type_name};

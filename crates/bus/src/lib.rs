//! Messaging primitives shared by scenes and entities.
//!
//! - [`Mailbox`]: topic-based publish/subscribe with per-consumer FIFO queues.
//!   Messages are delivered to the consumers subscribed at publish time only.
//! - [`ObserverManager`]: subject → observers registry with synchronous,
//!   in-order notification.
//!
//! Both are plain values. Whoever needs one is handed a reference; there is
//! no process-wide instance.

pub mod mailbox;
pub mod observer;

pub use mailbox::{Mailbox, MailboxError, Message, Topic};
pub use observer::{Observer, ObserverManager};

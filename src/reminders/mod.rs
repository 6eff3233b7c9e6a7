//! Inactivity reminders.
//!
//! Deciding who is due ([`find_due`]) is a pure read over stored records.
//! [`ReminderDispatcher`] turns the due list into messages, hands them to a
//! [`NotificationSender`], and records each delivered reminder on the record.

pub mod dispatch;
pub mod message;
pub mod scanner;
pub mod sender;

pub use dispatch::{ReminderDispatcher, ReminderFailure, ReminderReport, ReminderStage};
pub use message::{ReminderMessage, compose};
pub use scanner::{find_due, is_due};
pub use sender::{NotificationSender, TracingSender};

#![cfg_attr(not(test), no_std)]
extern crate alloc;

pub mod catalog;
pub mod event;
pub mod form;
pub mod ledger;
pub mod premade;
pub mod quiz;
pub mod results;

pub use ledger::Ledger;
pub use quiz::Question;

/// Platform identifier of a conversation.
pub type ConversationId = alloc::string::String;
/// Platform identifier of a posted item (message or form).
pub type ItemId = alloc::string::String;
/// Platform identifier of a user.
pub type UserId = alloc::string::String;

mod bot;
mod config;
mod gateway;
mod render;
mod rest;
mod session;
mod setup;
mod table;
mod webhook;

#[cfg(test)]
mod mock;

pub use bot::{error, Bot};
pub use config::{Config, Timing};
pub use gateway::{Attachment, Gateway, Item, Post, RemoteError, RemoteResult, User};
pub use rest::RestGateway;
pub use table::SessionTable;
pub use webhook::{try_respond, verify};

//! Domain types and the storage trait for the Warden EHS service.
//!
//! Everything HTTP- or SQLite-shaped lives in the other crates; this one
//! holds the records, the risk matrix, the intent classifier, and the
//! [`store::EhsStore`] abstraction they all share.

// Backend impls provide native `async fn` bodies for the store trait.
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod chat;
pub mod error;
pub mod incident;
pub mod intent;
pub mod risk;
pub mod sds;
pub mod store;
pub mod user;

pub use error::{Error, Result};

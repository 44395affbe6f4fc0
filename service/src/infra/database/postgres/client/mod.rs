//! Postgres database clients.
//!
//! Reads and single-statement writes go through a [`NonTx`] client, while
//! every command mutating several rows (recomputing `Quote` totals, returning
//! a `Loan` along with its history `Record`) runs inside a single [`Tx`].

pub mod non_tx;
pub mod tx;

pub use self::{non_tx::NonTx, tx::Tx};

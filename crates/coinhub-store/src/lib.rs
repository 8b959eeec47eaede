//! Document store for coinhub entities.
//!
//! Exposes what a document database adapter would: find-by-id, filtered
//! queries with pagination, create, and conditional updates. The two
//! conditional updates are the concurrency seams the ledger relies on:
//!
//! - `replace_account`: optimistic version check, so concurrent
//!   read-modify-write sequences on one account serialize instead of
//!   silently losing an update;
//! - `transfer_cas_status`: atomic status transition, so a concurrent
//!   approve/reject pair resolves to exactly one winner.
//!
//! The shipped implementation is in-memory (`DashMap` shards); swapping
//! in a real document DB means implementing the same surface.

pub mod error;
pub mod memory;
pub mod page;

pub use error::{StoreError, StoreResult};
pub use memory::{
    AccountFilter, CoinFilter, MemoryStore, OrderFilter, SavingFilter, TransferFilter,
};
pub use page::{Page, PageQuery, SortDir};

// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Data directory layout and atomic persistence.
//!
//! Every write on the happy path goes through [`Txn`]: stage each file to
//! a temp path, then rename every temp path into place. Nothing here
//! holds a lock across an `.await` — the storage layer is synchronous by
//! design, and callers running inside an async runtime should wrap calls
//! in `tokio::task::spawn_blocking` when the write is large enough to
//! matter.

mod error;
mod paths;
mod repo;
mod txn;

pub use error::StorageError;
pub use paths::{app_state_path, data_dir, expedition_path, expeditions_dir, index_path, route_path, routes_dir};
pub use repo::Repo;
pub use txn::Txn;

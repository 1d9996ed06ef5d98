// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Built-in [`Backend`](crate::Backend) implementations.

mod flatvec;
mod rtree;

pub use flatvec::FlatVec;
pub use rtree::{NODE_CAPACITY, RTree};

// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arbor Reactive: re-render invalidation primitives.
//!
//! This crate defines the contract between reactive component state and the
//! rendering engine. Writing to a reactive member produces exactly one
//! notification into an [`InvalidationSink`]; what the rendering engine does
//! with that notification (scheduling, batching, template re-evaluation) is
//! its own concern.
//!
//! Two sinks are provided:
//!
//! - [`RenderQueue`]: a deduplicating pending-re-render queue. Marking an
//!   already-pending component is a no-op, and [`RenderQueue::drain`] yields
//!   components in first-marked order for the render pass.
//! - [`InvalidationLog`]: a recording sink that keeps every notification in
//!   order, for tests that assert on notification counts.
//!
//! ## Quick Start
//!
//! ```rust
//! use arbor_reactive::{InvalidationSink, RenderQueue};
//!
//! let mut queue = RenderQueue::<u32>::new();
//!
//! // Reactive writes notify the sink; duplicates coalesce.
//! queue.invalidate(7);
//! queue.invalidate(3);
//! queue.invalidate(7);
//! assert_eq!(queue.len(), 2);
//!
//! // The render pass drains in first-marked order.
//! let order: Vec<_> = queue.drain().collect();
//! assert_eq!(order, vec![7, 3]);
//! assert!(queue.is_empty());
//! ```
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`. It does not depend on `std`.

#![no_std]

extern crate alloc;

mod queue;
mod sink;

pub use queue::RenderQueue;
pub use sink::{InvalidationLog, InvalidationSink};

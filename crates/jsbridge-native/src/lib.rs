// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! JSBridge — Host environment abstractions.
//!
//! The web view exposes three things to page code: a native object whose
//! methods can be called directly (Android), a named message handler that
//! accepts posted envelopes (iOS), and a slot for the global function the
//! native side calls back with responses. This crate models those as traits
//! so the registry never touches platform objects directly.
//!
//! `loopback` provides an in-process host for desktop/CI builds and tests.

pub mod loopback;
pub mod traits;

pub use loopback::{LoopbackHost, RecordedCall, Responder};
pub use traits::{CallbackSink, HostEnvironment, MessageChannel, NativeObject};

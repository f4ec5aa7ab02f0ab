#![forbid(unsafe_code)]

//! Stateful shell around the `scriv-options` engine.
//!
//! Owns the three state layers (raw, validated, computed), assembles one
//! environment snapshot per pass, wires external signal sources to
//! recomputation, and notifies listeners with a precise change set.
//!
//! # Concurrency model
//!
//! Single-threaded and synchronous: every pass (migrate → validate →
//! assemble → compute → diff → notify) runs to completion on the caller's
//! turn. State is swapped *before* listeners fire, so a listener reading
//! options mid-callback observes a fully consistent snapshot, and a listener
//! that updates options starts an independent pass after the current one
//! returns.

pub mod configuration;
pub mod event;
pub mod provider;

pub use configuration::Configuration;
pub use event::{EventEmitter, Signal, SignalSources, Subscription};
pub use provider::{EnvironmentProvider, FixedEnvironmentProvider, HostState, MeasurementError};

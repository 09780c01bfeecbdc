//! Engine and menu core for the Spectro three-channel synth controller.
//!
//! The crate is `no_std` and allocation-free. It knows nothing about the
//! RP2350: hardware is reached through the small traits in [`io`] and the
//! [`RecordStore`](patch::RecordStore) persistence trait, so everything here
//! runs under `cargo test` on the host.
//!
//! # Architecture
//!
//! ```text
//!            ┌─────────────┐  press events   ┌──────────────┐
//! buttons ──▶│ io::Keypad  │────────────────▶│ menu         │──▶ Screen
//!            └─────────────┘                 │  Navigator   │
//!                                            └──┬────────┬──┘
//!                                 load / save   │        │ apply(patch)
//!                                            ┌──▼─────┐ ┌▼─────────────┐
//!                                            │ patch  │ │ EngineConfig │
//!                                            │ Store  │ └──────┬───────┘
//!                                            └────────┘        │ &params
//!            ┌─────────────┐  volts          ┌─────────────────▼──┐
//! CV in ────▶│ io::Control │────────────────▶│ engine::           │──▶ PWM ×3
//!            │  Voltages   │                 │  ChannelRuntime    │
//!            └─────────────┘                 └────────────────────┘
//! ```
//!
//! [`controller::Synth`] owns all of the above and is driven by one call to
//! [`Synth::tick()`](controller::Synth::tick) per loop iteration.
//!
//! # Crate Features
//!
//! - **`defmt`**: structured logging and [`defmt::Format`] derives for
//!   embedded targets.

#![no_std]

pub mod config;
pub mod controller;
pub mod engine;
pub mod io;
pub mod menu;
pub mod patch;

pub use config::SynthConfig;
pub use controller::{Mode, Synth};
pub use engine::{EngineConfig, EngineParams};
pub use patch::{Patch, PatchStore, SlideMode};

/// Number of physical CV-input / PWM-output pairs.
pub const CHANNEL_COUNT: usize = 3;

/// Number of stored voices selectable from the root menu.
pub const VOICE_COUNT: usize = 4;

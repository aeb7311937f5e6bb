//! Clock, alarm and thermostat controller.
//!
//! # Overview
//!
//! A small panel device that:
//! - Keeps time of day and a simplified calendar (30-day months, 12 months)
//! - Samples a temperature sensor every second and lights a band LED
//!   (below / within / above a configurable `[min, max]` range)
//! - Buzzes once when the temperature leaves the band
//! - Sounds a daily alarm for a bounded number of pulses
//! - Gates every edit behind a 4-digit PIN with a timed lockout
//!
//! # Execution Model
//!
//! Two contexts share one [`SharedState`]:
//!
//! - **Periodic tick** ([`periodic::periodic_update`]): runs once per second
//!   at a higher priority and preempts the foreground. It only ever holds
//!   the lock for the pure [`AppState::tick`] update.
//! - **Foreground** ([`menu::Foreground`]): draws the main page and runs
//!   the operator-paced edit workflows raised by the front-panel buttons
//!   through [`Requests`].
//!
//! # Module Organization
//!
//! Model:
//! - [`clock`] - Time of day and calendar rollover
//! - [`temperature`] - Reading, thresholds and excursion detection
//! - [`alarm`] - Alarm target and the bounded sounder
//! - [`lockout`] - Attempt budget and lockout window
//! - [`auth`] - PIN verification and PIN change
//! - [`entry`] - Digit-by-digit field editor
//! - [`state`] - The shared aggregate
//!
//! Behavior:
//! - [`periodic`] - The once-per-second update
//! - [`requests`] - Button request flags
//! - [`menu`] - Foreground dispatch and workflows
//!
//! Devices:
//! - [`io`] - Collaborator traits for the panel hardware
//! - [`keypad`] - 4x3 matrix keypad scanner
//! - [`screen`] - Text formatting for the 16x2 display
//!
//! Configuration and errors live in [`config`] and [`error`].

#![cfg_attr(not(test), no_std)]

pub mod alarm;
pub mod auth;
pub mod clock;
pub mod config;
pub mod entry;
pub mod error;
pub mod io;
pub mod keypad;
pub mod lockout;
pub mod menu;
pub mod periodic;
pub mod requests;
pub mod screen;
pub mod state;
pub mod temperature;

pub use config::Settings;
pub use error::{Error, ThresholdConflict};
pub use menu::Foreground;
pub use periodic::{TickReport, periodic_update};
pub use requests::{Request, Requests, press_time_button};
pub use state::{AppState, SharedState};

//! Boundary contracts for the Herald pocket communicator
//!
//! This crate defines the types exchanged with the two external
//! collaborators of the command pipeline:
//!
//! - the e-paper display task, which consumes typed [`DisplayEvent`]s
//!   describing state changes it should render, and
//! - the I2C keyboard, which produces 8-bit keycodes classified by
//!   [`Key`] and [`FunctionKey`].
//!
//! The core never touches pixels or the I2C bus; everything it needs to
//! know about those devices lives here.

#![no_std]
#![deny(unsafe_code)]

pub mod events;
pub mod keys;

pub use events::DisplayEvent;
pub use keys::{FunctionKey, Key, KEY_NONE};

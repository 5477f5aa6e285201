//! Board-agnostic core logic for the Herald pocket communicator
//!
//! This crate contains all pipeline logic that does not depend on
//! specific hardware implementations:
//!
//! - Shared command buffer (input line, result, history ring)
//! - Keyboard line editor state machine
//! - Modal command interpreter (tokenizer, validation, dispatch)
//! - AT transaction building blocks (line assembly, response
//!   accumulation, terminator and success rules, URC classification,
//!   the engine transaction loop, the response slot arena)
//! - Readiness flags and configuration type definitions
//! - Hardware abstraction traits (modem control, display event sink)

#![no_std]
#![deny(unsafe_code)]
#![allow(async_fn_in_trait)]

#[cfg(test)]
extern crate std;

// Host tests need a critical-section implementation for the arena
#[cfg(test)]
use critical_section as _;

pub mod buffer;
pub mod config;
pub mod editor;
pub mod error;
pub mod interpreter;
pub mod modem;
pub mod readiness;
pub mod traits;

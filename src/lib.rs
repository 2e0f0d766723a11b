#![no_std]
#![doc = include_str!("../README.md")]

//! A serial console line editor for `no_std` embedded systems.
//!
//! The editor core is synchronous and I/O free; the [`hal`] module supplies
//! the serial, SPI, timer and non-volatile primitives around it, and
//! [`reader`] drives the editor over async I/O.

#[macro_use]
mod log;

pub mod editor;
pub mod hal;
pub mod reader;
pub mod writer;

pub use editor::{terminated, EditEvent, LineEditor};
pub use reader::{EditorConfig, LineReader, ReadLineError};
pub use writer::EchoWriter;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::editor::{EditEvent, LineEditor};
    pub use crate::hal::{Clock, NonVolatile, Serial, Spi};
    pub use crate::reader::{EditorConfig, LineReader};
    pub use crate::writer::EchoWriter;
}

//! Thin hardware abstraction layer.
//!
//! Each primitive is a trait the board support code implements. The line
//! editor only needs [`Serial`]; the rest exist for the surrounding firmware.
//! Adapters onto the `embedded-io` and `embedded-hal` ecosystems are provided
//! so most boards can plug in an existing driver.

pub mod nv;
pub mod serial;
pub mod spi;
pub mod time;

pub use nv::{NonVolatile, NvError, RamNv};
pub use serial::{IoSerial, Serial};
pub use spi::{BitOrder, BlockingSpi, Spi, SpiConfig, SpiError, SpiMode};
pub use time::{Clock, Timeout};

//! Receive core for u-blox style GPS modules speaking NMEA 0183.
//!
//! The crate takes the byte stream of a serial GPS receiver one byte at a
//! time, frames it into sentences, parses the GGA and RMC sentence types and
//! keeps one authoritative position/time/fix record:
//!
//! ```
//! use carpathia::{ByteSource, Receiver, Status};
//!
//! struct Uart;
//!
//! impl ByteSource for Uart {
//!     fn request_byte(&mut self) {
//!         // kick off the next single-byte receive on the real driver
//!     }
//! }
//!
//! let mut rx = Receiver::new(Uart);
//! for &b in b"$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47\r" {
//!     rx.receive_byte(b).unwrap();
//! }
//! rx.aggregate();
//! assert_eq!(rx.position().quality(), 1);
//! ```
#[cfg(test)]
#[macro_use]
extern crate assert_matches;
extern crate arrayvec;
extern crate chrono;
#[macro_use]
extern crate quick_error;

pub mod err;
#[macro_use]
mod macros;
mod fix;
mod framer;
mod lexer;
pub mod parser;

pub use err::Error;
pub use fix::PositionState;
pub use framer::{ByteSource, Receiver, SentenceBuffer, Status, SENTENCE_CAPACITY, SLOT_COUNT};
pub use lexer::Tokenizer;
pub use parser::{ParsedFix, SentenceKind};

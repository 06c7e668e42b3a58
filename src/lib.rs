//! Multi-user direct-sequence spread spectrum (DSSS/CDMA) at chip level.
//!
//! Each user's bytes are expanded to bits (MSB first), every bit is spread
//! into 8 chips by the user's 8-bit code, and all users are superposed on a
//! shared channel, optionally with additive noise. A receiver correlates the
//! composite against one code per 8-sample window, decides each bit by sign,
//! and reassembles bytes, keeping only those whose summed squared
//! correlation clears a confidence threshold.
//!
//! ```text
//! text -> bytes -> bits -> chips ─┐
//! text -> bytes -> bits -> chips ─┼─ mix (+ noise) -> Signal
//! text -> bytes -> bits -> chips ─┘        │
//!                     ┌────────────────────┘ (one receiver per code)
//!                     └-> correlation -> soft bits -> bytes -> text
//! ```
//!
//! All stages are lazy single-pass iterators. A consumed stream cannot be
//! replayed; buffer it into a [`Signal`] before handing it to several
//! receivers.

pub mod assembler;
pub mod bits;
pub mod channel;
pub mod code;
pub mod config;
pub mod correlator;
pub mod decider;
pub mod error;
pub mod frame;
pub mod noise;
pub mod plot;
pub mod session;
pub mod spreader;
pub mod text;

pub use assembler::{assemble, get_bytes, ByteOutcome, DEFAULT_THRESHOLD};
pub use bits::{from_bin, to_bin, to_bits, to_bytes, try_to_bin, Bit};
pub use channel::{mix, Sample, Signal};
pub use code::SpreadingCode;
pub use config::{Config, NoiseConfig, UserConfig};
pub use correlator::get_correlation;
pub use decider::{get_bits, SoftBit};
pub use error::{CdmaError, Result};
pub use noise::{GaussianNoise, NoiseSource};
pub use session::{receive_all, Reception, Receiver, Session, Transmitter};
pub use spreader::{to_chips, Chip};
pub use text::{get_str, Codec, Latin1, TextCodec, Utf8};

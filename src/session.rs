//! Per-user transmit and receive chains, and the multi-user session.
//!
//! Transmit: text -> bytes -> bits -> chips.
//! Receive: composite -> correlation -> soft bits -> bytes -> text.
//!
//! Receivers only read the composite, so any number of them can run over
//! one [`Signal`] at the same time.

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::assembler::{assemble, ByteOutcome, DEFAULT_THRESHOLD};
use crate::bits::to_bits;
use crate::channel::{Sample, Signal};
use crate::code::SpreadingCode;
use crate::correlator::get_correlation;
use crate::decider::{get_bits, SoftBit};
use crate::error::Result;
use crate::spreader::{to_chips, Chip};
use crate::text::{TextCodec, Utf8};

/// Sender side of one user.
#[derive(Debug, Clone)]
pub struct Transmitter<C = Utf8> {
    code: SpreadingCode,
    codec: C,
}

impl Transmitter<Utf8> {
    pub fn new(code: SpreadingCode) -> Self {
        Self::with_codec(code, Utf8)
    }
}

impl<C: TextCodec> Transmitter<C> {
    pub fn with_codec(code: SpreadingCode, codec: C) -> Self {
        Self { code, codec }
    }

    pub fn code(&self) -> SpreadingCode {
        self.code
    }

    /// Spread `text` into its chip sequence.
    pub fn transmit(&self, text: &str) -> Result<Vec<Chip>> {
        let bytes = self.codec.encode(text)?;
        let chips: Vec<Chip> = to_chips(to_bits(bytes.iter().copied()), self.code).collect();
        debug!(code = %self.code, bytes = bytes.len(), chips = chips.len(), "spread user stream");
        Ok(chips)
    }
}

/// Receiver side of one user.
#[derive(Debug, Clone)]
pub struct Receiver<C = Utf8> {
    code: SpreadingCode,
    threshold: Sample,
    codec: C,
}

impl Receiver<Utf8> {
    pub fn new(code: SpreadingCode) -> Self {
        Self::with_codec(code, Utf8)
    }
}

impl<C: TextCodec> Receiver<C> {
    pub fn with_codec(code: SpreadingCode, codec: C) -> Self {
        Self {
            code,
            threshold: DEFAULT_THRESHOLD,
            codec,
        }
    }

    pub fn threshold(mut self, threshold: Sample) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn code(&self) -> SpreadingCode {
        self.code
    }

    /// Despread this user's stream from the composite.
    pub fn receive(&self, signal: &Signal) -> Reception {
        let trace: Vec<SoftBit> = get_bits(get_correlation(signal.iter(), self.code)).collect();
        let outcomes: Vec<ByteOutcome> = assemble(trace.iter().copied(), self.threshold).collect();
        let bytes: Vec<u8> = outcomes.iter().filter_map(ByteOutcome::byte).collect();
        let text = self.codec.decode(&bytes);

        let reception = Reception {
            code: self.code,
            text,
            bytes,
            outcomes,
            trace,
        };

        debug!(
            code = %self.code,
            bits = reception.trace.len(),
            accepted = reception.bytes.len(),
            "despread user stream"
        );
        if reception.dropped() > 0 {
            warn!(
                code = %self.code,
                dropped = reception.dropped(),
                threshold = self.threshold,
                "bytes dropped for low confidence"
            );
        }

        reception
    }
}

/// Everything one receiver recovered from the composite.
#[derive(Debug, Clone)]
pub struct Reception {
    pub code: SpreadingCode,
    /// Accepted bytes decoded as text
    pub text: String,
    /// Accepted bytes only
    pub bytes: Vec<u8>,
    /// Accepted and dropped bytes, in stream order
    pub outcomes: Vec<ByteOutcome>,
    /// Per-bit decisions with their correlations
    pub trace: Vec<SoftBit>,
}

impl Reception {
    pub fn dropped(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_dropped()).count()
    }

    /// Window indices of the dropped bytes.
    pub fn dropped_positions(&self) -> Vec<usize> {
        self.outcomes
            .iter()
            .filter(|o| o.is_dropped())
            .map(ByteOutcome::index)
            .collect()
    }
}

/// Run every receiver over the same composite in parallel.
///
/// Results come back in the order of `receivers`.
pub fn receive_all<C>(signal: &Signal, receivers: &[Receiver<C>]) -> Vec<Reception>
where
    C: TextCodec,
{
    receivers.par_iter().map(|receiver| receiver.receive(signal)).collect()
}

/// A set of users sharing one channel.
#[derive(Debug, Clone)]
pub struct Session<C = Utf8> {
    users: Vec<(String, SpreadingCode)>,
    codec: C,
}

impl Session<Utf8> {
    pub fn new() -> Self {
        Self::with_codec(Utf8)
    }
}

impl Default for Session<Utf8> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: TextCodec + Clone> Session<C> {
    pub fn with_codec(codec: C) -> Self {
        Self {
            users: Vec::new(),
            codec,
        }
    }

    pub fn user(mut self, text: impl Into<String>, code: SpreadingCode) -> Self {
        self.users.push((text.into(), code));
        self
    }

    pub fn users(&self) -> &[(String, SpreadingCode)] {
        &self.users
    }

    /// Spread every user and superpose them into one composite.
    ///
    /// All users must encode to the same number of bytes.
    pub fn transmit(&self) -> Result<Signal> {
        let streams = self
            .users
            .iter()
            .map(|(text, code)| Transmitter::with_codec(*code, self.codec.clone()).transmit(text))
            .collect::<Result<Vec<Vec<Chip>>>>()?;
        Signal::superpose(streams)
    }

    /// One receiver per user, in user order.
    pub fn receivers(&self, threshold: Sample) -> Vec<Receiver<C>> {
        self.users
            .iter()
            .map(|(_, code)| Receiver::with_codec(*code, self.codec.clone()).threshold(threshold))
            .collect()
    }
}

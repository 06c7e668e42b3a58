//! Text at the stream boundary.
//!
//! The pipeline only moves bytes; how characters become bytes is up to a
//! [`TextCodec`].

use crate::error::{CdmaError, Result};

/// Character-set policy for turning text into bytes and back.
pub trait TextCodec: Send + Sync {
    fn encode(&self, text: &str) -> Result<Vec<u8>>;
    fn decode(&self, bytes: &[u8]) -> String;
}

/// UTF-8; invalid sequences decode to U+FFFD.
#[derive(Debug, Clone, Copy, Default)]
pub struct Utf8;

impl TextCodec for Utf8 {
    fn encode(&self, text: &str) -> Result<Vec<u8>> {
        Ok(text.as_bytes().to_vec())
    }

    fn decode(&self, bytes: &[u8]) -> String {
        String::from_utf8_lossy(bytes).into_owned()
    }
}

/// ISO-8859-1: every byte is the code point of the same value.
#[derive(Debug, Clone, Copy, Default)]
pub struct Latin1;

impl TextCodec for Latin1 {
    fn encode(&self, text: &str) -> Result<Vec<u8>> {
        text.chars()
            .map(|c| {
                u8::try_from(u32::from(c)).map_err(|_| {
                    CdmaError::InvalidInput(format!("'{}' (U+{:04X}) is not Latin-1", c, u32::from(c)))
                })
            })
            .collect()
    }

    fn decode(&self, bytes: &[u8]) -> String {
        get_str(bytes.iter().copied())
    }
}

/// Runtime choice between the built-in codecs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Codec {
    #[default]
    Utf8,
    Latin1,
}

impl TextCodec for Codec {
    fn encode(&self, text: &str) -> Result<Vec<u8>> {
        match self {
            Codec::Utf8 => Utf8.encode(text),
            Codec::Latin1 => Latin1.encode(text),
        }
    }

    fn decode(&self, bytes: &[u8]) -> String {
        match self {
            Codec::Utf8 => Utf8.decode(bytes),
            Codec::Latin1 => Latin1.decode(bytes),
        }
    }
}

/// Join bytes into text, one character per byte value.
pub fn get_str<I>(bytes: I) -> String
where
    I: IntoIterator<Item = u8>,
{
    bytes.into_iter().map(char::from).collect()
}

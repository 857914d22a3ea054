//! Stream filters. Decompression is treated as an injected, pluggable
//! byte-in/byte-out transform: the core only needs to know a
//! filter's PDF name and dispatch to whatever implements it. `FlateDecode`
//! is the one filter implemented here; every other name is reported as
//! [`crate::Error::UnsupportedFilter`] rather than guessed at.

use std::io::Read;

use flate2::read::ZlibDecoder;
use log::warn;

use crate::error::Error;

/// A pluggable byte-in/byte-out stream transform.
pub trait StreamFilter {
    fn decode(&self, input: &[u8]) -> Result<Vec<u8>, Error>;
}

struct FlateDecode;

impl StreamFilter for FlateDecode {
    fn decode(&self, input: &[u8]) -> Result<Vec<u8>, Error> {
        let mut decoder = ZlibDecoder::new(input);
        let mut out = Vec::new();
        decoder.read_to_end(&mut out)?;
        Ok(out)
    }
}

/// Look up the filter named by a stream dictionary's `/Filter` entry.
pub fn decode(filter_name: &[u8], input: &[u8]) -> Result<Vec<u8>, Error> {
    match filter_name {
        b"FlateDecode" => FlateDecode.decode(input),
        other => {
            let name = String::from_utf8_lossy(other).into_owned();
            warn!("stream names unsupported filter '{name}'");
            Err(Error::UnsupportedFilter(name))
        }
    }
}

// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Binary strings and their text renderings.

use std::fmt;
use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::DecodeError;

/// The text rendering used for binary values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BinaryFormat {
    /// Two lowercase hex digits per byte. This is also the wire encoding.
    #[default]
    Hex,
    /// Standard, padded base64.
    Base64,
}

impl BinaryFormat {
    /// Renders `bytes` in this format.
    pub fn encode(&self, bytes: &[u8]) -> String {
        match self {
            BinaryFormat::Hex => hex::encode(bytes),
            BinaryFormat::Base64 => STANDARD.encode(bytes),
        }
    }
}

impl FromStr for BinaryFormat {
    type Err = InvalidBinaryFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "HEX" => Ok(BinaryFormat::Hex),
            "BASE64" => Ok(BinaryFormat::Base64),
            _ => Err(InvalidBinaryFormatError(s.to_owned())),
        }
    }
}

impl fmt::Display for BinaryFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            BinaryFormat::Hex => "HEX",
            BinaryFormat::Base64 => "BASE64",
        })
    }
}

/// The error returned when parsing an unrecognized [`BinaryFormat`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid binary format: {0}")]
pub struct InvalidBinaryFormatError(pub String);

/// Decodes a binary token, which is a sequence of hex digit pairs.
///
/// Odd-length tokens and tokens containing non-hex characters are rejected.
pub fn decode_hex(token: &str) -> Result<Vec<u8>, DecodeError> {
    hex::decode(token).map_err(|_| DecodeError::new("binary", token))
}

use std::fmt;
use std::str::FromStr;

use bech32::{FromBase32, ToBase32, Variant};
use borsh::{BorshDeserialize, BorshSerialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Human readable part of every textual address.
pub const HRP: &str = "bal";

/// Errors raised while parsing an [`Address`] from its bech32m form.
#[derive(Debug, Error)]
pub enum Bech32ParseError {
    /// The string is not valid bech32.
    #[error("Bech32 error: {0}")]
    Bech32(#[from] bech32::Error),
    /// The string was encoded for another network.
    #[error("Wrong HRP: {0}")]
    WrongHRP(String),
    /// The payload does not hold exactly 32 bytes.
    #[error("Address must be 32 bytes long, got {0}")]
    InvalidLength(usize),
}

/// An opaque, globally unique participant identity.
///
/// Human readable serializers (JSON, TOML) see the bech32m string, binary
/// ones the raw 32 bytes.
#[derive(
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Clone,
    Copy,
    Hash,
    BorshDeserialize,
    BorshSerialize,
    schemars::JsonSchema,
)]
pub struct Address {
    addr: [u8; 32],
}

impl Address {
    /// Creates a new address containing the given bytes
    pub const fn new(addr: [u8; 32]) -> Self {
        Self { addr }
    }

    /// Derives an address by hashing arbitrary bytes, e.g. a public key or a
    /// module name.
    pub fn derive(seed: &[u8]) -> Self {
        Self {
            addr: Sha256::digest(seed).into(),
        }
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.addr
    }
}

impl From<[u8; 32]> for Address {
    fn from(addr: [u8; 32]) -> Self {
        Self { addr }
    }
}

impl<'a> TryFrom<&'a [u8]> for Address {
    type Error = Bech32ParseError;

    fn try_from(addr: &'a [u8]) -> Result<Self, Self::Error> {
        let addr: [u8; 32] = addr
            .try_into()
            .map_err(|_| Bech32ParseError::InvalidLength(addr.len()))?;
        Ok(Self { addr })
    }
}

impl FromStr for Address {
    type Err = Bech32ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (hrp, data, _) = bech32::decode(s)?;
        if hrp != HRP {
            return Err(Bech32ParseError::WrongHRP(hrp));
        }
        let bytes = Vec::<u8>::from_base32(&data)?;
        Self::try_from(bytes.as_slice())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        bech32::encode_to_fmt(f, HRP, self.addr.to_base32(), Variant::Bech32m)
            .unwrap_or(Err(fmt::Error))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.to_string())
    }
}

impl serde::Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        if serializer.is_human_readable() {
            serializer.collect_str(self)
        } else {
            serde::Serialize::serialize(&self.addr, serializer)
        }
    }
}

impl<'de> serde::Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        if deserializer.is_human_readable() {
            let s = <String as serde::Deserialize>::deserialize(deserializer)?;
            Address::from_str(&s).map_err(serde::de::Error::custom)
        } else {
            let addr = <[u8; 32] as serde::Deserialize>::deserialize(deserializer)?;
            Ok(Address { addr })
        }
    }
}

//! Content addresses for manifests.
//!
//! A manifest address is a CIDv1 over its canonical CBOR bytes:
//! `0x01 (v1) || 0x71 (dag-cbor) || 0x12 (sha2-256) || 0x20 (32 bytes) || hash`.
//!
//! The host prints access-controller parameter addresses in base32 (`b...`)
//! and manifest addresses in base58btc (`z...`), so both multibase forms are
//! supported.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::canonical::canonical_bytes;
use crate::crypto::Sha256Hash;
use crate::error::{CoreError, Result};

const CID_V1: u8 = 0x01;
const DAG_CBOR: u8 = 0x71;
const SHA2_256: u8 = 0x12;
const SHA2_256_LEN: u8 = 0x20;

/// Path prefix used when one manifest references another.
pub const IPFS_PATH_PREFIX: &str = "/ipfs/";

const BASE32_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz234567";
const BASE58_ALPHABET: &[u8] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Multibase text encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Multibase {
    /// RFC 4648 base32, lowercase, no padding. Prefix `b`.
    Base32Lower,
    /// Bitcoin base58. Prefix `z`.
    Base58Btc,
}

/// A CIDv1 content address of a dag-cbor block hashed with SHA-256.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cid(Sha256Hash);

impl Cid {
    /// Address of raw canonical bytes.
    pub fn for_bytes(bytes: &[u8]) -> Self {
        Self(Sha256Hash::hash(bytes))
    }

    /// Address of a serializable value, via its canonical CBOR bytes.
    pub fn for_value<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        Ok(Self::for_bytes(&canonical_bytes(value)?))
    }

    /// The digest inside this address.
    pub fn hash(&self) -> &Sha256Hash {
        &self.0
    }

    /// Binary CID: version, codec, multihash.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(36);
        bytes.extend_from_slice(&[CID_V1, DAG_CBOR, SHA2_256, SHA2_256_LEN]);
        bytes.extend_from_slice(self.0.as_bytes());
        bytes
    }

    /// Parse a binary CID.
    pub fn from_cid_bytes(bytes: &[u8]) -> Result<Self> {
        match bytes {
            [CID_V1, DAG_CBOR, SHA2_256, SHA2_256_LEN, digest @ ..] if digest.len() == 32 => {
                let mut arr = [0u8; 32];
                arr.copy_from_slice(digest);
                Ok(Self(Sha256Hash(arr)))
            }
            _ => Err(CoreError::DecodingError(
                "not a CIDv1 dag-cbor sha2-256 address".into(),
            )),
        }
    }

    /// Encode with the given multibase prefix.
    pub fn encode(&self, base: Multibase) -> String {
        match base {
            Multibase::Base32Lower => format!("b{}", base32_encode(&self.to_bytes())),
            Multibase::Base58Btc => format!("z{}", base58_encode(&self.to_bytes())),
        }
    }

    /// Render as an `/ipfs/<cid>` path in base58btc.
    pub fn to_path(&self) -> String {
        format!("{}{}", IPFS_PATH_PREFIX, self.encode(Multibase::Base58Btc))
    }

    /// Parse a multibase string, optionally prefixed with `/ipfs/`.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.strip_prefix(IPFS_PATH_PREFIX).unwrap_or(s);
        let bytes = if let Some(rest) = s.strip_prefix('b') {
            base32_decode(rest)?
        } else if let Some(rest) = s.strip_prefix('z') {
            base58_decode(rest)?
        } else {
            return Err(CoreError::DecodingError(format!(
                "unsupported multibase address: {:?}",
                s
            )));
        };
        Self::from_cid_bytes(&bytes)
    }
}

impl fmt::Display for Cid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode(Multibase::Base32Lower))
    }
}

impl fmt::Debug for Cid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cid({})", self)
    }
}

impl FromStr for Cid {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

// RFC 4648 Base32 encoding (lowercase, no padding)
fn base32_encode(data: &[u8]) -> String {
    let mut result = String::new();
    let mut buffer: u64 = 0;
    let mut bits_in_buffer = 0;

    for &byte in data {
        buffer = (buffer << 8) | (byte as u64);
        bits_in_buffer += 8;

        while bits_in_buffer >= 5 {
            bits_in_buffer -= 5;
            let index = ((buffer >> bits_in_buffer) & 0x1f) as usize;
            result.push(BASE32_ALPHABET[index] as char);
        }
    }

    if bits_in_buffer > 0 {
        let index = ((buffer << (5 - bits_in_buffer)) & 0x1f) as usize;
        result.push(BASE32_ALPHABET[index] as char);
    }

    result
}

fn base32_decode(s: &str) -> Result<Vec<u8>> {
    let mut result = Vec::with_capacity(s.len() * 5 / 8);
    let mut buffer: u64 = 0;
    let mut bits_in_buffer = 0;

    for c in s.bytes() {
        let value = BASE32_ALPHABET
            .iter()
            .position(|&a| a == c)
            .ok_or_else(|| CoreError::DecodingError(format!("invalid base32 char {:?}", c as char)))?;
        buffer = (buffer << 5) | value as u64;
        bits_in_buffer += 5;

        if bits_in_buffer >= 8 {
            bits_in_buffer -= 8;
            result.push((buffer >> bits_in_buffer) as u8);
        }
    }

    // Trailing bits must be zero padding shorter than one symbol.
    if bits_in_buffer >= 5 || buffer & ((1 << bits_in_buffer) - 1) != 0 {
        return Err(CoreError::DecodingError("non-canonical base32 padding".into()));
    }

    Ok(result)
}

fn base58_encode(data: &[u8]) -> String {
    let zeros = data.iter().take_while(|&&b| b == 0).count();

    // Little-endian base58 digits.
    let mut digits: Vec<u8> = Vec::with_capacity(data.len() * 138 / 100 + 1);
    for &byte in &data[zeros..] {
        let mut carry = byte as u32;
        for digit in digits.iter_mut() {
            carry += (*digit as u32) << 8;
            *digit = (carry % 58) as u8;
            carry /= 58;
        }
        while carry > 0 {
            digits.push((carry % 58) as u8);
            carry /= 58;
        }
    }

    let mut result = String::with_capacity(zeros + digits.len());
    result.extend(std::iter::repeat('1').take(zeros));
    result.extend(digits.iter().rev().map(|&d| BASE58_ALPHABET[d as usize] as char));
    result
}

fn base58_decode(s: &str) -> Result<Vec<u8>> {
    let zeros = s.bytes().take_while(|&c| c == b'1').count();

    // Little-endian base256 bytes.
    let mut bytes: Vec<u8> = Vec::with_capacity(s.len());
    for c in s.bytes().skip(zeros) {
        let mut carry = BASE58_ALPHABET
            .iter()
            .position(|&a| a == c)
            .ok_or_else(|| CoreError::DecodingError(format!("invalid base58 char {:?}", c as char)))?
            as u32;
        for byte in bytes.iter_mut() {
            carry += (*byte as u32) * 58;
            *byte = (carry & 0xff) as u8;
            carry >>= 8;
        }
        while carry > 0 {
            bytes.push((carry & 0xff) as u8);
            carry >>= 8;
        }
    }

    let mut result = vec![0u8; zeros];
    result.extend(bytes.iter().rev());
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base32_encode() {
        // Test vector from RFC 4648
        assert_eq!(base32_encode(b""), "");
        assert_eq!(base32_encode(b"f"), "my");
        assert_eq!(base32_encode(b"fo"), "mzxq");
        assert_eq!(base32_encode(b"foo"), "mzxw6");
        assert_eq!(base32_encode(b"foob"), "mzxw6yq");
        assert_eq!(base32_encode(b"fooba"), "mzxw6ytb");
        assert_eq!(base32_encode(b"foobar"), "mzxw6ytboi");
    }

    #[test]
    fn test_base32_decode() {
        assert_eq!(base32_decode("mzxw6ytboi").unwrap(), b"foobar");
        assert_eq!(base32_decode("my").unwrap(), b"f");
        assert!(base32_decode("MZXW6").is_err());
    }

    #[test]
    fn test_base32_decode_rejects_nonzero_padding() {
        assert_eq!(base32_decode("my").unwrap(), b"f");
        assert!(base32_decode("mz").is_err());
        assert!(base32_decode("m").is_err());
        assert!(base32_decode("mya").is_err());
    }

    #[test]
    fn test_cid_parse_rejects_non_canonical_base32() {
        let encoded = Cid::for_bytes(b"manifest").encode(Multibase::Base32Lower);
        let last = encoded.as_bytes()[encoded.len() - 1];
        let index = BASE32_ALPHABET.iter().position(|&a| a == last).unwrap();
        assert_eq!(index & 0b11, 0);

        for spare in 1..4 {
            let mut variant = encoded[..encoded.len() - 1].to_string();
            variant.push(BASE32_ALPHABET[index | spare] as char);
            assert!(Cid::parse(&variant).is_err(), "{} parsed", variant);
        }
        assert!(Cid::parse(&encoded).is_ok());
    }

    #[test]
    fn test_base58_known_vectors() {
        assert_eq!(base58_encode(b"hello world"), "StV1DL6CwTryKyV");
        assert_eq!(base58_encode(&[0, 0, 1]), "112");
        assert_eq!(base58_decode("StV1DL6CwTryKyV").unwrap(), b"hello world");
        assert_eq!(base58_decode("112").unwrap(), vec![0, 0, 1]);
        assert!(base58_decode("0OIl").is_err());
    }

    #[test]
    fn test_cid_prefixes() {
        let cid = Cid::for_bytes(b"hello");
        assert!(cid.encode(Multibase::Base32Lower).starts_with("bafyrei"));
        assert!(cid.encode(Multibase::Base58Btc).starts_with("zdpu"));
        assert!(cid.to_path().starts_with("/ipfs/zdpu"));
    }

    #[test]
    fn test_cid_parse_both_bases() {
        let cid = Cid::for_bytes(b"manifest");
        assert_eq!(Cid::parse(&cid.encode(Multibase::Base32Lower)).unwrap(), cid);
        assert_eq!(Cid::parse(&cid.encode(Multibase::Base58Btc)).unwrap(), cid);
        assert_eq!(Cid::parse(&cid.to_path()).unwrap(), cid);
        assert_eq!(cid.to_string().parse::<Cid>().unwrap(), cid);
    }

    #[test]
    fn test_cid_parse_rejects_garbage() {
        assert!(Cid::parse("").is_err());
        assert!(Cid::parse("Qmfoo").is_err());
        assert!(Cid::parse("bmzxw6ytboi").is_err());
    }
}

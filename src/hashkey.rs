use std::convert::TryFrom;

use crate::{error as e, value::Value};

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HashKind {
    Integer,
    Boolean,
    String,
}

/// Key of a hash entry: the value's type plus a 64-bit digest.
///
/// Strings are keyed by their FNV-1a digest alone, so two different strings
/// whose digests collide address the same entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HashKey {
    pub kind: HashKind,
    pub digest: u64,
}

pub fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(FNV_PRIME)
    })
}

impl TryFrom<&Value> for HashKey {
    type Error = Value;
    fn try_from(source: &Value) -> Result<Self, Self::Error> {
        match source {
            Value::Integer(n) => Ok(HashKey {
                kind: HashKind::Integer,
                digest: *n as u64,
            }),
            Value::Boolean(b) => Ok(HashKey {
                kind: HashKind::Boolean,
                digest: u64::from(*b),
            }),
            Value::String(s) => Ok(HashKey {
                kind: HashKind::String,
                digest: fnv1a(s.as_bytes()),
            }),
            provided => Err(e::unusable_as_hash_key(provided)),
        }
    }
}

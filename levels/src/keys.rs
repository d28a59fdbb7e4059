//! Byte layout of the two key families.
//!
//! forward: `ns 0x00 'w' 0x00 code 0x00 id` -> id
//! reverse: `ns 0x00 'o' 0x00 id code`      -> code
//!
//! Ids are 8 big-endian bytes, so byte order is numeric order.

use crate::DocId;

const SEP: u8 = 0x00;
const WORD: u8 = b'w';
const OBJECT: u8 = b'o';

fn family(ns: &str, tag: u8) -> Vec<u8> {
    let mut k = Vec::with_capacity(ns.len() + 24);
    k.extend_from_slice(ns.as_bytes());
    k.push(SEP);
    k.push(tag);
    k.push(SEP);
    k
}

/// Prefix shared by every forward entry of `code`.
pub fn word_prefix(ns: &str, code: &str) -> Vec<u8> {
    let mut k = family(ns, WORD);
    k.extend_from_slice(code.as_bytes());
    k.push(SEP);
    k
}

pub fn word_key(ns: &str, code: &str, id: DocId) -> Vec<u8> {
    let mut k = word_prefix(ns, code);
    k.extend_from_slice(&id.to_be_bytes());
    k
}

/// Prefix shared by every reverse entry of `id`.
pub fn object_prefix(ns: &str, id: DocId) -> Vec<u8> {
    let mut k = family(ns, OBJECT);
    k.extend_from_slice(&id.to_be_bytes());
    k
}

pub fn object_key(ns: &str, id: DocId, code: &str) -> Vec<u8> {
    let mut k = object_prefix(ns, id);
    k.extend_from_slice(code.as_bytes());
    k
}

pub fn encode_id(id: DocId) -> Vec<u8> {
    id.to_be_bytes().to_vec()
}

pub fn decode_id(bytes: &[u8]) -> Option<DocId> {
    let arr: [u8; 8] = bytes.try_into().ok()?;
    Some(DocId::from_be_bytes(arr))
}

/// Smallest key greater than every key starting with `prefix`.
///
/// Returns an empty vec when no such bound exists (prefix is all 0xff).
pub fn prefix_end(prefix: &[u8]) -> Vec<u8> {
    let mut end = prefix.to_vec();
    while let Some(last) = end.pop() {
        if last < u8::MAX {
            end.push(last + 1);
            return end;
        }
    }
    end
}

pub(crate) fn validate_namespace(ns: &str) -> Result<(), String> {
    if ns.is_empty() {
        return Err("namespace must not be empty".into());
    }
    if ns.as_bytes().contains(&SEP) {
        return Err("namespace must not contain NUL bytes".into());
    }
    Ok(())
}

//! Ring hash function.
//!
//! A single 64-bit hash places virtual points and locates lookup keys, so the
//! two address spaces are directly comparable. XXH3 is a one-shot function with
//! no shared accumulator, which makes it safe to call from any number of
//! readers at once.

use xxhash_rust::xxh3::xxh3_64;

/// Hash an arbitrary byte sequence onto the ring.
#[inline]
pub fn hash_key(bytes: impl AsRef<[u8]>) -> u64 {
    xxh3_64(bytes.as_ref())
}

/// Position of virtual point `index` of `node_key`.
///
/// The point is the hash of `"{node_key}_{index}"`.
pub fn vnode_hash(node_key: &str, index: usize) -> u64 {
    hash_key(format!("{}_{}", node_key, index))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_deterministic() {
        assert_eq!(hash_key("clientid42"), hash_key("clientid42"));
        assert_eq!(hash_key(b"clientid42"), hash_key("clientid42".as_bytes()));
    }

    #[test]
    fn test_hash_differs_for_different_input() {
        assert_ne!(hash_key("server1"), hash_key("server2"));
    }

    #[test]
    fn test_vnode_hash_matches_formatted_key() {
        assert_eq!(vnode_hash("server7", 3), hash_key("server7_3"));
        assert_ne!(vnode_hash("server7", 3), vnode_hash("server7", 4));
    }
}

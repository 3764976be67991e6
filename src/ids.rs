//! Helpers for turning other identifiers into 64-bit item keys

/// Spread a numeric id over 64 bits with a xorshift, so sequential ids from
/// different sources are less likely to collide.
pub fn hash_long_64(value: i64) -> u64 {
    let mut value = value as u64;
    value ^= value << 21;
    value ^= value >> 35;
    value ^= value << 4;
    value
}

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// FNV-1a over the UTF-16 code units of `value`.
pub fn hash_str_64(value: &str) -> u64 {
    value.encode_utf16().fold(FNV_OFFSET_BASIS, |hash, unit| {
        (hash ^ u64::from(unit)).wrapping_mul(FNV_PRIME)
    })
}

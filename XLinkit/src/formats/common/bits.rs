//! Bit counting for sparse parameter masks
//!
//! A presence mask marks which schema fields carry an override. The override
//! words are packed, so the slot of field `i` is the number of set bits at or
//! below `i`.

/// Bit-parallel population count of a 32-bit word.
#[must_use]
pub fn count_on_bits(x: u32) -> u32 {
    let mut x = x - ((x >> 1) & 0x55555555);
    x = (x & 0x33333333) + ((x >> 2) & 0x33333333);
    x = (x + (x >> 4)) & 0x0F0F0F0F;
    x += x >> 8;
    x += x >> 16;
    x & 0x3F
}

/// Population count of a 64-bit word, as two 32-bit halves.
#[must_use]
pub fn count_on_bits_64(x: u64) -> u32 {
    count_on_bits(x as u32) + count_on_bits((x >> 32) as u32)
}

/// Count the set bits of `mask` at positions `0..=bit`.
///
/// `bit` must be below 32.
#[must_use]
pub fn count_set_bits_through(mask: u32, bit: u32) -> u32 {
    let inclusive = ((1u32 << bit) - 1) | (1u32 << bit);
    count_on_bits(mask & inclusive)
}

/// Count the set bits of `mask` at positions `0..=bit`.
///
/// `bit` must be below 64.
#[must_use]
pub fn count_set_bits_through_64(mask: u64, bit: u32) -> u32 {
    let inclusive = ((1u64 << bit) - 1) | (1u64 << bit);
    count_on_bits_64(mask & inclusive)
}

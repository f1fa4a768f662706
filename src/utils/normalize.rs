/// Map a 16-bit sample onto 8 bits by integer division by 257
///
/// 257 maps 0xFFFF to 0xFF exactly and 0x0101 * v back to v.
#[inline]
pub fn u16_to_u8(sample: u16) -> u8 {
    (sample / 257) as u8
}

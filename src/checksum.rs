/// Sums the given bytes modulo 256.
///
/// Received frames are checked against the sum of their six data bytes;
/// command frames carry the sum of everything between the command marker
/// and the checksum itself.
pub fn sum8(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |sum, &b| sum.wrapping_add(b))
}

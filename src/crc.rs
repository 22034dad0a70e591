//! CRC16-CCITT checksum engine.
//!
//! Outgoing messages can carry a 16-bit CRC so that ground-station decoders
//! can reject corrupted telemetry strings. The variant used here is
//! CRC16-CCITT with an initial value of `0xFFFF` and the `0x1021`
//! polynomial, computed byte-by-byte with the table-free nibble-folding
//! update (no 512-byte lookup table, which matters on AVR-class targets).

/// Folds one byte into a running CRC16-CCITT value.
///
/// The input byte is XORed into the high byte of the CRC and the result is
/// folded through two nibble shifts, equivalent to eight iterations of the
/// `0x1021` polynomial division.
pub fn crc_ccitt_update(crc: u16, byte: u8) -> u16 {
    let x = ((crc >> 8) ^ byte as u16) & 0xff;
    let x = x ^ (x >> 4);
    ((crc << 8) ^ (x << 12) ^ (x << 5) ^ x) & 0xffff
}

/// Computes the CRC16-CCITT checksum of `data`, starting from `0xFFFF`.
///
/// Pure and deterministic; the checksum of an empty slice is the initial
/// value itself.
pub fn crc16(data: &[u8]) -> u16 {
    let mut crc: u16 = 0xffff;
    for &byte in data {
        crc = crc_ccitt_update(crc, byte);
    }
    crc
}

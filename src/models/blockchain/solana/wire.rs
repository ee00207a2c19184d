//! Solana transaction wire layout helpers.
//!
//! A serialized transaction is a compact-u16 signature count, that many
//! 64-byte signatures, then the message bytes.

/// Length of an ed25519 signature
pub const SIGNATURE_LENGTH: usize = 64;

/// Decodes a compact-u16 ("shortvec") length prefix
///
/// Returns the value and the number of bytes consumed, or `None` when the
/// input is truncated, overlong or overflows `u16`.
pub fn decode_short_u16(bytes: &[u8]) -> Option<(u16, usize)> {
	let mut value: u32 = 0;
	for (index, byte) in bytes.iter().take(3).enumerate() {
		let part = u32::from(byte & 0x7f);
		value |= part << (index * 7);
		if byte & 0x80 == 0 {
			// A zero continuation byte is a non-canonical encoding
			if index > 0 && *byte == 0 {
				return None;
			}
			return u16::try_from(value).ok().map(|v| (v, index + 1));
		}
		if index == 2 {
			return None;
		}
	}
	None
}

/// Splits a signed transaction into its signatures and message
pub fn split_signed_transaction(bytes: &[u8]) -> Option<(Vec<&[u8]>, &[u8])> {
	let (count, offset) = decode_short_u16(bytes)?;
	let signatures_end = offset.checked_add(usize::from(count) * SIGNATURE_LENGTH)?;
	if bytes.len() <= signatures_end {
		return None;
	}
	let signatures = bytes[offset..signatures_end]
		.chunks_exact(SIGNATURE_LENGTH)
		.collect();
	Some((signatures, &bytes[signatures_end..]))
}

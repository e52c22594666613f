//! Keccak-256 hashing and Ethereum-style address derivation.

use sha3::{Digest, Keccak256};

use crate::curve::CurvePoint;
use crate::error::WithdrawalResult;

/// Keccak-256 of `data` (the pre-NIST padding variant used by Ethereum).
pub(crate) fn keccak256(data: &[u8]) -> [u8; 32] {
	let mut hasher = Keccak256::new();
	hasher.update(data);
	hasher.finalize().into()
}

/// Derive an Ethereum-style address from a public key point: Keccak-256 of
/// the 64-byte uncompressed encoding, last 20 bytes.
///
/// # Errors
///
/// The point at infinity has no encoding and therefore no address.
pub fn derive_address(point: &CurvePoint) -> WithdrawalResult<[u8; 20]> {
	let encoded = point.to_uncompressed_bytes()?;
	let digest = keccak256(&encoded);
	let mut address = [0u8; 20];
	address.copy_from_slice(&digest[12..]);
	Ok(address)
}

/// Lowercase `0x`-prefixed hex rendering of an address.
pub fn address_to_hex(address: &[u8; 20]) -> String {
	let mut out = String::with_capacity(42);
	out.push_str("0x");
	for byte in address {
		out.push_str(&format!("{:02x}", byte));
	}
	out
}

#[cfg(test)]
mod tests {
	use super::*;
	use num_bigint::BigUint;

	#[test]
	fn test_keccak256_empty_input() {
		// Well-known Keccak-256 of the empty string.
		let digest = keccak256(b"");
		assert_eq!(
			hex::encode(digest),
			"c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
		);
	}

	#[test]
	fn test_address_of_private_key_one() {
		// The address of G (private key 1) is a fixture every Ethereum
		// tool agrees on.
		let g = CurvePoint::generator();
		let address = derive_address(&g).unwrap();
		assert_eq!(address_to_hex(&address), "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf");
	}

	#[test]
	fn test_infinity_has_no_address() {
		assert!(derive_address(&CurvePoint::infinity()).is_err());
	}

	#[test]
	fn test_address_depends_on_scalar() {
		let g = CurvePoint::generator();
		let p2 = g.scalar_mul(&BigUint::from(2u32)).unwrap();
		assert_ne!(derive_address(&g).unwrap(), derive_address(&p2).unwrap());
	}
}

//! Winternitz one-time signatures over Keccak-256 chains.
//!
//! The protocol standardizes on Keccak-256 for the hash chain (a deliberate
//! deviation from the hash-agnostic Winternitz construction, shared with the
//! on-chain verifier). Parameters: w = 16, 64 message digits, 3 checksum
//! digits, 67 chain elements.
//!
//! Signing hashes each private element `d_i` times, where `d_i` is the i-th
//! base-w digit of the message; verification hashes the remaining
//! `(w-1) - d_i` steps and compares against the public key element.

use std::collections::HashMap;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::address::keccak256;
use crate::config::ProtocolConfig;
use crate::error::{WithdrawalError, WithdrawalResult};
use crate::shamir::{lagrange_at_zero, KeyShare};
use crate::params::{
	WOTS_CHAIN_ELEMENTS, WOTS_CHECKSUM_DIGITS, WOTS_ELEMENT_SIZE, WOTS_MESSAGE_DIGITS, WOTS_W,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "serde")]
use crate::serde_helpers::serde_chain_array;

/// The 67 private chain seeds of one WOTS key.
///
/// **This contains secret material and MUST be kept confidential.** Memory is
/// cleared on drop and the Debug rendering is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct WotsPrivateKey {
	elements: [[u8; WOTS_ELEMENT_SIZE]; WOTS_CHAIN_ELEMENTS],
}

impl WotsPrivateKey {
	/// Assemble a private key from 67 chain seeds.
	pub fn from_elements(elements: [[u8; WOTS_ELEMENT_SIZE]; WOTS_CHAIN_ELEMENTS]) -> Self {
		Self { elements }
	}

	/// The raw chain seeds (secret material, internal use).
	pub(crate) fn elements(&self) -> &[[u8; WOTS_ELEMENT_SIZE]; WOTS_CHAIN_ELEMENTS] {
		&self.elements
	}
}

impl Zeroize for WotsPrivateKey {
	fn zeroize(&mut self) {
		for element in &mut self.elements {
			element.zeroize();
		}
	}
}

impl Drop for WotsPrivateKey {
	fn drop(&mut self) {
		self.zeroize();
	}
}

impl ZeroizeOnDrop for WotsPrivateKey {}

impl core::fmt::Debug for WotsPrivateKey {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("WotsPrivateKey").field("elements", &"[REDACTED]").finish()
	}
}

/// The 67 public chain ends of one WOTS key. Freely distributable.
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WotsPublicKey {
	#[cfg_attr(feature = "serde", serde(with = "serde_chain_array"))]
	elements: [[u8; WOTS_ELEMENT_SIZE]; WOTS_CHAIN_ELEMENTS],
}

impl WotsPublicKey {
	/// The chain end for each position.
	pub fn elements(&self) -> &[[u8; WOTS_ELEMENT_SIZE]; WOTS_CHAIN_ELEMENTS] {
		&self.elements
	}

	/// Tight 2144-byte concatenation of all elements, matching
	/// `abi.encodePacked` on the contract side.
	pub fn packed(&self) -> Vec<u8> {
		let mut out = Vec::with_capacity(WOTS_CHAIN_ELEMENTS * WOTS_ELEMENT_SIZE);
		for element in &self.elements {
			out.extend_from_slice(element);
		}
		out
	}
}

/// A WOTS signature: one intermediate chain value per position.
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WotsSignature {
	#[cfg_attr(feature = "serde", serde(with = "serde_chain_array"))]
	elements: [[u8; WOTS_ELEMENT_SIZE]; WOTS_CHAIN_ELEMENTS],
}

impl WotsSignature {
	/// The signature chain values.
	pub fn elements(&self) -> &[[u8; WOTS_ELEMENT_SIZE]; WOTS_CHAIN_ELEMENTS] {
		&self.elements
	}
}

/// Split a 32-byte message hash into 64 base-16 message digits plus the
/// 3-digit checksum.
///
/// Message digits come out most-significant nibble first per byte. The
/// checksum `sum(15 - d_i)` is masked to 12 bits and appended
/// **least-significant nibble first**, the ordering the verifier contract
/// uses. Pinned by tests: getting it backwards produces signatures that
/// fail only on chain.
pub fn message_to_base_w(msg_hash: &[u8; 32]) -> [u8; WOTS_CHAIN_ELEMENTS] {
	let mut digits = [0u8; WOTS_CHAIN_ELEMENTS];

	for (i, byte) in msg_hash.iter().enumerate() {
		digits[2 * i] = byte >> 4;
		digits[2 * i + 1] = byte & 0x0F;
	}

	let mut checksum: u32 = 0;
	for digit in &digits[..WOTS_MESSAGE_DIGITS] {
		checksum += (WOTS_W - 1 - digit) as u32;
	}
	checksum &= 0x0FFF;

	for i in 0..WOTS_CHECKSUM_DIGITS {
		digits[WOTS_MESSAGE_DIGITS + i] = ((checksum >> (4 * i)) & 0x0F) as u8;
	}

	digits
}

/// Apply Keccak-256 iteratively `count` times to `seed`.
pub fn chain_hash(seed: &[u8; WOTS_ELEMENT_SIZE], count: u8) -> [u8; WOTS_ELEMENT_SIZE] {
	let mut current = *seed;
	for _ in 0..count {
		current = keccak256(&current);
	}
	current
}

/// Sign a 32-byte message hash: hash each private element `d_i` times.
pub fn sign(private_key: &WotsPrivateKey, msg_hash: &[u8; 32]) -> WotsSignature {
	let digits = message_to_base_w(msg_hash);
	let mut elements = [[0u8; WOTS_ELEMENT_SIZE]; WOTS_CHAIN_ELEMENTS];
	for (i, digit) in digits.iter().enumerate() {
		elements[i] = chain_hash(&private_key.elements()[i], *digit);
	}
	WotsSignature { elements }
}

/// Derive the public key: every chain run to its end (w - 1 steps).
pub fn derive_public_key(private_key: &WotsPrivateKey) -> WotsPublicKey {
	let mut elements = [[0u8; WOTS_ELEMENT_SIZE]; WOTS_CHAIN_ELEMENTS];
	for (i, seed) in private_key.elements().iter().enumerate() {
		elements[i] = chain_hash(seed, WOTS_W - 1);
	}
	WotsPublicKey { elements }
}

/// Verify a signature: hashing each signature element the remaining
/// `(w-1) - d_i` steps must reach the public key element.
pub fn verify(msg_hash: &[u8; 32], signature: &WotsSignature, public_key: &WotsPublicKey) -> bool {
	let digits = message_to_base_w(msg_hash);
	for i in 0..WOTS_CHAIN_ELEMENTS {
		let remaining = (WOTS_W - 1) - digits[i];
		if chain_hash(&signature.elements[i], remaining) != public_key.elements[i] {
			return false;
		}
	}
	true
}

/// Reconstruct a WOTS private key from threshold shares, one Lagrange
/// interpolation per chain position.
///
/// Shares are grouped by `element_index`; every one of the 67 positions must
/// reach the threshold. A position without enough shares fails the whole
/// reconstruction with [`WithdrawalError::IncompleteKey`]. The engine never
/// zero-fills missing positions, because a zero-filled key still produces a
/// syntactically valid but unspendable signature.
pub fn reconstruct_private_key(
	shares: &[KeyShare],
	config: &ProtocolConfig,
) -> WithdrawalResult<WotsPrivateKey> {
	let mut by_element: HashMap<u32, Vec<KeyShare>> = HashMap::new();
	for share in shares {
		by_element.entry(share.element_index).or_default().push(share.clone());
	}

	let missing = (0..WOTS_CHAIN_ELEMENTS as u32)
		.filter(|i| {
			by_element.get(i).map_or(true, |group| {
				(group.len() as u32) < config.threshold()
			})
		})
		.count();
	if missing > 0 {
		return Err(WithdrawalError::IncompleteKey { missing, expected: WOTS_CHAIN_ELEMENTS });
	}

	let mut elements = [[0u8; WOTS_ELEMENT_SIZE]; WOTS_CHAIN_ELEMENTS];
	for i in 0..WOTS_CHAIN_ELEMENTS {
		let group = &by_element[&(i as u32)];
		let mut scalar = lagrange_at_zero(group, config)?;
		elements[i] = scalar.to_bytes_be();
		scalar.zeroize();
	}

	Ok(WotsPrivateKey { elements })
}

#[cfg(test)]
mod tests {
	use super::*;
	use num_bigint::BigUint;
	use rand::RngCore;

	use crate::field::FieldElement;

	fn random_private_key() -> WotsPrivateKey {
		let mut rng = rand::thread_rng();
		let mut elements = [[0u8; WOTS_ELEMENT_SIZE]; WOTS_CHAIN_ELEMENTS];
		for element in &mut elements {
			rng.fill_bytes(element);
		}
		WotsPrivateKey::from_elements(elements)
	}

	#[test]
	fn test_base_w_zero_message_checksum_ordering() {
		// All-zero message: 64 zero digits, checksum 64 * 15 = 960 = 0x3C0,
		// appended least-significant nibble first: [0x0, 0xC, 0x3].
		let digits = message_to_base_w(&[0u8; 32]);
		assert_eq!(&digits[..WOTS_MESSAGE_DIGITS], &[0u8; 64][..]);
		assert_eq!(&digits[WOTS_MESSAGE_DIGITS..], &[0x0, 0xC, 0x3]);
	}

	#[test]
	fn test_base_w_nibble_order_within_byte() {
		let mut msg = [0u8; 32];
		msg[0] = 0xAB;
		let digits = message_to_base_w(&msg);
		assert_eq!(digits[0], 0xA);
		assert_eq!(digits[1], 0xB);
	}

	#[test]
	fn test_base_w_max_message_checksum_is_zero() {
		let digits = message_to_base_w(&[0xFF; 32]);
		assert_eq!(&digits[WOTS_MESSAGE_DIGITS..], &[0, 0, 0]);
	}

	#[test]
	fn test_chain_hash_compounds() {
		let seed = [7u8; 32];
		let twice = chain_hash(&seed, 2);
		assert_eq!(twice, keccak256(&keccak256(&seed)));
		assert_eq!(chain_hash(&seed, 0), seed);
	}

	#[test]
	fn test_sign_verify_round_trip() {
		let private_key = random_private_key();
		let public_key = derive_public_key(&private_key);

		let mut msg = [0u8; 32];
		rand::thread_rng().fill_bytes(&mut msg);

		let signature = sign(&private_key, &msg);
		assert!(verify(&msg, &signature, &public_key));
	}

	#[test]
	fn test_tampered_signature_rejected() {
		let private_key = random_private_key();
		let public_key = derive_public_key(&private_key);
		let msg = [0x5Au8; 32];
		let signature = sign(&private_key, &msg);

		// Flip one bit in a sampled set of positions.
		for (element, bit) in [(0usize, 0u8), (13, 3), (33, 7), (66, 5)] {
			let mut elements = *signature.elements();
			elements[element][bit as usize % 32] ^= 1 << (bit % 8);
			let tampered = WotsSignature { elements };
			assert!(!verify(&msg, &tampered, &public_key));
		}
	}

	#[test]
	fn test_tampered_public_key_rejected() {
		let private_key = random_private_key();
		let public_key = derive_public_key(&private_key);
		let msg = [0xC3u8; 32];
		let signature = sign(&private_key, &msg);

		let mut elements = *public_key.elements();
		elements[42][17] ^= 0x01;
		let tampered = WotsPublicKey { elements };
		assert!(!verify(&msg, &signature, &tampered));
	}

	#[test]
	fn test_wrong_message_rejected() {
		let private_key = random_private_key();
		let public_key = derive_public_key(&private_key);
		let signature = sign(&private_key, &[0x01u8; 32]);
		assert!(!verify(&[0x02u8; 32], &signature, &public_key));
	}

	#[test]
	fn test_reconstruct_private_key_from_shares() {
		let config = ProtocolConfig::default_protocol();

		// Secret chain seeds s_i = i + 1, shared with slope i + 100.
		let mut shares = Vec::new();
		let mut expected = [[0u8; WOTS_ELEMENT_SIZE]; WOTS_CHAIN_ELEMENTS];
		for i in 0..WOTS_CHAIN_ELEMENTS as u32 {
			let secret = FieldElement::scalar(BigUint::from(i + 1));
			let slope = FieldElement::scalar(BigUint::from(i + 100));
			expected[i as usize] = secret.to_bytes_be();
			for node in [1u32, 2] {
				let x = FieldElement::scalar(BigUint::from(node));
				let y = secret.field_add(&slope.field_mul(&x));
				shares.push(KeyShare::new(node, i, y));
			}
		}

		let reconstructed = reconstruct_private_key(&shares, &config).unwrap();
		assert_eq!(reconstructed.elements(), &expected);
	}

	#[test]
	fn test_reconstruct_fails_closed_on_missing_positions() {
		let config = ProtocolConfig::default_protocol();

		// Only one share for element 66; everything else has two.
		let mut shares = Vec::new();
		for i in 0..WOTS_CHAIN_ELEMENTS as u32 {
			let nodes: &[u32] = if i == 66 { &[1] } else { &[1, 2] };
			for &node in nodes {
				shares.push(KeyShare::new(
					node,
					i,
					FieldElement::scalar(BigUint::from(node + i)),
				));
			}
		}

		let result = reconstruct_private_key(&shares, &config);
		assert_eq!(
			result.unwrap_err(),
			WithdrawalError::IncompleteKey { missing: 1, expected: WOTS_CHAIN_ELEMENTS }
		);
	}

	#[test]
	fn test_private_key_debug_redacts() {
		let private_key = WotsPrivateKey::from_elements(
			[[0x42u8; WOTS_ELEMENT_SIZE]; WOTS_CHAIN_ELEMENTS],
		);
		let debug_str = format!("{:?}", private_key);
		assert!(debug_str.contains("REDACTED"));
		assert!(!debug_str.contains("66"));
	}

	#[test]
	fn test_private_key_zeroize() {
		let mut private_key = WotsPrivateKey::from_elements(
			[[0x42u8; WOTS_ELEMENT_SIZE]; WOTS_CHAIN_ELEMENTS],
		);
		private_key.zeroize();
		assert_eq!(private_key.elements()[0], [0u8; WOTS_ELEMENT_SIZE]);
		assert_eq!(private_key.elements()[66], [0u8; WOTS_ELEMENT_SIZE]);
	}
}

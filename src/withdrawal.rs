//! Withdrawal proof construction.
//!
//! [`WithdrawalProofBuilder`] orchestrates the full flow: collect shares from
//! the bundle, reconstruct the key, compose the domain-separated message
//! hash, sign it, and verify the Merkle inclusion proof locally before
//! handing the payload back. Every operation walks the same state machine
//! and any failure parks the builder in [`BuilderState::Failed`]; there is no
//! internal retry, because retrying with the same data cannot change the
//! math.
//!
//! Two message encodings exist and are NOT interchangeable: the WOTS path
//! hashes a tight-packed concatenation, the ECDSA path hashes three ABI
//! words. The on-chain verifiers differ in the same way.

use num_bigint::BigUint;
use num_traits::Zero;
use zeroize::{Zeroize, ZeroizeOnDrop};

use hkdf::Hkdf;
use sha2::Sha256;

use crate::address::{derive_address, keccak256};
use crate::bundle::KeyShareBundle;
use crate::config::ProtocolConfig;
use crate::curve::CurvePoint;
use crate::error::{WithdrawalError, WithdrawalResult};
use crate::field::FieldElement;
use crate::merkle::{address_leaf_hash, verify_proof, wots_leaf_hash};
use crate::params::{GROUP_ORDER, WEI_DECIMALS};
use crate::shamir::lagrange_at_zero;
use crate::wots::{self, WotsPublicKey, WotsSignature};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Caller-provided description of the withdrawal being proven. Immutable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WithdrawalIntent {
	/// Recipient address the funds go to.
	pub recipient: [u8; 20],
	/// Amount in wei.
	pub denomination_wei: BigUint,
	/// Merkle root the key was registered under.
	pub merkle_root: [u8; 32],
	/// On-chain identifier of that root, resolved by the collaborator.
	pub merkle_root_id: u64,
	/// EVM chain id the proof targets.
	pub chain_id: u64,
	/// Caller-chosen nonce, echoed into the payload.
	pub nonce: u64,
	/// Caller-chosen timestamp, echoed into the payload.
	pub timestamp: u64,
}

/// Which signature scheme a withdrawal uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignatureScheme {
	/// Winternitz one-time signature (quantum-safe path).
	Wots,
	/// ECDSA over secp256k1.
	Ecdsa,
}

/// Builder progress. Terminal states are `Ready` and `Failed`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BuilderState {
	/// Nothing done yet.
	Start,
	/// Shares and metadata pulled from the bundle.
	SharesCollected,
	/// Private key material reconstructed.
	KeyReconstructed,
	/// Message hash composed.
	MessageComposed,
	/// Signature produced.
	Signed,
	/// Merkle inclusion verified against the intent root.
	ProofVerifiedLocally,
	/// Payload handed back to the caller.
	Ready,
	/// The operation failed; the error is preserved for inspection.
	Failed(WithdrawalError),
}

/// Ephemeral reconstructed key material for the ECDSA path.
///
/// Exists only inside one withdrawal operation. The private scalar is
/// zeroized before the builder returns, on success and on failure.
pub struct ReconstructedKeyMaterial {
	/// The reconstructed private scalar.
	private_scalar: FieldElement,
	/// The matching public point `d * G`.
	pub public_point: CurvePoint,
	/// Ethereum-style address of the public point.
	pub address: [u8; 20],
}

impl Zeroize for ReconstructedKeyMaterial {
	fn zeroize(&mut self) {
		self.private_scalar.zeroize();
	}
}

impl Drop for ReconstructedKeyMaterial {
	fn drop(&mut self) {
		self.zeroize();
	}
}

impl ZeroizeOnDrop for ReconstructedKeyMaterial {}

impl core::fmt::Debug for ReconstructedKeyMaterial {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("ReconstructedKeyMaterial")
			.field("private_scalar", &"[REDACTED]")
			.field("address", &crate::address::address_to_hex(&self.address))
			.finish()
	}
}

/// An ECDSA signature in Ethereum's `(r, s, v)` form, low-s normalized,
/// `v` in `{27, 28}`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EcdsaSignature {
	/// x-coordinate of the nonce point, mod n.
	pub r: [u8; 32],
	/// Proof scalar, normalized to the low half of the order.
	pub s: [u8; 32],
	/// Recovery id plus 27.
	pub v: u8,
}

/// The signature carried by a [`SignedWithdrawal`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum WithdrawalSignature {
	/// 67 chain values.
	Wots(WotsSignature),
	/// `(r, s, v)` triple.
	Ecdsa(EcdsaSignature),
}

/// The signer identity the on-chain verifier checks the signature against.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SignerIdentity {
	/// 67 WOTS chain ends.
	Wots(WotsPublicKey),
	/// 20-byte address recovered from the ECDSA key.
	Ecdsa([u8; 20]),
}

/// The payload returned to the collaborator, shaped to be passed straight
/// into the on-chain `withdraw(...)` call. Contains no secret material.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SignedWithdrawal {
	/// Recipient address.
	pub recipient: [u8; 20],
	/// Amount in wei.
	pub denomination_wei: BigUint,
	/// On-chain Merkle root id.
	pub merkle_root_id: u64,
	/// The signature over the composed message.
	pub signature: WithdrawalSignature,
	/// The signer identity the verifier checks against.
	pub signer: SignerIdentity,
	/// Sibling path for the key's leaf.
	pub merkle_proof: Vec<[u8; 32]>,
	/// Leaf position within the tree.
	pub tree_index: u64,
	/// Double-spend tag: `keccak(merkle_root_id || tree_index)`.
	pub nullifier: [u8; 32],
}

impl SignedWithdrawal {
	/// The nullifier as a 0x-prefixed hex string.
	pub fn nullifier_hex(&self) -> String {
		let mut out = String::with_capacity(66);
		out.push_str("0x");
		for byte in &self.nullifier {
			out.push_str(&format!("{:02x}", byte));
		}
		out
	}
}

fn u64_to_32be(value: u64) -> [u8; 32] {
	let mut out = [0u8; 32];
	out[24..].copy_from_slice(&value.to_be_bytes());
	out
}

fn biguint_to_32be(value: &BigUint) -> WithdrawalResult<[u8; 32]> {
	let raw = value.to_bytes_be();
	if raw.len() > 32 {
		return Err(WithdrawalError::InvalidData("amount exceeds 256 bits".into()));
	}
	let mut out = [0u8; 32];
	out[32 - raw.len()..].copy_from_slice(&raw);
	Ok(out)
}

/// Convert a decimal ETH denomination string (e.g. `"0.1"`) to wei.
///
/// Accepts an optional fractional part of up to 18 digits. Anything else is
/// rejected; the fractional precision limit exists because wei has exactly
/// 18 decimals and silently truncating would change the committed amount.
pub fn denomination_to_wei(denomination: &str) -> WithdrawalResult<BigUint> {
	let (int_part, frac_part) = match denomination.split_once('.') {
		Some((i, f)) => (i, f),
		None => (denomination, ""),
	};

	if int_part.is_empty() && frac_part.is_empty() {
		return Err(WithdrawalError::InvalidData(format!(
			"malformed denomination {:?}",
			denomination
		)));
	}
	if frac_part.len() > WEI_DECIMALS {
		return Err(WithdrawalError::InvalidData(format!(
			"denomination {:?} has more than {} fractional digits",
			denomination, WEI_DECIMALS
		)));
	}
	if !int_part.bytes().all(|b| b.is_ascii_digit())
		|| !frac_part.bytes().all(|b| b.is_ascii_digit())
	{
		return Err(WithdrawalError::InvalidData(format!(
			"malformed denomination {:?}",
			denomination
		)));
	}

	let ten = BigUint::from(10u32);
	let mut wei = BigUint::zero();
	for digit in int_part.bytes() {
		wei = wei * &ten + BigUint::from(digit - b'0');
	}
	for digit in frac_part.bytes() {
		wei = wei * &ten + BigUint::from(digit - b'0');
	}
	for _ in 0..(WEI_DECIMALS - frac_part.len()) {
		wei *= &ten;
	}
	Ok(wei)
}

/// WOTS message hash: tight-packed
/// `keccak(recipient(20) || wei(32 BE) || merkle_root(32) || chain_id(32 BE))`.
pub fn compose_wots_message(intent: &WithdrawalIntent) -> WithdrawalResult<[u8; 32]> {
	let mut buf = Vec::with_capacity(20 + 32 + 32 + 32);
	buf.extend_from_slice(&intent.recipient);
	buf.extend_from_slice(&biguint_to_32be(&intent.denomination_wei)?);
	buf.extend_from_slice(&intent.merkle_root);
	buf.extend_from_slice(&u64_to_32be(intent.chain_id));
	Ok(keccak256(&buf))
}

/// ECDSA message hash: `keccak(abi.encode(address, uint256, uint256))`,
/// i.e. three 32-byte words (left-padded recipient, wei, merkle_root_id).
pub fn compose_ecdsa_message(intent: &WithdrawalIntent) -> WithdrawalResult<[u8; 32]> {
	let mut buf = [0u8; 96];
	buf[12..32].copy_from_slice(&intent.recipient);
	buf[32..64].copy_from_slice(&biguint_to_32be(&intent.denomination_wei)?);
	buf[64..96].copy_from_slice(&u64_to_32be(intent.merkle_root_id));
	Ok(keccak256(&buf))
}

/// Double-spend tag: `keccak(merkle_root_id(32 BE) || tree_index(32 BE))`.
pub fn nullifier(merkle_root_id: u64, tree_index: u64) -> [u8; 32] {
	let mut buf = [0u8; 64];
	buf[..32].copy_from_slice(&u64_to_32be(merkle_root_id));
	buf[32..].copy_from_slice(&u64_to_32be(tree_index));
	keccak256(&buf)
}

/// Derive a candidate ECDSA nonce from the private scalar and message hash.
///
/// HKDF-SHA256 keyed on the scalar with the message as salt; the counter
/// feeds the info field so a rejected candidate (zero mod n, or one that
/// produces `r = 0` or `s = 0`) gets a fresh successor. Not RFC 6979
/// bit-for-bit; verifiers only depend on signature validity, not nonce
/// choice.
fn derive_nonce(
	scalar_bytes: &[u8; 32],
	msg_hash: &[u8; 32],
	counter: u8,
) -> WithdrawalResult<BigUint> {
	let hk = Hkdf::<Sha256>::new(Some(msg_hash), scalar_bytes);
	let mut okm = [0u8; 32];
	hk.expand(&[counter], &mut okm)
		.map_err(|_| WithdrawalError::SigningError("nonce expansion failed"))?;
	let k = BigUint::from_bytes_be(&okm) % &*GROUP_ORDER;
	okm.zeroize();
	Ok(k)
}

/// Sign a 32-byte message hash with the reconstructed private scalar.
///
/// Standard ECDSA over the hand-rolled curve, with low-s normalization and
/// an Ethereum recovery id (`v = 27` or `28`).
pub fn sign_ecdsa(
	private_scalar: &FieldElement,
	msg_hash: &[u8; 32],
) -> WithdrawalResult<EcdsaSignature> {
	if private_scalar.is_zero() {
		return Err(WithdrawalError::SigningError("private scalar is zero"));
	}

	let mut scalar_bytes = private_scalar.to_bytes_be();
	let z = FieldElement::scalar_from_bytes(msg_hash);
	let half_order: BigUint = &*GROUP_ORDER >> 1;

	let mut result = Err(WithdrawalError::SigningError("nonce derivation exhausted"));
	for counter in 0u8..=255 {
		let k = derive_nonce(&scalar_bytes, msg_hash, counter)?;
		if k.is_zero() {
			continue;
		}

		let nonce_point = CurvePoint::generator().scalar_mul(&k)?;
		if nonce_point.is_infinity() {
			continue;
		}
		let r = FieldElement::scalar(nonce_point.x().value().clone());
		if r.is_zero() {
			continue;
		}

		// s = k^-1 * (z + r * d) mod n
		let k_elem = FieldElement::scalar(k);
		let mut s = k_elem.inv()?.field_mul(&z.field_add(&r.field_mul(private_scalar)));
		if s.is_zero() {
			continue;
		}

		let y_odd = nonce_point.y().value().bit(0);
		let flipped = s.value() > &half_order;
		if flipped {
			s = s.field_neg();
		}
		let v = 27 + u8::from(y_odd != flipped);

		result = Ok(EcdsaSignature { r: r.to_bytes_be(), s: s.to_bytes_be(), v });
		break;
	}

	scalar_bytes.zeroize();
	result
}

/// Verify an ECDSA signature against a public point.
pub fn verify_ecdsa(
	msg_hash: &[u8; 32],
	signature: &EcdsaSignature,
	public_point: &CurvePoint,
) -> bool {
	let r = BigUint::from_bytes_be(&signature.r);
	let s = BigUint::from_bytes_be(&signature.s);
	if r.is_zero() || s.is_zero() || r >= *GROUP_ORDER || s >= *GROUP_ORDER {
		return false;
	}

	let s_elem = FieldElement::scalar(s);
	let s_inv = match s_elem.inv() {
		Ok(inv) => inv,
		Err(_) => return false,
	};
	let z = FieldElement::scalar_from_bytes(msg_hash);
	let u1 = z.field_mul(&s_inv);
	let u2 = FieldElement::scalar(r.clone()).field_mul(&s_inv);

	let candidate = CurvePoint::generator()
		.scalar_mul(u1.value())
		.and_then(|p1| public_point.scalar_mul(u2.value()).and_then(|p2| p1.add(&p2)));
	match candidate {
		Ok(point) if !point.is_infinity() => point.x().value() % &*GROUP_ORDER == r,
		_ => false,
	}
}

/// Orchestrates one withdrawal: reconstruct, compose, sign, verify locally.
#[derive(Debug)]
pub struct WithdrawalProofBuilder {
	config: ProtocolConfig,
	state: BuilderState,
}

impl WithdrawalProofBuilder {
	/// A fresh builder in the `Start` state.
	pub fn new(config: ProtocolConfig) -> Self {
		Self { config, state: BuilderState::Start }
	}

	/// The builder's current state.
	pub fn state(&self) -> &BuilderState {
		&self.state
	}

	/// Run the full pipeline for `key_index` under the chosen scheme.
	///
	/// The Merkle inclusion proof is verified locally against the intent's
	/// root before the payload is returned; a proof that fails there would
	/// also fail on chain, so the signature is withheld
	/// ([`WithdrawalError::ProofInvalid`]). Any error parks the builder in
	/// [`BuilderState::Failed`].
	pub fn build_and_sign(
		&mut self,
		bundle: &KeyShareBundle,
		key_index: u32,
		intent: &WithdrawalIntent,
		scheme: SignatureScheme,
	) -> WithdrawalResult<SignedWithdrawal> {
		match self.run(bundle, key_index, intent, scheme) {
			Ok(payload) => {
				self.state = BuilderState::Ready;
				Ok(payload)
			},
			Err(err) => {
				self.state = BuilderState::Failed(err.clone());
				Err(err)
			},
		}
	}

	fn run(
		&mut self,
		bundle: &KeyShareBundle,
		key_index: u32,
		intent: &WithdrawalIntent,
		scheme: SignatureScheme,
	) -> WithdrawalResult<SignedWithdrawal> {
		let shares = bundle.shares_for(key_index)?;
		let metadata = bundle.resolve_metadata(key_index)?;
		if metadata.merkle_root != intent.merkle_root {
			// The nodes agree with each other here; it is the caller's
			// intent that points at a different tree.
			return Err(WithdrawalError::InvalidData(format!(
				"intent merkle root does not match bundle metadata for key index {}",
				key_index
			)));
		}
		self.state = BuilderState::SharesCollected;

		match scheme {
			SignatureScheme::Wots => {
				let mut private_key = wots::reconstruct_private_key(&shares, &self.config)?;
				self.state = BuilderState::KeyReconstructed;

				let public_key = wots::derive_public_key(&private_key);
				let leaf = wots_leaf_hash(&public_key);

				let msg_hash = compose_wots_message(intent)?;
				self.state = BuilderState::MessageComposed;

				let signature = wots::sign(&private_key, &msg_hash);
				private_key.zeroize();
				if !wots::verify(&msg_hash, &signature, &public_key) {
					return Err(WithdrawalError::SigningError(
						"signature failed self-verification",
					));
				}
				self.state = BuilderState::Signed;

				self.verify_inclusion(&leaf, metadata.tree_index, &metadata.merkle_proof, intent)?;

				Ok(SignedWithdrawal {
					recipient: intent.recipient,
					denomination_wei: intent.denomination_wei.clone(),
					merkle_root_id: intent.merkle_root_id,
					signature: WithdrawalSignature::Wots(signature),
					signer: SignerIdentity::Wots(public_key),
					merkle_proof: metadata.merkle_proof.clone(),
					tree_index: metadata.tree_index,
					nullifier: nullifier(intent.merkle_root_id, metadata.tree_index),
				})
			},
			SignatureScheme::Ecdsa => {
				let mut material = self.reconstruct_ecdsa_material(&shares)?;
				self.state = BuilderState::KeyReconstructed;

				let leaf = address_leaf_hash(&material.address);

				let msg_hash = compose_ecdsa_message(intent)?;
				self.state = BuilderState::MessageComposed;

				let signed = sign_ecdsa(&material.private_scalar, &msg_hash);
				let verified = signed
					.as_ref()
					.map(|sig| verify_ecdsa(&msg_hash, sig, &material.public_point))
					.unwrap_or(false);
				material.zeroize();
				let signature = signed?;
				if !verified {
					return Err(WithdrawalError::SigningError(
						"signature failed self-verification",
					));
				}
				self.state = BuilderState::Signed;

				self.verify_inclusion(&leaf, metadata.tree_index, &metadata.merkle_proof, intent)?;

				Ok(SignedWithdrawal {
					recipient: intent.recipient,
					denomination_wei: intent.denomination_wei.clone(),
					merkle_root_id: intent.merkle_root_id,
					signature: WithdrawalSignature::Ecdsa(signature),
					signer: SignerIdentity::Ecdsa(material.address),
					merkle_proof: metadata.merkle_proof.clone(),
					tree_index: metadata.tree_index,
					nullifier: nullifier(intent.merkle_root_id, metadata.tree_index),
				})
			},
		}
	}

	/// Lagrange-reconstruct the ECDSA scalar and derive its public identity.
	fn reconstruct_ecdsa_material(
		&self,
		shares: &[crate::shamir::KeyShare],
	) -> WithdrawalResult<ReconstructedKeyMaterial> {
		let mut private_scalar = lagrange_at_zero(shares, &self.config)?;
		let derived = CurvePoint::generator()
			.scalar_mul(private_scalar.value())
			.and_then(|public_point| {
				let address = derive_address(&public_point)?;
				Ok((public_point, address))
			});
		match derived {
			Ok((public_point, address)) => {
				Ok(ReconstructedKeyMaterial { private_scalar, public_point, address })
			},
			Err(err) => {
				private_scalar.zeroize();
				Err(err)
			},
		}
	}

	fn verify_inclusion(
		&mut self,
		leaf: &[u8; 32],
		tree_index: u64,
		proof: &[[u8; 32]],
		intent: &WithdrawalIntent,
	) -> WithdrawalResult<()> {
		if !verify_proof(leaf, proof, &intent.merkle_root, tree_index) {
			return Err(WithdrawalError::ProofInvalid);
		}
		self.state = BuilderState::ProofVerifiedLocally;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use num_traits::One;
	use rand::RngCore;

	fn intent() -> WithdrawalIntent {
		WithdrawalIntent {
			recipient: [0x11; 20],
			denomination_wei: denomination_to_wei("0.1").unwrap(),
			merkle_root: [0xAB; 32],
			merkle_root_id: 5,
			chain_id: 31337,
			nonce: 0,
			timestamp: 1_700_000_000,
		}
	}

	#[test]
	fn test_denomination_to_wei() {
		assert_eq!(denomination_to_wei("1").unwrap(), BigUint::from(10u64).pow(18));
		assert_eq!(denomination_to_wei("0.1").unwrap(), BigUint::from(10u64).pow(17));
		assert_eq!(denomination_to_wei("10.5").unwrap(), BigUint::from(105u64) * BigUint::from(10u64).pow(17));
		assert_eq!(denomination_to_wei(".5").unwrap(), BigUint::from(5u64) * BigUint::from(10u64).pow(17));
	}

	#[test]
	fn test_denomination_to_wei_rejects_malformed() {
		for bad in ["", ".", "1.2.3", "abc", "1,5", "0.1234567890123456789", "-1"] {
			assert!(denomination_to_wei(bad).is_err(), "{:?} should be rejected", bad);
		}
	}

	#[test]
	fn test_compose_wots_message_matches_hand_packed() {
		let intent = intent();
		let mut buf = Vec::new();
		buf.extend_from_slice(&[0x11; 20]);
		let mut wei = [0u8; 32];
		let raw = intent.denomination_wei.to_bytes_be();
		wei[32 - raw.len()..].copy_from_slice(&raw);
		buf.extend_from_slice(&wei);
		buf.extend_from_slice(&[0xAB; 32]);
		let mut chain = [0u8; 32];
		chain[24..].copy_from_slice(&31337u64.to_be_bytes());
		buf.extend_from_slice(&chain);
		assert_eq!(buf.len(), 116);

		assert_eq!(compose_wots_message(&intent).unwrap(), keccak256(&buf));
	}

	#[test]
	fn test_compose_ecdsa_message_is_abi_padded() {
		let intent = intent();
		let mut buf = [0u8; 96];
		buf[12..32].copy_from_slice(&[0x11; 20]);
		let raw = intent.denomination_wei.to_bytes_be();
		buf[64 - raw.len()..64].copy_from_slice(&raw);
		buf[88..96].copy_from_slice(&5u64.to_be_bytes());

		assert_eq!(compose_ecdsa_message(&intent).unwrap(), keccak256(&buf));
	}

	#[test]
	fn test_encodings_are_distinct() {
		let intent = intent();
		assert_ne!(
			compose_wots_message(&intent).unwrap(),
			compose_ecdsa_message(&intent).unwrap()
		);
	}

	#[test]
	fn test_nullifier_pinned() {
		let mut buf = [0u8; 64];
		buf[24..32].copy_from_slice(&5u64.to_be_bytes());
		buf[56..64].copy_from_slice(&3u64.to_be_bytes());
		assert_eq!(nullifier(5, 3), keccak256(&buf));
		assert_ne!(nullifier(5, 3), nullifier(5, 4));
		assert_ne!(nullifier(5, 3), nullifier(6, 3));
	}

	#[test]
	fn test_ecdsa_sign_verify_round_trip() {
		let mut rng = rand::thread_rng();
		let mut scalar_bytes = [0u8; 32];
		rng.fill_bytes(&mut scalar_bytes);
		let scalar = FieldElement::scalar_from_bytes(&scalar_bytes);
		let public_point = CurvePoint::generator().scalar_mul(scalar.value()).unwrap();

		let mut msg = [0u8; 32];
		rng.fill_bytes(&mut msg);

		let signature = sign_ecdsa(&scalar, &msg).unwrap();
		assert!(signature.v == 27 || signature.v == 28);
		assert!(verify_ecdsa(&msg, &signature, &public_point));

		// Wrong message and wrong key both fail.
		assert!(!verify_ecdsa(&[0u8; 32], &signature, &public_point));
		let other = CurvePoint::generator().scalar_mul(&BigUint::from(99u32)).unwrap();
		assert!(!verify_ecdsa(&msg, &signature, &other));
	}

	#[test]
	fn test_ecdsa_low_s() {
		let scalar = FieldElement::scalar(BigUint::from(12345u32));
		let signature = sign_ecdsa(&scalar, &[0x77; 32]).unwrap();
		let s = BigUint::from_bytes_be(&signature.s);
		assert!(s <= &*GROUP_ORDER >> 1);
	}

	#[test]
	fn test_ecdsa_is_deterministic() {
		let scalar = FieldElement::scalar(BigUint::from(4242u32));
		let a = sign_ecdsa(&scalar, &[0x31; 32]).unwrap();
		let b = sign_ecdsa(&scalar, &[0x31; 32]).unwrap();
		assert_eq!(a, b);
	}

	#[test]
	fn test_ecdsa_zero_scalar_rejected() {
		let zero = FieldElement::scalar(BigUint::zero());
		assert!(sign_ecdsa(&zero, &[0x01; 32]).is_err());
	}

	#[test]
	fn test_nullifier_hex_format() {
		let payload_nullifier = nullifier(1, 2);
		let payload = SignedWithdrawal {
			recipient: [0; 20],
			denomination_wei: BigUint::one(),
			merkle_root_id: 1,
			signature: WithdrawalSignature::Ecdsa(EcdsaSignature {
				r: [0; 32],
				s: [0; 32],
				v: 27,
			}),
			signer: SignerIdentity::Ecdsa([0; 20]),
			merkle_proof: vec![],
			tree_index: 2,
			nullifier: payload_nullifier,
		};
		let hex = payload.nullifier_hex();
		assert!(hex.starts_with("0x"));
		assert_eq!(hex.len(), 66);
	}

	#[test]
	fn test_zero_secret_has_no_key_material() {
		// f(x) = 0 + 5x interpolates to the zero scalar, whose public point
		// is infinity and has no address. The error must surface instead of
		// leaking a half-built material struct.
		use crate::shamir::KeyShare;
		let builder = WithdrawalProofBuilder::new(ProtocolConfig::default_protocol());
		let shares = vec![
			KeyShare::new(1, 0, FieldElement::scalar(BigUint::from(5u32))),
			KeyShare::new(2, 0, FieldElement::scalar(BigUint::from(10u32))),
		];
		let err = builder.reconstruct_ecdsa_material(&shares).unwrap_err();
		assert!(matches!(err, WithdrawalError::InvalidPoint { .. }));
	}

	#[test]
	fn test_key_material_zeroize_clears_scalar() {
		let scalar = FieldElement::scalar(BigUint::from(7u32));
		let public_point = CurvePoint::generator().scalar_mul(scalar.value()).unwrap();
		let address = derive_address(&public_point).unwrap();
		let mut material =
			ReconstructedKeyMaterial { private_scalar: scalar, public_point, address };
		material.zeroize();
		assert!(material.private_scalar.is_zero());
	}

	#[test]
	fn test_key_material_debug_redacts() {
		let scalar = FieldElement::scalar(BigUint::from(7u32));
		let public_point = CurvePoint::generator().scalar_mul(scalar.value()).unwrap();
		let address = derive_address(&public_point).unwrap();
		let material = ReconstructedKeyMaterial { private_scalar: scalar, public_point, address };
		let debug_str = format!("{:?}", material);
		assert!(debug_str.contains("REDACTED"));
	}
}

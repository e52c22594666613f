//! Threshold secret reconstruction from distributed key shares.
//!
//! Two reconstruction conventions coexist in the protocol and must never be
//! conflated:
//!
//! - **Private scalars** are Shamir polynomial shares and are recovered by
//!   Lagrange interpolation at x = 0 over the scalar field.
//! - **The joint public key** is the flat sum of each node's generator
//!   multiple, because every DKG contribution adds into the group key. It is
//!   NOT the Lagrange combination of points.
//!
//! Mixing the two produces a wrong-but-plausible-looking key, so the caller
//! selects a [`ReconstructionMode`] explicitly per code path.

use num_bigint::BigUint;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::config::ProtocolConfig;
use crate::curve::CurvePoint;
use crate::error::{WithdrawalError, WithdrawalResult};
use crate::field::FieldElement;

/// One node's fragment of a secret, received from a DKG node and consumed
/// exactly once per reconstruction. Never persisted by this crate.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyShare {
	/// Index of the contributing DKG node (the Shamir x-coordinate; must be
	/// non-zero).
	pub node_index: u32,
	/// Position in the WOTS chain this share belongs to. Zero for the single
	/// ECDSA scalar.
	pub element_index: u32,
	/// The share value over the scalar field.
	value: FieldElement,
}

impl KeyShare {
	/// Create a share from a scalar-field value.
	pub fn new(node_index: u32, element_index: u32, value: FieldElement) -> Self {
		Self { node_index, element_index, value }
	}

	/// Create a share from a 32-byte big-endian value.
	pub fn from_bytes(node_index: u32, element_index: u32, value: &[u8; 32]) -> Self {
		Self::new(node_index, element_index, FieldElement::scalar_from_bytes(value))
	}

	/// The share value (secret material).
	pub fn value(&self) -> &FieldElement {
		&self.value
	}
}

impl Zeroize for KeyShare {
	fn zeroize(&mut self) {
		self.node_index.zeroize();
		self.element_index.zeroize();
		self.value.zeroize();
	}
}

impl Drop for KeyShare {
	fn drop(&mut self) {
		self.zeroize();
	}
}

impl ZeroizeOnDrop for KeyShare {}

impl core::fmt::Debug for KeyShare {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("KeyShare")
			.field("node_index", &self.node_index)
			.field("element_index", &self.element_index)
			.field("value", &"[REDACTED]")
			.finish()
	}
}

/// Which reconstruction convention to apply.
///
/// There is deliberately no default: the private-key signing path uses
/// [`ReconstructionMode::LagrangePrivate`], the public-key/address
/// verification path uses [`ReconstructionMode::PublicKeySum`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconstructionMode {
	/// Lagrange interpolation at x = 0 over the scalar field.
	LagrangePrivate,
	/// Flat sum of generator multiples of the share values.
	PublicKeySum,
}

/// The outcome of a [`reconstruct`] call, tagged by the convention that
/// produced it so a private scalar can never be mistaken for a public point.
#[derive(Debug)]
pub enum Reconstructed {
	/// A private scalar recovered by Lagrange interpolation.
	PrivateScalar(FieldElement),
	/// The joint public key recovered by summing public shares.
	PublicPoint(CurvePoint),
}

/// Reconstruct under an explicitly chosen convention.
///
/// Thin dispatch over [`lagrange_at_zero`] and [`sum_of_public_shares`] for
/// callers that carry the mode as data rather than in control flow.
pub fn reconstruct(
	mode: ReconstructionMode,
	shares: &[KeyShare],
	config: &ProtocolConfig,
) -> WithdrawalResult<Reconstructed> {
	match mode {
		ReconstructionMode::LagrangePrivate => {
			Ok(Reconstructed::PrivateScalar(lagrange_at_zero(shares, config)?))
		},
		ReconstructionMode::PublicKeySum => {
			Ok(Reconstructed::PublicPoint(sum_of_public_shares(shares, config)?))
		},
	}
}

/// Select the deterministic reconstruction subset: shares sorted by node
/// index, lowest first, exactly `threshold` of them. Rejects zero and
/// duplicate node indices up front.
fn select_subset<'a>(
	shares: &'a [KeyShare],
	config: &ProtocolConfig,
) -> WithdrawalResult<Vec<&'a KeyShare>> {
	let required = config.threshold();
	if (shares.len() as u32) < required {
		return Err(WithdrawalError::InsufficientShares {
			provided: shares.len(),
			required,
		});
	}

	let mut ordered: Vec<&KeyShare> = shares.iter().collect();
	ordered.sort_by_key(|s| s.node_index);

	for pair in ordered.windows(2) {
		if pair[0].node_index == pair[1].node_index {
			return Err(WithdrawalError::InvalidShare {
				node_index: pair[0].node_index,
				reason: "duplicate node index",
			});
		}
	}
	if ordered[0].node_index == 0 {
		return Err(WithdrawalError::InvalidShare {
			node_index: 0,
			reason: "node index zero would place a share at the secret",
		});
	}

	ordered.truncate(required as usize);
	Ok(ordered)
}

/// Reconstruct a private scalar by Lagrange interpolation at x = 0.
///
/// Takes exactly the `threshold` lowest-indexed shares so repeated calls on
/// the same share set are reproducible. Computes
/// `sum_i y_i * prod_{j != i} (0 - x_j) / (x_i - x_j) mod n`.
///
/// # Errors
///
/// * [`WithdrawalError::InsufficientShares`] when fewer than `threshold`
///   shares are supplied.
/// * [`WithdrawalError::InvalidShare`] for zero or duplicate node indices.
/// * [`WithdrawalError::NoInverse`] if a denominator collapses, which a
///   well-formed share set cannot produce.
pub fn lagrange_at_zero(
	shares: &[KeyShare],
	config: &ProtocolConfig,
) -> WithdrawalResult<FieldElement> {
	let subset = select_subset(shares, config)?;

	let mut acc = FieldElement::zero(shares[0].value().modulus());
	for (i, share_i) in subset.iter().enumerate() {
		let x_i = FieldElement::scalar(BigUint::from(share_i.node_index));

		let mut numerator = FieldElement::one(x_i.modulus());
		let mut denominator = FieldElement::one(x_i.modulus());
		for (j, share_j) in subset.iter().enumerate() {
			if i == j {
				continue;
			}
			let x_j = FieldElement::scalar(BigUint::from(share_j.node_index));
			numerator = numerator.field_mul(&x_j.field_neg());
			denominator = denominator.field_mul(&x_i.field_sub(&x_j));
		}

		let coefficient = numerator.field_mul(&denominator.inv()?);
		acc = acc.field_add(&share_i.value().field_mul(&coefficient));
	}

	Ok(acc)
}

/// Reconstruct the joint public key as the flat sum of generator multiples:
/// `sum_i (y_i * G)`.
///
/// This matches how the DKG nodes compute the group public key from their
/// individual contributions. It is intentionally NOT Lagrange interpolation
/// applied to points; see the module docs.
///
/// # Errors
///
/// [`WithdrawalError::InsufficientShares`] when fewer than `threshold`
/// shares are supplied.
pub fn sum_of_public_shares(
	shares: &[KeyShare],
	config: &ProtocolConfig,
) -> WithdrawalResult<CurvePoint> {
	let required = config.threshold();
	if (shares.len() as u32) < required {
		return Err(WithdrawalError::InsufficientShares {
			provided: shares.len(),
			required,
		});
	}

	let g = CurvePoint::generator();
	let mut acc = CurvePoint::infinity();
	for share in shares {
		let term = g.scalar_mul(share.value().value())?;
		acc = acc.add(&term)?;
	}
	Ok(acc)
}

//! secp256k1 affine point arithmetic.
//!
//! Points are immutable `{x, y}` pairs over the base field plus a point at
//! infinity. The group law is the standard chord-and-tangent construction;
//! scalar multiplication is double-and-add from the least-significant bit.
//!
//! # Known limitation
//!
//! Scalar multiplication is not constant time: the sequence of additions
//! depends on the bit pattern of the scalar. Bignum arithmetic here cannot
//! hide secret-dependent timing, matching the reference behavior this engine
//! reproduces.

use num_bigint::BigUint;
use num_traits::Zero;

use crate::error::{WithdrawalError, WithdrawalResult};
use crate::field::FieldElement;
use crate::params::{CURVE_B, FIELD_MODULUS, GENERATOR_X, GENERATOR_Y, GROUP_ORDER};

/// A point on secp256k1 (`y^2 = x^3 + 7 mod p`) or the point at infinity.
///
/// Invariant: when `infinity` is false, `(x, y)` satisfies the curve
/// equation. Constructors enforce this; the group-law operations preserve it.
#[derive(Clone, PartialEq, Eq)]
pub struct CurvePoint {
	x: FieldElement,
	y: FieldElement,
	infinity: bool,
}

impl CurvePoint {
	/// The point at infinity (group identity).
	pub fn infinity() -> Self {
		Self {
			x: FieldElement::zero(&FIELD_MODULUS),
			y: FieldElement::zero(&FIELD_MODULUS),
			infinity: true,
		}
	}

	/// Construct a point from affine coordinates, validating the curve
	/// equation.
	///
	/// # Errors
	///
	/// Returns [`WithdrawalError::InvalidPoint`] if `(x, y)` is not on
	/// secp256k1. A rejected point signals corrupted or adversarial input.
	pub fn from_affine(x: FieldElement, y: FieldElement) -> WithdrawalResult<Self> {
		let point = Self { x, y, infinity: false };
		if !point.is_on_curve() {
			return Err(WithdrawalError::InvalidPoint {
				reason: "coordinates do not satisfy y^2 = x^3 + 7",
			});
		}
		Ok(point)
	}

	/// The secp256k1 generator point G.
	pub fn generator() -> Self {
		// The coordinates are compile-time constants validated by tests.
		Self {
			x: FieldElement::base_field(GENERATOR_X.clone()),
			y: FieldElement::base_field(GENERATOR_Y.clone()),
			infinity: false,
		}
	}

	/// Whether this is the point at infinity.
	pub fn is_infinity(&self) -> bool {
		self.infinity
	}

	/// The affine x-coordinate. Meaningless for the point at infinity.
	pub fn x(&self) -> &FieldElement {
		&self.x
	}

	/// The affine y-coordinate. Meaningless for the point at infinity.
	pub fn y(&self) -> &FieldElement {
		&self.y
	}

	/// Check the curve equation `y^2 = x^3 + 7 mod p`.
	pub fn is_on_curve(&self) -> bool {
		if self.infinity {
			return true;
		}
		let y2 = self.y.field_mul(&self.y);
		let x3 = self.x.field_mul(&self.x).field_mul(&self.x);
		let b = FieldElement::base_field(BigUint::from(CURVE_B));
		y2 == x3.field_add(&b)
	}

	/// Point doubling.
	///
	/// The point at infinity and order-2 points (`y = 0`) both map to
	/// infinity. No `y = 0` point exists on secp256k1, but the guard keeps
	/// the tangent-slope inversion total.
	pub fn double(&self) -> WithdrawalResult<Self> {
		debug_assert!(self.is_on_curve());
		if self.infinity || self.y.is_zero() {
			return Ok(Self::infinity());
		}

		// lambda = 3*x^2 / (2*y)
		let x2 = self.x.field_mul(&self.x);
		let three_x2 = x2.field_add(&x2).field_add(&x2);
		let two_y = self.y.field_add(&self.y);
		let lambda = three_x2.field_mul(&two_y.inv()?);

		// x' = lambda^2 - 2*x, y' = lambda*(x - x') - y
		let x_new = lambda.field_mul(&lambda).field_sub(&self.x).field_sub(&self.x);
		let y_new = lambda.field_mul(&self.x.field_sub(&x_new)).field_sub(&self.y);

		Ok(Self { x: x_new, y: y_new, infinity: false })
	}

	/// Point addition.
	pub fn add(&self, other: &Self) -> WithdrawalResult<Self> {
		debug_assert!(self.is_on_curve() && other.is_on_curve());
		if self.infinity {
			return Ok(other.clone());
		}
		if other.infinity {
			return Ok(self.clone());
		}

		if self.x == other.x {
			if self.y == other.y {
				return self.double();
			}
			// Inverse points: P + (-P) = O.
			return Ok(Self::infinity());
		}

		// lambda = (y2 - y1) / (x2 - x1)
		let dy = other.y.field_sub(&self.y);
		let dx = other.x.field_sub(&self.x);
		let lambda = dy.field_mul(&dx.inv()?);

		let x_new = lambda.field_mul(&lambda).field_sub(&self.x).field_sub(&other.x);
		let y_new = lambda.field_mul(&self.x.field_sub(&x_new)).field_sub(&self.y);

		Ok(Self { x: x_new, y: y_new, infinity: false })
	}

	/// Scalar multiplication `k * P`, double-and-add from the
	/// least-significant bit. The scalar is reduced mod n first; `k = 0`
	/// yields the point at infinity.
	pub fn scalar_mul(&self, k: &BigUint) -> WithdrawalResult<Self> {
		let k = k % &*GROUP_ORDER;
		if k.is_zero() {
			return Ok(Self::infinity());
		}

		let mut result = Self::infinity();
		let mut base = self.clone();
		for bit in 0..k.bits() {
			if k.bit(bit) {
				result = result.add(&base)?;
			}
			base = base.double()?;
		}
		Ok(result)
	}

	/// 64-byte uncompressed encoding: 32-byte big-endian x followed by
	/// 32-byte big-endian y.
	///
	/// # Errors
	///
	/// The point at infinity has no affine encoding.
	pub fn to_uncompressed_bytes(&self) -> WithdrawalResult<[u8; 64]> {
		if self.infinity {
			return Err(WithdrawalError::InvalidPoint {
				reason: "point at infinity has no affine encoding",
			});
		}
		let mut out = [0u8; 64];
		out[..32].copy_from_slice(&self.x.to_bytes_be());
		out[32..].copy_from_slice(&self.y.to_bytes_be());
		Ok(out)
	}
}

impl core::fmt::Debug for CurvePoint {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		if self.infinity {
			write!(f, "CurvePoint(infinity)")
		} else {
			write!(f, "CurvePoint(x={:064x})", self.x.value())
		}
	}
}

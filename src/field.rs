//! Modular field arithmetic over the secp256k1 base and scalar fields.
//!
//! Elements are unbounded big integers kept reduced into `[0, m)` for a fixed
//! modulus. Every operation returns a new value; nothing is mutated in place.
//! The same type serves both the base field (mod p) and the scalar field
//! (mod n); the modulus travels with the element as a static reference.

use core::ops::{Add, Mul, Neg, Sub};

use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::{One, Zero};
use zeroize::Zeroize;

use crate::error::{WithdrawalError, WithdrawalResult};
use crate::params::{FIELD_MODULUS, GROUP_ORDER};

/// An integer modulo a prime, always reduced into `[0, m)`.
///
/// Immutable value type: arithmetic produces new elements. Elements from
/// different fields must never be mixed; doing so is a programming error
/// caught by debug assertions.
#[derive(Clone, PartialEq, Eq)]
pub struct FieldElement {
	value: BigUint,
	modulus: &'static BigUint,
}

impl FieldElement {
	/// Create a new element, reducing `value` modulo `modulus`.
	pub fn new(value: BigUint, modulus: &'static BigUint) -> Self {
		Self { value: value % modulus, modulus }
	}

	/// The additive identity of the given field.
	pub fn zero(modulus: &'static BigUint) -> Self {
		Self { value: BigUint::zero(), modulus }
	}

	/// The multiplicative identity of the given field.
	pub fn one(modulus: &'static BigUint) -> Self {
		Self { value: BigUint::one(), modulus }
	}

	/// Element of the secp256k1 base field (mod p).
	pub fn base_field(value: BigUint) -> Self {
		Self::new(value, &FIELD_MODULUS)
	}

	/// Element of the secp256k1 scalar field (mod n).
	pub fn scalar(value: BigUint) -> Self {
		Self::new(value, &GROUP_ORDER)
	}

	/// Scalar-field element from a 32-byte big-endian encoding.
	pub fn scalar_from_bytes(bytes: &[u8; 32]) -> Self {
		Self::scalar(BigUint::from_bytes_be(bytes))
	}

	/// The reduced integer value.
	pub fn value(&self) -> &BigUint {
		&self.value
	}

	/// The field modulus this element is reduced by.
	pub fn modulus(&self) -> &'static BigUint {
		self.modulus
	}

	/// Whether this is the additive identity.
	pub fn is_zero(&self) -> bool {
		self.value.is_zero()
	}

	/// 32-byte big-endian encoding, left-padded with zeros.
	pub fn to_bytes_be(&self) -> [u8; 32] {
		let raw = self.value.to_bytes_be();
		let mut out = [0u8; 32];
		out[32 - raw.len()..].copy_from_slice(&raw);
		out
	}

	/// Field addition.
	pub fn field_add(&self, other: &Self) -> Self {
		debug_assert!(core::ptr::eq(self.modulus, other.modulus));
		Self::new(&self.value + &other.value, self.modulus)
	}

	/// Field subtraction.
	pub fn field_sub(&self, other: &Self) -> Self {
		debug_assert!(core::ptr::eq(self.modulus, other.modulus));
		// Lift above the modulus before subtracting so BigUint never underflows.
		Self::new(self.modulus + &self.value - &other.value, self.modulus)
	}

	/// Field multiplication.
	pub fn field_mul(&self, other: &Self) -> Self {
		debug_assert!(core::ptr::eq(self.modulus, other.modulus));
		Self::new(&self.value * &other.value, self.modulus)
	}

	/// Additive inverse.
	pub fn field_neg(&self) -> Self {
		if self.value.is_zero() {
			return self.clone();
		}
		Self { value: self.modulus - &self.value, modulus: self.modulus }
	}

	/// Multiplicative inverse via the extended Euclidean algorithm.
	///
	/// # Errors
	///
	/// Returns [`WithdrawalError::NoInverse`] when `gcd(a, m) != 1`, i.e. for
	/// the zero element since the modulus is prime. Callers must treat this
	/// as fatal for the reconstruction in progress: it signals a malformed or
	/// adversarial share set, not a transient condition.
	pub fn inv(&self) -> WithdrawalResult<Self> {
		if self.value.is_zero() {
			return Err(WithdrawalError::NoInverse);
		}

		let a = BigInt::from_biguint(Sign::Plus, self.value.clone());
		let m = BigInt::from_biguint(Sign::Plus, self.modulus.clone());
		let gcd = a.extended_gcd(&m);

		if !gcd.gcd.is_one() {
			return Err(WithdrawalError::NoInverse);
		}

		// gcd.x may be negative; lift into [0, m).
		let x = gcd.x.mod_floor(&m);
		let (_, reduced) = x.into_parts();
		Ok(Self { value: reduced, modulus: self.modulus })
	}
}

impl Add for &FieldElement {
	type Output = FieldElement;

	fn add(self, other: Self) -> FieldElement {
		self.field_add(other)
	}
}

impl Sub for &FieldElement {
	type Output = FieldElement;

	fn sub(self, other: Self) -> FieldElement {
		self.field_sub(other)
	}
}

impl Mul for &FieldElement {
	type Output = FieldElement;

	fn mul(self, other: Self) -> FieldElement {
		self.field_mul(other)
	}
}

impl Neg for &FieldElement {
	type Output = FieldElement;

	fn neg(self) -> FieldElement {
		self.field_neg()
	}
}

impl Zeroize for FieldElement {
	fn zeroize(&mut self) {
		// num-bigint offers no in-place limb wiping; overwrite with zero.
		self.value = BigUint::zero();
	}
}

impl core::fmt::Debug for FieldElement {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		// Field elements may hold private scalars; never print the value.
		f.debug_struct("FieldElement").field("value", &"[REDACTED]").finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_add_wraps_at_modulus() {
		let n = &*GROUP_ORDER;
		let a = FieldElement::scalar(n - BigUint::one());
		let b = FieldElement::scalar(BigUint::from(5u32));
		let sum = a.field_add(&b);
		assert_eq!(*sum.value(), BigUint::from(4u32));
	}

	#[test]
	fn test_sub_never_underflows() {
		let a = FieldElement::scalar(BigUint::from(3u32));
		let b = FieldElement::scalar(BigUint::from(10u32));
		let diff = a.field_sub(&b);
		let expected = FieldElement::scalar(&*GROUP_ORDER - BigUint::from(7u32));
		assert_eq!(diff, expected);
	}

	#[test]
	fn test_mul_matches_modpow_square() {
		let a = FieldElement::base_field(BigUint::from(123456789u64));
		let squared = a.field_mul(&a);
		let expected = a.value().modpow(&BigUint::from(2u32), &FIELD_MODULUS);
		assert_eq!(*squared.value(), expected);
	}

	#[test]
	fn test_inverse_round_trip() {
		let a = FieldElement::scalar(BigUint::from(7919u32));
		let inv = a.inv().unwrap();
		let product = a.field_mul(&inv);
		assert_eq!(*product.value(), BigUint::one());
	}

	#[test]
	fn test_inverse_round_trip_base_field() {
		let a = FieldElement::base_field(BigUint::from(0xDEADBEEFu64));
		let inv = a.inv().unwrap();
		assert_eq!(*a.field_mul(&inv).value(), BigUint::one());
	}

	#[test]
	fn test_zero_has_no_inverse() {
		let zero = FieldElement::zero(&GROUP_ORDER);
		assert_eq!(zero.inv(), Err(WithdrawalError::NoInverse));
	}

	#[test]
	fn test_neg_cancels() {
		let a = FieldElement::scalar(BigUint::from(42u32));
		let sum = a.field_add(&a.field_neg());
		assert!(sum.is_zero());
	}

	#[test]
	fn test_bytes_round_trip() {
		let a = FieldElement::scalar(BigUint::from(0x0102030405060708u64));
		let bytes = a.to_bytes_be();
		assert_eq!(bytes[0], 0);
		assert_eq!(bytes[24..], [1, 2, 3, 4, 5, 6, 7, 8]);
		let back = FieldElement::scalar_from_bytes(&bytes);
		assert_eq!(a, back);
	}

	#[test]
	fn test_debug_redacts_value() {
		let a = FieldElement::scalar(BigUint::from(42u32));
		let debug_str = format!("{:?}", a);
		assert!(debug_str.contains("REDACTED"));
		assert!(!debug_str.contains("42"));
	}

	#[test]
	fn test_zeroize_clears_value() {
		let mut a = FieldElement::scalar(BigUint::from(42u32));
		a.zeroize();
		assert!(a.is_zero());
	}
}

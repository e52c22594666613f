//! Parameter definitions for the threshold WOTS withdrawal engine.
//!
//! All curve arithmetic in this crate is fixed to secp256k1. The base field
//! modulus, group order and generator coordinates live here as lazily parsed
//! bignum statics, alongside the Winternitz chain parameters.

use std::sync::LazyLock;

use num_bigint::BigUint;

/// secp256k1 base field modulus, p = 2^256 - 2^32 - 977.
pub static FIELD_MODULUS: LazyLock<BigUint> = LazyLock::new(|| {
	BigUint::parse_bytes(
		b"FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFC2F",
		16,
	)
	.expect("valid hex constant")
});

/// secp256k1 group order n (the scalar field modulus).
pub static GROUP_ORDER: LazyLock<BigUint> = LazyLock::new(|| {
	BigUint::parse_bytes(
		b"FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141",
		16,
	)
	.expect("valid hex constant")
});

/// x-coordinate of the secp256k1 generator point G.
pub static GENERATOR_X: LazyLock<BigUint> = LazyLock::new(|| {
	BigUint::parse_bytes(
		b"79BE667EF9DCBBAC55A06295CE870B07029BFCDB2DCE28D959F2815B16F81798",
		16,
	)
	.expect("valid hex constant")
});

/// y-coordinate of the secp256k1 generator point G.
pub static GENERATOR_Y: LazyLock<BigUint> = LazyLock::new(|| {
	BigUint::parse_bytes(
		b"483ADA7726A3C4655DA4FBFC0E1108A8FD17B448A68554199C47D08FFB10D4B8",
		16,
	)
	.expect("valid hex constant")
});

/// Curve equation constant b in y^2 = x^3 + b (a = 0 for secp256k1).
pub const CURVE_B: u32 = 7;

/// Winternitz parameter w (digits are base-16 nibbles, 4 bits each).
pub const WOTS_W: u8 = 16;

/// Number of message digits: one 256-bit digest split into nibbles.
pub const WOTS_MESSAGE_DIGITS: usize = 64;

/// Number of checksum digits appended after the message digits.
pub const WOTS_CHECKSUM_DIGITS: usize = 3;

/// Total chain elements per WOTS key: message digits plus checksum digits.
pub const WOTS_CHAIN_ELEMENTS: usize = WOTS_MESSAGE_DIGITS + WOTS_CHECKSUM_DIGITS;

/// Size in bytes of one chain element (a Keccak-256 digest).
pub const WOTS_ELEMENT_SIZE: usize = 32;

/// Number of decimal places in one whole token unit (wei precision).
pub const WEI_DECIMALS: usize = 18;

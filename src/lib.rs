//! # Threshold WOTS Withdrawal Engine
//!
//! This crate reconstructs threshold-shared one-time-signature keys and
//! builds withdrawal proofs for a cross-chain privacy protocol on secp256k1.
//!
//! ## Overview
//!
//! Deposit keys are split across a set of DKG nodes with Shamir secret
//! sharing. To withdraw, a caller collects a threshold of shares per key,
//! reconstructs the private material, signs a domain-separated withdrawal
//! message, and verifies the key's Merkle inclusion proof locally before the
//! payload is handed to the on-chain submitter.
//!
//! Two signature paths exist:
//!
//! - **WOTS** (quantum-safe): a w=16 Winternitz one-time signature over
//!   Keccak-256 chains, 67 chain elements per key, each element
//!   reconstructed independently from its shares.
//! - **ECDSA**: a single scalar reconstructed by Lagrange interpolation,
//!   signed with a deterministic HKDF-derived nonce and low-s normalization.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use threshold_wots::{
//!     ProtocolConfig, SignatureScheme, WithdrawalIntent, WithdrawalProofBuilder,
//!     denomination_to_wei,
//! };
//!
//! let config = ProtocolConfig::new(2, 3).expect("invalid parameters");
//! let mut builder = WithdrawalProofBuilder::new(config);
//!
//! // `bundle` arrives from the DKG nodes; `intent` describes the withdrawal.
//! // let payload = builder.build_and_sign(&bundle, 0, &intent, SignatureScheme::Wots)?;
//! // Submit `payload` on chain via the collaborating transport layer.
//! ```
//!
//! ## Two reconstruction conventions
//!
//! Private keys use Lagrange interpolation at `x = 0`; aggregate public keys
//! use a plain sum of per-node public shares. These are distinct protocols
//! that happen to share a data shape, so the caller selects one explicitly
//! via [`ReconstructionMode`]. There is no default.
//!
//! ## Warning
//!
//! **The bignum arithmetic here is not constant time.** Scalar
//! multiplication timing depends on secret bits. Treat this as a research
//! implementation pending a hardened backend.

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod address;
pub mod bundle;
pub mod config;
pub mod curve;
pub mod error;
pub mod field;
pub mod merkle;
pub mod params;
pub mod serde_helpers;
pub mod shamir;
pub mod withdrawal;
pub mod wots;

pub use bundle::{KeyMetadata, KeyShareBundle, KeyShareEntry, NodeShare};
pub use config::ProtocolConfig;
pub use curve::CurvePoint;
pub use error::{WithdrawalError, WithdrawalResult, MAX_NODES, MIN_THRESHOLD};
pub use field::FieldElement;
pub use shamir::{
	lagrange_at_zero, reconstruct, sum_of_public_shares, KeyShare, Reconstructed,
	ReconstructionMode,
};
pub use withdrawal::{
	denomination_to_wei, BuilderState, EcdsaSignature, SignatureScheme, SignedWithdrawal,
	SignerIdentity, WithdrawalIntent, WithdrawalProofBuilder, WithdrawalSignature,
};
pub use wots::{WotsPrivateKey, WotsPublicKey, WotsSignature};

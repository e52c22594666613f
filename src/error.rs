//! Error types for threshold key reconstruction and withdrawal proving.

use core::fmt;

/// Result type for withdrawal-engine operations.
pub type WithdrawalResult<T> = Result<T, WithdrawalError>;

/// Error types for threshold key reconstruction and withdrawal proving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WithdrawalError {
	/// Fewer shares supplied than the reconstruction threshold requires.
	InsufficientShares {
		/// Number of shares provided.
		provided: usize,
		/// Required threshold.
		required: u32,
	},
	/// Contributing nodes disagree on metadata for the same key index.
	InconsistentMetadata {
		/// Key index whose metadata conflicts.
		key_index: u32,
		/// Name of the conflicting field.
		field: &'static str,
	},
	/// A field element has no modular inverse (zero, or a share set that
	/// collapses a Lagrange denominator).
	NoInverse,
	/// A point does not satisfy the secp256k1 curve equation.
	InvalidPoint {
		/// Description of the violation.
		reason: &'static str,
	},
	/// Local Merkle inclusion verification failed after reconstruction.
	ProofInvalid,
	/// WOTS reconstruction produced fewer than the required chain elements.
	IncompleteKey {
		/// Number of chain positions without a threshold of shares.
		missing: usize,
		/// Total chain positions expected.
		expected: usize,
	},
	/// A key share is malformed (zero or duplicate node index).
	InvalidShare {
		/// Node index of the offending share.
		node_index: u32,
		/// Reason for rejection.
		reason: &'static str,
	},
	/// No shares or metadata exist for the requested key index.
	UnknownKeyIndex {
		/// The key index that was requested.
		key_index: u32,
	},
	/// Invalid threshold configuration.
	InvalidConfiguration {
		/// Threshold value.
		threshold: u32,
		/// Total number of nodes.
		total_nodes: u32,
		/// Description of the validation error.
		reason: &'static str,
	},
	/// Invalid data format or structure.
	InvalidData(String),
	/// A cryptographic signing step failed.
	SigningError(&'static str),
}

impl fmt::Display for WithdrawalError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			WithdrawalError::InsufficientShares { provided, required } => {
				write!(f, "insufficient shares: provided {}, required {}", provided, required)
			},
			WithdrawalError::InconsistentMetadata { key_index, field } => {
				write!(
					f,
					"contributing nodes disagree on {} for key index {}",
					field, key_index
				)
			},
			WithdrawalError::NoInverse => {
				write!(f, "field element has no modular inverse")
			},
			WithdrawalError::InvalidPoint { reason } => {
				write!(f, "invalid curve point: {}", reason)
			},
			WithdrawalError::ProofInvalid => {
				write!(f, "local Merkle proof verification failed")
			},
			WithdrawalError::IncompleteKey { missing, expected } => {
				write!(
					f,
					"WOTS key reconstruction incomplete: {} of {} chain positions missing",
					missing, expected
				)
			},
			WithdrawalError::InvalidShare { node_index, reason } => {
				write!(f, "invalid share from node {}: {}", node_index, reason)
			},
			WithdrawalError::UnknownKeyIndex { key_index } => {
				write!(f, "no shares or metadata for key index {}", key_index)
			},
			WithdrawalError::InvalidConfiguration { threshold, total_nodes, reason } => {
				write!(
					f,
					"invalid configuration: t={}, n={}, reason: {}",
					threshold, total_nodes, reason
				)
			},
			WithdrawalError::InvalidData(msg) => {
				write!(f, "invalid data: {}", msg)
			},
			WithdrawalError::SigningError(reason) => {
				write!(f, "signing failed: {}", reason)
			},
		}
	}
}

impl std::error::Error for WithdrawalError {}

/// Maximum number of DKG nodes supported.
pub const MAX_NODES: u32 = 16;

/// Minimum threshold value (at least 2 nodes required).
pub const MIN_THRESHOLD: u32 = 2;

/// Validate threshold parameters.
pub fn validate_threshold_params(t: u32, n: u32) -> WithdrawalResult<()> {
	if t < MIN_THRESHOLD {
		return Err(WithdrawalError::InvalidConfiguration {
			threshold: t,
			total_nodes: n,
			reason: "threshold must be at least 2",
		});
	}

	if n > MAX_NODES {
		return Err(WithdrawalError::InvalidConfiguration {
			threshold: t,
			total_nodes: n,
			reason: "too many nodes (max 16)",
		});
	}

	if t > n {
		return Err(WithdrawalError::InvalidConfiguration {
			threshold: t,
			total_nodes: n,
			reason: "threshold cannot exceed number of nodes",
		});
	}

	Ok(())
}

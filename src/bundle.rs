//! Key-share bundles delivered by the DKG nodes.
//!
//! The transport layer parses each node's JSON response and hands the core an
//! in-memory [`KeyShareBundle`]. Several nodes contribute entries for the same
//! key index; before any reconstruction their metadata must agree on the
//! Merkle root and tree index. Disagreement is surfaced as
//! [`WithdrawalError::InconsistentMetadata`], never resolved by picking a
//! side.

use crate::error::{WithdrawalError, WithdrawalResult};
use crate::shamir::KeyShare;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One node's fragment of one chain element.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NodeShare {
	/// The contributing node's 1-based index (the Shamir x-coordinate).
	pub node_index: u32,
	/// Which of the 67 WOTS chain positions this share belongs to.
	/// Always 0 for ECDSA keys.
	pub element_index: u32,
	/// The share value, 32 big-endian bytes.
	pub share_value: [u8; 32],
}

/// All shares one or more nodes supplied for a single key index.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KeyShareEntry {
	/// The deposit key this entry belongs to.
	pub key_index: u32,
	/// Share fragments, typically 67 per contributing node for WOTS keys.
	pub shares: Vec<NodeShare>,
}

/// One node's view of a key's on-chain placement.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KeyMetadata {
	/// The deposit key this metadata describes.
	pub key_index: u32,
	/// Root of the Merkle tree the key's leaf was registered under.
	pub merkle_root: [u8; 32],
	/// Sibling path from the key's leaf up to `merkle_root`.
	pub merkle_proof: Vec<[u8; 32]>,
	/// The leaf position within the tree.
	pub tree_index: u64,
	/// Human-readable denomination string, e.g. `"0.1"`.
	pub denomination: String,
	/// The deposit batch the key was generated in.
	pub batch_id: u64,
}

/// A full bundle: key shares plus per-key metadata, as received from the
/// DKG nodes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KeyShareBundle {
	/// Share entries, possibly several per key index (one per node).
	pub keyshares: Vec<KeyShareEntry>,
	/// Metadata entries, possibly several per key index (one per node).
	pub keys_metadata: Vec<KeyMetadata>,
}

impl KeyShareBundle {
	/// Collect every share for `key_index` across all contributing nodes,
	/// converted into field elements ready for reconstruction.
	pub fn shares_for(&self, key_index: u32) -> WithdrawalResult<Vec<KeyShare>> {
		let mut shares = Vec::new();
		for entry in self.keyshares.iter().filter(|e| e.key_index == key_index) {
			for share in &entry.shares {
				if share.node_index == 0 {
					return Err(WithdrawalError::InvalidShare {
						node_index: 0,
						reason: "node index 0 would place the secret at x = 0",
					});
				}
				shares.push(KeyShare::from_bytes(
					share.node_index,
					share.element_index,
					&share.share_value,
				));
			}
		}
		if shares.is_empty() {
			return Err(WithdrawalError::UnknownKeyIndex { key_index });
		}
		Ok(shares)
	}

	/// Resolve the single agreed metadata record for `key_index`.
	///
	/// Every contributing node's record must match on `merkle_root` and
	/// `tree_index`; the first record is returned once agreement is
	/// established. A key with no metadata at all yields
	/// [`WithdrawalError::UnknownKeyIndex`].
	pub fn resolve_metadata(&self, key_index: u32) -> WithdrawalResult<&KeyMetadata> {
		let mut records = self.keys_metadata.iter().filter(|m| m.key_index == key_index);
		let first = records.next().ok_or(WithdrawalError::UnknownKeyIndex { key_index })?;

		for record in records {
			if record.merkle_root != first.merkle_root {
				return Err(WithdrawalError::InconsistentMetadata {
					key_index,
					field: "merkle_root",
				});
			}
			if record.tree_index != first.tree_index {
				return Err(WithdrawalError::InconsistentMetadata {
					key_index,
					field: "tree_index",
				});
			}
		}
		Ok(first)
	}
}

//! Keccak-256 binary Merkle trees and inclusion proofs.
//!
//! The tree commits to the set of registered withdrawal keys. Parent nodes
//! are `keccak256(left || right)` with no domain separation, matching the
//! on-chain verifier. Levels with an odd node count duplicate their last
//! node.

use crate::address::keccak256;
use crate::error::{WithdrawalError, WithdrawalResult};
use crate::wots::WotsPublicKey;

/// Leaf hash of a WOTS public key: Keccak-256 over the tight 2144-byte
/// concatenation of its 67 chain ends.
pub fn wots_leaf_hash(public_key: &WotsPublicKey) -> [u8; 32] {
	keccak256(&public_key.packed())
}

/// Leaf hash of a plain 20-byte address key.
pub fn address_leaf_hash(address: &[u8; 20]) -> [u8; 32] {
	keccak256(address)
}

/// Verify an inclusion proof against a known root.
///
/// The parity of the shifted leaf index picks sibling order at each level:
/// an even index hashes `current || sibling`, an odd one `sibling || current`.
/// An empty proof is valid exactly when the leaf already equals the root
/// (the single-leaf tree).
pub fn verify_proof(
	leaf: &[u8; 32],
	proof: &[[u8; 32]],
	root: &[u8; 32],
	leaf_index: u64,
) -> bool {
	let mut current = *leaf;
	let mut index = leaf_index;
	for sibling in proof {
		let mut buf = [0u8; 64];
		if index % 2 == 0 {
			buf[..32].copy_from_slice(&current);
			buf[32..].copy_from_slice(sibling);
		} else {
			buf[..32].copy_from_slice(sibling);
			buf[32..].copy_from_slice(&current);
		}
		current = keccak256(&buf);
		index /= 2;
	}
	current == *root
}

/// An in-memory Merkle tree over precomputed leaf hashes.
///
/// Stores every level so proofs come out without rehashing. The withdrawal
/// builder only needs [`verify_proof`]; the full tree exists for operators
/// assembling proofs off-chain and for tests.
#[derive(Clone, Debug)]
pub struct MerkleTree {
	levels: Vec<Vec<[u8; 32]>>,
}

impl MerkleTree {
	/// Build a tree from leaf hashes. At least one leaf is required.
	pub fn build(leaves: &[[u8; 32]]) -> WithdrawalResult<Self> {
		if leaves.is_empty() {
			return Err(WithdrawalError::InvalidData("merkle tree requires at least one leaf".into()));
		}

		let mut levels = vec![leaves.to_vec()];
		while levels[levels.len() - 1].len() > 1 {
			let prev = &levels[levels.len() - 1];
			let mut next = Vec::with_capacity((prev.len() + 1) / 2);
			for pair in prev.chunks(2) {
				let left = pair[0];
				// Odd level: duplicate the last node.
				let right = if pair.len() == 2 { pair[1] } else { pair[0] };
				let mut buf = [0u8; 64];
				buf[..32].copy_from_slice(&left);
				buf[32..].copy_from_slice(&right);
				next.push(keccak256(&buf));
			}
			levels.push(next);
		}

		Ok(Self { levels })
	}

	/// The root hash.
	pub fn root(&self) -> [u8; 32] {
		self.levels[self.levels.len() - 1][0]
	}

	/// Number of leaves.
	pub fn leaf_count(&self) -> usize {
		self.levels[0].len()
	}

	/// The sibling path for `leaf_index`, bottom level first.
	pub fn proof(&self, leaf_index: u64) -> WithdrawalResult<Vec<[u8; 32]>> {
		if leaf_index as usize >= self.leaf_count() {
			return Err(WithdrawalError::InvalidData(format!(
				"leaf index {} out of range for {} leaves",
				leaf_index,
				self.leaf_count()
			)));
		}

		let mut path = Vec::with_capacity(self.levels.len() - 1);
		let mut index = leaf_index as usize;
		for level in &self.levels[..self.levels.len() - 1] {
			let sibling_index = index ^ 1;
			// Duplicated last node is its own sibling.
			let sibling = if sibling_index < level.len() { level[sibling_index] } else { level[index] };
			path.push(sibling);
			index /= 2;
		}
		Ok(path)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn leaf(tag: u8) -> [u8; 32] {
		keccak256(&[tag])
	}

	#[test]
	fn test_single_leaf_root_is_leaf() {
		let l = leaf(1);
		let tree = MerkleTree::build(&[l]).unwrap();
		assert_eq!(tree.root(), l);
		let proof = tree.proof(0).unwrap();
		assert!(proof.is_empty());
		assert!(verify_proof(&l, &proof, &tree.root(), 0));
	}

	#[test]
	fn test_empty_proof_rejects_mismatched_leaf() {
		assert!(!verify_proof(&leaf(1), &[], &leaf(2), 0));
	}

	#[test]
	fn test_two_leaf_tree() {
		let leaves = [leaf(1), leaf(2)];
		let tree = MerkleTree::build(&leaves).unwrap();

		let mut buf = [0u8; 64];
		buf[..32].copy_from_slice(&leaves[0]);
		buf[32..].copy_from_slice(&leaves[1]);
		assert_eq!(tree.root(), keccak256(&buf));

		for (i, l) in leaves.iter().enumerate() {
			let proof = tree.proof(i as u64).unwrap();
			assert!(verify_proof(l, &proof, &tree.root(), i as u64));
		}
	}

	#[test]
	fn test_all_leaves_verify_in_larger_trees() {
		for n in [3usize, 4, 5, 8] {
			let leaves: Vec<[u8; 32]> = (0..n as u8).map(leaf).collect();
			let tree = MerkleTree::build(&leaves).unwrap();
			for (i, l) in leaves.iter().enumerate() {
				let proof = tree.proof(i as u64).unwrap();
				assert!(
					verify_proof(l, &proof, &tree.root(), i as u64),
					"leaf {} of {} failed",
					i,
					n
				);
			}
		}
	}

	#[test]
	fn test_corrupted_sibling_rejected() {
		let leaves: Vec<[u8; 32]> = (0..4u8).map(leaf).collect();
		let tree = MerkleTree::build(&leaves).unwrap();
		let mut proof = tree.proof(2).unwrap();
		proof[1][0] ^= 0x01;
		assert!(!verify_proof(&leaves[2], &proof, &tree.root(), 2));
	}

	#[test]
	fn test_wrong_index_parity_rejected() {
		// Swapping the claimed index changes sibling ordering and the
		// recomputed root.
		let leaves: Vec<[u8; 32]> = (0..4u8).map(leaf).collect();
		let tree = MerkleTree::build(&leaves).unwrap();
		let proof = tree.proof(2).unwrap();
		assert!(!verify_proof(&leaves[2], &proof, &tree.root(), 3));
	}

	#[test]
	fn test_odd_width_duplicates_last() {
		let leaves: Vec<[u8; 32]> = (0..3u8).map(leaf).collect();
		let tree = MerkleTree::build(&leaves).unwrap();

		// Level 1: h(0||1), h(2||2); root: h(h01 || h22).
		let mut buf = [0u8; 64];
		buf[..32].copy_from_slice(&leaves[0]);
		buf[32..].copy_from_slice(&leaves[1]);
		let h01 = keccak256(&buf);
		buf[..32].copy_from_slice(&leaves[2]);
		buf[32..].copy_from_slice(&leaves[2]);
		let h22 = keccak256(&buf);
		buf[..32].copy_from_slice(&h01);
		buf[32..].copy_from_slice(&h22);
		assert_eq!(tree.root(), keccak256(&buf));
	}

	#[test]
	fn test_proof_index_out_of_range() {
		let tree = MerkleTree::build(&[leaf(1), leaf(2)]).unwrap();
		assert!(tree.proof(2).is_err());
	}

	#[test]
	fn test_empty_leaves_rejected() {
		assert!(MerkleTree::build(&[]).is_err());
	}
}

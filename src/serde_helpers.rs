//! Serde helpers for the 67-element WOTS chain arrays.
//!
//! Serde only supports arrays up to 32 elements by default. These helpers
//! provide serialization for the `[[u8; 32]; 67]` arrays carried by WOTS
//! public keys and signatures.

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Serde support for `[[u8; 32]; 67]` chain-element arrays.
#[cfg(feature = "serde")]
pub mod serde_chain_array {
	use super::*;
	use crate::params::{WOTS_CHAIN_ELEMENTS, WOTS_ELEMENT_SIZE};

	pub fn serialize<S>(
		arr: &[[u8; WOTS_ELEMENT_SIZE]; WOTS_CHAIN_ELEMENTS],
		serializer: S,
	) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		let vec_of_vecs: Vec<Vec<u8>> = arr.iter().map(|e| e.to_vec()).collect();
		vec_of_vecs.serialize(serializer)
	}

	pub fn deserialize<'de, D>(
		deserializer: D,
	) -> Result<[[u8; WOTS_ELEMENT_SIZE]; WOTS_CHAIN_ELEMENTS], D::Error>
	where
		D: Deserializer<'de>,
	{
		let vec_of_vecs: Vec<Vec<u8>> = Vec::deserialize(deserializer)?;
		if vec_of_vecs.len() != WOTS_CHAIN_ELEMENTS {
			return Err(serde::de::Error::custom(format!(
				"expected {} chain elements, got {}",
				WOTS_CHAIN_ELEMENTS,
				vec_of_vecs.len()
			)));
		}
		let mut arr = [[0u8; WOTS_ELEMENT_SIZE]; WOTS_CHAIN_ELEMENTS];
		for (i, v) in vec_of_vecs.into_iter().enumerate() {
			if v.len() != WOTS_ELEMENT_SIZE {
				return Err(serde::de::Error::custom(format!(
					"expected {} bytes in chain element {}, got {}",
					WOTS_ELEMENT_SIZE,
					i,
					v.len()
				)));
			}
			arr[i].copy_from_slice(&v);
		}
		Ok(arr)
	}
}

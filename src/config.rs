//! Threshold configuration for key reconstruction.
//!
//! The protocol runs a fixed 2-of-3 DKG; the configuration type keeps the
//! threshold and node count validated and explicit instead of scattering
//! magic numbers through the reconstruction code.

use crate::error::{validate_threshold_params, WithdrawalResult};

/// Default reconstruction threshold for the deployed protocol.
pub const DEFAULT_THRESHOLD: u32 = 2;

/// Default number of DKG nodes for the deployed protocol.
pub const DEFAULT_NODES: u32 = 3;

/// Configuration for a (t, n) threshold reconstruction.
///
/// At least `t` of `n` node shares are required to reconstruct key material.
///
/// # Example
///
/// ```
/// use threshold_wots::ProtocolConfig;
///
/// let config = ProtocolConfig::new(2, 3).expect("valid parameters");
/// assert_eq!(config.threshold(), 2);
/// assert_eq!(config.total_nodes(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtocolConfig {
	/// Threshold value (minimum shares required to reconstruct).
	t: u32,
	/// Total number of DKG nodes.
	n: u32,
}

impl ProtocolConfig {
	/// Create a new threshold configuration.
	///
	/// # Errors
	///
	/// Returns an error if `t < 2`, `n > 16`, or `t > n`.
	pub fn new(t: u32, n: u32) -> WithdrawalResult<Self> {
		validate_threshold_params(t, n)?;
		Ok(Self { t, n })
	}

	/// The deployed protocol's 2-of-3 configuration.
	pub fn default_protocol() -> Self {
		// Parameters validated by test below; new() cannot fail for them.
		Self { t: DEFAULT_THRESHOLD, n: DEFAULT_NODES }
	}

	/// Get the threshold value (minimum shares required).
	#[inline]
	pub fn threshold(&self) -> u32 {
		self.t
	}

	/// Get the total number of DKG nodes.
	#[inline]
	pub fn total_nodes(&self) -> u32 {
		self.n
	}
}

#[cfg(feature = "serde")]
impl serde::Serialize for ProtocolConfig {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: serde::Serializer,
	{
		use serde::ser::SerializeStruct;
		let mut state = serializer.serialize_struct("ProtocolConfig", 2)?;
		state.serialize_field("threshold", &self.t)?;
		state.serialize_field("total_nodes", &self.n)?;
		state.end()
	}
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for ProtocolConfig {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		#[derive(serde::Deserialize)]
		struct ConfigData {
			threshold: u32,
			total_nodes: u32,
		}

		let data = ConfigData::deserialize(deserializer)?;
		ProtocolConfig::new(data.threshold, data.total_nodes).map_err(serde::de::Error::custom)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_config_creation() {
		let config = ProtocolConfig::new(2, 3).unwrap();
		assert_eq!(config.threshold(), 2);
		assert_eq!(config.total_nodes(), 3);
	}

	#[test]
	fn test_default_protocol_is_valid() {
		let config = ProtocolConfig::default_protocol();
		assert_eq!(ProtocolConfig::new(config.threshold(), config.total_nodes()), Ok(config));
	}

	#[test]
	fn test_invalid_threshold_too_small() {
		assert!(ProtocolConfig::new(1, 3).is_err());
	}

	#[test]
	fn test_invalid_threshold_exceeds_nodes() {
		assert!(ProtocolConfig::new(5, 3).is_err());
	}

	#[test]
	fn test_invalid_too_many_nodes() {
		assert!(ProtocolConfig::new(3, 17).is_err());
	}
}

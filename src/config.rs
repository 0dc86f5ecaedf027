/* src/config.rs */

use std::path::PathBuf;

/// Settings shared by every generated output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
	/// `tshark` executable used to dissect captures.
	pub tshark: PathBuf,
	/// Module path the generated files import the fingerprint functions from.
	pub oracle_path: String,
	/// Show a progress bar while captures are processed.
	pub progress: bool,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			tshark: PathBuf::from("tshark"),
			oracle_path: "super".to_owned(),
			progress: true,
		}
	}
}

/* src/error.rs */

use std::io;
use std::path::PathBuf;

/// Errors produced while reading captures and generating fixtures.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
	/// A capture or output file could not be accessed.
	#[error("{}: {source}", .path.display())]
	Io {
		/// Path of the file being accessed.
		path: PathBuf,
		/// Underlying I/O failure.
		#[source]
		source: io::Error,
	},

	/// The capture-analysis engine could not be started.
	#[error("failed to start {program}: {source}")]
	Spawn {
		/// Program that was executed.
		program: String,
		/// Underlying I/O failure.
		#[source]
		source: io::Error,
	},

	/// The capture could not be dissected.
	#[error("{}: {reason}", .path.display())]
	Dissect {
		/// Capture that failed.
		path: PathBuf,
		/// Description reported by the engine or the decoder.
		reason: String,
	},

	/// A hex-encoded payload could not be decoded.
	#[error("invalid hex in {field}: {source}")]
	Hex {
		/// Name of the field holding the payload.
		field: &'static str,
		/// Decoder failure.
		#[source]
		source: hex::FromHexError,
	},

	/// A payload field decoded to zero bytes.
	#[error("empty payload in {field}")]
	EmptyPayload {
		/// Name of the field holding the payload.
		field: &'static str,
	},

	/// A frame carrying a fingerprint lacks the field it was computed from.
	#[error("missing field {field}")]
	MissingField {
		/// Name of the absent field.
		field: &'static str,
	},

	/// None of the raw handshake candidates starts with the expected type.
	#[error("no raw handshake candidate starts with {marker}")]
	NoCandidate {
		/// Hex marker that was searched for.
		marker: &'static str,
	},

	/// A frame's certificates and fingerprints cannot be paired.
	#[error("{certificates} certificate(s) but {fingerprints} fingerprint(s)")]
	CountMismatch {
		/// Certificates carried by the frame.
		certificates: usize,
		/// Fingerprints carried by the frame.
		fingerprints: usize,
	},

	/// A handshake header was shorter than its fixed fields.
	#[error("truncated {field}")]
	Truncated {
		/// Name of the truncated field.
		field: &'static str,
	},

	/// Every input failed for one output, so nothing was written.
	#[error("all {inputs} input(s) failed")]
	NoUsableInput {
		/// Number of inputs attempted.
		inputs: usize,
	},
}

/// Invalid invocation, detected before any input is touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum UsageError {
	/// None of the output files was requested.
	#[error("please specify at least one output file with --ja4, --ja4s or --ja4x")]
	NoOutputs,

	/// No capture files were given.
	#[error("no PCAP files provided")]
	NoInputs,
}

impl UsageError {
	/// Process exit status for this condition.
	#[must_use]
	pub fn exit_code(self) -> u8 {
		match self {
			Self::NoOutputs => 1,
			Self::NoInputs => 2,
		}
	}
}

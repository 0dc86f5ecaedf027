/* src/extract.rs */

//! Per-frame record extraction, one extractor per fingerprint.
//!
//! Frames that match the display filter but carry no fingerprint are
//! housekeeping traffic and yield no record. Frames whose payload cannot be
//! decoded are logged and skipped without stopping the capture.

use std::path::Path;

use tracing::{debug, trace, warn};

use crate::Error;
use crate::capture::{CaptureSource, Frame, ReadOptions};
use crate::handshake::{self, HandshakeType};
use crate::record::{CertificateRecord, ClientRecord, ServerRecord, TCP};
use crate::render::Fixture;

const CERTIFICATE: &str = "tls.handshake.certificate";
const HANDSHAKE: &str = "tls.handshake";
const JA4: &str = "tls.handshake.ja4";
const JA4S: &str = "ja4.ja4s";
const JA4X: &str = "ja4.ja4x";

/// Turns matching frames into records of one fingerprint variant.
pub trait Extractor {
	/// Record produced by this extractor.
	type Record: Fixture;

	/// How captures must be read for this extractor.
	fn options(&self) -> ReadOptions;

	/// Records carried by `frame`; empty when the frame has none.
	///
	/// # Errors
	///
	/// Returns an error when the frame carries a fingerprint but its
	/// payload cannot be recovered.
	fn extract<F: Frame>(&self, frame: &F, source_file: &str) -> Result<Vec<Self::Record>, Error>;
}

/// Decode hex wire bytes, ignoring `:` separators and whitespace.
///
/// # Errors
///
/// Returns [`Error::Hex`] for odd-length or non-hex input and
/// [`Error::EmptyPayload`] when nothing remains to decode.
///
/// ```
/// let cert = ja4_fixtures::decode_payload("30:82:01:0a", "certificate").unwrap();
/// assert_eq!(cert, [0x30, 0x82, 0x01, 0x0a]);
/// ```
pub fn decode_payload(text: &str, field: &'static str) -> Result<Vec<u8>, Error> {
	let digits: String = text
		.chars()
		.filter(|c| *c != ':' && !c.is_ascii_whitespace())
		.collect();
	let payload = hex::decode(digits).map_err(|source| Error::Hex { field, source })?;
	if payload.is_empty() {
		return Err(Error::EmptyPayload { field });
	}
	Ok(payload)
}

/// Extracts DER certificates paired with their JA4X fingerprints.
#[derive(Debug, Clone, Copy, Default)]
pub struct CertificateExtractor;

impl Extractor for CertificateExtractor {
	type Record = CertificateRecord;

	fn options(&self) -> ReadOptions {
		ReadOptions {
			display_filter: "tls.handshake",
			include_raw: false,
		}
	}

	fn extract<F: Frame>(&self, frame: &F, source_file: &str) -> Result<Vec<CertificateRecord>, Error> {
		if !frame.has_layer("tls") {
			return Ok(Vec::new());
		}
		let (Some(certificates), Some(fingerprints)) = (frame.field(CERTIFICATE), frame.field(JA4X))
		else {
			trace!(frame = frame.number(), "no certificate fingerprint");
			return Ok(Vec::new());
		};

		let certificates = certificates.candidates();
		let fingerprints = fingerprints.candidates();
		if certificates.len() != fingerprints.len() {
			return Err(Error::CountMismatch {
				certificates: certificates.len(),
				fingerprints: fingerprints.len(),
			});
		}
		certificates
			.iter()
			.zip(fingerprints)
			.map(|(certificate, fingerprint)| {
				Ok(CertificateRecord {
					source_file: source_file.to_owned(),
					frame_index: frame.number(),
					payload: decode_payload(certificate, CERTIFICATE)?,
					fingerprint: fingerprint.clone(),
				})
			})
			.collect()
	}
}

/// Extracts ServerHello messages paired with their JA4S fingerprints.
#[derive(Debug, Clone, Copy, Default)]
pub struct ServerHelloExtractor;

impl Extractor for ServerHelloExtractor {
	type Record = ServerRecord;

	fn options(&self) -> ReadOptions {
		ReadOptions {
			display_filter: "tls.handshake.type == 2",
			include_raw: true,
		}
	}

	fn extract<F: Frame>(&self, frame: &F, source_file: &str) -> Result<Vec<ServerRecord>, Error> {
		let found = extract_hello(frame, HandshakeType::ServerHello, JA4S)?;
		Ok(found
			.map(|(payload, fingerprint)| ServerRecord {
				source_file: source_file.to_owned(),
				frame_index: frame.number(),
				payload,
				protocol_tag: TCP.to_owned(),
				fingerprint,
			})
			.into_iter()
			.collect())
	}
}

/// Extracts ClientHello messages paired with their JA4 fingerprints.
///
/// The JA4 value hangs off the handshake node itself, unlike JA4S which
/// comes from the plugin's own protocol tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClientHelloExtractor;

impl Extractor for ClientHelloExtractor {
	type Record = ClientRecord;

	fn options(&self) -> ReadOptions {
		ReadOptions {
			display_filter: "tls.handshake.type == 1",
			include_raw: true,
		}
	}

	fn extract<F: Frame>(&self, frame: &F, source_file: &str) -> Result<Vec<ClientRecord>, Error> {
		let found = extract_hello(frame, HandshakeType::ClientHello, JA4)?;
		Ok(found
			.map(|(payload, fingerprint)| ClientRecord {
				source_file: source_file.to_owned(),
				frame_index: frame.number(),
				payload,
				protocol_tag: TCP.to_owned(),
				fingerprint,
			})
			.into_iter()
			.collect())
	}
}

fn extract_hello<F: Frame>(
	frame: &F,
	kind: HandshakeType,
	fingerprint_field: &'static str,
) -> Result<Option<(Vec<u8>, String)>, Error> {
	if !frame.has_layer("tls") {
		return Ok(None);
	}
	let Some(fingerprint) = frame.field(fingerprint_field) else {
		trace!(frame = frame.number(), field = fingerprint_field, "no fingerprint");
		return Ok(None);
	};
	let raw = frame
		.raw_field(HANDSHAKE)
		.ok_or(Error::MissingField { field: HANDSHAKE })?;
	let payload = decode_payload(handshake::select_candidate(&raw, kind)?, HANDSHAKE)?;

	match handshake::inspect(&payload) {
		Ok(header) if header.msg_type != kind.code() => warn!(
			frame = frame.number(),
			found = header.msg_type,
			expected = kind.code(),
			"raw handshake has an unexpected type"
		),
		Ok(header) if !header.is_complete() => warn!(
			frame = frame.number(),
			declared = header.length,
			captured = header.captured,
			"raw handshake is shorter than its declared length"
		),
		Ok(_) => {}
		Err(err) => warn!(frame = frame.number(), error = %err, "raw handshake too short to inspect"),
	}

	Ok(Some((payload, fingerprint.first().to_owned())))
}

/// Extract every record of one capture, in frame order.
///
/// # Errors
///
/// Returns an error when the capture cannot be opened or the frame stream
/// breaks. Records already gathered from that capture are discarded.
pub fn extract_file<S, E>(source: &S, extractor: &E, path: &Path) -> Result<Vec<E::Record>, Error>
where
	S: CaptureSource,
	E: Extractor,
{
	let label = <E::Record as Fixture>::LAYOUT.label;
	let file = path.file_name().map_or_else(
		|| path.display().to_string(),
		|name| name.to_string_lossy().into_owned(),
	);

	let mut records = Vec::new();
	let mut failed = 0usize;
	for frame in source.open(path, extractor.options())? {
		let frame = frame?;
		match extractor.extract(&frame, &file) {
			Ok(found) => records.extend(found),
			Err(err) => {
				failed += 1;
				warn!(
					fingerprint = label,
					capture = %file,
					frame = frame.number(),
					error = %err,
					"skipping frame"
				);
			}
		}
	}
	debug!(
		fingerprint = label,
		capture = %file,
		records = records.len(),
		failed_frames = failed,
		"capture processed"
	);
	Ok(records)
}

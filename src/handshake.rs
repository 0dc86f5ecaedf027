/* src/handshake.rs */

//! Handshake message framing.
//!
//! Only the 4-byte header (type + 24-bit length) is looked at. Fingerprint
//! computation needs the full message and is not done here.

use crate::Error;
use crate::capture::FieldValue;

/// Handshake message types with a fingerprint defined over them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeType {
	/// ClientHello (`0x01`).
	ClientHello,
	/// ServerHello (`0x02`).
	ServerHello,
}

impl HandshakeType {
	/// Wire value of the type byte.
	#[must_use]
	pub fn code(self) -> u8 {
		match self {
			Self::ClientHello => 0x01,
			Self::ServerHello => 0x02,
		}
	}

	/// Hex spelling of [`Self::code`], as it prefixes raw handshake bytes.
	#[must_use]
	pub fn marker(self) -> &'static str {
		match self {
			Self::ClientHello => "01",
			Self::ServerHello => "02",
		}
	}
}

/// Header of a decoded handshake message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
	/// Handshake type byte.
	pub msg_type: u8,
	/// Body length declared by the header.
	pub length: u32,
	/// Body bytes actually present after the header.
	pub captured: usize,
}

impl Header {
	/// Whether the captured body covers the declared length.
	#[must_use]
	pub fn is_complete(&self) -> bool {
		self.captured >= self.length as usize
	}
}

/// Read the handshake header at the start of `payload`.
///
/// # Errors
///
/// Returns [`Error::Truncated`] when fewer than four bytes are available.
///
/// ```
/// let header = ja4_fixtures::inspect(&[0x02, 0x00, 0x00, 0x02, 0x03, 0x03]).unwrap();
/// assert_eq!(header.msg_type, 0x02);
/// assert!(header.is_complete());
/// ```
pub fn inspect(payload: &[u8]) -> Result<Header, Error> {
	let mut r = Reader::new(payload);
	let msg_type = r.read_u8("handshake type")?;
	let length = r.read_u24("handshake length")?;
	Ok(Header {
		msg_type,
		length,
		captured: r.remaining(),
	})
}

/// Pick the raw handshake bytes belonging to a message of type `kind`.
///
/// Reassembled segments can expose several overlapping raw candidates for
/// one frame. A single value is taken as-is; from a list, the first entry
/// starting with the type marker wins.
///
/// # Errors
///
/// Returns [`Error::NoCandidate`] when no list entry carries the marker.
pub fn select_candidate(value: &FieldValue, kind: HandshakeType) -> Result<&str, Error> {
	match value {
		FieldValue::One(raw) => Ok(raw.as_str()),
		FieldValue::Many(candidates) => candidates
			.iter()
			.find(|raw| has_marker(raw, kind.marker()))
			.map(String::as_str)
			.ok_or(Error::NoCandidate {
				marker: kind.marker(),
			}),
	}
}

fn has_marker(raw: &str, marker: &str) -> bool {
	raw.get(..marker.len())
		.is_some_and(|prefix| prefix.eq_ignore_ascii_case(marker))
}

/// Bounds-checked cursor over a decoded payload.
struct Reader<'a> {
	data: &'a [u8],
	pos: usize,
}

impl<'a> Reader<'a> {
	fn new(data: &'a [u8]) -> Self {
		Self { data, pos: 0 }
	}

	fn remaining(&self) -> usize {
		self.data.len() - self.pos
	}

	fn read_u8(&mut self, field: &'static str) -> Result<u8, Error> {
		let val = *self.data.get(self.pos).ok_or(Error::Truncated { field })?;
		self.pos += 1;
		Ok(val)
	}

	fn read_u24(&mut self, field: &'static str) -> Result<u32, Error> {
		let bytes = self
			.data
			.get(self.pos..self.pos + 3)
			.ok_or(Error::Truncated { field })?;
		self.pos += 3;
		Ok(u32::from_be_bytes([0, bytes[0], bytes[1], bytes[2]]))
	}
}

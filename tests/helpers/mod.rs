/* tests/helpers/mod.rs */
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use ja4_fixtures::{CaptureSource, Error, FieldValue, Frame, ReadOptions};

/// Frame with hand-picked fields.
#[derive(Debug, Clone)]
pub(crate) struct TestFrame {
	number: u64,
	layers: Vec<&'static str>,
	fields: HashMap<&'static str, FieldValue>,
	raw: HashMap<&'static str, FieldValue>,
}

impl TestFrame {
	/// A TCP frame with a dissected TLS layer and no fields.
	pub(crate) fn tls(number: u64) -> Self {
		Self {
			number,
			layers: vec!["frame", "eth", "ip", "tcp", "tls"],
			fields: HashMap::new(),
			raw: HashMap::new(),
		}
	}

	pub(crate) fn without_tls(mut self) -> Self {
		self.layers.retain(|layer| *layer != "tls");
		self
	}

	pub(crate) fn with_field(mut self, name: &'static str, value: &str) -> Self {
		self.fields.insert(name, FieldValue::One(value.to_owned()));
		self
	}

	pub(crate) fn with_fields(mut self, name: &'static str, values: &[&str]) -> Self {
		self.fields.insert(name, many(values));
		self
	}

	pub(crate) fn with_raw(mut self, name: &'static str, value: &str) -> Self {
		self.raw.insert(name, FieldValue::One(value.to_owned()));
		self
	}

	pub(crate) fn with_raws(mut self, name: &'static str, values: &[&str]) -> Self {
		self.raw.insert(name, many(values));
		self
	}
}

fn many(values: &[&str]) -> FieldValue {
	FieldValue::Many(values.iter().map(|v| (*v).to_owned()).collect())
}

impl Frame for TestFrame {
	fn number(&self) -> u64 {
		self.number
	}

	fn has_layer(&self, layer: &str) -> bool {
		self.layers.iter().any(|known| *known == layer)
	}

	fn field(&self, name: &str) -> Option<FieldValue> {
		self.fields.get(name).cloned()
	}

	fn raw_field(&self, name: &str) -> Option<FieldValue> {
		self.raw.get(name).cloned()
	}
}

/// Contents of one in-memory capture. `Err` entries break the frame stream.
pub(crate) type Frames = Vec<Result<TestFrame, &'static str>>;

/// Captures served from memory. Unknown paths behave like missing files.
#[derive(Debug, Default)]
pub(crate) struct MemorySource {
	captures: HashMap<PathBuf, Frames>,
	failing_filters: Vec<&'static str>,
	opened: RefCell<Vec<(PathBuf, ReadOptions)>>,
}

impl MemorySource {
	pub(crate) fn new() -> Self {
		Self::default()
	}

	pub(crate) fn capture(mut self, path: &str, frames: Vec<TestFrame>) -> Self {
		self.captures
			.insert(PathBuf::from(path), frames.into_iter().map(Ok).collect());
		self
	}

	pub(crate) fn broken_capture(mut self, path: &str, frames: Frames) -> Self {
		self.captures.insert(PathBuf::from(path), frames);
		self
	}

	/// Refuse to dissect any capture with this display filter.
	pub(crate) fn failing_filter(mut self, filter: &'static str) -> Self {
		self.failing_filters.push(filter);
		self
	}

	pub(crate) fn opened(&self) -> Vec<(PathBuf, ReadOptions)> {
		self.opened.borrow().clone()
	}
}

impl CaptureSource for MemorySource {
	type Frame = TestFrame;
	type Frames = std::vec::IntoIter<Result<TestFrame, Error>>;

	fn open(&self, path: &Path, options: ReadOptions) -> Result<Self::Frames, Error> {
		self.opened.borrow_mut().push((path.to_owned(), options));
		let Some(frames) = self.captures.get(path) else {
			return Err(Error::Io {
				path: path.to_owned(),
				source: io::Error::from(io::ErrorKind::NotFound),
			});
		};
		if self.failing_filters.contains(&options.display_filter) {
			return Err(Error::Dissect {
				path: path.to_owned(),
				reason: format!("invalid display filter {}", options.display_filter),
			});
		}
		let frames: Vec<_> = frames
			.iter()
			.map(|frame| {
				frame.clone().map_err(|reason| Error::Dissect {
					path: path.to_owned(),
					reason: reason.to_owned(),
				})
			})
			.collect();
		Ok(frames.into_iter())
	}
}

/// Raw ServerHello: TLS 1.2, one cipher suite, no extensions.
pub(crate) fn server_hello_hex() -> String {
	let mut body = Vec::new();
	body.extend_from_slice(&[0x03, 0x03]); // legacy version
	body.extend_from_slice(&[0x5A; 32]); // random
	body.push(0x00); // session ID length
	body.extend_from_slice(&[0xC0, 0x2F]); // cipher suite
	body.push(0x00); // compression
	hex::encode(handshake(0x02, &body))
}

/// Raw ClientHello: TLS 1.2, one cipher suite, no extensions.
pub(crate) fn client_hello_hex() -> String {
	let mut body = Vec::new();
	body.extend_from_slice(&[0x03, 0x03]); // legacy version
	body.extend_from_slice(&[0u8; 32]); // random
	body.push(0x00); // session ID length
	body.extend_from_slice(&[0x00, 0x02, 0x13, 0x01]); // cipher suites
	body.extend_from_slice(&[0x01, 0x00]); // compression
	hex::encode(handshake(0x01, &body))
}

/// Raw Certificate handshake that often shares a segment with a ServerHello.
pub(crate) fn certificate_handshake_hex() -> String {
	hex::encode(handshake(0x0B, &[0x00, 0x00, 0x00]))
}

fn handshake(msg_type: u8, body: &[u8]) -> Vec<u8> {
	let mut msg = vec![msg_type];
	let len = body.len() as u32;
	msg.push((len >> 16) as u8);
	msg.push((len >> 8) as u8);
	msg.push(len as u8);
	msg.extend_from_slice(body);
	msg
}

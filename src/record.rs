/* src/record.rs */

//! Records harvested from captures.

use crate::render::{FieldDecl, Fixture, Layout, Literal};

/// Protocol tag of handshakes carried over TCP.
pub(crate) const TCP: &str = "t";

const HELLO_FIELDS: &[FieldDecl] = &[
	FieldDecl {
		name: "file",
		ty: "&'static str",
	},
	FieldDecl {
		name: "index",
		ty: "u64",
	},
	FieldDecl {
		name: "hello",
		ty: "&'static [u8]",
	},
	FieldDecl {
		name: "protocol",
		ty: "&'static str",
	},
	FieldDecl {
		name: "fingerprint",
		ty: "&'static str",
	},
];

const CERTIFICATE_FIELDS: &[FieldDecl] = &[
	FieldDecl {
		name: "file",
		ty: "&'static str",
	},
	FieldDecl {
		name: "index",
		ty: "u64",
	},
	FieldDecl {
		name: "cert",
		ty: "&'static [u8]",
	},
	FieldDecl {
		name: "fingerprint",
		ty: "&'static str",
	},
];

/// A ClientHello and its expected JA4 fingerprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientRecord {
	/// File name of the originating capture.
	pub source_file: String,
	/// Frame number within the capture.
	pub frame_index: u64,
	/// Handshake message bytes, starting with the type byte `0x01`.
	pub payload: Vec<u8>,
	/// Transport the handshake was seen on.
	pub protocol_tag: String,
	/// Expected fingerprint; empty when the dissector computed none.
	pub fingerprint: String,
}

/// A ServerHello and its expected JA4S fingerprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerRecord {
	/// File name of the originating capture.
	pub source_file: String,
	/// Frame number within the capture.
	pub frame_index: u64,
	/// Handshake message bytes, starting with the type byte `0x02`.
	pub payload: Vec<u8>,
	/// Transport the handshake was seen on.
	pub protocol_tag: String,
	/// Expected fingerprint; empty when the dissector computed none.
	pub fingerprint: String,
}

/// A DER certificate and its expected JA4X fingerprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateRecord {
	/// File name of the originating capture.
	pub source_file: String,
	/// Frame number within the capture.
	pub frame_index: u64,
	/// DER-encoded certificate.
	pub payload: Vec<u8>,
	/// Expected fingerprint; empty when the dissector computed none.
	pub fingerprint: String,
}

impl Fixture for ClientRecord {
	const LAYOUT: Layout = Layout {
		label: "JA4",
		record_type: "Ja4Record",
		table: "JA4_RECORDS",
		test_name: "ja4_records",
		oracle: "ja4",
		fallible: true,
		payload_field: "hello",
		fields: HELLO_FIELDS,
	};

	fn literals(&self) -> Vec<Literal<'_>> {
		vec![
			Literal::Str(&self.source_file),
			Literal::Int(self.frame_index),
			Literal::Bytes(&self.payload),
			Literal::Str(&self.protocol_tag),
			Literal::Str(&self.fingerprint),
		]
	}
}

impl Fixture for ServerRecord {
	const LAYOUT: Layout = Layout {
		label: "JA4S",
		record_type: "Ja4sRecord",
		table: "JA4S_RECORDS",
		test_name: "ja4s_records",
		oracle: "ja4s",
		fallible: true,
		payload_field: "hello",
		fields: HELLO_FIELDS,
	};

	fn literals(&self) -> Vec<Literal<'_>> {
		vec![
			Literal::Str(&self.source_file),
			Literal::Int(self.frame_index),
			Literal::Bytes(&self.payload),
			Literal::Str(&self.protocol_tag),
			Literal::Str(&self.fingerprint),
		]
	}
}

impl Fixture for CertificateRecord {
	const LAYOUT: Layout = Layout {
		label: "JA4X",
		record_type: "Ja4xRecord",
		table: "JA4X_RECORDS",
		test_name: "ja4x_records",
		oracle: "ja4x",
		fallible: false,
		payload_field: "cert",
		fields: CERTIFICATE_FIELDS,
	};

	fn literals(&self) -> Vec<Literal<'_>> {
		vec![
			Literal::Str(&self.source_file),
			Literal::Int(self.frame_index),
			Literal::Bytes(&self.payload),
			Literal::Str(&self.fingerprint),
		]
	}
}

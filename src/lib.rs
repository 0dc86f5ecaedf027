/* src/lib.rs */

//! Test fixture generator for the JA4 family of TLS fingerprints.
//!
//! Packet captures annotated by Wireshark (with the JA4 plugin) already
//! carry the expected fingerprint next to every handshake. This crate
//! harvests those pairs and renders them into Rust test files:
//!
//! - **JA4** from ClientHello messages via [`ClientHelloExtractor`].
//! - **JA4S** from ServerHello messages via [`ServerHelloExtractor`].
//! - **JA4X** from certificates via [`CertificateExtractor`].
//!
//! Captures are read through the [`CaptureSource`] trait; [`Tshark`] is the
//! production implementation. The [`Driver`] ties extraction and rendering
//! together for a validated [`Plan`].

mod capture;
mod config;
mod driver;
mod error;
mod extract;
mod handshake;
mod record;
pub mod render;

use core::fmt;

pub use crate::capture::{CaptureSource, EkFrame, EkFrames, FieldValue, Frame, ReadOptions, Tshark};
pub use crate::config::Config;
pub use crate::driver::{Driver, OutputReport, Plan, Summary};
pub use crate::error::{Error, UsageError};
pub use crate::extract::{
	CertificateExtractor, ClientHelloExtractor, Extractor, ServerHelloExtractor, decode_payload,
	extract_file,
};
pub use crate::handshake::{HandshakeType, Header, inspect, select_candidate};
pub use crate::record::{CertificateRecord, ClientRecord, ServerRecord};

/// One of the fingerprint algorithms a fixture file can be generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Variant {
	/// Client fingerprint computed over a ClientHello.
	Ja4,
	/// Server fingerprint computed over a ServerHello.
	Ja4s,
	/// Certificate fingerprint computed over a DER certificate.
	Ja4x,
}

impl Variant {
	/// All variants, in generation order.
	pub const ALL: [Self; 3] = [Self::Ja4, Self::Ja4s, Self::Ja4x];

	/// Upper-case name used in messages.
	#[must_use]
	pub fn label(self) -> &'static str {
		match self {
			Self::Ja4 => "JA4",
			Self::Ja4s => "JA4S",
			Self::Ja4x => "JA4X",
		}
	}
}

impl fmt::Display for Variant {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.label())
	}
}

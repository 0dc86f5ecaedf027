/* src/capture.rs */

//! Capture reading.
//!
//! Dissection is delegated to `tshark`. With `-T ek` it prints one
//! newline-delimited JSON document per frame, where field `a.b.c` of the
//! protocol `a` appears under the key `a_a_b_c` and, with `-x`, its wire
//! bytes under `a_a_b_c_raw`.

use std::fs::File;
use std::io::{BufRead, BufReader, Lines, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, Stdio};
use std::thread::{self, JoinHandle};

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::Error;

/// Value of a dissected field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
	/// The field occurs once in the frame.
	One(String),
	/// The field occurs several times, in dissection order.
	Many(Vec<String>),
}

impl FieldValue {
	/// First occurrence of the field.
	#[must_use]
	pub fn first(&self) -> &str {
		match self {
			Self::One(value) => value.as_str(),
			Self::Many(values) => values.first().map_or("", String::as_str),
		}
	}

	/// Every occurrence of the field.
	#[must_use]
	pub fn candidates(&self) -> &[String] {
		match self {
			Self::One(value) => core::slice::from_ref(value),
			Self::Many(values) => values,
		}
	}

	fn from_values(mut values: Vec<String>) -> Option<Self> {
		match values.len() {
			0 => None,
			1 => values.pop().map(Self::One),
			_ => Some(Self::Many(values)),
		}
	}
}

/// A dissected frame whose fields are looked up by their Wireshark name.
///
/// Absence of a field is not an error: `None` means the frame does not carry it.
pub trait Frame {
	/// 1-based position of the frame in its capture.
	fn number(&self) -> u64;

	/// Whether the given protocol was dissected in this frame.
	fn has_layer(&self, layer: &str) -> bool;

	/// Display value of a field, such as `tls.handshake.type`.
	fn field(&self, name: &str) -> Option<FieldValue>;

	/// Hex-encoded wire bytes of a field, if raw access was requested.
	fn raw_field(&self, name: &str) -> Option<FieldValue>;

	/// Whether [`Frame::field`] would return a value.
	fn has_field(&self, name: &str) -> bool {
		self.field(name).is_some()
	}
}

/// How a capture should be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadOptions {
	/// Display filter restricting the frames visited.
	pub display_filter: &'static str,
	/// Expose wire bytes through [`Frame::raw_field`].
	pub include_raw: bool,
}

/// Opens captures as a lazy, single-pass stream of frames.
pub trait CaptureSource {
	/// Frame type produced by this source.
	type Frame: Frame;
	/// Iterator over the frames of one capture.
	type Frames: Iterator<Item = Result<Self::Frame, Error>>;

	/// Start reading `path`.
	///
	/// # Errors
	///
	/// Returns [`Error::Io`] when the capture cannot be read and
	/// [`Error::Spawn`] when the dissector cannot be started.
	fn open(&self, path: &Path, options: ReadOptions) -> Result<Self::Frames, Error>;
}

/// [`CaptureSource`] backed by the `tshark` command line tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tshark {
	program: PathBuf,
}

impl Tshark {
	/// Use the given `tshark` executable.
	pub fn new(program: impl Into<PathBuf>) -> Self {
		Self {
			program: program.into(),
		}
	}

	/// Command line used to read `path`.
	#[must_use]
	pub fn command(&self, path: &Path, options: ReadOptions) -> Command {
		let mut cmd = Command::new(&self.program);
		cmd.arg("-n")
			.arg("-r")
			.arg(path)
			.arg("-Y")
			.arg(options.display_filter)
			.args(["-T", "ek"]);
		if options.include_raw {
			cmd.arg("-x");
		}
		cmd.stdin(Stdio::null())
			.stdout(Stdio::piped())
			.stderr(Stdio::piped());
		cmd
	}
}

impl Default for Tshark {
	fn default() -> Self {
		Self::new("tshark")
	}
}

impl CaptureSource for Tshark {
	type Frame = EkFrame;
	type Frames = EkFrames;

	fn open(&self, path: &Path, options: ReadOptions) -> Result<EkFrames, Error> {
		File::open(path).map_err(|source| Error::Io {
			path: path.to_owned(),
			source,
		})?;

		let mut child = self
			.command(path, options)
			.spawn()
			.map_err(|source| Error::Spawn {
				program: self.program.display().to_string(),
				source,
			})?;
		debug!(
			capture = %path.display(),
			filter = options.display_filter,
			raw = options.include_raw,
			"started tshark"
		);

		let Some(stdout) = child.stdout.take() else {
			let _ = child.kill();
			let _ = child.wait();
			return Err(Error::Dissect {
				path: path.to_owned(),
				reason: "tshark output was not captured".to_owned(),
			});
		};
		// Drained on its own thread so a chatty stderr never blocks stdout.
		let stderr = child.stderr.take().map(|mut pipe| {
			thread::spawn(move || {
				let mut text = String::new();
				if let Err(err) = pipe.read_to_string(&mut text) {
					debug!(error = %err, "tshark diagnostics could not be read");
				}
				text
			})
		});

		Ok(EkFrames {
			path: path.to_owned(),
			lines: BufReader::new(stdout).lines(),
			child: Some(child),
			stderr,
		})
	}
}

/// Frames streamed from a running `tshark` process.
///
/// The process is reaped on exhaustion and killed if the iterator is
/// dropped early.
#[derive(Debug)]
pub struct EkFrames {
	path: PathBuf,
	lines: Lines<BufReader<ChildStdout>>,
	child: Option<Child>,
	stderr: Option<JoinHandle<String>>,
}

impl EkFrames {
	fn finish(&mut self) -> Result<(), Error> {
		let Some(mut child) = self.child.take() else {
			return Ok(());
		};
		let status = child.wait().map_err(|source| Error::Io {
			path: self.path.clone(),
			source,
		})?;
		let stderr = self
			.stderr
			.take()
			.and_then(|handle| handle.join().ok())
			.unwrap_or_default();
		if status.success() {
			return Ok(());
		}
		let reason = match stderr.trim() {
			"" => format!("tshark exited with {status}"),
			text => text.to_owned(),
		};
		Err(Error::Dissect {
			path: self.path.clone(),
			reason,
		})
	}

	fn stop(&mut self) {
		if let Some(mut child) = self.child.take() {
			let _ = child.kill();
			let _ = child.wait();
		}
	}

	fn fail(&mut self, error: Error) -> Option<Result<EkFrame, Error>> {
		self.stop();
		Some(Err(error))
	}
}

impl Iterator for EkFrames {
	type Item = Result<EkFrame, Error>;

	fn next(&mut self) -> Option<Self::Item> {
		self.child.as_ref()?;
		loop {
			let line = match self.lines.next() {
				Some(Ok(line)) => line,
				Some(Err(source)) => {
					let path = self.path.clone();
					return self.fail(Error::Io { path, source });
				}
				None => return self.finish().err().map(Err),
			};
			match EkFrame::parse(&line) {
				Ok(Some(frame)) => return Some(Ok(frame)),
				Ok(None) => {}
				Err(reason) => {
					let path = self.path.clone();
					return self.fail(Error::Dissect { path, reason });
				}
			}
		}
	}
}

impl Drop for EkFrames {
	fn drop(&mut self) {
		self.stop();
	}
}

#[derive(Deserialize)]
struct Document {
	layers: Option<Map<String, Value>>,
}

/// One frame of `tshark -T ek` output.
#[derive(Debug, Clone, PartialEq)]
pub struct EkFrame {
	number: u64,
	layers: Map<String, Value>,
}

impl EkFrame {
	/// Build a frame from the `layers` object of an EK document.
	///
	/// Returns `None` when the layers lack `frame.number`.
	#[must_use]
	pub fn from_layers(layers: Map<String, Value>) -> Option<Self> {
		let number = lookup(&layers, &ek_key("frame.number"))?
			.first()
			.parse()
			.ok()?;
		Some(Self { number, layers })
	}

	/// Parse one output line. Bulk index lines yield `Ok(None)`.
	fn parse(line: &str) -> Result<Option<Self>, String> {
		let line = line.trim();
		if line.is_empty() {
			return Ok(None);
		}
		let document: Document =
			serde_json::from_str(line).map_err(|e| format!("invalid EK document: {e}"))?;
		let Some(layers) = document.layers else {
			return Ok(None);
		};
		Self::from_layers(layers)
			.map(Some)
			.ok_or_else(|| "EK document without frame.number".to_owned())
	}
}

impl Frame for EkFrame {
	fn number(&self) -> u64 {
		self.number
	}

	fn has_layer(&self, layer: &str) -> bool {
		self.layers.contains_key(layer)
	}

	fn field(&self, name: &str) -> Option<FieldValue> {
		lookup(&self.layers, &ek_key(name))
	}

	fn raw_field(&self, name: &str) -> Option<FieldValue> {
		lookup(&self.layers, &format!("{}_raw", ek_key(name)))
	}
}

fn ek_key(name: &str) -> String {
	let protocol = name.split('.').next().unwrap_or(name);
	format!("{protocol}_{}", name.replace('.', "_"))
}

// Plugin fields may be attached under another protocol's layer, so every
// layer is searched. A layer is an array when one frame holds several PDUs.
fn lookup(layers: &Map<String, Value>, key: &str) -> Option<FieldValue> {
	let mut values = Vec::new();
	for layer in layers.values() {
		let objects = match layer {
			Value::Array(items) => items.as_slice(),
			other => core::slice::from_ref(other),
		};
		for object in objects.iter().filter_map(Value::as_object) {
			if let Some(value) = object.get(key) {
				collect_strings(value, &mut values);
			}
		}
	}
	FieldValue::from_values(values)
}

fn collect_strings(value: &Value, out: &mut Vec<String>) {
	match value {
		Value::String(text) => out.push(text.clone()),
		Value::Array(items) => {
			for item in items {
				collect_strings(item, out);
			}
		}
		Value::Null | Value::Object(_) => {}
		Value::Bool(_) | Value::Number(_) => out.push(value.to_string()),
	}
}

/* src/driver.rs */

//! Output generation across all input captures.

use std::fs;
use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, info};

use crate::Variant;
use crate::capture::CaptureSource;
use crate::config::Config;
use crate::error::{Error, UsageError};
use crate::extract::{
	CertificateExtractor, ClientHelloExtractor, Extractor, ServerHelloExtractor, extract_file,
};
use crate::render::{self, Fixture};

/// Validated set of outputs and inputs for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
	outputs: Vec<(Variant, PathBuf)>,
	inputs: Vec<PathBuf>,
}

impl Plan {
	/// Check that at least one output and one input were requested.
	///
	/// Outputs are ordered by variant; a repeated variant keeps its last path.
	///
	/// # Errors
	///
	/// Returns [`UsageError::NoOutputs`] or [`UsageError::NoInputs`].
	pub fn new(
		outputs: impl IntoIterator<Item = (Variant, PathBuf)>,
		inputs: Vec<PathBuf>,
	) -> Result<Self, UsageError> {
		let mut outputs: Vec<_> = outputs.into_iter().collect();
		outputs.sort_by_key(|(variant, _)| *variant);
		outputs.reverse();
		outputs.dedup_by_key(|(variant, _)| *variant);
		outputs.reverse();

		if outputs.is_empty() {
			return Err(UsageError::NoOutputs);
		}
		if inputs.is_empty() {
			return Err(UsageError::NoInputs);
		}
		Ok(Self { outputs, inputs })
	}

	/// Requested outputs, in generation order.
	#[must_use]
	pub fn outputs(&self) -> &[(Variant, PathBuf)] {
		&self.outputs
	}

	/// Input captures, in argument order.
	#[must_use]
	pub fn inputs(&self) -> &[PathBuf] {
		&self.inputs
	}
}

/// Result of generating one output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
	/// Records written to the file.
	pub records: usize,
	/// Inputs that could not be processed.
	pub failed_inputs: usize,
}

/// Outcome for one requested output.
#[derive(Debug)]
pub struct OutputReport {
	/// Fingerprint variant of the output.
	pub variant: Variant,
	/// Destination file.
	pub path: PathBuf,
	/// What happened.
	pub outcome: Result<Summary, Error>,
}

/// Runs extraction and rendering for every output of a [`Plan`].
#[derive(Debug)]
pub struct Driver<S> {
	source: S,
	oracle_path: String,
	progress: bool,
}

impl<S: CaptureSource> Driver<S> {
	/// Driver reading captures from `source`.
	pub fn new(source: S, config: &Config) -> Self {
		Self {
			source,
			oracle_path: config.oracle_path.clone(),
			progress: config.progress,
		}
	}

	/// Generate every output. One output failing does not stop the others.
	pub fn run(&self, plan: &Plan) -> Vec<OutputReport> {
		plan.outputs()
			.iter()
			.map(|(variant, path)| {
				let outcome = match variant {
					Variant::Ja4 => self.generate(&ClientHelloExtractor, path, plan.inputs()),
					Variant::Ja4s => self.generate(&ServerHelloExtractor, path, plan.inputs()),
					Variant::Ja4x => self.generate(&CertificateExtractor, path, plan.inputs()),
				};
				if let Err(err) = &outcome {
					error!(fingerprint = %variant, output = %path.display(), error = %err, "output failed");
				}
				OutputReport {
					variant: *variant,
					path: path.clone(),
					outcome,
				}
			})
			.collect()
	}

	fn generate<E: Extractor>(&self, extractor: &E, output: &Path, inputs: &[PathBuf]) -> Result<Summary, Error> {
		let label = <E::Record as Fixture>::LAYOUT.label;
		let progress = self.progress_bar(inputs.len(), label);

		let mut records = Vec::new();
		let mut failed_inputs = 0;
		for input in inputs {
			progress.set_message(input.display().to_string());
			match extract_file(&self.source, extractor, input) {
				Ok(found) => records.extend(found),
				Err(err) => {
					failed_inputs += 1;
					error!(fingerprint = label, capture = %input.display(), error = %err, "capture failed");
				}
			}
			progress.inc(1);
		}
		progress.finish_and_clear();

		if failed_inputs == inputs.len() {
			return Err(Error::NoUsableInput {
				inputs: inputs.len(),
			});
		}

		let text = render::render(&records, &self.oracle_path);
		fs::write(output, text).map_err(|source| Error::Io {
			path: output.to_owned(),
			source,
		})?;
		info!(
			fingerprint = label,
			output = %output.display(),
			records = records.len(),
			failed_inputs,
			"fixture file written"
		);
		Ok(Summary {
			records: records.len(),
			failed_inputs,
		})
	}

	fn progress_bar(&self, len: usize, label: &str) -> ProgressBar {
		if !self.progress {
			return ProgressBar::hidden();
		}
		let pb = ProgressBar::new(len as u64);
		if let Ok(style) = ProgressStyle::with_template("{prefix:>5} [{bar:30.green}] {pos}/{len} {wide_msg}") {
			pb.set_style(style.progress_chars("=> "));
		}
		pb.set_prefix(label.to_owned());
		pb
	}
}

/* src/main.rs */

//! `ja4-fixtures` command line entry point.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use ja4_fixtures::{Config, Driver, Plan, Tshark, Variant};

const LONG_ABOUT: &str = "Generate JA4, JA4S and JA4X test files from packet captures.

Wireshark's tshark must be installed together with the JA4 plugin, which
annotates every handshake with its expected fingerprint:
https://github.com/FoxIO-LLC/ja4/tree/main/wireshark#installing-the-plugin";

/// Generate JA4 fingerprint test fixtures from packet captures.
#[derive(Parser, Debug)]
#[command(name = "ja4-fixtures")]
#[command(version, about, long_about = LONG_ABOUT)]
struct Args {
	/// Output file for JA4 tests
	#[arg(long, value_name = "FILE")]
	ja4: Option<PathBuf>,

	/// Output file for JA4S tests
	#[arg(long, value_name = "FILE")]
	ja4s: Option<PathBuf>,

	/// Output file for JA4X tests
	#[arg(long, value_name = "FILE")]
	ja4x: Option<PathBuf>,

	/// tshark executable
	#[arg(long, value_name = "PATH", env = "JA4_FIXTURES_TSHARK", default_value = "tshark")]
	tshark: PathBuf,

	/// Module the generated tests import ja4, ja4s and ja4x from
	#[arg(long, value_name = "PATH", env = "JA4_FIXTURES_ORACLE_PATH", default_value = "super")]
	oracle_path: String,

	/// Do not draw progress bars
	#[arg(long)]
	no_progress: bool,

	/// Enable verbose output
	#[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
	verbose: u8,

	/// Input PCAP files
	#[arg(value_name = "PCAP")]
	pcap_files: Vec<PathBuf>,
}

impl Args {
	fn outputs(&self) -> Vec<(Variant, PathBuf)> {
		[
			(Variant::Ja4, &self.ja4),
			(Variant::Ja4s, &self.ja4s),
			(Variant::Ja4x, &self.ja4x),
		]
		.into_iter()
		.filter_map(|(variant, path)| path.clone().map(|path| (variant, path)))
		.collect()
	}

	fn config(&self) -> Config {
		Config {
			tshark: self.tshark.clone(),
			oracle_path: self.oracle_path.clone(),
			progress: !self.no_progress,
		}
	}
}

fn main() -> ExitCode {
	let args = Args::parse();

	let filter = match args.verbose {
		0 => "warn",
		1 => "info",
		2 => "debug",
		_ => "trace",
	};
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
		.with_writer(std::io::stderr)
		.init();

	let plan = match Plan::new(args.outputs(), args.pcap_files.clone()) {
		Ok(plan) => plan,
		Err(err) => {
			eprintln!("error: {err}");
			return ExitCode::from(err.exit_code());
		}
	};

	let config = args.config();
	println!("{} PCAP files provided", plan.inputs().len());
	let driver = Driver::new(Tshark::new(&config.tshark), &config);

	let mut failed = false;
	for report in driver.run(&plan) {
		match report.outcome {
			Ok(summary) => println!(
				"{} test file generated: {} ({} records)",
				report.variant,
				report.path.display(),
				summary.records
			),
			Err(err) => {
				failed = true;
				eprintln!(
					"{} test file failed: {}: {err}",
					report.variant,
					report.path.display()
				);
			}
		}
	}

	if failed { ExitCode::from(3) } else { ExitCode::SUCCESS }
}

// @generated by ja4-fixtures from packet captures. Do not edit by hand.

use super::ja4x;

#[allow(dead_code)]
#[derive(Debug)]
struct Ja4xRecord {
	file: &'static str,
	index: u64,
	cert: &'static [u8],
	fingerprint: &'static str,
}

#[test]
fn ja4x_records() {
	let mut failures = Vec::new();
	for record in JA4X_RECORDS {
		let name = format!("{} - {}", record.file, record.index);
		let fingerprint = ja4x(record.cert);
		if !record.fingerprint.is_empty() && fingerprint != record.fingerprint {
			failures.push(format!("{name}: expected JA4X={}, got={fingerprint}", record.fingerprint));
		}
	}
	assert!(
		failures.is_empty(),
		"{} of {} JA4X records failed:\n{}",
		failures.len(),
		JA4X_RECORDS.len(),
		failures.join("\n")
	);
}

#[rustfmt::skip]
static JA4X_RECORDS: &[Ja4xRecord] = &[
	Ja4xRecord {
		file: "golden.pcap",
		index: 3,
		cert: &[0x30, 0x03, 0x02, 0x01, 0xc1],
		fingerprint: "a373a9f83c6b_2bab15409345_7bf9a7bf7029",
	},
	Ja4xRecord {
		file: "golden.pcap",
		index: 3,
		cert: &[0x30, 0x03, 0x02, 0x01, 0xc2],
		fingerprint: "",
	},
];

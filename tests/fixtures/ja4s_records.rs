// @generated by ja4-fixtures from packet captures. Do not edit by hand.

use super::ja4s;

#[allow(dead_code)]
#[derive(Debug)]
struct Ja4sRecord {
	file: &'static str,
	index: u64,
	hello: &'static [u8],
	protocol: &'static str,
	fingerprint: &'static str,
}

#[test]
fn ja4s_records() {
	let mut failures = Vec::new();
	for record in JA4S_RECORDS {
		let name = format!("{} - {}", record.file, record.index);
		match ja4s(record.hello) {
			Ok(fingerprint) => {
				if !record.fingerprint.is_empty() && fingerprint != record.fingerprint {
					failures.push(format!("{name}: expected JA4S={}, got={fingerprint}", record.fingerprint));
				}
			}
			Err(err) => {
				if !record.fingerprint.is_empty() {
					failures.push(format!("{name}: unexpected error: {err}"));
				}
			}
		}
	}
	assert!(
		failures.is_empty(),
		"{} of {} JA4S records failed:\n{}",
		failures.len(),
		JA4S_RECORDS.len(),
		failures.join("\n")
	);
}

#[rustfmt::skip]
static JA4S_RECORDS: &[Ja4sRecord] = &[
	Ja4sRecord {
		file: "golden.pcap",
		index: 2,
		hello: &[0x02, 0x00, 0x00, 0x01, 0xb1],
		protocol: "t",
		fingerprint: "t130200_1301_234ea6891581",
	},
	Ja4sRecord {
		file: "golden.pcap",
		index: 10,
		hello: &[0x02, 0x00, 0x00, 0x01, 0xa3],
		protocol: "t",
		fingerprint: "",
	},
];

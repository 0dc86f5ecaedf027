// @generated by ja4-fixtures from packet captures. Do not edit by hand.

use super::ja4;

#[allow(dead_code)]
#[derive(Debug)]
struct Ja4Record {
	file: &'static str,
	index: u64,
	hello: &'static [u8],
	protocol: &'static str,
	fingerprint: &'static str,
}

#[test]
fn ja4_records() {
	let mut failures = Vec::new();
	for record in JA4_RECORDS {
		let name = format!("{} - {}", record.file, record.index);
		match ja4(record.hello) {
			Ok(fingerprint) => {
				if !record.fingerprint.is_empty() && fingerprint != record.fingerprint {
					failures.push(format!("{name}: expected JA4={}, got={fingerprint}", record.fingerprint));
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
		"{} of {} JA4 records failed:\n{}",
		failures.len(),
		JA4_RECORDS.len(),
		failures.join("\n")
	);
}

#[rustfmt::skip]
static JA4_RECORDS: &[Ja4Record] = &[
	Ja4Record {
		file: "golden.pcap",
		index: 1,
		hello: &[0x01, 0x00, 0x00, 0x01, 0xa1],
		protocol: "t",
		fingerprint: "t13d1516h2_8daaf6152771_02713d6af862",
	},
	Ja4Record {
		file: "golden.pcap",
		index: 4,
		hello: &[0x01, 0x00, 0x00, 0x01, 0xa2],
		protocol: "t",
		fingerprint: "",
	},
	Ja4Record {
		file: "golden.pcap",
		index: 9,
		hello: &[0x01, 0x00, 0x00, 0x01, 0xa3],
		protocol: "t",
		fingerprint: "",
	},
];

/* src/render.rs */

//! Rust source rendering for fixture files.
//!
//! A fixture file is assembled from three pieces: a [`Header`] declaring
//! the record struct and the test that replays every record through the
//! fingerprint function, one [`RecordLiteral`] per record, and a
//! [`Footer`] closing the table. Output depends only on the records and
//! their order, so regenerating from the same captures gives an
//! identical file.

use core::fmt;

/// A field of the generated record struct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDecl {
	/// Field name.
	pub name: &'static str,
	/// Rust type of the field.
	pub ty: &'static str,
}

/// Shape of a generated fixture file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
	/// Fingerprint name used in failure messages.
	pub label: &'static str,
	/// Name of the generated record struct.
	pub record_type: &'static str,
	/// Name of the generated `static` table.
	pub table: &'static str,
	/// Name of the generated test function.
	pub test_name: &'static str,
	/// Fingerprint function under test.
	pub oracle: &'static str,
	/// Whether the function returns `Result<String, E>` rather than `String`.
	pub fallible: bool,
	/// Field passed to the function.
	pub payload_field: &'static str,
	/// Struct fields, in declaration order.
	pub fields: &'static [FieldDecl],
}

/// A literal value inside a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Literal<'a> {
	/// Rendered as an escaped string literal.
	Str(&'a str),
	/// Rendered bare.
	Int(u64),
	/// Rendered as a reference to a byte array.
	Bytes(&'a [u8]),
}

impl fmt::Display for Literal<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Str(text) => write!(f, "{text:?}"),
			Self::Int(value) => write!(f, "{value}"),
			Self::Bytes(bytes) => write!(f, "&{}", byte_array(bytes)),
		}
	}
}

/// A record type that can be embedded in a fixture file.
pub trait Fixture {
	/// File shape shared by every record of this type.
	const LAYOUT: Layout;

	/// Field values, in the order of [`Layout::fields`].
	fn literals(&self) -> Vec<Literal<'_>>;
}

/// Render bytes as an array literal of hex bytes.
///
/// ```
/// use ja4_fixtures::render::byte_array;
///
/// assert_eq!(byte_array(&[]), "[]");
/// assert_eq!(byte_array(&[0x00]), "[0x00]");
/// assert_eq!(byte_array(&[0x30, 0x82, 0x01]), "[0x30, 0x82, 0x01]");
/// ```
#[must_use]
pub fn byte_array(bytes: &[u8]) -> String {
	let items: Vec<String> = bytes.iter().map(|b| format!("0x{b:02x}")).collect();
	format!("[{}]", items.join(", "))
}

/// Declarations and test function that precede the record table.
#[derive(Debug, Clone, Copy)]
pub struct Header<'a> {
	layout: &'a Layout,
	oracle_path: &'a str,
}

impl<'a> Header<'a> {
	/// Header importing the fingerprint function from `oracle_path`.
	#[must_use]
	pub fn new(layout: &'a Layout, oracle_path: &'a str) -> Self {
		Self {
			layout,
			oracle_path,
		}
	}
}

impl fmt::Display for Header<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let Layout {
			label,
			record_type,
			table,
			test_name,
			oracle,
			fallible,
			payload_field,
			fields,
		} = *self.layout;

		f.write_str("// @generated by ja4-fixtures from packet captures. Do not edit by hand.\n\n")?;
		writeln!(f, "use {}::{oracle};", self.oracle_path)?;
		writeln!(f)?;
		f.write_str("#[allow(dead_code)]\n#[derive(Debug)]\n")?;
		writeln!(f, "struct {record_type} {{")?;
		for field in fields {
			writeln!(f, "\t{}: {},", field.name, field.ty)?;
		}
		f.write_str("}\n\n")?;

		f.write_str("#[test]\n")?;
		writeln!(f, "fn {test_name}() {{")?;
		f.write_str("\tlet mut failures = Vec::new();\n")?;
		writeln!(f, "\tfor record in {table} {{")?;
		f.write_str("\t\tlet name = format!(\"{} - {}\", record.file, record.index);\n")?;
		let mismatch = format!(
			"failures.push(format!(\"{{name}}: expected {label}={{}}, got={{fingerprint}}\", record.fingerprint));"
		);
		if fallible {
			writeln!(f, "\t\tmatch {oracle}(record.{payload_field}) {{")?;
			f.write_str("\t\t\tOk(fingerprint) => {\n")?;
			f.write_str("\t\t\t\tif !record.fingerprint.is_empty() && fingerprint != record.fingerprint {\n")?;
			writeln!(f, "\t\t\t\t\t{mismatch}")?;
			f.write_str("\t\t\t\t}\n\t\t\t}\n")?;
			f.write_str("\t\t\tErr(err) => {\n")?;
			f.write_str("\t\t\t\tif !record.fingerprint.is_empty() {\n")?;
			f.write_str("\t\t\t\t\tfailures.push(format!(\"{name}: unexpected error: {err}\"));\n")?;
			f.write_str("\t\t\t\t}\n\t\t\t}\n\t\t}\n")?;
		} else {
			writeln!(f, "\t\tlet fingerprint = {oracle}(record.{payload_field});")?;
			f.write_str("\t\tif !record.fingerprint.is_empty() && fingerprint != record.fingerprint {\n")?;
			writeln!(f, "\t\t\t{mismatch}")?;
			f.write_str("\t\t}\n")?;
		}
		f.write_str("\t}\n")?;
		f.write_str("\tassert!(\n\t\tfailures.is_empty(),\n")?;
		writeln!(f, "\t\t\"{{}} of {{}} {label} records failed:\\n{{}}\",")?;
		writeln!(f, "\t\tfailures.len(),\n\t\t{table}.len(),")?;
		f.write_str("\t\tfailures.join(\"\\n\")\n\t);\n}\n\n")?;

		f.write_str("#[rustfmt::skip]\n")?;
		writeln!(f, "static {table}: &[{record_type}] = &[")
	}
}

/// One record rendered as a struct literal with named fields.
#[derive(Debug, Clone)]
pub struct RecordLiteral<'a> {
	layout: &'a Layout,
	values: Vec<Literal<'a>>,
}

impl<'a> RecordLiteral<'a> {
	/// Literal for `record`.
	#[must_use]
	pub fn new<R: Fixture>(layout: &'a Layout, record: &'a R) -> Self {
		Self {
			layout,
			values: record.literals(),
		}
	}
}

impl fmt::Display for RecordLiteral<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		writeln!(f, "\t{} {{", self.layout.record_type)?;
		for (field, value) in self.layout.fields.iter().zip(&self.values) {
			writeln!(f, "\t\t{}: {value},", field.name)?;
		}
		f.write_str("\t},\n")
	}
}

/// Closes the record table.
#[derive(Debug, Clone, Copy, Default)]
pub struct Footer;

impl fmt::Display for Footer {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("];\n")
	}
}

/// A complete fixture file.
#[derive(Debug)]
pub struct FixtureFile<'a, R> {
	records: &'a [R],
	oracle_path: &'a str,
}

impl<'a, R: Fixture> FixtureFile<'a, R> {
	/// File embedding `records`, importing the fingerprint function from `oracle_path`.
	#[must_use]
	pub fn new(records: &'a [R], oracle_path: &'a str) -> Self {
		Self {
			records,
			oracle_path,
		}
	}
}

impl<R: Fixture> fmt::Display for FixtureFile<'_, R> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let layout = R::LAYOUT;
		write!(f, "{}", Header::new(&layout, self.oracle_path))?;
		for record in self.records {
			write!(f, "{}", RecordLiteral::new(&layout, record))?;
		}
		write!(f, "{}", Footer)
	}
}

/// Render `records` into the text of a fixture file.
#[must_use]
pub fn render<R: Fixture>(records: &[R], oracle_path: &str) -> String {
	FixtureFile::new(records, oracle_path).to_string()
}

use std::fmt::Display;

use thiserror::Error;

/// A validated Brazilian CPF number, stored as its 11 canonical digits.
///
/// Parsing strips any punctuation (`123.456.789-09` and `12345678909`
/// are equivalent) and verifies both mod-11 check digits.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub struct Cpf(String);

#[derive(Debug, PartialEq, Eq, Clone, Error)]
pub enum CpfError {
	#[error("CPF must contain exactly 11 digits")]
	InvalidLength,
	#[error("CPF with all digits repeated is not valid")]
	RepeatedDigits,
	#[error("CPF check digits do not match")]
	CheckDigitMismatch,
}

impl Cpf {
	pub fn parse(input: &str) -> Result<Self, CpfError> {
		let digits: Vec<u8> = input
			.chars()
			.filter(|c| c.is_ascii_digit())
			.map(|c| c as u8 - b'0')
			.collect();
		if digits.len() != 11 {
			return Err(CpfError::InvalidLength);
		}
		// sequences like 111.111.111-11 satisfy the check digit
		// formulas but are reserved as invalid
		if digits.iter().all(|d| *d == digits[0]) {
			return Err(CpfError::RepeatedDigits);
		}
		if check_digit(&digits[..9]) != digits[9]
			|| check_digit(&digits[..10]) != digits[10]
		{
			return Err(CpfError::CheckDigitMismatch);
		}

		Ok(Self(digits.iter().map(|d| (d + b'0') as char).collect()))
	}

	/// Canonical 11-digit form, no punctuation.
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// `XXX.XXX.XXX-XX` display form.
	pub fn formatted(&self) -> String {
		format!(
			"{}.{}.{}-{}",
			&self.0[0..3],
			&self.0[3..6],
			&self.0[6..9],
			&self.0[9..11]
		)
	}
}

impl Display for Cpf {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.0)
	}
}

/// Computes the mod-11 check digit over a digit prefix.
///
/// For a prefix of length `n`, digits are weighted `n + 1` down to `2`;
/// a remainder below 2 yields 0, anything else `11 - remainder`.
fn check_digit(prefix: &[u8]) -> u8 {
	let sum: u32 = prefix
		.iter()
		.enumerate()
		.map(|(i, d)| *d as u32 * (prefix.len() + 1 - i) as u32)
		.sum();
	match sum % 11 {
		0 | 1 => 0,
		r => (11 - r) as u8,
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_valid() {
		assert_eq!(Cpf::parse("52998224725").unwrap().as_str(), "52998224725");
		assert_eq!(
			Cpf::parse("111.444.777-35").unwrap().as_str(),
			"11144477735"
		);
	}

	#[test]
	fn test_repeated_digits() {
		for d in 0..=9 {
			let input: String = std::iter::repeat_n(char::from(b'0' + d), 11).collect();
			assert_eq!(Cpf::parse(&input), Err(CpfError::RepeatedDigits));
		}
	}

	#[test]
	fn test_length() {
		assert_eq!(Cpf::parse(""), Err(CpfError::InvalidLength));
		assert_eq!(Cpf::parse("5299822472"), Err(CpfError::InvalidLength));
		assert_eq!(Cpf::parse("529982247255"), Err(CpfError::InvalidLength));
		// punctuation does not count towards the digit count
		assert_eq!(Cpf::parse("529.982.247-2"), Err(CpfError::InvalidLength));
	}

	#[test]
	fn test_check_digits() {
		assert_eq!(
			Cpf::parse("52998224726"),
			Err(CpfError::CheckDigitMismatch)
		);
		assert_eq!(
			Cpf::parse("12345678900"),
			Err(CpfError::CheckDigitMismatch)
		);
	}

	#[test]
	fn test_formatted() {
		assert_eq!(
			Cpf::parse("52998224725").unwrap().formatted(),
			"529.982.247-25"
		);
	}
}

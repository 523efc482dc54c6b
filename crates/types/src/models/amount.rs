//! Arbitrary-precision token amounts in the token's smallest unit

use num_bigint::BigUint;
use num_traits::{FromPrimitive, One, ToPrimitive, Zero};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Raw token amount (smallest unit), serialized as a decimal string
///
/// Amounts never pass through floating point; only the USD helpers
/// produce approximate values.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(BigUint);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid amount '{value}': must be a non-negative decimal integer")]
pub struct ParseAmountError {
	pub value: String,
}

impl Amount {
	pub fn new(value: BigUint) -> Self {
		Self(value)
	}

	pub fn zero() -> Self {
		Self(BigUint::zero())
	}

	pub fn is_zero(&self) -> bool {
		self.0.is_zero()
	}

	pub fn as_biguint(&self) -> &BigUint {
		&self.0
	}

	/// Multiply by a small integer factor
	pub fn scaled(&self, factor: u64) -> Self {
		Self(&self.0 * BigUint::from(factor))
	}

	/// Multiply by `10^exponent`
	pub fn scaled_pow10(&self, exponent: u32) -> Self {
		Self(&self.0 * BigUint::from(10u32).pow(exponent))
	}

	pub fn saturating_sub(&self, other: &Amount) -> Self {
		if self.0 > other.0 {
			Self(&self.0 - &other.0)
		} else {
			Self::zero()
		}
	}

	/// Midpoint of `(self, upper)` rounded up, so the result is strictly above
	/// `self` whenever `upper > self`.
	pub fn midpoint_above(&self, upper: &Amount) -> Self {
		if upper.0 <= self.0 {
			return upper.clone();
		}
		let gap = &upper.0 - &self.0;
		Self(&self.0 + ((gap + BigUint::one()) >> 1u32))
	}

	/// Whether `upper` is more than one unit above `self`
	pub fn has_gap_to(&self, upper: &Amount) -> bool {
		upper.0 > &self.0 + BigUint::one()
	}

	/// Reduce by a slippage tolerance expressed in basis points
	pub fn less_bps(&self, bps: u32) -> Self {
		let bps = bps.min(10_000);
		Self(&self.0 * BigUint::from(10_000 - bps) / BigUint::from(10_000u32))
	}

	/// Render as a human decimal using the token's decimals, trailing zeros trimmed
	pub fn format_units(&self, decimals: u8) -> String {
		let digits = self.0.to_str_radix(10);
		let decimals = decimals as usize;
		if decimals == 0 {
			return digits;
		}

		let (whole, fraction) = if digits.len() > decimals {
			let split = digits.len() - decimals;
			(digits[..split].to_string(), digits[split..].to_string())
		} else {
			("0".to_string(), format!("{:0>width$}", digits, width = decimals))
		};

		let fraction = fraction.trim_end_matches('0');
		if fraction.is_empty() {
			whole
		} else {
			format!("{}.{}", whole, fraction)
		}
	}

	/// Approximate USD value given the token's decimals and per-unit price
	pub fn usd_value(&self, decimals: u8, price_usd: f64) -> Option<f64> {
		let raw = self.0.to_f64()?;
		let value = raw / 10f64.powi(decimals as i32) * price_usd;
		value.is_finite().then_some(value)
	}

	/// Smallest raw amount worth at least `usd` at the given per-unit price
	pub fn from_usd(usd: f64, decimals: u8, price_usd: f64) -> Option<Self> {
		if !(usd.is_finite() && usd > 0.0 && price_usd.is_finite() && price_usd > 0.0) {
			return None;
		}
		let raw = (usd / price_usd * 10f64.powi(decimals as i32)).ceil();
		BigUint::from_f64(raw)
			.filter(|value| !value.is_zero())
			.map(Self)
	}
}

impl fmt::Display for Amount {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl FromStr for Amount {
	type Err = ParseAmountError;

	fn from_str(value: &str) -> Result<Self, Self::Err> {
		let trimmed = value.trim();
		if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
			return Err(ParseAmountError {
				value: value.to_string(),
			});
		}
		BigUint::parse_bytes(trimmed.as_bytes(), 10)
			.map(Self)
			.ok_or_else(|| ParseAmountError {
				value: value.to_string(),
			})
	}
}

impl From<u64> for Amount {
	fn from(value: u64) -> Self {
		Self(BigUint::from(value))
	}
}

impl From<u128> for Amount {
	fn from(value: u128) -> Self {
		Self(BigUint::from(value))
	}
}

impl From<BigUint> for Amount {
	fn from(value: BigUint) -> Self {
		Self(value)
	}
}

impl Serialize for Amount {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(&self.0.to_str_radix(10))
	}
}

impl<'de> Deserialize<'de> for Amount {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let value = String::deserialize(deserializer)?;
		value.parse().map_err(serde::de::Error::custom)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_rejects_non_digits() {
		assert!("12a".parse::<Amount>().is_err());
		assert!("-5".parse::<Amount>().is_err());
		assert!("".parse::<Amount>().is_err());
		assert!("1.5".parse::<Amount>().is_err());
		assert_eq!("0042".parse::<Amount>().unwrap(), Amount::from(42u64));
	}

	#[test]
	fn test_parse_beyond_u128() {
		let huge = "1000000000000000000000000000000000000000000";
		let amount: Amount = huge.parse().unwrap();
		assert_eq!(amount.to_string(), huge);
		assert_eq!(amount.scaled(10).to_string(), format!("{}0", huge));
	}

	#[test]
	fn test_format_units() {
		assert_eq!(Amount::from(1_500_000u64).format_units(6), "1.5");
		assert_eq!(Amount::from(1u64).format_units(18), "0.000000000000000001");
		assert_eq!(Amount::from(25_000_000u64).format_units(6), "25");
		assert_eq!(Amount::from(123u64).format_units(0), "123");
		assert_eq!(Amount::zero().format_units(6), "0");
	}

	#[test]
	fn test_midpoint_above_rounds_up() {
		let lo = Amount::from(10u64);
		assert_eq!(lo.midpoint_above(&Amount::from(11u64)), Amount::from(11u64));
		assert_eq!(lo.midpoint_above(&Amount::from(13u64)), Amount::from(12u64));
		assert_eq!(lo.midpoint_above(&Amount::from(100u64)), Amount::from(55u64));
		assert!(lo.has_gap_to(&Amount::from(12u64)));
		assert!(!lo.has_gap_to(&Amount::from(11u64)));
	}

	#[test]
	fn test_usd_conversions() {
		let five_tokens = Amount::from_usd(10.0, 18, 2.0).unwrap();
		assert_eq!(five_tokens.format_units(18), "5");
		let value = five_tokens.usd_value(18, 2.0).unwrap();
		assert!((value - 10.0).abs() < 1e-9);
		assert!(Amount::from_usd(10.0, 6, 0.0).is_none());
	}

	#[test]
	fn test_less_bps_and_saturating_sub() {
		assert_eq!(Amount::from(10_000u64).less_bps(50), Amount::from(9_950u64));
		assert_eq!(
			Amount::from(5u64).saturating_sub(&Amount::from(7u64)),
			Amount::zero()
		);
	}

	#[test]
	fn test_serde_as_string() {
		let amount = Amount::from(1234u64);
		assert_eq!(serde_json::to_string(&amount).unwrap(), "\"1234\"");
		let parsed: Amount = serde_json::from_str("\"987\"").unwrap();
		assert_eq!(parsed, Amount::from(987u64));
		assert!(serde_json::from_str::<Amount>("\"0x10\"").is_err());
	}
}

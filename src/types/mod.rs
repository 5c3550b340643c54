use std::fmt;
use std::str::FromStr;

use primitive_types::U256;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub type Amount = U256;

pub const NAME: &str = "REME Coin";
pub const SYMBOL: &str = "REME";
pub const DECIMALS: u8 = 18;

/// Whole tokens minted to the deployer at construction.
pub const INITIAL_TOKENS: u64 = 375_000_000;

/// Denominator of the parts-per-million fee.
pub const FEE_DENOMINATOR: u64 = 1_000_000;

/// 1 REME expressed in base units (10^18).
pub fn token_scale() -> Amount {
    U256::exp10(DECIMALS as usize)
}

/// Converts whole tokens into base units.
pub fn tokens(whole: u64) -> Amount {
    U256::from(whole) * token_scale()
}

pub fn total_supply() -> Amount {
    tokens(INITIAL_TOKENS)
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum AddressParseError {
    #[error("address must be 0x-prefixed")]
    MissingPrefix,
    #[error("address must be 20 bytes, got {0}")]
    InvalidLength(usize),
    #[error("invalid hex in address: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}

/// 20-byte account identifier. The all-zero value is the null address.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address(pub [u8; 20]);

impl Address {
    pub const ZERO: Address = Address([0u8; 20]);

    pub fn is_null(&self) -> bool {
        *self == Self::ZERO
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Fixture address with every byte set to `tag`.
    pub const fn repeat(tag: u8) -> Self {
        Address([tag; 20])
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Address(bytes)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let body = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or(AddressParseError::MissingPrefix)?;
        let bytes = hex::decode(body)?;
        if bytes.len() != 20 {
            return Err(AddressParseError::InvalidLength(bytes.len()));
        }
        let mut out = [0u8; 20];
        out.copy_from_slice(&bytes);
        Ok(Address(out))
    }
}

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = String::deserialize(deserializer)?;
        encoded.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AmountParseError {
    #[error("amount {0:?} is not a base-10 integer")]
    InvalidDigit(String),
    #[error("amount {0:?} does not fit in 256 bits")]
    Overflow(String),
}

/// Parses a base-10 amount of base units.
pub fn parse_amount(s: &str) -> Result<Amount, AmountParseError> {
    let trimmed = s.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AmountParseError::InvalidDigit(trimmed.to_owned()));
    }
    // only digits remain, so the one failure left is overflow
    U256::from_dec_str(trimmed).map_err(|_| AmountParseError::Overflow(trimmed.to_owned()))
}

/// Amounts travel as decimal strings; JSON numbers cannot hold 256 bits.
pub(crate) mod amount_dec {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    use super::Amount;

    pub fn serialize<S>(value: &Amount, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Amount, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = String::deserialize(deserializer)?;
        super::parse_amount(&encoded).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_text_form_round_trips() {
        let addr: Address = "0x00000000000000000000000000000000000000ff".parse().unwrap();
        assert_eq!(addr.0[19], 0xff);
        assert_eq!(addr.to_string(), "0x00000000000000000000000000000000000000ff");
        assert!(!addr.is_null());
        assert!(Address::ZERO.is_null());
    }

    #[test]
    fn address_rejects_bad_input() {
        assert_eq!(
            "00000000000000000000000000000000000000ff".parse::<Address>(),
            Err(AddressParseError::MissingPrefix)
        );
        assert_eq!(
            "0xabcd".parse::<Address>(),
            Err(AddressParseError::InvalidLength(2))
        );
        assert!(matches!(
            "0xzz00000000000000000000000000000000000000".parse::<Address>(),
            Err(AddressParseError::InvalidHex(_))
        ));
    }

    #[test]
    fn total_supply_is_375m_tokens() {
        assert_eq!(
            total_supply(),
            U256::from_dec_str("375000000000000000000000000").unwrap()
        );
    }

    #[test]
    fn parse_amount_reports_typed_errors() {
        assert_eq!(parse_amount(" 1000 "), Ok(Amount::from(1_000u64)));
        assert_eq!(
            parse_amount("12x"),
            Err(AmountParseError::InvalidDigit("12x".into()))
        );
        assert_eq!(parse_amount(""), Err(AmountParseError::InvalidDigit(String::new())));
        let too_big = format!("{}0", U256::MAX);
        assert_eq!(
            parse_amount(&too_big),
            Err(AmountParseError::Overflow(too_big.clone()))
        );
    }

    #[test]
    fn amount_serializes_as_decimal_string() {
        #[derive(serde::Serialize, serde::Deserialize)]
        struct Wrapper {
            #[serde(with = "amount_dec")]
            value: Amount,
        }
        let json = serde_json::to_string(&Wrapper { value: tokens(5) }).unwrap();
        assert_eq!(json, r#"{"value":"5000000000000000000"}"#);
        let back: Wrapper = serde_json::from_str(&json).unwrap();
        assert_eq!(back.value, tokens(5));
    }
}

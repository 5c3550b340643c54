use serde::{Deserialize, Serialize};

use crate::types::{Address, Amount, FEE_DENOMINATOR};

/// Why a fee parameter was refused.
#[derive(Clone, Copy, Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParameterError {
    #[error("fee {0} ppm outside 1..=1000000")]
    FeeOutOfRange(u64),
    #[error("fee beneficiary is the null address")]
    NullBeneficiary,
    #[error("fee threshold must be greater than zero")]
    ZeroThreshold,
    #[error("owner is the null address")]
    NullOwner,
}

pub fn validate_fee(fee: u64) -> Result<(), ParameterError> {
    if fee == 0 || fee > FEE_DENOMINATOR {
        return Err(ParameterError::FeeOutOfRange(fee));
    }
    Ok(())
}

pub fn validate_beneficiary(beneficiary: &Address) -> Result<(), ParameterError> {
    if beneficiary.is_null() {
        return Err(ParameterError::NullBeneficiary);
    }
    Ok(())
}

pub fn validate_threshold(threshold: &Amount) -> Result<(), ParameterError> {
    if threshold.is_zero() {
        return Err(ParameterError::ZeroThreshold);
    }
    Ok(())
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeeSchedule {
    /// Parts per million of the transferred amount.
    pub fee: u64,
    pub fee_beneficiary: Address,
    #[serde(with = "crate::types::amount_dec")]
    pub fee_threshold: Amount,
}

impl FeeSchedule {
    /// Validates fee, beneficiary and threshold, in that order.
    pub fn new(
        fee: u64,
        fee_beneficiary: Address,
        fee_threshold: Amount,
    ) -> Result<Self, ParameterError> {
        validate_fee(fee)?;
        validate_beneficiary(&fee_beneficiary)?;
        validate_threshold(&fee_threshold)?;
        Ok(Self {
            fee,
            fee_beneficiary,
            fee_threshold,
        })
    }

    /// Amounts strictly below the threshold are never charged.
    pub fn applies_to(&self, amount: &Amount) -> bool {
        *amount >= self.fee_threshold
    }

    /// `floor(amount * fee / 1_000_000)`.
    ///
    /// Split as `q * fee + r * fee / D` with `amount = q * D + r` so the
    /// product never leaves 256 bits.
    pub fn charge(&self, amount: &Amount) -> Amount {
        let denominator = Amount::from(FEE_DENOMINATOR);
        let fee = Amount::from(self.fee);
        let whole = *amount / denominator;
        let rest = *amount % denominator;
        whole * fee + rest * fee / denominator
    }

    pub fn split(&self, amount: &Amount) -> FeeSplit {
        let fee = self.charge(amount);
        FeeSplit {
            fee,
            net: *amount - fee,
        }
    }
}

/// Portion of a transfer redirected to the beneficiary and the remainder.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeeSplit {
    #[serde(with = "crate::types::amount_dec")]
    pub fee: Amount,
    #[serde(with = "crate::types::amount_dec")]
    pub net: Amount,
}

impl FeeSplit {
    pub fn exempt(amount: Amount) -> Self {
        Self {
            fee: Amount::zero(),
            net: amount,
        }
    }

    pub fn is_charged(&self) -> bool {
        !self.fee.is_zero()
    }
}

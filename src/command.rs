use serde::Deserialize;
use thiserror::Error;

use crate::currency::{Amount, Currency, CurrencyCode, Rate};

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    AddRate,
    UpdateRate,
    Open,
    AddCurrency,
    SetMain,
    Deposit,
    Withdraw,
    Convert,
    RemoveCurrency,
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Amount is required for {kind:?}")]
    AmountRequired { kind: OperationKind },
    #[error("Amount must not be negative for {kind:?}")]
    NegativeAmount { kind: OperationKind },
    #[error("Currency is required for {kind:?}")]
    CurrencyRequired { kind: OperationKind },
    #[error("Target currency is required for {kind:?}")]
    TargetRequired { kind: OperationKind },
    #[error("Rate is required for {kind:?}")]
    RateRequired { kind: OperationKind },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountCommand {
    AddRate {
        from: Currency,
        to: Currency,
        rate: Rate,
    },
    UpdateRate {
        from: Currency,
        to: Currency,
        rate: Rate,
    },
    Open,
    AddCurrency {
        currency: Currency,
        amount: Amount,
    },
    SetMain {
        currency: Currency,
    },
    Deposit {
        currency: Option<Currency>,
        amount: Amount,
    },
    Withdraw {
        currency: Option<Currency>,
        amount: Amount,
    },
    Convert {
        from: Currency,
        to: Currency,
        amount: Amount,
    },
    RemoveCurrency {
        currency: Currency,
        convert_to: Option<Currency>,
    },
}

impl AccountCommand {
    /// Checks that the row carries what `kind` needs. Rate values are validated
    /// by the registry, not here.
    pub fn parse_command(
        kind: OperationKind,
        currency: Option<CurrencyCode>,
        target: Option<CurrencyCode>,
        amount: Option<Amount>,
        rate: Option<Rate>,
    ) -> Result<Self, CommandError> {
        let currency = currency.map(Currency::from);
        let target = target.map(Currency::from);
        match kind {
            OperationKind::AddRate => Ok(Self::AddRate {
                from: Self::required_currency(currency, kind)?,
                to: target.ok_or(CommandError::TargetRequired { kind })?,
                rate: rate.ok_or(CommandError::RateRequired { kind })?,
            }),
            OperationKind::UpdateRate => Ok(Self::UpdateRate {
                from: Self::required_currency(currency, kind)?,
                to: target.ok_or(CommandError::TargetRequired { kind })?,
                rate: rate.ok_or(CommandError::RateRequired { kind })?,
            }),
            OperationKind::Open => Ok(Self::Open),
            OperationKind::AddCurrency => Ok(Self::AddCurrency {
                currency: Self::required_currency(currency, kind)?,
                amount: Self::non_negative(amount.unwrap_or_default(), kind)?,
            }),
            OperationKind::SetMain => Ok(Self::SetMain {
                currency: Self::required_currency(currency, kind)?,
            }),
            OperationKind::Deposit => Ok(Self::Deposit {
                currency,
                amount: Self::required_amount(amount, kind)?,
            }),
            OperationKind::Withdraw => Ok(Self::Withdraw {
                currency,
                amount: Self::required_amount(amount, kind)?,
            }),
            OperationKind::Convert => Ok(Self::Convert {
                from: Self::required_currency(currency, kind)?,
                to: target.ok_or(CommandError::TargetRequired { kind })?,
                amount: Self::required_amount(amount, kind)?,
            }),
            OperationKind::RemoveCurrency => Ok(Self::RemoveCurrency {
                currency: Self::required_currency(currency, kind)?,
                convert_to: target,
            }),
        }
    }

    fn required_currency(
        currency: Option<Currency>,
        kind: OperationKind,
    ) -> Result<Currency, CommandError> {
        currency.ok_or(CommandError::CurrencyRequired { kind })
    }

    fn required_amount(amount: Option<Amount>, kind: OperationKind) -> Result<Amount, CommandError> {
        let Some(amount) = amount else {
            return Err(CommandError::AmountRequired { kind });
        };
        Self::non_negative(amount, kind)
    }

    fn non_negative(amount: Amount, kind: OperationKind) -> Result<Amount, CommandError> {
        if amount >= 0 {
            Ok(amount)
        } else {
            Err(CommandError::NegativeAmount { kind })
        }
    }
}

use std::{cell::RefCell, rc::Rc, str::FromStr};

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    account::{Account, AccountCurrency},
    currency::{Amount, Currency, Rate},
    error::ErrorKind,
    rate::RateRegistry,
};

#[cfg(test)]
mod balance_props;

/// Registry handle shared between whoever maintains the rates and the manager.
pub type SharedRateRegistry = Rc<RefCell<RateRegistry>>;

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("Bank account not set")]
    AccountNotSet,
    #[error("Bank account currency \"{currency}\" not found")]
    CurrencyNotFound { currency: Currency },
    #[error("Main bank account currency not set")]
    MainCurrencyNotSet,
    #[error("Cannot remove main bank account currency \"{currency}\"")]
    RemoveMainCurrency { currency: Currency },
    #[error("Failed withdraw {amount} {currency}. Balance: {balance}")]
    InsufficientFunds {
        amount: Amount,
        currency: Currency,
        balance: Amount,
    },
    #[error("Currency rate \"{from}\"/\"{to}\" and \"{to}\"/\"{from}\" not found")]
    RateNotFound { from: Currency, to: Currency },
    #[error("Amount {amount} overflows the {currency} balance")]
    AmountOverflow { amount: Amount, currency: Currency },
}

impl AccountError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AccountError::CurrencyNotFound { .. } => ErrorKind::NotFound,
            AccountError::AccountNotSet
            | AccountError::MainCurrencyNotSet
            | AccountError::RemoveMainCurrency { .. } => ErrorKind::InvalidState,
            AccountError::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
            AccountError::RateNotFound { .. } => ErrorKind::RateNotFound,
            AccountError::AmountOverflow { .. } => ErrorKind::InvalidArgument,
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown rounding mode `{0}`, expected `half-away-from-zero` or `half-even`")]
pub struct UnknownRounding(pub String);

/// How the quotient is rounded when converting through an inverse rate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InverseRounding {
    #[default]
    HalfAwayFromZero,
    HalfEven,
}

impl InverseRounding {
    /// `amount / rate` rounded to a whole amount. `None` when `rate` is zero.
    pub fn divide(self, amount: Amount, rate: Rate) -> Option<Amount> {
        let strategy = match self {
            InverseRounding::HalfAwayFromZero => RoundingStrategy::MidpointAwayFromZero,
            InverseRounding::HalfEven => RoundingStrategy::MidpointNearestEven,
        };
        Decimal::from(amount)
            .checked_div(Decimal::from(rate))?
            .round_dp_with_strategy(0, strategy)
            .to_i64()
    }
}

impl FromStr for InverseRounding {
    type Err = UnknownRounding;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "half-away-from-zero" => Ok(InverseRounding::HalfAwayFromZero),
            "half-even" => Ok(InverseRounding::HalfEven),
            other => Err(UnknownRounding(other.to_string())),
        }
    }
}

/// Business rules of a multi-currency account: main currency, balance moves and
/// conversions between sub-balances.
///
/// Operations taking `Option<&Currency>` fall back to the main currency on `None`.
/// Every mutation needs `&mut self`, so a conversion (debit then credit) cannot
/// interleave with another operation on the same account.
#[derive(Debug)]
pub struct AccountManager {
    rates: SharedRateRegistry,
    account: Option<Account>,
    rounding: InverseRounding,
}

impl AccountManager {
    pub fn new(rates: SharedRateRegistry) -> Self {
        Self {
            rates,
            account: None,
            rounding: InverseRounding::default(),
        }
    }

    pub fn with_rounding(mut self, rounding: InverseRounding) -> Self {
        self.rounding = rounding;
        self
    }

    pub fn rounding(&self) -> InverseRounding {
        self.rounding
    }

    pub fn rates(&self) -> &SharedRateRegistry {
        &self.rates
    }

    pub fn create_account(&self) -> Account {
        Account::default()
    }

    pub fn set_account(&mut self, account: Account) {
        self.account = Some(account);
    }

    pub fn account(&self) -> Result<&Account, AccountError> {
        self.account.as_ref().ok_or(AccountError::AccountNotSet)
    }

    pub fn account_mut(&mut self) -> Result<&mut Account, AccountError> {
        self.account.as_mut().ok_or(AccountError::AccountNotSet)
    }

    pub fn currency(&self, currency: &Currency) -> Result<Option<&AccountCurrency>, AccountError> {
        Ok(self.account()?.get(currency))
    }

    /// Adds a sub-balance. Replacing the main sub-balance keeps it main.
    pub fn add_currency(&mut self, mut sub_balance: AccountCurrency) -> Result<(), AccountError> {
        let account = self.account_mut()?;
        let was_main = account
            .get(sub_balance.currency())
            .is_some_and(AccountCurrency::is_main);
        sub_balance.set_main(was_main);
        debug!(currency = %sub_balance.currency(), amount = sub_balance.amount(), "currency added");
        account.add(sub_balance);
        Ok(())
    }

    pub fn currencies(&self) -> Result<impl Iterator<Item = &AccountCurrency>, AccountError> {
        Ok(self.account()?.iter())
    }

    pub fn currency_names(&self) -> Result<Vec<&str>, AccountError> {
        Ok(self.currencies()?.map(|ac| ac.currency().name()).collect())
    }

    pub fn main_currency(&self) -> Result<Option<&AccountCurrency>, AccountError> {
        Ok(self.account()?.iter().find(|ac| ac.is_main()))
    }

    pub fn set_main_currency(&mut self, currency: &Currency) -> Result<(), AccountError> {
        let account = self.account_mut()?;
        if account.get(currency).is_none() {
            return Err(AccountError::CurrencyNotFound {
                currency: currency.clone(),
            });
        }
        for sub_balance in account.iter_mut() {
            let main = sub_balance.currency() == currency;
            sub_balance.set_main(main);
        }
        info!(%currency, "main currency set");
        Ok(())
    }

    pub fn balance(&self, currency: Option<&Currency>) -> Result<Amount, AccountError> {
        Ok(self.sub_balance(currency)?.amount())
    }

    /// No sign check: a negative deposit reduces the balance without a funds check.
    pub fn deposit(
        &mut self,
        amount: Amount,
        currency: Option<&Currency>,
    ) -> Result<(), AccountError> {
        let sub_balance = self.sub_balance_mut(currency)?;
        let Some(balance) = sub_balance.amount().checked_add(amount) else {
            return Err(AccountError::AmountOverflow {
                amount,
                currency: sub_balance.currency().clone(),
            });
        };
        debug!(currency = %sub_balance.currency(), amount, balance, "deposit");
        sub_balance.set_amount(balance);
        Ok(())
    }

    pub fn withdraw(
        &mut self,
        amount: Amount,
        currency: Option<&Currency>,
    ) -> Result<(), AccountError> {
        let sub_balance = self.sub_balance_mut(currency)?;
        if amount > sub_balance.amount() {
            return Err(AccountError::InsufficientFunds {
                amount,
                currency: sub_balance.currency().clone(),
                balance: sub_balance.amount(),
            });
        }
        let Some(balance) = sub_balance.amount().checked_sub(amount) else {
            return Err(AccountError::AmountOverflow {
                amount,
                currency: sub_balance.currency().clone(),
            });
        };
        debug!(currency = %sub_balance.currency(), amount, balance, "withdraw");
        sub_balance.set_amount(balance);
        Ok(())
    }

    /// Moves `amount` of `from` into `to`, returning the amount credited to `to`.
    ///
    /// A direct `from → to` rate multiplies. Otherwise the inverse `to → from` rate
    /// divides, rounded per [`InverseRounding`].
    pub fn convert(
        &mut self,
        from: &Currency,
        to: &Currency,
        amount: Amount,
    ) -> Result<Amount, AccountError> {
        let converted = self.converted_amount(from, to, amount)?;

        // destination must be able to take the credit before anything is debited
        let destination = self.sub_balance(Some(to))?;
        if destination.amount().checked_add(converted).is_none() {
            return Err(AccountError::AmountOverflow {
                amount: converted,
                currency: to.clone(),
            });
        }

        self.withdraw(amount, Some(from))?;
        self.deposit(converted, Some(to))?;
        info!(%from, %to, amount, converted, "converted");
        Ok(converted)
    }

    /// Drops `currency` from the account, converting a positive balance into
    /// `convert_to` (or the main currency) first. Absent currency is a no-op.
    pub fn remove_currency(
        &mut self,
        currency: &Currency,
        convert_to: Option<&Currency>,
    ) -> Result<(), AccountError> {
        let Some(sub_balance) = self.account()?.get(currency) else {
            return Ok(());
        };
        if sub_balance.is_main() {
            return Err(AccountError::RemoveMainCurrency {
                currency: currency.clone(),
            });
        }

        let amount = sub_balance.amount();
        if amount > 0 {
            let destination = match convert_to {
                Some(target) => self.sub_balance(Some(target))?,
                None => self
                    .main_currency()?
                    .ok_or(AccountError::MainCurrencyNotSet)?,
            }
            .currency()
            .clone();
            self.convert(currency, &destination, amount)?;
        }

        self.account_mut()?.remove(currency);
        info!(%currency, "currency removed");
        Ok(())
    }

    /// Rate lookup happens here, once: the value is copied out before any balance moves.
    fn converted_amount(
        &self,
        from: &Currency,
        to: &Currency,
        amount: Amount,
    ) -> Result<Amount, AccountError> {
        let rates = self.rates.borrow();
        let overflow = || AccountError::AmountOverflow {
            amount,
            currency: from.clone(),
        };

        if let Some(rate) = rates.find_rate(from, to) {
            return amount.checked_mul(rate.rate()).ok_or_else(overflow);
        }
        if let Some(rate) = rates.find_rate(to, from) {
            return self.rounding.divide(amount, rate.rate()).ok_or_else(overflow);
        }
        Err(AccountError::RateNotFound {
            from: from.clone(),
            to: to.clone(),
        })
    }

    fn sub_balance(&self, currency: Option<&Currency>) -> Result<&AccountCurrency, AccountError> {
        let account = self.account()?;
        match currency {
            Some(currency) => account
                .get(currency)
                .ok_or_else(|| AccountError::CurrencyNotFound {
                    currency: currency.clone(),
                }),
            None => account
                .iter()
                .find(|ac| ac.is_main())
                .ok_or(AccountError::MainCurrencyNotSet),
        }
    }

    fn sub_balance_mut(
        &mut self,
        currency: Option<&Currency>,
    ) -> Result<&mut AccountCurrency, AccountError> {
        let account = self.account_mut()?;
        match currency {
            Some(currency) => account
                .get_mut(currency)
                .ok_or_else(|| AccountError::CurrencyNotFound {
                    currency: currency.clone(),
                }),
            None => account
                .iter_mut()
                .find(|ac| ac.is_main())
                .ok_or(AccountError::MainCurrencyNotSet),
        }
    }
}

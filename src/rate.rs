use std::collections::HashMap;

use thiserror::Error;
use tracing::info;

use crate::{
    currency::{Currency, Rate},
    error::ErrorKind,
};

#[derive(Debug, Error)]
pub enum RateError {
    #[error("Rate must be positive, got {rate}")]
    NonPositiveRate { rate: Rate },
    #[error("Currency rate \"{from}\"/\"{to}\" not found")]
    RateNotRegistered { from: Currency, to: Currency },
    #[error("Currency rate not selected")]
    NothingSelected,
}

impl RateError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RateError::NonPositiveRate { .. } => ErrorKind::InvalidArgument,
            RateError::RateNotRegistered { .. } | RateError::NothingSelected => ErrorKind::NotFound,
        }
    }
}

/// Directional conversion factor: 1 unit of `from` is worth `rate` units of `to`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyRate {
    from: Currency,
    to: Currency,
    rate: Rate,
}

impl CurrencyRate {
    pub fn new(from: impl Into<Currency>, to: impl Into<Currency>, rate: Rate) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            rate,
        }
    }

    pub fn from_currency(&self) -> &Currency {
        &self.from
    }

    pub fn to_currency(&self) -> &Currency {
        &self.to
    }

    pub fn rate(&self) -> Rate {
        self.rate
    }

    fn key(&self) -> (Currency, Currency) {
        (self.from.clone(), self.to.clone())
    }
}

/// Rates keyed by ordered `(from, to)` pair. A→B says nothing about B→A.
///
/// Rates are held by value: the only way to change one is [`RateRegistry::update_rate`]
/// (or the select/[`RateRegistry::set_rate`] pair built on top of it), and every
/// reader goes through [`RateRegistry::find_rate`].
#[derive(Debug, Default)]
pub struct RateRegistry {
    rates: HashMap<(Currency, Currency), CurrencyRate>,
    selected: Option<(Currency, Currency)>,
}

impl RateRegistry {
    /// Registers `rate` unless its pair is already present. Returns `true` on insert.
    pub fn add_rate(&mut self, rate: CurrencyRate) -> Result<bool, RateError> {
        if rate.rate <= 0 {
            return Err(RateError::NonPositiveRate { rate: rate.rate });
        }
        let key = rate.key();
        if self.rates.contains_key(&key) {
            return Ok(false);
        }
        info!(from = %rate.from, to = %rate.to, rate = rate.rate, "rate registered");
        self.rates.insert(key, rate);
        Ok(true)
    }

    /// Exact-direction lookup.
    pub fn find_rate(&self, from: &Currency, to: &Currency) -> Option<&CurrencyRate> {
        self.rates.get(&(from.clone(), to.clone()))
    }

    pub fn update_rate(
        &mut self,
        from: &Currency,
        to: &Currency,
        value: Rate,
    ) -> Result<(), RateError> {
        if value <= 0 {
            return Err(RateError::NonPositiveRate { rate: value });
        }
        let Some(rate) = self.rates.get_mut(&(from.clone(), to.clone())) else {
            return Err(RateError::RateNotRegistered {
                from: from.clone(),
                to: to.clone(),
            });
        };
        info!(%from, %to, old = rate.rate, new = value, "rate updated");
        rate.rate = value;
        Ok(())
    }

    /// Marks the pair of `rate` as the target of the next [`RateRegistry::set_rate`].
    pub fn select_rate(&mut self, rate: &CurrencyRate) {
        self.selected = Some(rate.key());
    }

    pub fn selected_rate(&self) -> Result<&CurrencyRate, RateError> {
        let (from, to) = self.selected.as_ref().ok_or(RateError::NothingSelected)?;
        self.find_rate(from, to)
            .ok_or_else(|| RateError::RateNotRegistered {
                from: from.clone(),
                to: to.clone(),
            })
    }

    pub fn set_rate(&mut self, value: Rate) -> Result<(), RateError> {
        if value <= 0 {
            return Err(RateError::NonPositiveRate { rate: value });
        }
        let (from, to) = self.selected.clone().ok_or(RateError::NothingSelected)?;
        self.update_rate(&from, &to, value)
    }

    pub fn rates(&self) -> impl Iterator<Item = &CurrencyRate> {
        self.rates.values()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

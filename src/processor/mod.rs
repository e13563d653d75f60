use thiserror::Error;

use crate::{
    command::{CommandError, OperationKind},
    currency::{Amount, CurrencyCode, Rate},
    error::ErrorKind,
    manager::AccountError,
    rate::RateError,
};

pub mod in_memory_processor;

#[derive(Debug, Error)]
pub enum OperationProcessError {
    #[error(transparent)]
    CommandErr(#[from] CommandError),
    #[error(transparent)]
    AccountErr(#[from] AccountError),
    #[error(transparent)]
    RateErr(#[from] RateError),
}

impl OperationProcessError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            OperationProcessError::CommandErr(_) => ErrorKind::InvalidArgument,
            OperationProcessError::AccountErr(err) => err.kind(),
            OperationProcessError::RateErr(err) => err.kind(),
        }
    }
}

pub trait OperationProcessor {
    fn process_operation(
        &mut self,
        kind: OperationKind,
        currency: Option<CurrencyCode>,
        target: Option<CurrencyCode>,
        amount: Option<Amount>,
        rate: Option<Rate>,
    ) -> Result<(), OperationProcessError>;
}

use std::{cell::RefCell, rc::Rc};

use tracing::warn;

use crate::{
    account::AccountCurrency,
    command::{AccountCommand, OperationKind},
    currency::{Amount, CurrencyCode, Rate},
    manager::{AccountManager, InverseRounding, SharedRateRegistry},
    rate::{CurrencyRate, RateRegistry},
};

use super::{OperationProcessError, OperationProcessor};

pub struct InMemoryOperationProcessor {
    pub rates: SharedRateRegistry,
    pub manager: AccountManager,
}

impl InMemoryOperationProcessor {
    pub fn new(rounding: InverseRounding) -> Self {
        let rates = Rc::new(RefCell::new(RateRegistry::default()));
        let manager = AccountManager::new(Rc::clone(&rates)).with_rounding(rounding);
        Self { rates, manager }
    }

    fn execute(&mut self, cmd: AccountCommand) -> Result<(), OperationProcessError> {
        match cmd {
            AccountCommand::AddRate { from, to, rate } => {
                self.rates
                    .borrow_mut()
                    .add_rate(CurrencyRate::new(from, to, rate))?;
            }
            AccountCommand::UpdateRate { from, to, rate } => {
                self.rates.borrow_mut().update_rate(&from, &to, rate)?;
            }
            AccountCommand::Open => {
                // opening again starts over with an empty account
                let account = self.manager.create_account();
                self.manager.set_account(account);
            }
            AccountCommand::AddCurrency { currency, amount } => {
                self.manager
                    .add_currency(AccountCurrency::new(currency, amount))?;
            }
            AccountCommand::SetMain { currency } => {
                self.manager.set_main_currency(&currency)?;
            }
            AccountCommand::Deposit { currency, amount } => {
                self.manager.deposit(amount, currency.as_ref())?;
            }
            AccountCommand::Withdraw { currency, amount } => {
                self.manager.withdraw(amount, currency.as_ref())?;
            }
            AccountCommand::Convert { from, to, amount } => {
                self.manager.convert(&from, &to, amount)?;
            }
            AccountCommand::RemoveCurrency {
                currency,
                convert_to,
            } => {
                self.manager
                    .remove_currency(&currency, convert_to.as_ref())?;
            }
        };
        Ok(())
    }
}

impl Default for InMemoryOperationProcessor {
    fn default() -> Self {
        Self::new(InverseRounding::default())
    }
}

impl OperationProcessor for InMemoryOperationProcessor {
    fn process_operation(
        &mut self,
        kind: OperationKind,
        currency: Option<CurrencyCode>,
        target: Option<CurrencyCode>,
        amount: Option<Amount>,
        rate: Option<Rate>,
    ) -> Result<(), OperationProcessError> {
        let cmd = AccountCommand::parse_command(kind, currency, target, amount, rate)?;
        self.execute(cmd)
            .inspect_err(|err| warn!(?kind, %err, "operation rejected"))
    }
}

//! Property tests for balance moves and main currency handling.

use std::{cell::RefCell, rc::Rc};

use proptest::prelude::*;

use crate::{
    account::AccountCurrency,
    currency::{Amount, Currency, CurrencyCode},
    error::ErrorKind,
    rate::{CurrencyRate, RateRegistry},
};

use super::AccountManager;

fn code_strategy() -> impl Strategy<Value = CurrencyCode> {
    prop_oneof![
        Just(CurrencyCode::Usd),
        Just(CurrencyCode::Eur),
        Just(CurrencyCode::Rub),
    ]
}

fn balance_strategy() -> impl Strategy<Value = Amount> {
    0..1_000_000_000i64
}

fn funded_manager(usd: Amount, eur: Amount, rub: Amount) -> AccountManager {
    let mut manager = AccountManager::new(Rc::new(RefCell::new(RateRegistry::default())));
    let account = manager.create_account();
    manager.set_account(account);
    for (code, amount) in [
        (CurrencyCode::Usd, usd),
        (CurrencyCode::Eur, eur),
        (CurrencyCode::Rub, rub),
    ] {
        manager
            .add_currency(AccountCurrency::new(code, amount))
            .unwrap();
    }
    manager
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_withdraw_whole_balance(
        code in code_strategy(),
        usd in balance_strategy(),
        eur in balance_strategy(),
        rub in balance_strategy(),
    ) {
        let mut manager = funded_manager(usd, eur, rub);
        let currency = Currency::from(code);
        let balance = manager.balance(Some(&currency)).unwrap();

        let err = manager.withdraw(balance + 1, Some(&currency)).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::InsufficientFunds);
        prop_assert_eq!(manager.balance(Some(&currency)).unwrap(), balance);

        manager.withdraw(balance, Some(&currency)).unwrap();
        prop_assert_eq!(manager.balance(Some(&currency)).unwrap(), 0);
    }

    #[test]
    fn prop_deposit_then_withdraw_restores(
        code in code_strategy(),
        start in balance_strategy(),
        amount in balance_strategy(),
    ) {
        let mut manager = funded_manager(start, start, start);
        let currency = Currency::from(code);

        manager.deposit(amount, Some(&currency)).unwrap();
        manager.withdraw(amount, Some(&currency)).unwrap();
        prop_assert_eq!(manager.balance(Some(&currency)).unwrap(), start);
    }

    #[test]
    fn prop_single_main_currency(codes in prop::collection::vec(code_strategy(), 1..10)) {
        let mut manager = funded_manager(0, 0, 0);
        for code in &codes {
            manager.set_main_currency(&Currency::from(*code)).unwrap();
        }
        let last = Currency::from(*codes.last().unwrap());

        let mains: Vec<_> = manager.currencies().unwrap().filter(|ac| ac.is_main()).collect();
        prop_assert_eq!(mains.len(), 1);
        prop_assert_eq!(mains[0].currency(), &last);
    }

    #[test]
    fn prop_main_currency_cannot_be_removed(
        code in code_strategy(),
        balance in balance_strategy(),
    ) {
        let mut manager = funded_manager(balance, balance, balance);
        let currency = Currency::from(code);
        manager.set_main_currency(&currency).unwrap();

        let err = manager.remove_currency(&currency, None).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::InvalidState);
        prop_assert_eq!(manager.account().unwrap().len(), 3);
    }

    #[test]
    fn prop_direct_rate_multiplies(
        amount in 0..1_000_000i64,
        rate in 1..10_000i64,
    ) {
        let mut manager = funded_manager(amount, 0, 0);
        manager
            .rates()
            .borrow_mut()
            .add_rate(CurrencyRate::new(CurrencyCode::Usd, CurrencyCode::Rub, rate))
            .unwrap();
        let usd = Currency::from(CurrencyCode::Usd);
        let rub = Currency::from(CurrencyCode::Rub);

        let converted = manager.convert(&usd, &rub, amount).unwrap();
        prop_assert_eq!(converted, amount * rate);
        prop_assert_eq!(manager.balance(Some(&usd)).unwrap(), 0);
        prop_assert_eq!(manager.balance(Some(&rub)).unwrap(), amount * rate);
    }

    #[test]
    fn prop_inverse_rate_rounds_to_nearest(
        amount in 0..1_000_000i64,
        rate in 1..10_000i64,
    ) {
        let mut manager = funded_manager(0, 0, amount);
        manager
            .rates()
            .borrow_mut()
            .add_rate(CurrencyRate::new(CurrencyCode::Eur, CurrencyCode::Rub, rate))
            .unwrap();
        let rub = Currency::from(CurrencyCode::Rub);
        let eur = Currency::from(CurrencyCode::Eur);

        let converted = manager.convert(&rub, &eur, amount).unwrap();
        // integer form of half-away-from-zero for non-negative amounts
        prop_assert_eq!(converted, (2 * amount + rate) / (2 * rate));
    }
}

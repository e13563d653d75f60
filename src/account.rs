use crate::currency::{Amount, Currency};

/// Balance held in one currency of an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountCurrency {
    currency: Currency,
    amount: Amount,
    main: bool,
}

impl AccountCurrency {
    pub fn new(currency: impl Into<Currency>, amount: Amount) -> Self {
        Self {
            currency: currency.into(),
            amount,
            main: false,
        }
    }

    pub fn currency(&self) -> &Currency {
        &self.currency
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn is_main(&self) -> bool {
        self.main
    }

    pub(crate) fn set_amount(&mut self, amount: Amount) {
        self.amount = amount;
    }

    pub(crate) fn set_main(&mut self, main: bool) {
        self.main = main;
    }
}

/// Sub-balances keyed by currency. Listing follows insertion order.
///
/// No validation happens here, the main currency flag is owned by
/// [`crate::manager::AccountManager`].
#[derive(Debug, Default)]
pub struct Account {
    currencies: Vec<AccountCurrency>,
}

impl Account {
    /// Inserts `sub_balance`, replacing any entry with the same currency in place.
    pub fn add(&mut self, sub_balance: AccountCurrency) {
        match self.position(&sub_balance.currency) {
            Some(idx) => self.currencies[idx] = sub_balance,
            None => self.currencies.push(sub_balance),
        }
    }

    pub fn remove(&mut self, currency: &Currency) -> Option<AccountCurrency> {
        self.position(currency)
            .map(|idx| self.currencies.remove(idx))
    }

    pub fn get(&self, currency: &Currency) -> Option<&AccountCurrency> {
        self.currencies.iter().find(|ac| &ac.currency == currency)
    }

    pub fn get_mut(&mut self, currency: &Currency) -> Option<&mut AccountCurrency> {
        self.currencies.iter_mut().find(|ac| &ac.currency == currency)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AccountCurrency> {
        self.currencies.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut AccountCurrency> {
        self.currencies.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.currencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.currencies.is_empty()
    }

    fn position(&self, currency: &Currency) -> Option<usize> {
        self.currencies.iter().position(|ac| &ac.currency == currency)
    }
}

#[cfg(test)]
mod tests {
    use crate::currency::CurrencyCode;

    use super::*;

    #[test]
    fn add_get_remove() {
        let mut acc = Account::default();
        acc.add(AccountCurrency::new(CurrencyCode::Usd, 100));
        acc.add(AccountCurrency::new(CurrencyCode::Eur, 150));
        assert_eq!(acc.len(), 2);

        let usd = Currency::from(CurrencyCode::Usd);
        let sub_balance = acc.get(&usd).unwrap();
        assert_eq!(sub_balance.amount(), 100);
        assert!(!sub_balance.is_main());
        assert!(acc.get(&CurrencyCode::Rub.into()).is_none());

        let names: Vec<&str> = acc.iter().map(|ac| ac.currency().name()).collect();
        assert_eq!(names, ["USD", "EUR"]);

        let removed = acc.remove(&usd).unwrap();
        assert_eq!(removed.amount(), 100);
        // removing twice is a no-op
        assert!(acc.remove(&usd).is_none());
        assert_eq!(acc.len(), 1);
    }

    #[test]
    fn add_overwrites_same_currency() {
        let mut acc = Account::default();
        acc.add(AccountCurrency::new(CurrencyCode::Usd, 100));
        acc.add(AccountCurrency::new(CurrencyCode::Rub, 5));
        acc.add(AccountCurrency::new(CurrencyCode::Usd, 7));

        assert_eq!(acc.len(), 2);
        assert_eq!(acc.get(&CurrencyCode::Usd.into()).unwrap().amount(), 7);
        // position of the replaced entry is kept
        assert_eq!(acc.iter().next().unwrap().currency().name(), "USD");
    }

    #[test]
    fn mutate_in_place() {
        let mut acc = Account::default();
        acc.add(AccountCurrency::new(CurrencyCode::Eur, 0));
        let eur = acc.get_mut(&CurrencyCode::Eur.into()).unwrap();
        eur.set_amount(42);
        eur.set_main(true);

        let eur = acc.iter().next().unwrap();
        assert_eq!(eur.amount(), 42);
        assert!(eur.is_main());
    }
}

use std::io::Read;

use crate::{
    command::OperationKind,
    currency::{Amount, CurrencyCode, Rate},
};
use csv::{DeserializeRecordsIntoIter, Trim};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Operation {
    #[serde(rename = "type")]
    pub kind: OperationKind,
    pub currency: Option<CurrencyCode>,
    pub target: Option<CurrencyCode>,
    pub amount: Option<Amount>,
    pub rate: Option<Rate>,
}

/// Parses an operation script in CSV format, yielding each row with its line number.
pub struct CsvOperationParser<R> {
    iter: DeserializeRecordsIntoIter<R, Operation>,
}

impl<R> CsvOperationParser<R>
where
    R: Read,
{
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(source);

        Self {
            iter: reader.into_deserialize(),
        }
    }
}

impl<R> Iterator for CsvOperationParser<R>
where
    R: Read,
{
    type Item = (u64, csv::Result<Operation>);

    fn next(&mut self) -> Option<Self::Item> {
        let curr_line = self.iter.reader().position().line();
        self.iter.next().map(|row| (curr_line, row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_operations() {
        let input = "type, currency, target, amount, rate\n\
                     add_rate, EUR, RUB, , 80\n\
                     deposit, , , 1000,\n\
                     remove_currency, USD\n";
        let rows: Vec<Operation> = CsvOperationParser::new(input.as_bytes())
            .map(|(_, row)| row.unwrap())
            .collect();
        assert_eq!(rows.len(), 3);

        assert_eq!(rows[0].kind, OperationKind::AddRate);
        assert_eq!(rows[0].currency, Some(CurrencyCode::Eur));
        assert_eq!(rows[0].target, Some(CurrencyCode::Rub));
        assert_eq!(rows[0].amount, None);
        assert_eq!(rows[0].rate, Some(80));

        assert_eq!(rows[1].kind, OperationKind::Deposit);
        assert_eq!(rows[1].currency, None);
        assert_eq!(rows[1].amount, Some(1000));

        assert_eq!(rows[2].kind, OperationKind::RemoveCurrency);
        assert_eq!(rows[2].currency, Some(CurrencyCode::Usd));
        assert_eq!(rows[2].target, None);
    }

    #[test]
    fn unknown_currency_is_an_error() {
        let input = "type,currency,target,amount,rate\nset_main,GBP,,,\n";
        let mut parser = CsvOperationParser::new(input.as_bytes());
        let (_, row) = parser.next().unwrap();
        assert!(row.is_err());
    }
}

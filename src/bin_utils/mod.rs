//! Bootstraps [`crate::processor`] for the binary: reads an operation script,
//! runs it against one account and prints the resulting sub-balances.

use std::io::{Read, Write};

use crate::{
    manager::InverseRounding,
    processor::{
        OperationProcessError, OperationProcessor,
        in_memory_processor::InMemoryOperationProcessor,
    },
};
use anyhow::{Context, Result};
use csv_parser::CsvOperationParser;
use csv_printer::{SubBalance, print_balances};
pub mod csv_parser;
pub mod csv_printer;

pub struct Service<'w, R, W: 'w> {
    pub input: R,
    pub output: &'w mut W,
    pub rounding: InverseRounding,
    pub error_printer: Box<dyn FnMut(u64, OperationProcessError)>,
}

impl<'w, R, W> Service<'w, R, W>
where
    R: Read,
    W: Write + 'w,
{
    pub fn run(mut self) -> Result<()> {
        let parser = CsvOperationParser::new(self.input);

        let mut processor = InMemoryOperationProcessor::new(self.rounding);

        for (line, row) in parser {
            let row = row.with_context(|| format!("Malformed operation at line {line}"))?;
            if let Err(err) =
                processor.process_operation(row.kind, row.currency, row.target, row.amount, row.rate)
            {
                (self.error_printer)(line, err);
            }
        }

        // an account that was never opened prints as empty
        print_balances(
            self.output,
            processor
                .manager
                .currencies()
                .into_iter()
                .flatten()
                .map(|ac| SubBalance {
                    currency: ac.currency().to_string(),
                    amount: ac.amount(),
                    main: ac.is_main(),
                }),
        )
    }
}

//! Line-based prompts. Invalid answers are reported and asked again; only
//! a closed input stream ends a prompt early.

use std::io::{self, BufRead, Write};

use rust_decimal::Decimal;
use tax_core::FilingStatus;
use tax_data::Jurisdiction;
use thiserror::Error;

use crate::utils::parse_decimal;

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("input closed before an answer was given")]
    Closed,

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(
        input: R,
        output: W,
    ) -> Self {
        Self { input, output }
    }

    /// Writer shared with the rest of the interactive output.
    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    fn ask(
        &mut self,
        question: &str,
    ) -> Result<String, PromptError> {
        write!(self.output, "{question}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(PromptError::Closed);
        }
        Ok(line.trim().to_string())
    }

    pub fn filing_status(&mut self) -> Result<FilingStatus, PromptError> {
        writeln!(self.output, "What is your filing status?")?;
        for status in FilingStatus::ALL {
            writeln!(self.output, "[{}] {}", status.menu_number(), status.label())?;
        }

        loop {
            let answer = self.ask("Enter a number from 1 to 4: ")?;
            match FilingStatus::parse(&answer) {
                Some(status) => return Ok(status),
                None => writeln!(self.output, "Invalid filing status '{answer}'.")?,
            }
        }
    }

    /// Accepts `$` and thousands separators; negative amounts are refused.
    pub fn taxable_income(&mut self) -> Result<Decimal, PromptError> {
        loop {
            let answer = self.ask("Please enter your taxable income: $")?;
            if answer.is_empty() {
                continue;
            }
            match parse_decimal(&answer) {
                Ok(income) if income < Decimal::ZERO => {
                    writeln!(self.output, "Taxable income cannot be negative.")?
                }
                Ok(income) => return Ok(income),
                Err(_) => writeln!(self.output, "'{answer}' is not a valid amount.")?,
            }
        }
    }

    /// `y`/`yes` in any case is a yes; anything else is a no.
    pub fn confirm(
        &mut self,
        question: &str,
    ) -> Result<bool, PromptError> {
        let answer = self.ask(&format!("{question} [y/n]: "))?;
        Ok(matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes"))
    }

    pub fn state(&mut self) -> Result<Jurisdiction, PromptError> {
        loop {
            let answer = self.ask("Please enter your state's abbreviated name: ")?;
            match Jurisdiction::state(&answer) {
                Some(state) => return Ok(state),
                None => writeln!(self.output, "Invalid state abbreviation.")?,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn prompter(input: &str) -> Prompter<&[u8], Vec<u8>> {
        Prompter::new(input.as_bytes(), Vec::new())
    }

    fn transcript(p: Prompter<&[u8], Vec<u8>>) -> String {
        String::from_utf8(p.output).unwrap()
    }

    #[test]
    fn filing_status_reprompts_until_valid() {
        let mut p = prompter("7\nabc\n3\n");

        let status = p.filing_status().unwrap();

        assert_eq!(status, FilingStatus::MarriedSeparate);
        let out = transcript(p);
        assert!(out.contains("[1] Single"));
        assert!(out.contains("[4] Head of household"));
        assert!(out.contains("Invalid filing status '7'."));
        assert!(out.contains("Invalid filing status 'abc'."));
    }

    #[test]
    fn filing_status_accepts_keys() {
        let mut p = prompter("head_of_household\n");

        assert_eq!(p.filing_status().unwrap(), FilingStatus::HeadOfHousehold);
    }

    #[test]
    fn income_accepts_currency_formatting() {
        let mut p = prompter("$50,000.25\n");

        assert_eq!(p.taxable_income().unwrap(), dec!(50000.25));
    }

    #[test]
    fn income_rejects_negative_and_garbage() {
        let mut p = prompter("-10\nlots\n0\n");

        let income = p.taxable_income().unwrap();

        assert_eq!(income, dec!(0));
        let out = transcript(p);
        assert!(out.contains("cannot be negative"));
        assert!(out.contains("'lots' is not a valid amount."));
    }

    #[test]
    fn confirm_understands_yes_variants() {
        assert!(prompter("Y\n").confirm("Continue?").unwrap());
        assert!(prompter("yes\n").confirm("Continue?").unwrap());
        assert!(!prompter("n\n").confirm("Continue?").unwrap());
        assert!(!prompter("\n").confirm("Continue?").unwrap());
    }

    #[test]
    fn state_reprompts_on_unknown_abbreviation() {
        let mut p = prompter("ZZ\nca\n");

        let state = p.state().unwrap();

        assert_eq!(state.label(), "CA");
        assert!(transcript(p).contains("Invalid state abbreviation."));
    }

    #[test]
    fn closed_input_is_an_error() {
        let mut p = prompter("");

        assert!(matches!(p.taxable_income(), Err(PromptError::Closed)));
    }
}

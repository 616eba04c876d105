//! Plain-text rendering of a computation result

use rust_decimal::Decimal;
use statera_config::CurrencyConfig;
use statera_core::{ComputationResult, Direction, Metadata};
use statera_utils::format_decimal;
use std::fmt::Write;

/// Shown for a ratio whose denominator is zero
pub const UNDEFINED: &str = "—";

const WIDTH: usize = 28;

pub struct Renderer<'a> {
    currency: &'a CurrencyConfig,
}

impl<'a> Renderer<'a> {
    pub fn new(currency: &'a CurrencyConfig) -> Self {
        Self { currency }
    }

    /// Amount with the currency symbol; the sign goes before the symbol
    pub fn money(&self, value: Decimal) -> String {
        let formatted = format_decimal(
            value,
            self.currency.decimal_places,
            &self.currency.thousands_separator,
            &self.currency.decimal_separator,
        );
        match formatted.strip_prefix('-') {
            Some(digits) => format!("-{}{}", self.currency.symbol, digits),
            None => format!("{}{}", self.currency.symbol, formatted),
        }
    }

    fn number(&self, value: Option<Decimal>) -> String {
        match value {
            Some(v) => format_decimal(v, 2, "", &self.currency.decimal_separator),
            None => UNDEFINED.to_string(),
        }
    }

    pub fn consistency_line(&self, result: &ComputationResult) -> String {
        match result.direction() {
            Direction::Balanced => "Balanced: assets = liabilities + equity".to_string(),
            Direction::AssetsExceed => format!(
                "NOT balanced: assets exceed liabilities + equity by {}",
                self.money(result.imbalance)
            ),
            Direction::ClaimsExceed => format!(
                "NOT balanced: liabilities + equity exceed assets by {}",
                self.money(result.imbalance.abs())
            ),
        }
    }

    pub fn report(&self, meta: &Metadata, result: &ComputationResult) -> String {
        let mut out = String::new();
        let line = |out: &mut String, label: &str, value: Decimal| {
            let _ = writeln!(out, "  {:<width$} {:>18}", label, self.money(value), width = WIDTH);
        };

        if !meta.company_name.is_empty() || !meta.period_label.is_empty() {
            let _ = writeln!(out, "{} {}", meta.company_name, meta.period_label);
            let _ = writeln!(out);
        }

        let bs = &result.balance_sheet;
        let _ = writeln!(out, "BALANCE SHEET");
        line(&mut out, "Current assets", bs.current_assets);
        line(&mut out, "Non-current assets", bs.non_current_assets);
        line(&mut out, "Total assets", bs.total_assets);
        line(&mut out, "Current liabilities", bs.current_liabilities);
        line(&mut out, "Non-current liabilities", bs.non_current_liabilities);
        line(&mut out, "Total liabilities", bs.total_liabilities);
        line(&mut out, "Equity", bs.total_equity);
        line(&mut out, "Liabilities + equity", bs.liabilities_plus_equity);

        let is = &result.income_statement;
        let _ = writeln!(out, "\nINCOME STATEMENT");
        line(&mut out, "Revenue", is.total_revenue);
        line(&mut out, "Cost of sales", is.cost_of_sales);
        line(&mut out, "Gross profit", is.gross_profit);
        line(&mut out, "Operating expenses", is.operating_expenses);
        line(&mut out, "Operating result", is.operating_result);
        line(&mut out, "EBITDA", is.ebitda);
        line(&mut out, "Financial expense", is.financial_expense);
        line(&mut out, "Pre-tax result", is.pre_tax_result);
        line(&mut out, "Tax", is.tax_expense);
        line(&mut out, "Net result", is.net_result);

        let cf = &result.cash_flow;
        let _ = writeln!(out, "\nCASH FLOW");
        line(&mut out, "Receipts", cf.receipts);
        line(&mut out, "Payments", cf.payments);
        line(&mut out, "Payroll", cf.payroll);
        line(&mut out, "Financial", cf.financial);
        line(&mut out, "Net flow", cf.net_flow);

        let _ = writeln!(out, "\nRATIOS");
        for (name, value) in result.ratios.named() {
            let shown = if name == "working_capital" {
                value.map_or_else(|| UNDEFINED.to_string(), |v| self.money(v))
            } else {
                self.number(value)
            };
            let _ = writeln!(out, "  {:<width$} {:>18}", name, shown, width = WIDTH);
        }

        let _ = writeln!(out, "\n{}", self.consistency_line(result));
        out
    }
}

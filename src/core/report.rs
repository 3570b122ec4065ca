use serde::Serialize;

use super::types::{BuyVsRentInput, BuyVsRentResult};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Buying,
    Renting,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportYear {
    pub year: u32,
    pub home_equity: f64,
    pub renting_net_worth: f64,
    /// `home_equity - renting_net_worth`.
    pub difference: f64,
    pub leader: Verdict,
    pub principal_paid: f64,
    pub interest_paid: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpfrontCosts {
    pub down_payment: f64,
    pub closing_costs: f64,
    pub renovation: f64,
    pub total: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringCosts {
    pub property_tax: f64,
    pub maintenance: f64,
    pub hoa: f64,
    pub mortgage_payments: f64,
}

/// Year-by-year breakdown and headline figures for a computed projection.
///
/// Every figure is read from [`BuyVsRentResult`]; nothing here re-derives
/// interest or taxes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedReport {
    pub verdict: Verdict,
    pub difference: f64,
    pub break_even_year: Option<u32>,
    pub years: Vec<ReportYear>,
    pub loan_amount: f64,
    pub total_interest_paid: f64,
    /// Interest as a percentage of the loan amount.
    pub interest_share_of_loan: f64,
    pub mortgage_interest_tax_benefit: f64,
    pub upfront: UpfrontCosts,
    /// Totals over the horizon at the purchase-price cost base.
    pub recurring: RecurringCosts,
    pub selling_costs: f64,
    /// First year in which appreciation alone covers the closing costs.
    pub closing_cost_recovery_year: Option<u32>,
    pub final_portfolio: f64,
    pub investment_gains: f64,
}

impl DetailedReport {
    pub fn build(input: &BuyVsRentInput, result: &BuyVsRentResult) -> Self {
        let mut years = Vec::with_capacity(result.yearly_data.len());
        let mut previous_balance = result.mortgage_principal;
        for row in &result.yearly_data {
            let home_equity = row.home_value - row.mortgage_balance;
            let difference = home_equity - row.renting_net_worth;
            years.push(ReportYear {
                year: row.year,
                home_equity,
                renting_net_worth: row.renting_net_worth,
                difference,
                leader: if difference > 0.0 {
                    Verdict::Buying
                } else {
                    Verdict::Renting
                },
                principal_paid: previous_balance - row.mortgage_balance,
                interest_paid: row.interest_paid,
            });
            previous_balance = row.mortgage_balance;
        }

        let horizon_months = f64::from(input.duration_years) * 12.0;
        let payment_months = f64::from(input.duration_years.min(input.mortgage_period_years)) * 12.0;
        let interest_share_of_loan = if result.mortgage_principal > 0.0 {
            result.total_interest_paid / result.mortgage_principal * 100.0
        } else {
            0.0
        };

        let closing_cost_recovery_year = result
            .yearly_data
            .iter()
            .skip(1)
            .find(|row| row.home_value - input.home_price >= result.closing_costs)
            .map(|row| row.year);

        let final_portfolio = result
            .final_year()
            .map_or(result.initial_cash_out, |row| row.investment_portfolio);

        Self {
            verdict: if result.buying_wins {
                Verdict::Buying
            } else {
                Verdict::Renting
            },
            difference: result.difference,
            break_even_year: result.break_even_year,
            years,
            loan_amount: result.mortgage_principal,
            total_interest_paid: result.total_interest_paid,
            interest_share_of_loan,
            mortgage_interest_tax_benefit: result.mortgage_interest_tax_benefit,
            upfront: UpfrontCosts {
                down_payment: result.down_payment,
                closing_costs: result.closing_costs,
                renovation: input.renovation_cost,
                total: result.initial_cash_out,
            },
            recurring: RecurringCosts {
                property_tax: result.monthly_property_tax * horizon_months,
                maintenance: result.monthly_maintenance * horizon_months,
                hoa: input.hoa_monthly_fee * horizon_months,
                mortgage_payments: result.monthly_mortgage_payment * payment_months,
            },
            selling_costs: result.selling_costs,
            closing_cost_recovery_year,
            final_portfolio,
            investment_gains: final_portfolio - result.initial_cash_out,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::compute;

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn report_reads_engine_figures() {
        let input = BuyVsRentInput::default();
        let result = compute(&input);
        let report = DetailedReport::build(&input, &result);

        assert_eq!(report.years.len(), result.yearly_data.len());
        assert_eq!(report.total_interest_paid, result.total_interest_paid);
        assert_eq!(report.difference, result.difference);
        assert_eq!(report.break_even_year, result.break_even_year);
        assert_eq!(report.verdict == Verdict::Buying, result.buying_wins);
        assert_eq!(report.loan_amount, 320_000.0);
        assert_approx(
            report.interest_share_of_loan,
            result.total_interest_paid / 320_000.0 * 100.0,
        );
        assert_approx(report.upfront.total, 151_000.0);
        assert_approx(
            report.investment_gains,
            result.final_renting_net_worth - result.initial_cash_out,
        );
    }

    #[test]
    fn yearly_principal_and_interest_sum_to_payments() {
        let input = BuyVsRentInput::default();
        let result = compute(&input);
        let report = DetailedReport::build(&input, &result);

        assert_eq!(report.years[0].principal_paid, 0.0);
        assert_eq!(report.years[0].interest_paid, 0.0);
        for row in &report.years[1..] {
            assert!(
                (row.principal_paid + row.interest_paid - result.monthly_mortgage_payment * 12.0)
                    .abs()
                    < 1e-4,
                "year {}",
                row.year
            );
        }
    }

    #[test]
    fn recurring_costs_use_purchase_price_base() {
        let input = BuyVsRentInput::default();
        let report = DetailedReport::build(&input, &compute(&input));

        assert_approx(report.recurring.property_tax, 840.0 * 10.0);
        assert_approx(report.recurring.maintenance, 4_000.0 * 10.0);
        assert_approx(report.recurring.hoa, 200.0 * 12.0 * 10.0);
    }

    #[test]
    fn closing_costs_recovered_once_appreciation_covers_them() {
        let input = BuyVsRentInput::default();
        let report = DetailedReport::build(&input, &compute(&input));

        // 46000 of closing costs: 400000 * 1.03^y - 400000 first exceeds it at y = 4.
        assert_eq!(report.closing_cost_recovery_year, Some(4));
    }

    #[test]
    fn falling_market_never_recovers_closing_costs() {
        let mut input = BuyVsRentInput::default();
        input.home_appreciation_annual = -2.0;
        let report = DetailedReport::build(&input, &compute(&input));
        assert_eq!(report.closing_cost_recovery_year, None);
    }

    #[test]
    fn zero_loan_has_zero_interest_share() {
        let mut input = BuyVsRentInput::default();
        input.down_payment_percent = 100.0;
        let report = DetailedReport::build(&input, &compute(&input));

        assert_eq!(report.loan_amount, 0.0);
        assert_eq!(report.interest_share_of_loan, 0.0);
        assert_eq!(report.total_interest_paid, 0.0);
    }

    #[test]
    fn report_serializes_camel_case_keys() {
        let input = BuyVsRentInput::default();
        let report = DetailedReport::build(&input, &compute(&input));
        let json = serde_json::to_string(&report).expect("report should serialize");

        assert!(json.contains("\"totalInterestPaid\""));
        assert!(json.contains("\"closingCostRecoveryYear\""));
        assert!(json.contains("\"homeEquity\""));
        assert!(json.contains("\"verdict\":\""));
    }
}

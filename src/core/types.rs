use serde::{Deserialize, Serialize};

/// Assumptions for one buy-vs-rent projection.
///
/// Currency amounts share a single base unit and every rate is a percentage
/// (`3.5` means 3.5%). The engine does not validate these values: a zero
/// duration or a negative price is computed as given.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyVsRentInput {
    pub home_price: f64,
    pub duration_years: u32,
    pub home_appreciation_annual: f64,

    pub down_payment_percent: f64,
    pub mortgage_rate_percent: f64,
    pub mortgage_period_years: u32,

    pub closing_costs_percent: f64,
    pub renovation_cost: f64,
    pub hoa_monthly_fee: f64,
    pub maintenance_annual_percent: f64,
    pub property_tax_annual_percent: f64,
    pub selling_costs_percent: f64,
    pub mortgage_interest_deduction_percent: f64,

    pub monthly_rent: f64,
    pub rent_growth_annual_percent: f64,

    pub investment_return_annual: f64,
    pub investment_tax_rate_percent: f64,
}

impl Default for BuyVsRentInput {
    fn default() -> Self {
        Self {
            home_price: 400_000.0,
            duration_years: 10,
            home_appreciation_annual: 3.0,
            down_payment_percent: 20.0,
            mortgage_rate_percent: 3.5,
            mortgage_period_years: 25,
            closing_costs_percent: 11.5,
            renovation_cost: 25_000.0,
            hoa_monthly_fee: 200.0,
            maintenance_annual_percent: 1.0,
            property_tax_annual_percent: 0.21,
            selling_costs_percent: 3.5,
            mortgage_interest_deduction_percent: 0.0,
            monthly_rent: 1_500.0,
            rent_growth_annual_percent: 2.0,
            investment_return_annual: 7.0,
            investment_tax_rate_percent: 15.0,
        }
    }
}

/// End-of-year snapshot of both paths. Year 0 is the purchase date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyData {
    pub year: u32,

    pub home_value: f64,
    pub mortgage_balance: f64,
    /// Equity, less selling costs in the final year only.
    pub buying_net_worth: f64,
    pub buyer_cumulative_expenses: f64,
    pub buyer_monthly_expense: f64,
    /// Mortgage interest paid during this year.
    pub interest_paid: f64,

    pub rent_cumulative_expenses: f64,
    pub renter_monthly_rent: f64,
    pub investment_portfolio: f64,
    pub renting_net_worth: f64,

    /// Monthly amount the renter invests this year, never negative.
    pub monthly_delta: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyVsRentResult {
    pub yearly_data: Vec<YearlyData>,
    pub break_even_year: Option<u32>,
    pub buying_wins: bool,
    pub final_buying_net_worth: f64,
    pub final_renting_net_worth: f64,
    /// `final_buying_net_worth - final_renting_net_worth`; positive favours buying.
    pub difference: f64,
    pub total_buying_costs: f64,
    pub total_renting_costs: f64,

    pub down_payment: f64,
    pub closing_costs: f64,
    pub initial_cash_out: f64,
    pub mortgage_principal: f64,
    pub monthly_mortgage_payment: f64,
    pub monthly_maintenance: f64,
    pub monthly_property_tax: f64,
    pub total_interest_paid: f64,
    pub mortgage_interest_tax_benefit: f64,
    pub selling_costs: f64,
}

impl BuyVsRentResult {
    pub fn final_year(&self) -> Option<&YearlyData> {
        self.yearly_data.last()
    }
}

use super::types::{BuyVsRentInput, BuyVsRentResult, YearlyData};

const MONTHS_PER_YEAR: u32 = 12;

#[derive(Debug, Clone, Copy)]
struct PurchaseSetup {
    down_payment: f64,
    closing_costs: f64,
    initial_cash_out: f64,
    mortgage_principal: f64,
    monthly_payment: f64,
    monthly_maintenance: f64,
    monthly_property_tax: f64,
}

impl PurchaseSetup {
    fn from_input(input: &BuyVsRentInput) -> Self {
        let down_payment = input.home_price * (input.down_payment_percent / 100.0);
        let closing_costs = input.home_price * (input.closing_costs_percent / 100.0);
        let mortgage_principal = input.home_price - down_payment;
        Self {
            down_payment,
            closing_costs,
            initial_cash_out: down_payment + closing_costs + input.renovation_cost,
            mortgage_principal,
            monthly_payment: monthly_mortgage_payment(
                mortgage_principal,
                input.mortgage_rate_percent,
                input.mortgage_period_years,
            ),
            // Held at the purchase price for the whole horizon.
            monthly_maintenance: input.home_price * input.maintenance_annual_percent / 100.0 / 12.0,
            monthly_property_tax: input.home_price * input.property_tax_annual_percent
                / 100.0
                / 12.0,
        }
    }

    fn buyer_monthly_housing_cost(&self, input: &BuyVsRentInput) -> f64 {
        self.monthly_payment
            + self.monthly_maintenance
            + self.monthly_property_tax
            + input.hoa_monthly_fee
    }
}

#[derive(Debug)]
struct InterestSchedule {
    total: f64,
    by_year: Vec<f64>,
}

/// Fixed monthly payment that retires `principal` over `years` at
/// `annual_rate_percent`.
pub fn monthly_mortgage_payment(principal: f64, annual_rate_percent: f64, years: u32) -> f64 {
    let monthly_rate = monthly_rate(annual_rate_percent);
    let payments = f64::from(years * MONTHS_PER_YEAR);

    if monthly_rate == 0.0 {
        return principal / payments;
    }

    let growth = (1.0 + monthly_rate).powf(payments);
    principal * (monthly_rate * growth) / (growth - 1.0)
}

/// Outstanding balance after `months_paid` payments, from the closed-form
/// amortization identity. The result can dip slightly below zero at maturity;
/// callers clamp it.
pub fn remaining_mortgage_balance(
    principal: f64,
    monthly_payment: f64,
    annual_rate_percent: f64,
    months_paid: u32,
) -> f64 {
    let monthly_rate = monthly_rate(annual_rate_percent);
    let months = f64::from(months_paid);

    if monthly_rate == 0.0 {
        return (principal - monthly_payment * months).max(0.0);
    }

    let growth = (1.0 + monthly_rate).powf(months);
    principal * growth - monthly_payment * (growth - 1.0) / monthly_rate
}

/// Projects both paths year by year and aggregates the verdict.
pub fn compute(input: &BuyVsRentInput) -> BuyVsRentResult {
    let setup = PurchaseSetup::from_input(input);
    let interest = interest_schedule(input, &setup);

    let after_tax_monthly_return = monthly_rate(input.investment_return_annual)
        * (1.0 - input.investment_tax_rate_percent / 100.0);
    let buyer_monthly_cost = setup.buyer_monthly_housing_cost(input);
    let period_months = input.mortgage_period_years * MONTHS_PER_YEAR;

    let mut yearly_data = Vec::with_capacity(input.duration_years as usize + 1);
    let mut break_even_year = None;
    let mut brokerage_balance = setup.initial_cash_out;
    let mut buyer_cash_outflow = setup.initial_cash_out;
    let mut renter_cash_outflow = 0.0;

    for year in 0..=input.duration_years {
        let home_value = compound(input.home_price, input.home_appreciation_annual, year);

        let months_paid = (year * MONTHS_PER_YEAR).min(period_months);
        let mortgage_balance = remaining_mortgage_balance(
            setup.mortgage_principal,
            setup.monthly_payment,
            input.mortgage_rate_percent,
            months_paid,
        )
        .max(0.0);

        let monthly_rent = compound(input.monthly_rent, input.rent_growth_annual_percent, year);
        let monthly_delta = (buyer_monthly_cost - monthly_rent).max(0.0);

        if year > 0 {
            renter_cash_outflow += monthly_rent * 12.0;
            for _ in 0..MONTHS_PER_YEAR {
                brokerage_balance *= 1.0 + after_tax_monthly_return;
                brokerage_balance += monthly_delta;
            }
            buyer_cash_outflow += buyer_monthly_cost * 12.0;
        }

        let buying_net_worth = if year == input.duration_years {
            let selling_costs = home_value * (input.selling_costs_percent / 100.0);
            home_value - mortgage_balance - selling_costs
        } else {
            home_value - mortgage_balance
        };
        let renting_net_worth = brokerage_balance;

        if break_even_year.is_none() && year > 0 && buying_net_worth > renting_net_worth {
            break_even_year = Some(year);
        }

        yearly_data.push(YearlyData {
            year,
            home_value,
            mortgage_balance,
            buying_net_worth,
            buyer_cumulative_expenses: buyer_cash_outflow,
            buyer_monthly_expense: buyer_monthly_cost,
            interest_paid: interest.by_year[year as usize],
            rent_cumulative_expenses: renter_cash_outflow,
            renter_monthly_rent: monthly_rent,
            investment_portfolio: brokerage_balance,
            renting_net_worth,
            monthly_delta,
        });
    }

    let final_year = yearly_data[input.duration_years as usize];
    let mortgage_interest_tax_benefit =
        interest.total * (input.mortgage_interest_deduction_percent / 100.0);
    let final_buying_net_worth = final_year.buying_net_worth + mortgage_interest_tax_benefit;
    let final_renting_net_worth = final_year.renting_net_worth;

    BuyVsRentResult {
        yearly_data,
        break_even_year,
        buying_wins: final_buying_net_worth > final_renting_net_worth,
        final_buying_net_worth,
        final_renting_net_worth,
        difference: final_buying_net_worth - final_renting_net_worth,
        total_buying_costs: final_year.buyer_cumulative_expenses,
        total_renting_costs: final_year.rent_cumulative_expenses,
        down_payment: setup.down_payment,
        closing_costs: setup.closing_costs,
        initial_cash_out: setup.initial_cash_out,
        mortgage_principal: setup.mortgage_principal,
        monthly_mortgage_payment: setup.monthly_payment,
        monthly_maintenance: setup.monthly_maintenance,
        monthly_property_tax: setup.monthly_property_tax,
        total_interest_paid: interest.total,
        mortgage_interest_tax_benefit,
        selling_costs: final_year.home_value * (input.selling_costs_percent / 100.0),
    }
}

/// Walks the loan month by month over the months that fall inside both the
/// horizon and the term. `by_year[y]` holds interest paid during year `y`.
fn interest_schedule(input: &BuyVsRentInput, setup: &PurchaseSetup) -> InterestSchedule {
    let monthly_rate = monthly_rate(input.mortgage_rate_percent);
    let months = input.duration_years.min(input.mortgage_period_years) * MONTHS_PER_YEAR;

    let mut by_year = vec![0.0; input.duration_years as usize + 1];
    let mut total = 0.0;
    let mut balance = setup.mortgage_principal;
    for month in 0..months {
        let interest = balance * monthly_rate;
        total += interest;
        by_year[(month / MONTHS_PER_YEAR + 1) as usize] += interest;
        balance -= setup.monthly_payment - interest;
    }

    InterestSchedule { total, by_year }
}

fn monthly_rate(annual_rate_percent: f64) -> f64 {
    annual_rate_percent / 100.0 / 12.0
}

fn compound(base: f64, annual_rate_percent: f64, years: u32) -> f64 {
    base * (1.0 + annual_rate_percent / 100.0).powf(f64::from(years))
}

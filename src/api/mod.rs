mod error;

use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::core::format::{format_currency, format_percentage};
use crate::core::market::{DEFAULT_MARKET_CODE, fallback_market};
use crate::core::{
    BuyVsRentInput, BuyVsRentResult, DetailedReport, MARKETS, MarketDefaults, Scenario, compute,
    market_defaults,
};

pub use error::{ApiError, InputError, Param};

const DEFAULT_LOG_FILTER: &str = "buy_vs_rent=info,tower_http=info";
const MAX_DURATION_YEARS: u32 = 50;
const MAX_MORTGAGE_PERIOD_YEARS: u32 = 50;
// Keeps 50 years of compounding on the largest amount well inside f64.
const MAX_GROWTH_RATE_PERCENT: f64 = 1_000.0;
const MAX_AMOUNT: f64 = 1e12;

const HOME_PRICE: Param = Param {
    flag: "home-price",
    key: "homePrice",
};
const DURATION: Param = Param {
    flag: "duration-years",
    key: "duration",
};
const APPRECIATION: Param = Param {
    flag: "home-appreciation",
    key: "appreciation",
};
const DOWN_PAYMENT: Param = Param {
    flag: "down-payment",
    key: "downPayment",
};
const MORTGAGE_RATE: Param = Param {
    flag: "mortgage-rate",
    key: "mortgageRate",
};
const MORTGAGE_PERIOD: Param = Param {
    flag: "mortgage-period-years",
    key: "mortgagePeriod",
};
const CLOSING_COSTS: Param = Param {
    flag: "closing-costs",
    key: "closingCosts",
};
const PROPERTY_TAX: Param = Param {
    flag: "property-tax-annual",
    key: "propertyTax",
};
const SELLING_COSTS: Param = Param {
    flag: "selling-costs",
    key: "sellingCosts",
};
const RENOVATION_COST: Param = Param {
    flag: "renovation-cost",
    key: "renovationCost",
};
const HOA_MONTHLY: Param = Param {
    flag: "hoa-monthly-fee",
    key: "hoaMonthly",
};
const MAINTENANCE: Param = Param {
    flag: "maintenance-annual",
    key: "maintenanceAnnual",
};
const MORTGAGE_DEDUCTION: Param = Param {
    flag: "mortgage-interest-deduction",
    key: "mortgageDeduction",
};
const RENT: Param = Param {
    flag: "monthly-rent",
    key: "rent",
};
const RENT_GROWTH: Param = Param {
    flag: "rent-growth",
    key: "rentGrowth",
};
const INVESTMENT_RETURN: Param = Param {
    flag: "investment-return",
    key: "investmentReturn",
};
const INVESTMENT_TAX_RATE: Param = Param {
    flag: "investment-tax-rate",
    key: "investmentTaxRate",
};

fn parse_scenario(name: &str) -> Result<Scenario, String> {
    name.parse()
}

/// Query/JSON parameters of `/api/compute`. The keys match the shareable
/// report link, so a `share_query` fed back here reproduces the same input.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
struct ComputePayload {
    country: Option<String>,
    scenario: Option<Scenario>,

    home_price: Option<f64>,
    duration: Option<u32>,
    appreciation: Option<f64>,

    down_payment: Option<f64>,
    mortgage_rate: Option<f64>,
    mortgage_period: Option<u32>,

    closing_costs: Option<f64>,
    renovation_cost: Option<f64>,
    hoa_monthly: Option<f64>,
    maintenance_annual: Option<f64>,
    property_tax: Option<f64>,
    selling_costs: Option<f64>,
    mortgage_deduction: Option<f64>,

    rent: Option<f64>,
    rent_growth: Option<f64>,

    investment_return: Option<f64>,
    investment_tax_rate: Option<f64>,
}

#[derive(Parser, Debug)]
#[command(
    name = "buy-vs-rent",
    about = "Compare the net worth of buying a home against renting and investing the difference"
)]
struct Cli {
    #[arg(
        long,
        default_value = DEFAULT_MARKET_CODE,
        help = "Country preset for closing costs, property tax and selling costs"
    )]
    country: String,
    #[arg(
        long,
        default_value = "baseline",
        value_parser = parse_scenario,
        help = "baseline, roaring-20s, lost-decade or crash-2008"
    )]
    scenario: Scenario,
    #[arg(long, default_value_t = 400_000.0)]
    home_price: f64,
    #[arg(long, default_value_t = 10, help = "Years to analyse (1-50)")]
    duration_years: u32,
    #[arg(
        long,
        default_value_t = 3.0,
        allow_negative_numbers = true,
        help = "Annual home appreciation in percent"
    )]
    home_appreciation: f64,
    #[arg(long, default_value_t = 20.0, help = "Down payment in percent of price")]
    down_payment: f64,
    #[arg(long, default_value_t = 3.5, help = "Mortgage interest rate in percent")]
    mortgage_rate: f64,
    #[arg(long, default_value_t = 25, help = "Mortgage term in years (1-50)")]
    mortgage_period_years: u32,
    #[arg(
        long,
        help = "Closing costs in percent of price; defaults to the country preset"
    )]
    closing_costs: Option<f64>,
    #[arg(long, default_value_t = 25_000.0)]
    renovation_cost: f64,
    #[arg(long, default_value_t = 200.0, help = "Monthly HOA or building fee")]
    hoa_monthly_fee: f64,
    #[arg(
        long,
        default_value_t = 1.0,
        help = "Annual maintenance in percent of price"
    )]
    maintenance_annual: f64,
    #[arg(
        long,
        help = "Annual property tax in percent of price; defaults to the country preset"
    )]
    property_tax_annual: Option<f64>,
    #[arg(
        long,
        help = "Selling costs in percent of final value; defaults to the country preset"
    )]
    selling_costs: Option<f64>,
    #[arg(
        long,
        default_value_t = 0.0,
        help = "Share of mortgage interest refunded as a tax deduction, in percent"
    )]
    mortgage_interest_deduction: f64,
    #[arg(long, default_value_t = 1_500.0, help = "First-year monthly rent")]
    monthly_rent: f64,
    #[arg(
        long,
        default_value_t = 2.0,
        allow_negative_numbers = true,
        help = "Annual rent growth in percent"
    )]
    rent_growth: f64,
    #[arg(
        long,
        default_value_t = 7.0,
        allow_negative_numbers = true,
        help = "Annual investment return in percent"
    )]
    investment_return: f64,
    #[arg(
        long,
        default_value_t = 15.0,
        help = "Tax on investment returns in percent"
    )]
    investment_tax_rate: f64,
    #[arg(long, help = "Print the full JSON response instead of a summary")]
    json: bool,
}

#[derive(Debug, Clone, Copy)]
struct ComputeRequest {
    market: &'static MarketDefaults,
    scenario: Scenario,
    base: BuyVsRentInput,
}

impl ComputeRequest {
    fn input(&self) -> BuyVsRentInput {
        self.scenario.apply(&self.base)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ComputeResponse {
    country: &'static str,
    scenario: Scenario,
    input: BuyVsRentInput,
    result: BuyVsRentResult,
    report: DetailedReport,
    share_query: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

fn resolve_market(code: &str) -> &'static MarketDefaults {
    market_defaults(code).unwrap_or_else(|| {
        let fallback = fallback_market();
        tracing::warn!(country = code, fallback = fallback.code, "unknown country preset");
        fallback
    })
}

fn build_inputs(cli: &Cli) -> Result<ComputeRequest, InputError> {
    check_above(HOME_PRICE, cli.home_price, 0.0)?;
    check_at_most(HOME_PRICE, cli.home_price, MAX_AMOUNT)?;
    check_years(DURATION, cli.duration_years, MAX_DURATION_YEARS)?;
    check_growth_rate(APPRECIATION, cli.home_appreciation)?;

    check_percent(DOWN_PAYMENT, cli.down_payment)?;
    check_percent(MORTGAGE_RATE, cli.mortgage_rate)?;
    check_years(
        MORTGAGE_PERIOD,
        cli.mortgage_period_years,
        MAX_MORTGAGE_PERIOD_YEARS,
    )?;

    let market = resolve_market(&cli.country);
    let mut base = BuyVsRentInput::default();
    market.apply_to(&mut base);
    if let Some(v) = cli.closing_costs {
        base.closing_costs_percent = v;
    }
    if let Some(v) = cli.property_tax_annual {
        base.property_tax_annual_percent = v;
    }
    if let Some(v) = cli.selling_costs {
        base.selling_costs_percent = v;
    }
    check_percent(CLOSING_COSTS, base.closing_costs_percent)?;
    check_percent(PROPERTY_TAX, base.property_tax_annual_percent)?;
    check_percent(SELLING_COSTS, base.selling_costs_percent)?;

    check_amount(RENOVATION_COST, cli.renovation_cost)?;
    check_amount(HOA_MONTHLY, cli.hoa_monthly_fee)?;
    check_percent(MAINTENANCE, cli.maintenance_annual)?;
    check_percent(MORTGAGE_DEDUCTION, cli.mortgage_interest_deduction)?;

    check_amount(RENT, cli.monthly_rent)?;
    check_growth_rate(RENT_GROWTH, cli.rent_growth)?;

    check_growth_rate(INVESTMENT_RETURN, cli.investment_return)?;
    check_percent(INVESTMENT_TAX_RATE, cli.investment_tax_rate)?;

    base.home_price = cli.home_price;
    base.duration_years = cli.duration_years;
    base.home_appreciation_annual = cli.home_appreciation;
    base.down_payment_percent = cli.down_payment;
    base.mortgage_rate_percent = cli.mortgage_rate;
    base.mortgage_period_years = cli.mortgage_period_years;
    base.renovation_cost = cli.renovation_cost;
    base.hoa_monthly_fee = cli.hoa_monthly_fee;
    base.maintenance_annual_percent = cli.maintenance_annual;
    base.mortgage_interest_deduction_percent = cli.mortgage_interest_deduction;
    base.monthly_rent = cli.monthly_rent;
    base.rent_growth_annual_percent = cli.rent_growth;
    base.investment_return_annual = cli.investment_return;
    base.investment_tax_rate_percent = cli.investment_tax_rate;

    Ok(ComputeRequest {
        market,
        scenario: cli.scenario,
        base,
    })
}

fn check_finite(param: Param, value: f64) -> Result<(), InputError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(InputError::NotFinite { param })
    }
}

fn check_above(param: Param, value: f64, min: f64) -> Result<(), InputError> {
    check_finite(param, value)?;
    if value <= min {
        return Err(InputError::NotAbove { param, min });
    }
    Ok(())
}

fn check_at_most(param: Param, value: f64, max: f64) -> Result<(), InputError> {
    check_finite(param, value)?;
    if value > max {
        return Err(InputError::Above { param, max });
    }
    Ok(())
}

// Flat money amounts: non-negative and bounded.
fn check_amount(param: Param, value: f64) -> Result<(), InputError> {
    check_finite(param, value)?;
    if value < 0.0 {
        return Err(InputError::Below { param, min: 0.0 });
    }
    check_at_most(param, value, MAX_AMOUNT)
}

fn check_percent(param: Param, value: f64) -> Result<(), InputError> {
    check_finite(param, value)?;
    if !(0.0..=100.0).contains(&value) {
        return Err(InputError::OutOfRange {
            param,
            min: 0.0,
            max: 100.0,
        });
    }
    Ok(())
}

// A rate of -100% or below would wipe out or flip the sign of the base.
fn check_growth_rate(param: Param, value: f64) -> Result<(), InputError> {
    check_above(param, value, -100.0)?;
    check_at_most(param, value, MAX_GROWTH_RATE_PERCENT)
}

fn check_years(param: Param, value: u32, max: u32) -> Result<(), InputError> {
    if !(1..=max).contains(&value) {
        return Err(InputError::OutOfRange {
            param,
            min: 1.0,
            max: f64::from(max),
        });
    }
    Ok(())
}

fn default_cli_for_api() -> Cli {
    let defaults = BuyVsRentInput::default();
    Cli {
        country: DEFAULT_MARKET_CODE.to_string(),
        scenario: Scenario::Baseline,
        home_price: defaults.home_price,
        duration_years: defaults.duration_years,
        home_appreciation: defaults.home_appreciation_annual,
        down_payment: defaults.down_payment_percent,
        mortgage_rate: defaults.mortgage_rate_percent,
        mortgage_period_years: defaults.mortgage_period_years,
        closing_costs: None,
        renovation_cost: defaults.renovation_cost,
        hoa_monthly_fee: defaults.hoa_monthly_fee,
        maintenance_annual: defaults.maintenance_annual_percent,
        property_tax_annual: None,
        selling_costs: None,
        mortgage_interest_deduction: defaults.mortgage_interest_deduction_percent,
        monthly_rent: defaults.monthly_rent,
        rent_growth: defaults.rent_growth_annual_percent,
        investment_return: defaults.investment_return_annual,
        investment_tax_rate: defaults.investment_tax_rate_percent,
        json: false,
    }
}

fn request_from_payload(payload: ComputePayload) -> Result<ComputeRequest, InputError> {
    let mut cli = default_cli_for_api();

    if let Some(v) = payload.country {
        cli.country = v;
    }
    if let Some(v) = payload.scenario {
        cli.scenario = v;
    }

    if let Some(v) = payload.home_price {
        cli.home_price = v;
    }
    if let Some(v) = payload.duration {
        cli.duration_years = v;
    }
    if let Some(v) = payload.appreciation {
        cli.home_appreciation = v;
    }

    if let Some(v) = payload.down_payment {
        cli.down_payment = v;
    }
    if let Some(v) = payload.mortgage_rate {
        cli.mortgage_rate = v;
    }
    if let Some(v) = payload.mortgage_period {
        cli.mortgage_period_years = v;
    }

    cli.closing_costs = payload.closing_costs;
    cli.property_tax_annual = payload.property_tax;
    cli.selling_costs = payload.selling_costs;
    if let Some(v) = payload.renovation_cost {
        cli.renovation_cost = v;
    }
    if let Some(v) = payload.hoa_monthly {
        cli.hoa_monthly_fee = v;
    }
    if let Some(v) = payload.maintenance_annual {
        cli.maintenance_annual = v;
    }
    if let Some(v) = payload.mortgage_deduction {
        cli.mortgage_interest_deduction = v;
    }

    if let Some(v) = payload.rent {
        cli.monthly_rent = v;
    }
    if let Some(v) = payload.rent_growth {
        cli.rent_growth = v;
    }

    if let Some(v) = payload.investment_return {
        cli.investment_return = v;
    }
    if let Some(v) = payload.investment_tax_rate {
        cli.investment_tax_rate = v;
    }

    build_inputs(&cli)
}

fn payload_from_request(request: &ComputeRequest) -> ComputePayload {
    let base = &request.base;
    ComputePayload {
        country: Some(request.market.code.to_string()),
        scenario: Some(request.scenario),
        home_price: Some(base.home_price),
        duration: Some(base.duration_years),
        appreciation: Some(base.home_appreciation_annual),
        down_payment: Some(base.down_payment_percent),
        mortgage_rate: Some(base.mortgage_rate_percent),
        mortgage_period: Some(base.mortgage_period_years),
        closing_costs: Some(base.closing_costs_percent),
        renovation_cost: Some(base.renovation_cost),
        hoa_monthly: Some(base.hoa_monthly_fee),
        maintenance_annual: Some(base.maintenance_annual_percent),
        property_tax: Some(base.property_tax_annual_percent),
        selling_costs: Some(base.selling_costs_percent),
        mortgage_deduction: Some(base.mortgage_interest_deduction_percent),
        rent: Some(base.monthly_rent),
        rent_growth: Some(base.rent_growth_annual_percent),
        investment_return: Some(base.investment_return_annual),
        investment_tax_rate: Some(base.investment_tax_rate_percent),
    }
}

fn share_query(request: &ComputeRequest) -> Result<String, serde_urlencoded::ser::Error> {
    serde_urlencoded::to_string(payload_from_request(request))
}

fn build_compute_response(request: &ComputeRequest) -> Result<ComputeResponse, ApiError> {
    let input = request.input();
    let result = compute(&input);
    let report = DetailedReport::build(&input, &result);
    tracing::debug!(
        country = request.market.code,
        scenario = request.scenario.as_str(),
        duration_years = input.duration_years,
        buying_wins = result.buying_wins,
        "computed projection"
    );

    Ok(ComputeResponse {
        country: request.market.code,
        scenario: request.scenario,
        input,
        result,
        report,
        share_query: share_query(request)?,
    })
}

pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

pub fn app_router() -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/api/compute",
            get(compute_get_handler).post(compute_post_handler),
        )
        .route("/api/markets", get(markets_handler))
        .fallback(not_found_handler)
        .layer(TraceLayer::new_for_http())
}

pub async fn run_http_server(port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Buy vs rent API listening on http://{addr}");
    tracing::info!("Local access: http://127.0.0.1:{port}/api/compute");

    axum::serve(listener, app_router()).await?;
    Ok(())
}

/// Parses `args` as CLI flags, computes once and renders the output.
pub fn run_cli<I, T>(args: I) -> anyhow::Result<String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = Cli::parse_from(args);
    let request = build_inputs(&cli)?;
    let response = build_compute_response(&request)?;

    if cli.json {
        return Ok(serde_json::to_string_pretty(&response)?);
    }
    Ok(render_summary(&request, &response))
}

fn render_summary(request: &ComputeRequest, response: &ComputeResponse) -> String {
    let result = &response.result;
    let report = &response.report;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Buy vs rent over {} years ({}, {})",
        response.input.duration_years,
        request.market.name,
        request.scenario.as_str()
    );
    let _ = writeln!(
        out,
        "  Monthly mortgage payment: {}",
        format_currency(result.monthly_mortgage_payment)
    );
    let _ = writeln!(
        out,
        "  Buying net worth:         {}",
        format_currency(result.final_buying_net_worth)
    );
    let _ = writeln!(
        out,
        "  Renting net worth:        {}",
        format_currency(result.final_renting_net_worth)
    );
    let _ = writeln!(
        out,
        "  {} ahead by {}",
        if result.buying_wins { "Buying" } else { "Renting" },
        format_currency(result.difference.abs())
    );
    match result.break_even_year {
        Some(year) => {
            let _ = writeln!(out, "  Break-even year: {year}");
        }
        None => {
            let _ = writeln!(out, "  Break-even year: never within the horizon");
        }
    }
    let _ = writeln!(
        out,
        "  Interest paid: {} ({} of the loan)",
        format_currency(result.total_interest_paid),
        format_percentage(report.interest_share_of_loan / 100.0, 1)
    );
    let _ = writeln!(
        out,
        "  Total cash out: buying {}, renting {}",
        format_currency(result.total_buying_costs),
        format_currency(result.total_renting_costs)
    );

    let _ = writeln!(
        out,
        "\n{:>4}  {:>14}  {:>14}  {:>14}  {:>14}",
        "Year", "Home value", "Mortgage", "Buying", "Renting"
    );
    for row in &result.yearly_data {
        let _ = writeln!(
            out,
            "{:>4}  {:>14}  {:>14}  {:>14}  {:>14}",
            row.year,
            format_currency(row.home_value),
            format_currency(row.mortgage_balance),
            format_currency(row.buying_net_worth),
            format_currency(row.renting_net_worth)
        );
    }
    out
}

async fn health_handler() -> Response {
    json_response(StatusCode::OK, HealthResponse { status: "ok" })
}

async fn markets_handler() -> Response {
    json_response(StatusCode::OK, MARKETS)
}

async fn not_found_handler() -> Response {
    ApiError::NotFound.into_response()
}

async fn compute_get_handler(Query(payload): Query<ComputePayload>) -> Result<Response, ApiError> {
    compute_handler_impl(payload).await
}

async fn compute_post_handler(Json(payload): Json<ComputePayload>) -> Result<Response, ApiError> {
    compute_handler_impl(payload).await
}

async fn compute_handler_impl(payload: ComputePayload) -> Result<Response, ApiError> {
    let request = request_from_payload(payload)?;
    let response = build_compute_response(&request)?;
    Ok(json_response(StatusCode::OK, response))
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

#[cfg(test)]
fn request_from_json(json: &str) -> Result<ComputeRequest, String> {
    let payload = serde_json::from_str::<ComputePayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    request_from_payload(payload).map_err(|e| e.to_string())
}

use serde::Serialize;

use super::types::BuyVsRentInput;

/// Typical transaction and holding costs for one country, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketDefaults {
    pub code: &'static str,
    pub name: &'static str,
    pub buying_costs: f64,
    pub property_tax: f64,
    pub selling_costs: f64,
}

impl MarketDefaults {
    /// Copies the closing costs, property tax and selling costs into `input`.
    pub fn apply_to(&self, input: &mut BuyVsRentInput) {
        input.closing_costs_percent = self.buying_costs;
        input.property_tax_annual_percent = self.property_tax;
        input.selling_costs_percent = self.selling_costs;
    }
}

pub const DEFAULT_MARKET_CODE: &str = "DE";
pub const FALLBACK_MARKET_CODE: &str = "OTHER";

const fn market(
    code: &'static str,
    name: &'static str,
    buying_costs: f64,
    property_tax: f64,
    selling_costs: f64,
) -> MarketDefaults {
    MarketDefaults {
        code,
        name,
        buying_costs,
        property_tax,
        selling_costs,
    }
}

pub const MARKETS: &[MarketDefaults] = &[
    market("OTHER", "Other Country", 3.0, 1.1, 6.0),
    // Western & central Europe
    market("DE", "Germany", 11.5, 0.21, 3.5),
    market("FR", "France", 7.5, 0.98, 5.0),
    market("AT", "Austria", 10.5, 0.1, 3.5),
    market("BE", "Belgium", 14.5, 0.62, 3.0),
    market("NL", "Netherlands", 2.5, 0.51, 1.5),
    market("CH", "Switzerland", 2.5, 0.08, 2.0),
    market("LU", "Luxembourg", 9.5, 0.05, 3.0),
    // Southern Europe
    market("GR", "Greece", 8.5, 1.13, 2.5),
    market("IT", "Italy", 9.0, 0.62, 3.0),
    market("ES", "Spain", 11.5, 0.58, 5.0),
    market("PT", "Portugal", 8.5, 0.41, 5.0),
    market("CY", "Cyprus", 5.0, 0.0, 5.0),
    market("MT", "Malta", 5.0, 0.0, 5.0),
    // Nordics
    market("SE", "Sweden", 3.5, 0.35, 2.5),
    market("NO", "Norway", 3.6, 0.21, 2.5),
    market("DK", "Denmark", 2.5, 0.75, 2.0),
    market("FI", "Finland", 4.0, 0.38, 3.5),
    // Central & eastern Europe
    market("PL", "Poland", 4.5, 0.95, 3.0),
    market("CZ", "Czech Republic", 4.5, 0.1, 3.5),
    market("HU", "Hungary", 5.5, 0.25, 4.0),
    market("RO", "Romania", 3.5, 0.15, 3.0),
    market("HR", "Croatia", 4.5, 0.25, 3.0),
    market("BG", "Bulgaria", 5.0, 0.2, 2.5),
    // Ireland & UK
    market("IE", "Ireland", 4.5, 0.29, 2.0),
    market("UK", "United Kingdom", 5.5, 1.94, 3.0),
    // North America
    market("US", "USA (National Avg)", 3.0, 1.1, 6.0),
];

pub fn market_defaults(code: &str) -> Option<&'static MarketDefaults> {
    MARKETS
        .iter()
        .find(|market| market.code.eq_ignore_ascii_case(code.trim()))
}

pub fn fallback_market() -> &'static MarketDefaults {
    &MARKETS[0]
}

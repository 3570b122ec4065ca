use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::types::BuyVsRentInput;

/// Named overrides of the growth assumptions used to stress a projection.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", try_from = "String")]
pub enum Scenario {
    #[default]
    Baseline,
    /// Strong equity growth, low inflation.
    #[serde(rename = "roaring-20s")]
    Roaring20s,
    /// Flat equities, 5% inflation.
    LostDecade,
    /// Property down 30% a year, equities down 50%.
    #[serde(rename = "crash-2008")]
    Crash2008,
}

impl Scenario {
    pub const ALL: [Scenario; 4] = [
        Scenario::Baseline,
        Scenario::Roaring20s,
        Scenario::LostDecade,
        Scenario::Crash2008,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Scenario::Baseline => "baseline",
            Scenario::Roaring20s => "roaring-20s",
            Scenario::LostDecade => "lost-decade",
            Scenario::Crash2008 => "crash-2008",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        let normalized: String = name
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "baseline" | "normal" => Some(Scenario::Baseline),
            "roaring20s" => Some(Scenario::Roaring20s),
            "lostdecade" => Some(Scenario::LostDecade),
            "crash2008" => Some(Scenario::Crash2008),
            _ => None,
        }
    }

    fn expected_names() -> String {
        Scenario::ALL
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn apply(self, input: &BuyVsRentInput) -> BuyVsRentInput {
        let mut adjusted = *input;
        match self {
            Scenario::Baseline => {}
            Scenario::Roaring20s => {
                adjusted.investment_return_annual = 15.0;
                adjusted.rent_growth_annual_percent = 1.0;
                adjusted.home_appreciation_annual = 5.0;
            }
            Scenario::LostDecade => {
                adjusted.investment_return_annual = 0.0;
                adjusted.rent_growth_annual_percent = 5.0;
                adjusted.home_appreciation_annual = 1.0;
            }
            Scenario::Crash2008 => {
                adjusted.investment_return_annual = -50.0;
                adjusted.home_appreciation_annual = -30.0;
                adjusted.rent_growth_annual_percent = 3.0;
            }
        }
        adjusted
    }
}

impl FromStr for Scenario {
    type Err = String;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Scenario::parse(name).ok_or_else(|| {
            format!(
                "unknown scenario '{name}', expected one of: {}",
                Scenario::expected_names()
            )
        })
    }
}

impl TryFrom<String> for Scenario {
    type Error = String;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        name.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::compute;

    #[test]
    fn baseline_leaves_input_untouched() {
        let input = BuyVsRentInput::default();
        assert_eq!(Scenario::Baseline.apply(&input), input);
    }

    #[test]
    fn crash_overrides_growth_only() {
        let input = BuyVsRentInput::default();
        let crashed = Scenario::Crash2008.apply(&input);

        assert_eq!(crashed.investment_return_annual, -50.0);
        assert_eq!(crashed.home_appreciation_annual, -30.0);
        assert_eq!(crashed.rent_growth_annual_percent, 3.0);
        assert_eq!(crashed.home_price, input.home_price);
        assert_eq!(crashed.monthly_rent, input.monthly_rent);
    }

    #[test]
    fn parse_accepts_common_spellings() {
        for scenario in Scenario::ALL {
            assert_eq!(Scenario::parse(scenario.as_str()), Some(scenario));
        }
        assert_eq!(Scenario::parse("roaring20s"), Some(Scenario::Roaring20s));
        assert_eq!(Scenario::parse("lostDecade"), Some(Scenario::LostDecade));
        assert_eq!(Scenario::parse("crash_2008"), Some(Scenario::Crash2008));
        assert_eq!(Scenario::parse("boom"), None);
    }

    #[test]
    fn serde_uses_kebab_case_and_aliases() {
        let parsed: Scenario = serde_json::from_str("\"lostDecade\"").expect("alias");
        assert_eq!(parsed, Scenario::LostDecade);
        let parsed: Scenario = serde_json::from_str("\"crash_2008\"").expect("snake case");
        assert_eq!(parsed, Scenario::Crash2008);
        let json = serde_json::to_string(&Scenario::Roaring20s).expect("serialize");
        assert_eq!(json, "\"roaring-20s\"");

        let err = serde_json::from_str::<Scenario>("\"boom\"").expect_err("unknown name");
        assert!(err.to_string().contains("expected one of: baseline, roaring-20s"));
    }

    #[test]
    fn crash_scenario_computes_finite_falling_home_values() {
        let result = compute(&Scenario::Crash2008.apply(&BuyVsRentInput::default()));
        for pair in result.yearly_data.windows(2) {
            assert!(pair[1].home_value < pair[0].home_value);
        }
        assert!(result.difference.is_finite());
    }
}

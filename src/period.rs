use serde::{Deserialize, Serialize};

use crate::{AppError, AppResult};

/// Recurrence unit for incomes and expenses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodType {
    Day,
    Week,
    Month,
    Year,
}

impl PeriodType {
    pub fn as_str(self) -> &'static str {
        match self {
            PeriodType::Day => "day",
            PeriodType::Week => "week",
            PeriodType::Month => "month",
            PeriodType::Year => "year",
        }
    }

    pub fn parse(value: &str) -> AppResult<Self> {
        match value {
            "day" => Ok(PeriodType::Day),
            "week" => Ok(PeriodType::Week),
            "month" => Ok(PeriodType::Month),
            "year" => Ok(PeriodType::Year),
            other => Err(AppError::new("PERIOD/INVALID_TYPE", "Not a valid period type")
                .with_context("value", other)),
        }
    }

    /// Number of periods in one year. The SQL aggregation scripts embed the
    /// same constants; keep them in sync.
    pub fn periods_per_year(self) -> f64 {
        match self {
            PeriodType::Day => 365.0,
            PeriodType::Week => 52.0,
            PeriodType::Month => 12.0,
            PeriodType::Year => 1.0,
        }
    }
}

/// A recurrence descriptor: "every `amount` `kind`s", e.g. every 2 weeks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    #[serde(rename = "type")]
    pub kind: PeriodType,
    pub amount: i64,
}

/// A normalized amount broken out per unit period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmountPerPeriod {
    pub day: f64,
    pub week: f64,
    pub month: f64,
    pub year: f64,
}

const NORMALIZED: Period = Period {
    kind: PeriodType::Year,
    amount: 1,
};

/// Re-express a rate given per `current` as a rate per `target`, using a
/// year as the common basis.
pub fn convert_period(amount: f64, current: Period, target: Period) -> f64 {
    let yearly = amount / current.amount as f64 * current.kind.periods_per_year();
    yearly / target.kind.periods_per_year() * target.amount as f64
}

/// Rate per arbitrary period → yearly-equivalent rate.
pub fn amount_to_normalized(amount: f64, period: Period) -> f64 {
    convert_period(amount, period, NORMALIZED)
}

/// Yearly-equivalent rate → per-unit-period breakdown.
pub fn amount_from_normalized(amount: f64) -> AmountPerPeriod {
    let unit = |kind| Period { kind, amount: 1 };
    AmountPerPeriod {
        day: convert_period(amount, NORMALIZED, unit(PeriodType::Day)),
        week: convert_period(amount, NORMALIZED, unit(PeriodType::Week)),
        month: convert_period(amount, NORMALIZED, unit(PeriodType::Month)),
        year: convert_period(amount, NORMALIZED, unit(PeriodType::Year)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monthly_rate_normalizes_to_yearly() {
        let period = Period {
            kind: PeriodType::Month,
            amount: 1,
        };
        assert_eq!(amount_to_normalized(120.0, period), 1440.0);
    }

    #[test]
    fn fortnightly_rate_halves_the_weekly_basis() {
        let fortnight = Period {
            kind: PeriodType::Week,
            amount: 2,
        };
        // 10 per 2 weeks = 5 per week = 260 per year
        assert_eq!(amount_to_normalized(10.0, fortnight), 260.0);
    }

    #[test]
    fn converts_between_arbitrary_periods() {
        let weekly = Period {
            kind: PeriodType::Week,
            amount: 1,
        };
        let yearly = Period {
            kind: PeriodType::Year,
            amount: 1,
        };
        assert_eq!(convert_period(15.0, weekly, yearly), 780.0);
    }

    #[test]
    fn breakdown_from_normalized_covers_all_units() {
        let per = amount_from_normalized(365.0);
        assert_eq!(per.day, 1.0);
        assert_eq!(per.year, 365.0);
        assert!((per.month - 365.0 / 12.0).abs() < 1e-9);
    }

    #[test]
    fn period_type_round_trips_through_storage_text() {
        for kind in [
            PeriodType::Day,
            PeriodType::Week,
            PeriodType::Month,
            PeriodType::Year,
        ] {
            assert_eq!(PeriodType::parse(kind.as_str()).unwrap(), kind);
        }
        assert!(PeriodType::parse("fortnight").is_err());
    }

    #[test]
    fn period_serializes_with_type_tag() {
        let period = Period {
            kind: PeriodType::Week,
            amount: 2,
        };
        let json = serde_json::to_value(period).unwrap();
        assert_eq!(json["type"], "week");
        assert_eq!(json["amount"], 2);
    }
}

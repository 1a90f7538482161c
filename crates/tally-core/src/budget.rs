//! Budget alert evaluation
//!
//! A monthly budget figure is scaled to the requested period, the window
//! start is resolved, and the spend-to-budget percentage maps onto a
//! status. Threshold evaluation is top-down; the first match wins.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Budget evaluation window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    Week,
    Month,
    Year,
}

impl BudgetPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }

    /// Start of the window containing `now`
    ///
    /// week: most recent Monday 00:00; month: first of the month 00:00;
    /// year: January 1st 00:00.
    pub fn window_start(&self, now: NaiveDateTime) -> NaiveDateTime {
        let today = now.date();
        let start_day = match self {
            Self::Week => {
                today - Duration::days(today.weekday().num_days_from_monday() as i64)
            }
            Self::Month => NaiveDate::from_ymd_opt(today.year(), today.month(), 1).unwrap(),
            Self::Year => NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap(),
        };
        start_day.and_hms_opt(0, 0, 0).unwrap()
    }

    /// Scale a monthly budget figure to this window
    pub fn scale_monthly_budget(&self, monthly_budget: f64) -> f64 {
        match self {
            Self::Week => monthly_budget / 4.0,
            Self::Month => monthly_budget,
            Self::Year => monthly_budget * 12.0,
        }
    }
}

impl std::str::FromStr for BudgetPeriod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            other => Err(Error::InvalidPeriod(other.to_string())),
        }
    }
}

/// Budget status derived from percentage used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BudgetStatus {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "CAUTION")]
    Caution,
    #[serde(rename = "WARNING")]
    Warning,
    #[serde(rename = "OVER BUDGET")]
    OverBudget,
}

impl BudgetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Caution => "CAUTION",
            Self::Warning => "WARNING",
            Self::OverBudget => "OVER BUDGET",
        }
    }

    /// Map percentage-used onto a status, evaluated top-down
    pub fn for_percentage(percentage_used: f64) -> Self {
        if percentage_used >= 100.0 {
            Self::OverBudget
        } else if percentage_used >= 80.0 {
            Self::Warning
        } else if percentage_used >= 60.0 {
            Self::Caution
        } else {
            Self::Ok
        }
    }
}

/// Percentage of budget used; 0 when the budget is 0
pub fn percentage_used(spent: f64, budget: f64) -> f64 {
    if budget > 0.0 {
        spent / budget * 100.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    #[test]
    fn test_status_boundaries() {
        assert_eq!(BudgetStatus::for_percentage(59.9), BudgetStatus::Ok);
        assert_eq!(BudgetStatus::for_percentage(60.0), BudgetStatus::Caution);
        assert_eq!(BudgetStatus::for_percentage(79.9), BudgetStatus::Caution);
        assert_eq!(BudgetStatus::for_percentage(80.0), BudgetStatus::Warning);
        assert_eq!(BudgetStatus::for_percentage(99.9), BudgetStatus::Warning);
        assert_eq!(BudgetStatus::for_percentage(100.0), BudgetStatus::OverBudget);
        assert_eq!(BudgetStatus::for_percentage(150.0), BudgetStatus::OverBudget);
    }

    #[test]
    fn test_percentage_used_zero_budget() {
        assert_eq!(percentage_used(50.0, 0.0), 0.0);
        assert_eq!(percentage_used(50.0, 100.0), 50.0);
    }

    #[test]
    fn test_period_parse() {
        assert_eq!("week".parse::<BudgetPeriod>().unwrap(), BudgetPeriod::Week);
        assert_eq!("month".parse::<BudgetPeriod>().unwrap(), BudgetPeriod::Month);
        assert_eq!("year".parse::<BudgetPeriod>().unwrap(), BudgetPeriod::Year);
        assert!(matches!(
            "quarter".parse::<BudgetPeriod>(),
            Err(Error::InvalidPeriod(_))
        ));
    }

    #[test]
    fn test_week_window_starts_monday() {
        // 2024-06-13 was a Thursday
        let now = NaiveDate::from_ymd_opt(2024, 6, 13)
            .unwrap()
            .and_hms_opt(15, 30, 0)
            .unwrap();
        let start = BudgetPeriod::Week.window_start(now);
        assert_eq!(start.date().weekday(), Weekday::Mon);
        assert_eq!(start.date(), NaiveDate::from_ymd_opt(2024, 6, 10).unwrap());
        assert_eq!(start.time(), chrono::NaiveTime::from_hms_opt(0, 0, 0).unwrap());
    }

    #[test]
    fn test_week_window_on_monday_is_today() {
        let now = NaiveDate::from_ymd_opt(2024, 6, 10)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        let start = BudgetPeriod::Week.window_start(now);
        assert_eq!(start.date(), now.date());
    }

    #[test]
    fn test_month_and_year_windows() {
        let now = NaiveDate::from_ymd_opt(2024, 6, 13)
            .unwrap()
            .and_hms_opt(15, 30, 0)
            .unwrap();
        assert_eq!(
            BudgetPeriod::Month.window_start(now).date(),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
        );
        assert_eq!(
            BudgetPeriod::Year.window_start(now).date(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
    }

    #[test]
    fn test_budget_scaling() {
        assert_eq!(BudgetPeriod::Week.scale_monthly_budget(400.0), 100.0);
        assert_eq!(BudgetPeriod::Month.scale_monthly_budget(400.0), 400.0);
        assert_eq!(BudgetPeriod::Year.scale_monthly_budget(400.0), 4800.0);
    }
}

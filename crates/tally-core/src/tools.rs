//! Ledger tool implementations
//!
//! These are the query, report, and mutation operations behind the MCP
//! tools. Each function takes the database, the owner id resolved by the
//! session guard, and a params struct; results are plain serializable
//! shapes the boundary renders as JSON.
//!
//! Every function is scoped to the supplied owner id - there is no path
//! to another user's records from here.

use chrono::{Datelike, Duration, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::budget::{percentage_used, BudgetPeriod, BudgetStatus};
use crate::db::{Database, ExpenseFilter};
use crate::error::{Error, Result};
use crate::models::{Expense, ExpenseUpdate, NewExpense};
use crate::quick_add;

// =============================================================================
// Shared utilities
// =============================================================================

/// Parse a YYYY-MM-DD request date to midnight of that day
pub fn parse_request_date(s: &str) -> Result<NaiveDateTime> {
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| Error::InvalidDate(s.to_string()))?;
    Ok(date.and_hms_opt(0, 0, 0).unwrap())
}

/// The current wall-clock moment
fn now_local() -> NaiveDateTime {
    Local::now().naive_local()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// One expense as rendered in listings
#[derive(Debug, Serialize, schemars::JsonSchema)]
pub struct ExpenseRecord {
    pub id: i64,
    pub category: String,
    pub amount: f64,
    pub date: String,
    pub description: String,
}

impl ExpenseRecord {
    /// Date-only rendering (YYYY-MM-DD)
    fn from_expense(expense: &Expense) -> Self {
        Self {
            id: expense.id,
            category: expense.category.clone(),
            amount: expense.amount,
            date: expense.date.format("%Y-%m-%d").to_string(),
            description: expense.description.clone(),
        }
    }

    /// Recency-sensitive rendering (YYYY-MM-DD HH:MM)
    fn from_expense_with_time(expense: &Expense) -> Self {
        Self {
            id: expense.id,
            category: expense.category.clone(),
            amount: expense.amount,
            date: expense.date.format("%Y-%m-%d %H:%M").to_string(),
            description: expense.description.clone(),
        }
    }
}

fn sum_amounts(expenses: &[Expense]) -> f64 {
    expenses.iter().map(|e| e.amount).sum()
}

/// Fold expenses into (category, amount) pairs sorted largest first
fn category_amounts(expenses: &[Expense]) -> Vec<CategoryAmount> {
    let mut by_category: HashMap<&str, f64> = HashMap::new();
    for expense in expenses {
        *by_category.entry(expense.category.as_str()).or_insert(0.0) += expense.amount;
    }
    let mut amounts: Vec<CategoryAmount> = by_category
        .into_iter()
        .map(|(category, amount)| CategoryAmount {
            category: category.to_string(),
            amount,
        })
        .collect();
    amounts.sort_by(|a, b| {
        b.amount
            .partial_cmp(&a.amount)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.category.cmp(&b.category))
    });
    amounts
}

/// A category with its summed amount
#[derive(Debug, Serialize, schemars::JsonSchema)]
pub struct CategoryAmount {
    pub category: String,
    pub amount: f64,
}

/// Id selector shared by the by-id tools
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ExpenseIdParams {
    #[schemars(description = "Id of the expense")]
    pub expense_id: i64,
}

// =============================================================================
// add_expense
// =============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddExpenseParams {
    #[schemars(description = "Expense category (e.g., Food, Transport, Entertainment)")]
    pub category: String,

    #[schemars(description = "Amount spent")]
    pub amount: f64,

    #[schemars(description = "Date in YYYY-MM-DD format")]
    pub date: String,

    #[schemars(description = "Description of the expense")]
    pub description: String,
}

/// Insert a new expense; returns the new id.
/// The date is validated before anything is written.
pub fn add_expense(db: &Database, user_id: i64, params: AddExpenseParams) -> Result<i64> {
    let date = parse_request_date(&params.date)?;
    db.insert_expense(
        user_id,
        &NewExpense {
            category: params.category,
            amount: params.amount,
            date,
            description: params.description,
        },
    )
}

// =============================================================================
// quick_add_expense
// =============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct QuickAddParams {
    #[schemars(description = "Natural language expense like 'coffee $5.50' or 'uber ride 25'")]
    pub expense_text: String,
}

/// Parse free text ("coffee $5.50") and insert with the current moment
pub fn quick_add_expense(db: &Database, user_id: i64, text: &str) -> Result<i64> {
    let parsed = quick_add::parse(text)?;
    db.insert_expense(
        user_id,
        &NewExpense {
            category: parsed.category.to_string(),
            amount: parsed.amount,
            date: now_local(),
            description: parsed.description,
        },
    )
}

// =============================================================================
// get_my_expenses / get_my_expense_by_id
// =============================================================================

#[derive(Debug, Serialize, schemars::JsonSchema)]
pub struct ExpenseListResult {
    pub total_count: usize,
    pub total_amount: f64,
    pub expenses: Vec<ExpenseRecord>,
}

pub fn list_expenses(db: &Database, user_id: i64) -> Result<ExpenseListResult> {
    let expenses = db.list_expenses(user_id)?;
    Ok(ExpenseListResult {
        total_count: expenses.len(),
        total_amount: sum_amounts(&expenses),
        expenses: expenses.iter().map(ExpenseRecord::from_expense).collect(),
    })
}

pub fn get_expense_by_id(db: &Database, user_id: i64, expense_id: i64) -> Result<ExpenseRecord> {
    let expense = db
        .get_expense(user_id, expense_id)?
        .ok_or_else(|| Error::NotFound(format!("no expense with id {} for this user", expense_id)))?;
    Ok(ExpenseRecord::from_expense(&expense))
}

// =============================================================================
// get_my_expenses_by_category
// =============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CategoryExpensesParams {
    #[schemars(description = "Category to filter by (exact match)")]
    pub category: String,
}

#[derive(Debug, Serialize, schemars::JsonSchema)]
pub struct CategoryExpensesResult {
    pub category: String,
    pub total_expenses: usize,
    pub total_amount: f64,
    pub expenses: Vec<ExpenseRecord>,
}

pub fn expenses_by_category(
    db: &Database,
    user_id: i64,
    params: CategoryExpensesParams,
) -> Result<CategoryExpensesResult> {
    let expenses = db.list_expenses_by_category(user_id, &params.category)?;
    Ok(CategoryExpensesResult {
        category: params.category,
        total_expenses: expenses.len(),
        total_amount: sum_amounts(&expenses),
        expenses: expenses.iter().map(ExpenseRecord::from_expense).collect(),
    })
}

// =============================================================================
// find_my_expenses
// =============================================================================

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct FindExpensesParams {
    #[schemars(description = "Search in description or category (case-insensitive substring)")]
    pub search_term: Option<String>,

    #[schemars(description = "Minimum amount (inclusive)")]
    pub min_amount: Option<f64>,

    #[schemars(description = "Maximum amount (inclusive)")]
    pub max_amount: Option<f64>,

    #[schemars(description = "Search within the last N days")]
    pub days_back: Option<i64>,
}

/// Echo of the criteria a search ran with
#[derive(Debug, Serialize, schemars::JsonSchema)]
pub struct SearchCriteria {
    pub search_term: Option<String>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
    pub days_back: Option<i64>,
}

#[derive(Debug, Serialize, schemars::JsonSchema)]
pub struct FindExpensesResult {
    pub search_criteria: SearchCriteria,
    pub total_found: usize,
    pub total_amount: f64,
    pub expenses: Vec<ExpenseRecord>,
}

/// Search with flexible criteria, AND-combined. With no criteria this
/// degenerates to the full listing.
pub fn find_expenses(
    db: &Database,
    user_id: i64,
    params: FindExpensesParams,
) -> Result<FindExpensesResult> {
    let filter = ExpenseFilter {
        search_term: params.search_term.clone(),
        min_amount: params.min_amount,
        max_amount: params.max_amount,
        since: params.days_back.map(|days| now_local() - Duration::days(days)),
    };

    let expenses = db.search_expenses(user_id, &filter)?;

    Ok(FindExpensesResult {
        search_criteria: SearchCriteria {
            search_term: params.search_term,
            min_amount: params.min_amount,
            max_amount: params.max_amount,
            days_back: params.days_back,
        },
        total_found: expenses.len(),
        total_amount: sum_amounts(&expenses),
        expenses: expenses.iter().map(ExpenseRecord::from_expense).collect(),
    })
}

// =============================================================================
// get_my_today_expenses
// =============================================================================

/// One of today's expenses; reports a time of day rather than a date
#[derive(Debug, Serialize, schemars::JsonSchema)]
pub struct TodayExpenseRecord {
    pub id: i64,
    pub category: String,
    pub amount: f64,
    pub time: String,
    pub description: String,
}

#[derive(Debug, Serialize, schemars::JsonSchema)]
pub struct TodayExpensesResult {
    pub date: String,
    pub total_expenses: usize,
    pub total_amount: f64,
    pub expenses: Vec<TodayExpenseRecord>,
}

pub fn today_expenses(db: &Database, user_id: i64) -> Result<TodayExpensesResult> {
    let today_start = now_local().date().and_hms_opt(0, 0, 0).unwrap();
    let tomorrow_start = today_start + Duration::days(1);

    let expenses = db.expenses_in_range(user_id, today_start, tomorrow_start)?;

    Ok(TodayExpensesResult {
        date: today_start.format("%Y-%m-%d").to_string(),
        total_expenses: expenses.len(),
        total_amount: sum_amounts(&expenses),
        expenses: expenses
            .iter()
            .map(|e| TodayExpenseRecord {
                id: e.id,
                category: e.category.clone(),
                amount: e.amount,
                time: e.date.format("%H:%M").to_string(),
                description: e.description.clone(),
            })
            .collect(),
    })
}

// =============================================================================
// get_my_recent_expenses
// =============================================================================

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct RecentExpensesParams {
    #[schemars(description = "Number of recent expenses to show (1-20, default 5)")]
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize, schemars::JsonSchema)]
pub struct RecentExpensesResult {
    pub recent_expenses_count: usize,
    pub total_amount_recent: f64,
    pub expenses: Vec<ExpenseRecord>,
}

pub fn recent_expenses(
    db: &Database,
    user_id: i64,
    params: RecentExpensesParams,
) -> Result<RecentExpensesResult> {
    let limit = params.limit.unwrap_or(5);
    if !(1..=20).contains(&limit) {
        return Err(Error::InvalidRange(
            "limit must be between 1 and 20".to_string(),
        ));
    }

    let expenses = db.list_recent_expenses(user_id, limit)?;

    Ok(RecentExpensesResult {
        recent_expenses_count: expenses.len(),
        total_amount_recent: sum_amounts(&expenses),
        expenses: expenses
            .iter()
            .map(ExpenseRecord::from_expense_with_time)
            .collect(),
    })
}

// =============================================================================
// update_my_expense
// =============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateExpenseParams {
    #[schemars(description = "Id of the expense to update")]
    pub expense_id: i64,

    #[schemars(description = "New category (optional)")]
    pub category: Option<String>,

    #[schemars(description = "New amount (optional)")]
    pub amount: Option<f64>,

    #[schemars(description = "New date in YYYY-MM-DD format (optional)")]
    pub date: Option<String>,

    #[schemars(description = "New description (optional)")]
    pub description: Option<String>,
}

/// What an update call did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated,
    /// No fields were supplied; nothing to do, not an error
    NothingToUpdate,
}

pub fn update_expense(
    db: &Database,
    user_id: i64,
    params: UpdateExpenseParams,
) -> Result<UpdateOutcome> {
    let update = ExpenseUpdate {
        category: params.category,
        amount: params.amount,
        date: params.date.as_deref().map(parse_request_date).transpose()?,
        description: params.description,
    };

    if update.is_empty() {
        return Ok(UpdateOutcome::NothingToUpdate);
    }

    if db.update_expense(user_id, params.expense_id, &update)? {
        Ok(UpdateOutcome::Updated)
    } else {
        Err(Error::NotFound(format!(
            "no expense with id {} for this user",
            params.expense_id
        )))
    }
}

// =============================================================================
// delete_my_expense
// =============================================================================

pub fn delete_expense(db: &Database, user_id: i64, expense_id: i64) -> Result<()> {
    if db.delete_expense(user_id, expense_id)? {
        Ok(())
    } else {
        Err(Error::NotFound(format!(
            "no expense with id {} for this user",
            expense_id
        )))
    }
}

// =============================================================================
// duplicate_my_expense
// =============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DuplicateExpenseParams {
    #[schemars(description = "Id of the expense to duplicate")]
    pub expense_id: i64,

    #[schemars(description = "New date (YYYY-MM-DD), defaults to now")]
    pub new_date: Option<String>,

    #[schemars(description = "New amount, defaults to the original")]
    pub new_amount: Option<f64>,
}

/// Copy an expense. Category and description carry over (description marked
/// as a copy); the date defaults to the current moment, not the original's.
pub fn duplicate_expense(
    db: &Database,
    user_id: i64,
    params: DuplicateExpenseParams,
) -> Result<i64> {
    let date = params
        .new_date
        .as_deref()
        .map(parse_request_date)
        .transpose()?
        .unwrap_or_else(now_local);

    let original = db
        .get_expense(user_id, params.expense_id)?
        .ok_or_else(|| Error::NotFound(format!(
            "no expense with id {} for this user",
            params.expense_id
        )))?;

    db.insert_expense(
        user_id,
        &NewExpense {
            category: original.category,
            amount: params.new_amount.unwrap_or(original.amount),
            date,
            description: format!("{} (duplicate)", original.description),
        },
    )
}

// =============================================================================
// get_my_monthly_report
// =============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct MonthlyReportParams {
    #[schemars(description = "Year (e.g., 2024)")]
    pub year: i32,

    #[schemars(description = "Month (1-12)")]
    pub month: u32,
}

#[derive(Debug, Serialize, schemars::JsonSchema)]
pub struct MonthlyReportResult {
    pub period: String,
    pub total_expenses: usize,
    pub total_amount: f64,
    pub category_breakdown: Vec<CategoryAmount>,
    pub expenses: Vec<ExpenseRecord>,
}

/// Report over [month start, next month start). Returns None when the
/// month has no expenses.
pub fn monthly_report(
    db: &Database,
    user_id: i64,
    params: MonthlyReportParams,
) -> Result<Option<MonthlyReportResult>> {
    let start_day = NaiveDate::from_ymd_opt(params.year, params.month, 1)
        .ok_or_else(|| Error::InvalidDate(format!("{}-{}", params.year, params.month)))?;

    // December rolls over into the next year
    let end_day = if params.month == 12 {
        NaiveDate::from_ymd_opt(params.year + 1, 1, 1).unwrap()
    } else {
        NaiveDate::from_ymd_opt(params.year, params.month + 1, 1).unwrap()
    };

    let expenses = db.expenses_in_range(
        user_id,
        start_day.and_hms_opt(0, 0, 0).unwrap(),
        end_day.and_hms_opt(0, 0, 0).unwrap(),
    )?;

    if expenses.is_empty() {
        return Ok(None);
    }

    Ok(Some(MonthlyReportResult {
        period: format!("{}-{:02}", params.year, params.month),
        total_expenses: expenses.len(),
        total_amount: sum_amounts(&expenses),
        category_breakdown: category_amounts(&expenses),
        expenses: expenses.iter().map(ExpenseRecord::from_expense).collect(),
    }))
}

// =============================================================================
// get_my_expense_summary
// =============================================================================

#[derive(Debug, Serialize, schemars::JsonSchema)]
pub struct CategorySummary {
    pub category: String,
    pub total_amount: f64,
    pub count: i64,
    pub percentage: f64,
}

#[derive(Debug, Serialize, schemars::JsonSchema)]
pub struct ExpenseSummaryResult {
    pub total_expenses: i64,
    pub total_amount: f64,
    pub category_breakdown: Vec<CategorySummary>,
}

/// Group all of the user's expenses by category with share-of-total
/// percentages. Percentages are 0 when the grand total is 0.
pub fn expense_summary(db: &Database, user_id: i64) -> Result<ExpenseSummaryResult> {
    let totals = db.category_totals(user_id)?;
    let total_expenses = db.count_expenses(user_id)?;
    let total_amount: f64 = totals.iter().map(|t| t.total_amount).sum();

    let category_breakdown = totals
        .into_iter()
        .map(|t| CategorySummary {
            percentage: if total_amount > 0.0 {
                round2(t.total_amount / total_amount * 100.0)
            } else {
                0.0
            },
            category: t.category,
            total_amount: t.total_amount,
            count: t.count,
        })
        .collect();

    Ok(ExpenseSummaryResult {
        total_expenses,
        total_amount,
        category_breakdown,
    })
}

// =============================================================================
// get_my_week_summary
// =============================================================================

#[derive(Debug, Serialize, schemars::JsonSchema)]
pub struct DailyAmount {
    pub day: String,
    pub amount: f64,
}

#[derive(Debug, Serialize, schemars::JsonSchema)]
pub struct WeekSummaryResult {
    pub week_period: String,
    pub total_amount: f64,
    pub daily_breakdown: Vec<DailyAmount>,
    pub category_breakdown: Vec<CategoryAmount>,
    pub average_per_day: f64,
}

/// Summary of the current week, Monday 00:00 through next Monday 00:00.
/// The per-day average divides by 7 regardless of how many days had
/// expenses. Returns None when the week is empty.
pub fn week_summary(db: &Database, user_id: i64) -> Result<Option<WeekSummaryResult>> {
    let today = now_local().date();
    let monday = today - Duration::days(today.weekday().num_days_from_monday() as i64);
    let week_start = monday.and_hms_opt(0, 0, 0).unwrap();
    let week_end = week_start + Duration::days(7);

    let expenses = db.expenses_in_range(user_id, week_start, week_end)?;
    if expenses.is_empty() {
        return Ok(None);
    }

    let total_amount = sum_amounts(&expenses);

    // Accumulate per weekday, Monday first
    let mut day_totals = [0.0f64; 7];
    let mut day_counts = [0usize; 7];
    for expense in &expenses {
        let index = expense.date.weekday().num_days_from_monday() as usize;
        day_totals[index] += expense.amount;
        day_counts[index] += 1;
    }

    let daily_breakdown = (0..7)
        .filter(|&i| day_counts[i] > 0)
        .map(|i| DailyAmount {
            day: (monday + Duration::days(i as i64)).format("%A").to_string(),
            amount: day_totals[i],
        })
        .collect();

    Ok(Some(WeekSummaryResult {
        week_period: format!(
            "{} to {}",
            week_start.format("%Y-%m-%d"),
            (week_end - Duration::days(1)).format("%Y-%m-%d")
        ),
        total_amount,
        daily_breakdown,
        category_breakdown: category_amounts(&expenses),
        average_per_day: round2(total_amount / 7.0),
    }))
}

// =============================================================================
// get_my_spending_trends
// =============================================================================

#[derive(Debug, Serialize, schemars::JsonSchema)]
pub struct TopCategory {
    pub category: String,
    pub total_spent: f64,
    pub average_per_expense: f64,
    pub expense_count: i64,
}

#[derive(Debug, Serialize, schemars::JsonSchema)]
pub struct WeeklyAmount {
    pub week: String,
    pub amount: f64,
}

#[derive(Debug, Serialize, schemars::JsonSchema)]
pub struct SpendingTrendsResult {
    pub analysis_period: String,
    pub daily_average: f64,
    pub weekly_average: f64,
    pub total_days_with_expenses: usize,
    pub top_spending_categories: Vec<TopCategory>,
    pub weekly_breakdown: Vec<WeeklyAmount>,
}

/// Trend analysis over the last 30 days. Averages divide by the number of
/// distinct days (or ISO weeks) that actually had expenses. Returns None
/// when the window is empty.
pub fn spending_trends(db: &Database, user_id: i64) -> Result<Option<SpendingTrendsResult>> {
    let cutoff = now_local() - Duration::days(30);
    let expenses = db.expenses_since(user_id, cutoff)?;
    if expenses.is_empty() {
        return Ok(None);
    }

    let mut weekly: HashMap<String, f64> = HashMap::new();
    let mut daily: HashMap<NaiveDate, f64> = HashMap::new();
    let mut categories: HashMap<&str, (f64, i64)> = HashMap::new();

    for expense in &expenses {
        let iso = expense.date.iso_week();
        let week_key = format!("{}-W{:02}", iso.year(), iso.week());
        *weekly.entry(week_key).or_insert(0.0) += expense.amount;
        *daily.entry(expense.date.date()).or_insert(0.0) += expense.amount;

        let entry = categories.entry(expense.category.as_str()).or_insert((0.0, 0));
        entry.0 += expense.amount;
        entry.1 += 1;
    }

    let daily_average = daily.values().sum::<f64>() / daily.len() as f64;
    let weekly_average = weekly.values().sum::<f64>() / weekly.len() as f64;

    let mut top: Vec<TopCategory> = categories
        .into_iter()
        .map(|(category, (total, count))| TopCategory {
            category: category.to_string(),
            total_spent: total,
            average_per_expense: round2(total / count as f64),
            expense_count: count,
        })
        .collect();
    top.sort_by(|a, b| {
        b.total_spent
            .partial_cmp(&a.total_spent)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.category.cmp(&b.category))
    });
    top.truncate(5);

    let mut weekly_breakdown: Vec<WeeklyAmount> = weekly
        .into_iter()
        .map(|(week, amount)| WeeklyAmount { week, amount })
        .collect();
    weekly_breakdown.sort_by(|a, b| a.week.cmp(&b.week));

    Ok(Some(SpendingTrendsResult {
        analysis_period: "30 days".to_string(),
        daily_average: round2(daily_average),
        weekly_average: round2(weekly_average),
        total_days_with_expenses: daily.len(),
        top_spending_categories: top,
        weekly_breakdown,
    }))
}

// =============================================================================
// set_my_budget_alert
// =============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct BudgetAlertParams {
    #[schemars(description = "Category to check the budget for")]
    pub category: String,

    #[schemars(description = "Monthly budget limit for this category")]
    pub monthly_budget: f64,

    #[schemars(description = "Period: 'week', 'month', or 'year' (default month)")]
    pub period: Option<String>,
}

#[derive(Debug, Serialize, schemars::JsonSchema)]
pub struct BudgetAlertResult {
    pub category: String,
    pub period: String,
    pub budget_limit: f64,
    pub amount_spent: f64,
    pub remaining_budget: f64,
    pub percentage_used: f64,
    pub status: String,
    pub days_in_period: i64,
    pub expense_count: i64,
}

/// Compare the category's spend in the selected period against the scaled
/// budget. The period is validated before the store is touched.
pub fn budget_alert(
    db: &Database,
    user_id: i64,
    params: BudgetAlertParams,
) -> Result<BudgetAlertResult> {
    let period: BudgetPeriod = params.period.as_deref().unwrap_or("month").parse()?;

    let now = now_local();
    let window_start = period.window_start(now);
    let budget_limit = period.scale_monthly_budget(params.monthly_budget);

    let (amount_spent, expense_count) =
        db.category_spend_since(user_id, &params.category, window_start)?;

    let pct = percentage_used(amount_spent, budget_limit);

    Ok(BudgetAlertResult {
        category: params.category,
        period: period.as_str().to_string(),
        budget_limit,
        amount_spent,
        remaining_budget: budget_limit - amount_spent,
        percentage_used: round1(pct),
        status: BudgetStatus::for_percentage(pct).as_str().to_string(),
        days_in_period: (now.date() - window_start.date()).num_days() + 1,
        expense_count,
    })
}

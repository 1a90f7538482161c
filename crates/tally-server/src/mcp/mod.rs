//! MCP (Model Context Protocol) Server for tally
//!
//! Exposes the expense ledger to LLMs via MCP tools: account management,
//! expense CRUD, search, reports, trends, and budget checks.
//!
//! # Architecture
//!
//! The server uses HTTP/SSE (Streamable HTTP) transport for local network
//! access. Ledger tools require a prior `login`; the session guard is
//! shared across MCP sessions, so one identity is active per process.
//!
//! # Example
//!
//! ```bash
//! # Start the tally MCP server
//! tally serve --host 127.0.0.1 --port 8000
//! ```
//!
//! Every tool converts failures into a descriptive text result at this
//! boundary; nothing below it renders errors and no failure takes the
//! process down.

use std::sync::Arc;

use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{
        CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler,
};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::info;

use tally_core::db::Database;
use tally_core::error::Error;
use tally_core::session::SessionGuard;
use tally_core::tools;

/// Render a success message as tool output
fn text_content(message: String) -> CallToolResult {
    CallToolResult::success(vec![Content::text(message)])
}

/// Render a core error as a descriptive text result
fn error_content(error: &Error) -> CallToolResult {
    CallToolResult::error(vec![Content::text(error.to_string())])
}

/// Render a result struct as pretty-printed JSON
fn json_content<T: Serialize>(value: &T) -> CallToolResult {
    CallToolResult::success(vec![Content::text(
        serde_json::to_string_pretty(value).unwrap_or_default(),
    )])
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RegisterParams {
    #[schemars(description = "Username for the new account")]
    pub username: String,

    #[schemars(description = "Password for the new account")]
    pub password: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LoginParams {
    #[schemars(description = "Username")]
    pub username: String,

    #[schemars(description = "Password")]
    pub password: String,
}

/// Tally MCP Server state
#[derive(Clone)]
pub struct TallyMcpServer {
    /// Database connection (wrapped for thread-safe access)
    db: Arc<Mutex<Database>>,
    /// Authenticated identity, shared across MCP sessions
    session: Arc<SessionGuard>,
    /// Tool router for MCP operations
    tool_router: ToolRouter<Self>,
}

impl TallyMcpServer {
    /// Create a new MCP server with the given database and session guard
    pub fn new(db: Database, session: Arc<SessionGuard>) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
            session,
            tool_router: Self::tool_router(),
        }
    }

    /// Get database access for tool implementations
    pub(crate) async fn db(&self) -> tokio::sync::MutexGuard<'_, Database> {
        self.db.lock().await
    }
}

#[tool_handler]
impl ServerHandler for TallyMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "tally".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: Some("Tally Expense Ledger".to_string()),
                website_url: Some("https://github.com/heskew/tally".to_string()),
                icons: None,
            },
            instructions: Some(
                "Tally is a personal expense ledger. Register and log in first, then use \
                 the tools to record expenses, search and filter them, and pull monthly, \
                 weekly, and trend reports or budget checks."
                    .to_string(),
            ),
        }
    }
}

#[tool_router]
impl TallyMcpServer {
    // -- account -------------------------------------------------------------

    /// Create a new user account
    #[tool(description = "Register a new user with username and password")]
    async fn register(
        &self,
        Parameters(params): Parameters<RegisterParams>,
    ) -> Result<CallToolResult, McpError> {
        let db = self.db().await;
        Ok(match self.session.register(&db, &params.username, &params.password) {
            Ok(()) => text_content(format!(
                "User '{}' registered successfully. Please log in.",
                params.username
            )),
            Err(e) => error_content(&e),
        })
    }

    /// Authenticate and start a session
    #[tool(description = "Log in with username and password")]
    async fn login(
        &self,
        Parameters(params): Parameters<LoginParams>,
    ) -> Result<CallToolResult, McpError> {
        let db = self.db().await;
        Ok(match self.session.login(&db, &params.username, &params.password) {
            Ok(identity) => text_content(format!("Logged in as {}.", identity.username)),
            Err(e) => error_content(&e),
        })
    }

    /// End the current session
    #[tool(description = "Log out the current user")]
    async fn logout(&self) -> Result<CallToolResult, McpError> {
        self.session.logout();
        Ok(text_content("Logged out.".to_string()))
    }

    // -- expense CRUD --------------------------------------------------------

    /// Record a structured expense
    #[tool(description = "Add a new expense for the logged-in user")]
    async fn add_expense(
        &self,
        Parameters(params): Parameters<tools::AddExpenseParams>,
    ) -> Result<CallToolResult, McpError> {
        let user = match self.session.require() {
            Ok(user) => user,
            Err(e) => return Ok(error_content(&e)),
        };
        let db = self.db().await;
        Ok(match tools::add_expense(&db, user.user_id, params) {
            Ok(id) => text_content(format!(
                "Expense added for {} with ID: {}",
                user.username, id
            )),
            Err(e) => error_content(&e),
        })
    }

    /// Record an expense from natural language, dated now
    #[tool(
        description = "Quickly add an expense with today's date using natural language like 'lunch $15' or 'gas 45.50'"
    )]
    async fn quick_add_expense(
        &self,
        Parameters(params): Parameters<tools::QuickAddParams>,
    ) -> Result<CallToolResult, McpError> {
        let user = match self.session.require() {
            Ok(user) => user,
            Err(e) => return Ok(error_content(&e)),
        };
        let db = self.db().await;
        Ok(
            match tools::quick_add_expense(&db, user.user_id, &params.expense_text) {
                Ok(id) => text_content(format!(
                    "Expense added for {} with ID: {}",
                    user.username, id
                )),
                Err(e) => error_content(&e),
            },
        )
    }

    /// Update supplied fields of an expense
    #[tool(description = "Update an expense by ID for the logged-in user")]
    async fn update_my_expense(
        &self,
        Parameters(params): Parameters<tools::UpdateExpenseParams>,
    ) -> Result<CallToolResult, McpError> {
        let user = match self.session.require() {
            Ok(user) => user,
            Err(e) => return Ok(error_content(&e)),
        };
        let db = self.db().await;
        Ok(match tools::update_expense(&db, user.user_id, params) {
            Ok(tools::UpdateOutcome::Updated) => text_content("Expense updated.".to_string()),
            Ok(tools::UpdateOutcome::NothingToUpdate) => {
                text_content("No update data provided.".to_string())
            }
            Err(e) => error_content(&e),
        })
    }

    /// Delete an expense
    #[tool(description = "Delete an expense by ID for the logged-in user")]
    async fn delete_my_expense(
        &self,
        Parameters(params): Parameters<tools::ExpenseIdParams>,
    ) -> Result<CallToolResult, McpError> {
        let user = match self.session.require() {
            Ok(user) => user,
            Err(e) => return Ok(error_content(&e)),
        };
        let db = self.db().await;
        Ok(
            match tools::delete_expense(&db, user.user_id, params.expense_id) {
                Ok(()) => text_content("Expense deleted.".to_string()),
                Err(e) => error_content(&e),
            },
        )
    }

    /// Copy an expense with optional date/amount overrides
    #[tool(description = "Duplicate an existing expense for the logged-in user")]
    async fn duplicate_my_expense(
        &self,
        Parameters(params): Parameters<tools::DuplicateExpenseParams>,
    ) -> Result<CallToolResult, McpError> {
        let user = match self.session.require() {
            Ok(user) => user,
            Err(e) => return Ok(error_content(&e)),
        };
        let db = self.db().await;
        Ok(match tools::duplicate_expense(&db, user.user_id, params) {
            Ok(id) => text_content(format!("Expense duplicated successfully with new ID: {}", id)),
            Err(e) => error_content(&e),
        })
    }

    // -- listings and search -------------------------------------------------

    /// List all expenses, newest first
    #[tool(description = "Get all expenses for the logged-in user")]
    async fn get_my_expenses(&self) -> Result<CallToolResult, McpError> {
        let user = match self.session.require() {
            Ok(user) => user,
            Err(e) => return Ok(error_content(&e)),
        };
        let db = self.db().await;
        Ok(match tools::list_expenses(&db, user.user_id) {
            Ok(result) if result.total_count == 0 => {
                text_content("No expenses found.".to_string())
            }
            Ok(result) => json_content(&result),
            Err(e) => error_content(&e),
        })
    }

    /// Fetch one expense by id
    #[tool(description = "Get a specific expense by ID for the logged-in user")]
    async fn get_my_expense_by_id(
        &self,
        Parameters(params): Parameters<tools::ExpenseIdParams>,
    ) -> Result<CallToolResult, McpError> {
        let user = match self.session.require() {
            Ok(user) => user,
            Err(e) => return Ok(error_content(&e)),
        };
        let db = self.db().await;
        Ok(
            match tools::get_expense_by_id(&db, user.user_id, params.expense_id) {
                Ok(record) => json_content(&record),
                Err(e) => error_content(&e),
            },
        )
    }

    /// List expenses in one category
    #[tool(description = "Get expenses by category for the logged-in user")]
    async fn get_my_expenses_by_category(
        &self,
        Parameters(params): Parameters<tools::CategoryExpensesParams>,
    ) -> Result<CallToolResult, McpError> {
        let user = match self.session.require() {
            Ok(user) => user,
            Err(e) => return Ok(error_content(&e)),
        };
        let db = self.db().await;
        Ok(match tools::expenses_by_category(&db, user.user_id, params) {
            Ok(result) if result.total_expenses == 0 => text_content(format!(
                "No expenses found for category: {}.",
                result.category
            )),
            Ok(result) => json_content(&result),
            Err(e) => error_content(&e),
        })
    }

    /// Search with flexible criteria
    #[tool(
        description = "Search expenses by description, category, or amount range for the logged-in user"
    )]
    async fn find_my_expenses(
        &self,
        Parameters(params): Parameters<tools::FindExpensesParams>,
    ) -> Result<CallToolResult, McpError> {
        let user = match self.session.require() {
            Ok(user) => user,
            Err(e) => return Ok(error_content(&e)),
        };
        let db = self.db().await;
        Ok(match tools::find_expenses(&db, user.user_id, params) {
            Ok(result) if result.total_found == 0 => {
                text_content("No expenses found matching your criteria.".to_string())
            }
            Ok(result) => json_content(&result),
            Err(e) => error_content(&e),
        })
    }

    /// List the most recent expenses
    #[tool(description = "Get the most recent expenses for the logged-in user")]
    async fn get_my_recent_expenses(
        &self,
        Parameters(params): Parameters<tools::RecentExpensesParams>,
    ) -> Result<CallToolResult, McpError> {
        let user = match self.session.require() {
            Ok(user) => user,
            Err(e) => return Ok(error_content(&e)),
        };
        let db = self.db().await;
        Ok(match tools::recent_expenses(&db, user.user_id, params) {
            Ok(result) if result.recent_expenses_count == 0 => {
                text_content("No expenses found.".to_string())
            }
            Ok(result) => json_content(&result),
            Err(e) => error_content(&e),
        })
    }

    /// List today's expenses with times
    #[tool(description = "Get all expenses for today for the logged-in user")]
    async fn get_my_today_expenses(&self) -> Result<CallToolResult, McpError> {
        let user = match self.session.require() {
            Ok(user) => user,
            Err(e) => return Ok(error_content(&e)),
        };
        let db = self.db().await;
        Ok(match tools::today_expenses(&db, user.user_id) {
            Ok(result) if result.total_expenses == 0 => {
                text_content("No expenses recorded for today.".to_string())
            }
            Ok(result) => json_content(&result),
            Err(e) => error_content(&e),
        })
    }

    // -- reports -------------------------------------------------------------

    /// Per-category report for one month
    #[tool(description = "Get monthly expense report for the logged-in user")]
    async fn get_my_monthly_report(
        &self,
        Parameters(params): Parameters<tools::MonthlyReportParams>,
    ) -> Result<CallToolResult, McpError> {
        let user = match self.session.require() {
            Ok(user) => user,
            Err(e) => return Ok(error_content(&e)),
        };
        let period = format!("{}-{:02}", params.year, params.month);
        let db = self.db().await;
        Ok(match tools::monthly_report(&db, user.user_id, params) {
            Ok(Some(report)) => json_content(&report),
            Ok(None) => text_content(format!("No expenses found for {}.", period)),
            Err(e) => error_content(&e),
        })
    }

    /// Category totals with share-of-total percentages
    #[tool(
        description = "Get a summary of all expenses with totals by category for the logged-in user"
    )]
    async fn get_my_expense_summary(&self) -> Result<CallToolResult, McpError> {
        let user = match self.session.require() {
            Ok(user) => user,
            Err(e) => return Ok(error_content(&e)),
        };
        let db = self.db().await;
        Ok(match tools::expense_summary(&db, user.user_id) {
            Ok(summary) => json_content(&summary),
            Err(e) => error_content(&e),
        })
    }

    /// Current-week breakdown by day and category
    #[tool(description = "Get expenses summary for the current week for the logged-in user")]
    async fn get_my_week_summary(&self) -> Result<CallToolResult, McpError> {
        let user = match self.session.require() {
            Ok(user) => user,
            Err(e) => return Ok(error_content(&e)),
        };
        let db = self.db().await;
        Ok(match tools::week_summary(&db, user.user_id) {
            Ok(Some(summary)) => json_content(&summary),
            Ok(None) => text_content("No expenses found for this week.".to_string()),
            Err(e) => error_content(&e),
        })
    }

    /// Spending analysis over the last 30 days
    #[tool(description = "Analyze spending patterns and trends over time for the logged-in user")]
    async fn get_my_spending_trends(&self) -> Result<CallToolResult, McpError> {
        let user = match self.session.require() {
            Ok(user) => user,
            Err(e) => return Ok(error_content(&e)),
        };
        let db = self.db().await;
        Ok(match tools::spending_trends(&db, user.user_id) {
            Ok(Some(trends)) => json_content(&trends),
            Ok(None) => text_content(
                "Not enough data for trend analysis (need at least 30 days of expenses)"
                    .to_string(),
            ),
            Err(e) => error_content(&e),
        })
    }

    /// Budget check for a category over a period
    #[tool(description = "Check if spending exceeds budget limits for the logged-in user")]
    async fn set_my_budget_alert(
        &self,
        Parameters(params): Parameters<tools::BudgetAlertParams>,
    ) -> Result<CallToolResult, McpError> {
        let user = match self.session.require() {
            Ok(user) => user,
            Err(e) => return Ok(error_content(&e)),
        };
        let db = self.db().await;
        Ok(match tools::budget_alert(&db, user.user_id, params) {
            Ok(result) => json_content(&result),
            Err(e) => error_content(&e),
        })
    }
}

/// Start the MCP server on the given host and port
pub async fn start_mcp_server(db: Database, host: &str, port: u16) -> anyhow::Result<()> {
    use rmcp::transport::streamable_http_server::session::local::LocalSessionManager;
    use rmcp::transport::streamable_http_server::StreamableHttpService;

    info!("Starting MCP server at http://{}:{}/mcp", host, port);

    // One session guard for the process; MCP sessions share the identity
    let session = Arc::new(SessionGuard::new());

    let service = StreamableHttpService::new(
        move || Ok(TallyMcpServer::new(db.clone(), session.clone())),
        LocalSessionManager::default().into(),
        Default::default(),
    );

    let router = axum::Router::new().nest_service("/mcp", service);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("MCP server ready at http://{}/mcp", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            // Wait for shutdown signal
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_server() -> TallyMcpServer {
        let db = Database::in_memory().unwrap();
        TallyMcpServer::new(db, Arc::new(SessionGuard::new()))
    }

    fn result_text(result: &CallToolResult) -> String {
        serde_json::to_value(result).unwrap()["content"][0]["text"]
            .as_str()
            .unwrap_or_default()
            .to_string()
    }

    fn is_error(result: &CallToolResult) -> bool {
        result.is_error == Some(true)
    }

    async fn register_and_login(server: &TallyMcpServer) {
        server
            .register(Parameters(RegisterParams {
                username: "alice".to_string(),
                password: "secret".to_string(),
            }))
            .await
            .unwrap();
        server
            .login(Parameters(LoginParams {
                username: "alice".to_string(),
                password: "secret".to_string(),
            }))
            .await
            .unwrap();
    }

    async fn add(server: &TallyMcpServer, category: &str, amount: f64, date: &str) {
        let result = server
            .add_expense(Parameters(tools::AddExpenseParams {
                category: category.to_string(),
                amount,
                date: date.to_string(),
                description: format!("{} purchase", category),
            }))
            .await
            .unwrap();
        assert!(!is_error(&result), "add failed: {}", result_text(&result));
    }

    #[tokio::test]
    async fn test_register_then_login_flow() {
        let server = test_server();

        let result = server
            .register(Parameters(RegisterParams {
                username: "alice".to_string(),
                password: "secret".to_string(),
            }))
            .await
            .unwrap();
        assert!(result_text(&result).contains("registered successfully"));

        // Registration does not authenticate
        let result = server.get_my_expenses().await.unwrap();
        assert!(is_error(&result));
        assert!(result_text(&result).contains("log in"));

        let result = server
            .login(Parameters(LoginParams {
                username: "alice".to_string(),
                password: "secret".to_string(),
            }))
            .await
            .unwrap();
        assert_eq!(result_text(&result), "Logged in as alice.");

        let result = server.get_my_expenses().await.unwrap();
        assert!(!is_error(&result));
        assert_eq!(result_text(&result), "No expenses found.");
    }

    #[tokio::test]
    async fn test_duplicate_registration_renders_as_text_error() {
        let server = test_server();
        register_and_login(&server).await;

        let result = server
            .register(Parameters(RegisterParams {
                username: "alice".to_string(),
                password: "other".to_string(),
            }))
            .await
            .unwrap();
        assert!(is_error(&result));
        assert!(result_text(&result).contains("already exists"));
    }

    #[tokio::test]
    async fn test_bad_credentials() {
        let server = test_server();
        register_and_login(&server).await;
        server.logout().await.unwrap();

        let result = server
            .login(Parameters(LoginParams {
                username: "alice".to_string(),
                password: "wrong".to_string(),
            }))
            .await
            .unwrap();
        assert!(is_error(&result));
        assert!(result_text(&result).contains("Invalid username or password"));
    }

    #[tokio::test]
    async fn test_add_and_report_round_trip() {
        let server = test_server();
        register_and_login(&server).await;

        add(&server, "Food", 30.0, "2024-03-10").await;
        add(&server, "Transport", 10.0, "2024-03-12").await;

        let result = server
            .get_my_monthly_report(Parameters(tools::MonthlyReportParams {
                year: 2024,
                month: 3,
            }))
            .await
            .unwrap();
        let report: serde_json::Value = serde_json::from_str(&result_text(&result)).unwrap();
        assert_eq!(report["period"], "2024-03");
        assert_eq!(report["total_amount"], 40.0);
        assert_eq!(report["category_breakdown"][0]["category"], "Food");
    }

    #[tokio::test]
    async fn test_monthly_report_empty_message() {
        let server = test_server();
        register_and_login(&server).await;

        let result = server
            .get_my_monthly_report(Parameters(tools::MonthlyReportParams {
                year: 2031,
                month: 1,
            }))
            .await
            .unwrap();
        assert_eq!(result_text(&result), "No expenses found for 2031-01.");
    }

    #[tokio::test]
    async fn test_invalid_date_renders_as_text_error() {
        let server = test_server();
        register_and_login(&server).await;

        let result = server
            .add_expense(Parameters(tools::AddExpenseParams {
                category: "Food".to_string(),
                amount: 10.0,
                date: "not-a-date".to_string(),
                description: "lunch".to_string(),
            }))
            .await
            .unwrap();
        assert!(is_error(&result));
        assert!(result_text(&result).contains("Invalid date"));
    }

    #[tokio::test]
    async fn test_quick_add_flow() {
        let server = test_server();
        register_and_login(&server).await;

        let result = server
            .quick_add_expense(Parameters(tools::QuickAddParams {
                expense_text: "lunch with friends 15".to_string(),
            }))
            .await
            .unwrap();
        assert!(result_text(&result).contains("Expense added for alice"));

        let result = server.get_my_today_expenses().await.unwrap();
        let today: serde_json::Value = serde_json::from_str(&result_text(&result)).unwrap();
        assert_eq!(today["total_amount"], 15.0);
        assert_eq!(today["expenses"][0]["category"], "Food");
    }

    #[tokio::test]
    async fn test_every_ledger_tool_requires_login() {
        let server = test_server();

        let results = vec![
            server.get_my_expenses().await.unwrap(),
            server.get_my_expense_summary().await.unwrap(),
            server.get_my_week_summary().await.unwrap(),
            server.get_my_spending_trends().await.unwrap(),
            server.get_my_today_expenses().await.unwrap(),
            server
                .quick_add_expense(Parameters(tools::QuickAddParams {
                    expense_text: "coffee 5".to_string(),
                }))
                .await
                .unwrap(),
            server
                .delete_my_expense(Parameters(tools::ExpenseIdParams { expense_id: 1 }))
                .await
                .unwrap(),
            server
                .set_my_budget_alert(Parameters(tools::BudgetAlertParams {
                    category: "Food".to_string(),
                    monthly_budget: 100.0,
                    period: None,
                }))
                .await
                .unwrap(),
        ];

        for result in results {
            assert!(is_error(&result));
            assert!(result_text(&result).contains("log in"));
        }
    }

    #[tokio::test]
    async fn test_logout_revokes_access() {
        let server = test_server();
        register_and_login(&server).await;

        server.logout().await.unwrap();
        let result = server.get_my_expenses().await.unwrap();
        assert!(is_error(&result));
    }

    #[tokio::test]
    async fn test_budget_alert_json_shape() {
        let server = test_server();
        register_and_login(&server).await;

        let result = server
            .set_my_budget_alert(Parameters(tools::BudgetAlertParams {
                category: "Food".to_string(),
                monthly_budget: 100.0,
                period: Some("month".to_string()),
            }))
            .await
            .unwrap();
        let alert: serde_json::Value = serde_json::from_str(&result_text(&result)).unwrap();
        assert_eq!(alert["status"], "OK");
        assert_eq!(alert["budget_limit"], 100.0);
        assert_eq!(alert["amount_spent"], 0.0);
    }

    #[tokio::test]
    async fn test_get_info_advertises_tools() {
        let server = test_server();
        let info = server.get_info();
        assert!(info.capabilities.tools.is_some());
        assert_eq!(info.server_info.name, "tally");
    }
}

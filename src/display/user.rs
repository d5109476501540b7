//! User, activity and dashboard display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::{MonthlyActivity, User};
use crate::services::activity::Dashboard;

/// Table row for user listings
#[derive(Debug, Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Username")]
    username: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Budget User")]
    budget_user_id: String,
    #[tabled(rename = "Last Login")]
    last_login: String,
}

impl From<&User> for UserRow {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.short(),
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role.to_string(),
            status: user.status.to_string(),
            budget_user_id: user.budget_user_id.clone(),
            last_login: user
                .last_login
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "never".to_string()),
        }
    }
}

#[derive(Debug, Tabled)]
struct ActivityRow {
    #[tabled(rename = "User")]
    username: String,
    #[tabled(rename = "Month")]
    month: String,
    #[tabled(rename = "Created")]
    records_created: u64,
    #[tabled(rename = "Modified")]
    records_modified: u64,
    #[tabled(rename = "Total Amount")]
    total_amount: String,
    #[tabled(rename = "Last Activity")]
    last_activity: String,
}

impl From<&MonthlyActivity> for ActivityRow {
    fn from(entry: &MonthlyActivity) -> Self {
        Self {
            username: entry.username.clone(),
            month: format!("{} {}", entry.month, entry.year),
            records_created: entry.records_created,
            records_modified: entry.records_modified,
            total_amount: format!("{:.2}", entry.total_amount),
            last_activity: entry.last_activity.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

pub fn format_user_list(users: &[User]) -> String {
    if users.is_empty() {
        return "No users found.\n".to_string();
    }
    let rows: Vec<UserRow> = users.iter().map(UserRow::from).collect();
    let mut table = Table::new(rows);
    table.with(Style::psql());
    format!("{}\n", table)
}

pub fn format_user_details(user: &User) -> String {
    let mut output = String::new();

    output.push_str(&format!("User: {}\n", user.username));
    output.push_str(&format!("  ID:           {}\n", user.id));
    output.push_str(&format!("  Email:        {}\n", user.email));
    output.push_str(&format!("  Role:         {}\n", user.role));
    output.push_str(&format!("  Status:       {}\n", user.status));
    output.push_str(&format!("  Budget User:  {}\n", user.budget_user_id));
    output.push_str(&format!("  Treasury:     {}\n", user.treasury));
    if let Some(name) = &user.pdf_display_name {
        output.push_str(&format!("  Display Name: {}\n", name));
    }
    output.push('\n');
    output.push_str(&format!(
        "  Created:    {}\n",
        user.created_at.format("%Y-%m-%d %H:%M UTC")
    ));
    output.push_str(&format!(
        "  Last Login: {}\n",
        user.last_login
            .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
            .unwrap_or_else(|| "never".to_string())
    ));

    output
}

pub fn format_activity_list(entries: &[MonthlyActivity]) -> String {
    if entries.is_empty() {
        return "No activity recorded.\n".to_string();
    }
    let rows: Vec<ActivityRow> = entries.iter().map(ActivityRow::from).collect();
    let mut table = Table::new(rows);
    table.with(Style::psql());
    format!("{}\n", table)
}

pub fn format_dashboard(dashboard: &Dashboard) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "Dashboard ({} {})\n",
        dashboard.month, dashboard.year
    ));
    output.push_str(&format!(
        "  Users:            {} ({} active)\n",
        dashboard.total_users, dashboard.active_users
    ));
    output.push_str(&format!("  Records Created:  {}\n", dashboard.records_created));
    output.push_str(&format!("  Records Modified: {}\n", dashboard.records_modified));
    output.push_str(&format!("  Total Amount:     {:.2}\n", dashboard.total_amount));
    output
}

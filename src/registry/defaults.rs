// Built-in tab definitions and column schemas.

use super::{TabDefinition, TableColumn};

pub const OVERVIEW: &str = "overview";
pub const TEAM: &str = "team";
pub const ANALYTICS: &str = "analytics";
pub const DOCUMENTS: &str = "documents";
pub const SETTINGS: &str = "settings";

fn tab(id: &str, title: &str, order: i32, visible: bool, icon: &str) -> TabDefinition {
    TabDefinition {
        id: id.to_string(),
        title: title.to_string(),
        order,
        visible,
        icon: Some(icon.to_string()),
        columns: columns_for(id),
    }
}

/// The default tab set, in registration order.
pub fn tab_definitions() -> Vec<TabDefinition> {
    vec![
        tab(OVERVIEW, "Overview", 1, true, "ℹ"),
        tab(TEAM, "Team", 2, true, "👥"),
        tab(ANALYTICS, "Analytics", 3, true, "📈"),
        tab(DOCUMENTS, "Documents", 4, false, "📁"),
        tab(SETTINGS, "Settings", 5, true, "⚙"),
    ]
}

fn columns_for(tab_id: &str) -> Vec<TableColumn> {
    let col = TableColumn::new;
    match tab_id {
        OVERVIEW => vec![
            col("taskName", "Task Name", true, "25%"),
            col("assignee", "Assignee", true, "15%"),
            col("status", "Status", true, "15%"),
            col("progress", "Progress", true, "15%"),
            col("dueDate", "Due Date", true, "15%"),
            col("priority", "Priority", true, "15%"),
        ],
        TEAM => vec![
            col("name", "Name", true, "20%"),
            col("role", "Role", true, "20%"),
            col("department", "Department", true, "15%"),
            col("email", "Email", true, "25%"),
            col("joinDate", "Join Date", true, "10%"),
            col("status", "Status", true, "10%"),
        ],
        ANALYTICS => vec![
            col("metric", "Metric", true, "25%"),
            col("current", "Current", true, "15%"),
            col("previous", "Previous", true, "15%"),
            col("change", "Change", true, "15%"),
            col("trend", "Trend", true, "15%"),
            col("target", "Target", true, "15%"),
        ],
        DOCUMENTS => vec![
            col("fileName", "File Name", true, "25%"),
            col("type", "Type", true, "15%"),
            col("size", "Size", true, "15%"),
            col("modified", "Last Modified", true, "20%"),
            col("owner", "Owner", true, "15%"),
            col("actions", "Actions", false, "10%"),
        ],
        SETTINGS => vec![
            col("setting", "Setting", true, "30%"),
            col("value", "Value", true, "25%"),
            col("description", "Description", true, "30%"),
            col("lastModified", "Last Modified", true, "15%"),
        ],
        _ => Vec::new(),
    }
}

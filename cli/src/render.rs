//! Plain-text rendering of work orders for terminal output.

use workorders_core::{Status, WorkOrder, format_timestamp};

/// Shortens `text` to at most `max` characters, ending in `...` when cut.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// Renders the `list` table.
pub fn list_table(orders: &[WorkOrder]) -> String {
    if orders.is_empty() {
        return "(no work orders found)\n".to_string();
    }

    let mut out = format!(
        "{:>4}  {:<10}  {:<4}  {:<6}  ISSUE\n",
        "ID", "MACHINE", "PRIO", "STATUS"
    );
    out.push_str(&"-".repeat(70));
    out.push('\n');
    for order in orders {
        out.push_str(&format!(
            "{:>4}  {:<10}  {:<4}  {:<6}  {}\n",
            order.id,
            order.machine_id,
            order.priority.as_str(),
            order.status.as_str(),
            truncate(&order.issue, 45)
        ));
    }
    out
}

/// Renders the `history` table for one machine.
pub fn history_table(machine_id: &str, status: Option<Status>, orders: &[WorkOrder]) -> String {
    if orders.is_empty() {
        let status_note = status
            .map(|s| format!(" with status={s}"))
            .unwrap_or_default();
        return format!("(no work orders found for machine {machine_id}{status_note})\n");
    }

    let mut out = format!("History for machine: {machine_id}\n");
    out.push_str(&format!(
        "{:>4}  {:<4}  {:<6}  {:<20}  ISSUE\n",
        "ID", "PRIO", "STATUS", "CREATED"
    ));
    out.push_str(&"-".repeat(80));
    out.push('\n');
    for order in orders {
        out.push_str(&format!(
            "{:>4}  {:<4}  {:<6}  {:<20}  {}\n",
            order.id,
            order.priority.as_str(),
            order.status.as_str(),
            format_timestamp(&order.created_at),
            truncate(&order.issue, 40)
        ));
    }
    out
}

/// Renders the `show` detail view.
pub fn detail(order: &WorkOrder) -> String {
    let closed_at = order
        .closed_at
        .as_ref()
        .map(format_timestamp)
        .unwrap_or_else(|| "-".to_string());
    format!(
        "Work Order #{}\n\
         Machine ID : {}\n\
         Priority   : {}\n\
         Status     : {}\n\
         Created At : {}\n\
         Closed At  : {}\n\
         Issue      : {}\n",
        order.id,
        order.machine_id,
        order.priority,
        order.status,
        format_timestamp(&order.created_at),
        closed_at,
        order.issue,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use workorders_core::{Priority, parse_timestamp};

    fn sample(id: i64, issue: &str, status: Status) -> WorkOrder {
        let closed_at = match status {
            Status::Open => None,
            Status::Closed => parse_timestamp("2024-01-03T00:00:00Z"),
        };
        WorkOrder {
            id,
            machine_id: "KMT-102".into(),
            issue: issue.into(),
            priority: Priority::Med,
            status,
            created_at: parse_timestamp("2024-01-02T03:04:05Z").unwrap(),
            closed_at,
        }
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 45), "short");
        let long = "x".repeat(50);
        let cut = truncate(&long, 45);
        assert_eq!(cut.chars().count(), 45);
        assert!(cut.ends_with("..."));
        assert_eq!(truncate(&"y".repeat(45), 45), "y".repeat(45));
    }

    #[test]
    fn test_truncate_counts_characters_not_bytes() {
        let text = "é".repeat(50);
        let cut = truncate(&text, 10);
        assert_eq!(cut, format!("{}...", "é".repeat(7)));
    }

    #[test]
    fn test_list_table_layout() {
        let table = list_table(&[sample(1, "Hydraulic leak", Status::Open)]);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "  ID  MACHINE     PRIO  STATUS  ISSUE");
        assert_eq!(lines[1], "-".repeat(70));
        assert_eq!(lines[2], "   1  KMT-102     med   open    Hydraulic leak");
    }

    #[test]
    fn test_list_table_empty() {
        assert_eq!(list_table(&[]), "(no work orders found)\n");
    }

    #[test]
    fn test_history_table_layout() {
        let table = history_table("KMT-102", None, &[sample(3, "Leak", Status::Closed)]);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "History for machine: KMT-102");
        assert_eq!(lines[2], "-".repeat(80));
        assert_eq!(lines[3], "   3  med   closed  2024-01-02T03:04:05Z  Leak");
    }

    #[test]
    fn test_history_table_empty_mentions_status() {
        assert_eq!(
            history_table("M9", Some(Status::Closed), &[]),
            "(no work orders found for machine M9 with status=closed)\n"
        );
        assert_eq!(
            history_table("M9", None, &[]),
            "(no work orders found for machine M9)\n"
        );
    }

    #[test]
    fn test_detail_open_and_closed() {
        let open = detail(&sample(1, "Leak", Status::Open));
        assert!(open.starts_with("Work Order #1\n"));
        assert!(open.contains("Closed At  : -\n"));
        assert!(open.contains("Created At : 2024-01-02T03:04:05Z\n"));

        let closed = detail(&sample(1, "Leak", Status::Closed));
        assert!(closed.contains("Status     : closed\n"));
        assert!(closed.contains("Closed At  : 2024-01-03T00:00:00Z\n"));
    }
}

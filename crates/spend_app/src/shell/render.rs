use std::fmt::Write;

use spend_core::{
    ActiveView, AppViewModel, EmployeeOption, TransactionListView, TransactionRowView,
    EMPLOYEES_LOADING_LABEL, TRANSACTIONS_LOADING_LABEL, TRANSACTIONS_UNAVAILABLE_LABEL,
};

pub fn render(view: &AppViewModel) -> String {
    let mut out = String::new();

    let filter = match view.active_view {
        ActiveView::Unfiltered => "All Employees".to_string(),
        ActiveView::Filtered => view
            .employee_options
            .iter()
            .find(|option| option.value == view.selected_employee_id)
            .map(|option| option.label.clone())
            .unwrap_or_else(|| view.selected_employee_id.clone()),
    };
    let _ = writeln!(out, "== Transactions: {filter} ==");

    if view.employees_loading {
        let _ = writeln!(out, "{EMPLOYEES_LOADING_LABEL}");
    }
    if let Some(error) = &view.error {
        let _ = writeln!(out, "! {error}");
    }

    match &view.transactions {
        TransactionListView::Loading => {
            let _ = writeln!(out, "{TRANSACTIONS_LOADING_LABEL}");
        }
        TransactionListView::Unavailable => {
            let _ = writeln!(out, "{TRANSACTIONS_UNAVAILABLE_LABEL}");
        }
        TransactionListView::Rows(rows) if rows.is_empty() => {
            let _ = writeln!(out, "(no transactions)");
        }
        TransactionListView::Rows(rows) => {
            for row in rows {
                let _ = writeln!(out, "{}", format_row(row));
            }
        }
    }

    if view.load_more.visible {
        let label = if view.load_more.enabled {
            "[more] View More"
        } else {
            "[more] View More (disabled)"
        };
        let _ = writeln!(out, "{label}");
    }

    out
}

pub fn render_employee_options(options: &[EmployeeOption]) -> String {
    if options.is_empty() {
        return format!("{EMPLOYEES_LOADING_LABEL}\n");
    }
    options
        .iter()
        .map(|option| {
            let value = if option.value.is_empty() {
                "all"
            } else {
                option.value.as_str()
            };
            format!("  {value:<12} {}\n", option.label)
        })
        .collect()
}

fn format_row(row: &TransactionRowView) -> String {
    let status = if row.approved { "approved" } else { "pending" };
    format!(
        "[{status:>8}] {date}  {merchant} ({employee})  ${amount:.2}  #{id}",
        date = row.date,
        merchant = row.merchant,
        employee = row.employee_name,
        amount = row.amount,
        id = row.id
    )
}

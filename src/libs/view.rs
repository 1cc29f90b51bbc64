//! Console rendering of task pages.

use super::messages::Message;
use super::query::QueryParams;
use super::task::{Pagination, TaskPage};
use crate::msg_print;
use prettytable::{row, Table};

pub struct View {}

impl View {
    pub fn tasks(page: &TaskPage) {
        if page.is_empty() {
            msg_print!(Message::TasksEmpty);
            return;
        }

        let mut table = Table::new();
        table.add_row(row!["ID", "TITLE", "DESCRIPTION", "DONE", "CREATED", "UPDATED"]);
        for task in &page.tasks {
            table.add_row(row![
                task.id,
                task.title,
                task.description,
                if task.completed { "✔" } else { "" },
                task.created_at.format("%Y-%m-%d %H:%M"),
                task.updated_at.format("%Y-%m-%d %H:%M")
            ]);
        }
        table.printstd();
    }

    /// Page summary; omitted when the server reports no pages.
    pub fn pager(pagination: &Pagination) {
        if !pagination.has_pager() {
            return;
        }
        msg_print!(Message::PageSummary {
            current_page: pagination.current_page,
            total_pages: pagination.total_pages,
            total_items: pagination.total_items,
        });
    }

    pub fn location(params: &QueryParams) {
        msg_print!(Message::Location(params.display_location()));
    }

    /// Table, pager and location of one loaded view.
    pub fn page(page: &TaskPage, params: &QueryParams) {
        msg_print!(Message::TasksHeader, true);
        Self::tasks(page);
        Self::pager(&page.pagination);
        Self::location(params);
    }
}

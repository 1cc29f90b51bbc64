//! Task list command.
//!
//! Starts from the saved view location, applies the given flags and prints
//! the resulting page together with the new location. Changing the status
//! filter, the search or the ordering starts again at page 1 unless
//! `--page` is given as well.

use super::{open_view, show};
use crate::libs::query::{OrderBy, QueryParams, SortBy};
use crate::libs::view_state::ViewState;
use anyhow::Result;
use clap::{Args, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusFilter {
    All,
    Completed,
    Pending,
}

impl StatusFilter {
    pub fn completed(self) -> Option<bool> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Completed => Some(true),
            StatusFilter::Pending => Some(false),
        }
    }
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Open this location instead of the saved one, e.g. "?page=2&search=milk"
    #[arg(long)]
    at: Option<String>,

    #[arg(short, long)]
    page: Option<u32>,

    #[arg(short, long)]
    search: Option<String>,

    #[arg(long, value_enum)]
    status: Option<StatusFilter>,

    #[arg(long, value_enum)]
    order_by: Option<OrderBy>,

    #[arg(long, value_enum)]
    sort_by: Option<SortBy>,
}

pub async fn cmd(args: ListArgs) -> Result<()> {
    let Some(app) = open_view()? else {
        return Ok(());
    };

    let params = apply(&app.view, &args)?;
    let outcome = app.query.run(params).await;
    show(&app, &outcome);
    Ok(())
}

fn apply(view: &ViewState, args: &ListArgs) -> Result<QueryParams> {
    if let Some(location) = &args.at {
        view.navigate(location)?;
    }

    view.edit(|params| {
        let mut reset = false;
        if let Some(status) = args.status {
            reset |= params.completed != status.completed();
            params.completed = status.completed();
        }
        if let Some(search) = &args.search {
            let search = search.trim();
            reset |= params.search != search;
            params.search = search.to_string();
        }
        if let Some(order_by) = args.order_by {
            reset |= params.order_by != order_by;
            params.order_by = order_by;
        }
        if let Some(sort_by) = args.sort_by {
            reset |= params.sort_by != sort_by;
            params.sort_by = sort_by;
        }

        if let Some(page) = args.page {
            params.page = page;
        } else if reset {
            params.page = 1;
        }
    })
}

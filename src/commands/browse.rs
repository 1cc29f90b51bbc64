//! Interactive task browser.
//!
//! A menu loop over the view state. A [`QueryDriver`] follows the view and
//! the session: paging, search, status filter and ordering only change the
//! location and the loop waits for the driver's page. Mutations refetch
//! themselves. The loop ends on quit or when the session goes away.
//!
//! Filter and ordering changes return to page 1. Search goes through the
//! debounced draft like any other search input.

use super::task::{confirm_delete, edit_fields, report_step_back, value_or_prompt};
use super::{is_notified, open_view, show};
use crate::libs::app::App;
use crate::libs::guard::LOGIN_ROUTE;
use crate::libs::messages::Message;
use crate::libs::query::{OrderBy, SortBy};
use crate::libs::query_engine::QueryDriver;
use crate::libs::task::Task;
use crate::{msg_info, msg_print, msg_success};
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Input, Select};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    NextPage,
    PreviousPage,
    Search,
    Filter,
    Sort,
    Add,
    Edit,
    Toggle,
    Delete,
    Quit,
}

impl Action {
    const ALL: [Action; 10] = [
        Action::NextPage,
        Action::PreviousPage,
        Action::Search,
        Action::Filter,
        Action::Sort,
        Action::Add,
        Action::Edit,
        Action::Toggle,
        Action::Delete,
        Action::Quit,
    ];

    fn label(self) -> Message {
        match self {
            Action::NextPage => Message::BrowseNextPage,
            Action::PreviousPage => Message::BrowsePreviousPage,
            Action::Search => Message::BrowseSearch,
            Action::Filter => Message::BrowseFilter,
            Action::Sort => Message::BrowseSort,
            Action::Add => Message::BrowseAdd,
            Action::Edit => Message::BrowseEdit,
            Action::Toggle => Message::BrowseToggle,
            Action::Delete => Message::BrowseDelete,
            Action::Quit => Message::BrowseQuit,
        }
    }
}

const SORTS: [(Message, OrderBy, SortBy); 4] = [
    (Message::SortNewest, OrderBy::CreatedAt, SortBy::Desc),
    (Message::SortOldest, OrderBy::CreatedAt, SortBy::Asc),
    (Message::SortTitleAsc, OrderBy::Title, SortBy::Asc),
    (Message::SortTitleDesc, OrderBy::Title, SortBy::Desc),
];

pub async fn cmd() -> Result<()> {
    let Some(app) = open_view()? else {
        return Ok(());
    };

    msg_print!(Message::BrowseHeader, true);
    let _driver = QueryDriver::spawn(app.view.clone(), app.query.clone());

    loop {
        let status = app.query.wait_for(&app.view.params()).await;
        show(&app, &status.into());
        loop {
            if !app.session.is_logged_in() {
                msg_info!(Message::RedirectTo(LOGIN_ROUTE.to_string()));
                return Ok(());
            }
            let action = select_action()?;
            if action == Action::Quit {
                return Ok(());
            }
            if perform(&app, action).await? {
                break;
            }
        }
    }
}

fn select_action() -> Result<Action> {
    let labels: Vec<String> = Action::ALL.iter().map(|action| action.label().to_string()).collect();
    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::PromptSelectAction.to_string())
        .items(&labels)
        .default(0)
        .interact()?;
    Ok(Action::ALL[selection])
}

/// Runs one menu action; `false` when nothing changed and the page need not be redrawn.
async fn perform(app: &App, action: Action) -> Result<bool> {
    let pagination = app.query.pagination();

    match action {
        Action::NextPage => {
            if !pagination.has_next() {
                msg_info!(Message::NoNextPage);
                return Ok(false);
            }
            app.view.next_page()?;
            Ok(true)
        }
        Action::PreviousPage => {
            if !pagination.has_previous() {
                msg_info!(Message::NoPreviousPage);
                return Ok(false);
            }
            app.view.previous_page()?;
            Ok(true)
        }
        Action::Search => {
            let text: String = Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptSearch.to_string())
                .default(app.view.search_draft())
                .allow_empty(true)
                .interact_text()?;
            app.view.type_search(&text);
            msg_info!(Message::SearchPending(text.trim().to_string()));
            app.view.settled().await;
            Ok(true)
        }
        Action::Filter => {
            let options = [Message::FilterAll, Message::FilterCompleted, Message::FilterPending];
            let selection = Select::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptSelectFilter.to_string())
                .items(&options.iter().map(ToString::to_string).collect::<Vec<_>>())
                .default(0)
                .interact()?;
            let completed = [None, Some(true), Some(false)][selection];
            app.view.edit(|params| {
                if params.completed != completed {
                    params.completed = completed;
                    params.page = 1;
                }
            })?;
            Ok(true)
        }
        Action::Sort => {
            let selection = Select::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptSelectSort.to_string())
                .items(&SORTS.iter().map(|(label, _, _)| label.to_string()).collect::<Vec<_>>())
                .default(0)
                .interact()?;
            let (_, order_by, sort_by) = SORTS[selection].clone();
            app.view.edit(|params| {
                if params.order_by != order_by || params.sort_by != sort_by {
                    params.order_by = order_by;
                    params.sort_by = sort_by;
                    params.page = 1;
                }
            })?;
            Ok(true)
        }
        Action::Add => {
            let title = value_or_prompt(None, Message::PromptTaskTitle, None)?;
            let description = value_or_prompt(None, Message::PromptTaskDescription, None)?;
            mutated(app.mutations.create(&title, &description).await, Message::TaskCreated)
        }
        Action::Edit => {
            let Some(task) = select_task(app)? else {
                return Ok(false);
            };
            let (title, description) = edit_fields(None, None, Some(&task))?;
            mutated(app.mutations.edit(task.id, &title, &description).await, Message::TaskUpdated)
        }
        Action::Toggle => {
            let Some(task) = select_task(app)? else {
                return Ok(false);
            };
            let message = if task.completed {
                Message::TaskMarkedPending(task.id)
            } else {
                Message::TaskMarkedDone(task.id)
            };
            mutated(app.mutations.toggle(task.id, !task.completed).await, message)
        }
        Action::Delete => {
            let Some(task) = select_task(app)? else {
                return Ok(false);
            };
            if !confirm_delete(task.id)? {
                msg_info!(Message::DeleteCancelled);
                return Ok(false);
            }
            let before = app.view.params().page;
            let deleted = mutated(app.mutations.delete(task.id).await, Message::TaskDeleted)?;
            report_step_back(app, before);
            Ok(deleted)
        }
        Action::Quit => Ok(false),
    }
}

/// Keeps the browser open after a failure the API client already reported.
fn mutated<T>(result: Result<T>, success: Message) -> Result<bool> {
    match result {
        Ok(_) => {
            msg_success!(success);
            Ok(true)
        }
        Err(err) if is_notified(&err) => Ok(false),
        Err(err) => Err(err),
    }
}

fn select_task(app: &App) -> Result<Option<Task>> {
    let tasks = app.query.page().map(|page| page.tasks).unwrap_or_default();
    if tasks.is_empty() {
        msg_info!(Message::TasksEmpty);
        return Ok(None);
    }

    let items: Vec<String> = tasks
        .iter()
        .map(|task| format!("{} {} [{}]", task.id, task.title, if task.completed { "x" } else { " " }))
        .collect();
    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::PromptTaskId.to_string())
        .items(&items)
        .default(0)
        .interact()?;
    Ok(tasks.into_iter().nth(selection))
}

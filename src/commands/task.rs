//! Task mutation commands.
//!
//! Each command sends one mutation and prints the refetched view. Missing
//! titles and descriptions are prompted for; empty input is refused before
//! any request is made.

use super::{open_view, show};
use crate::libs::app::App;
use crate::libs::messages::Message;
use crate::libs::query_engine::QueryOutcome;
use crate::libs::task::Task;
use crate::{msg_info, msg_success, msg_warning};
use anyhow::Result;
use clap::Args;
use dialoguer::{theme::ColorfulTheme, Confirm, Input};

#[derive(Debug, Args)]
pub struct AddArgs {
    #[arg(short, long)]
    title: Option<String>,

    #[arg(short, long)]
    description: Option<String>,
}

#[derive(Debug, Args)]
pub struct EditArgs {
    id: i64,

    #[arg(short, long)]
    title: Option<String>,

    #[arg(short, long)]
    description: Option<String>,
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    id: i64,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    yes: bool,
}

#[derive(Debug, Args)]
pub struct ToggleArgs {
    id: i64,
}

pub async fn add(args: AddArgs) -> Result<()> {
    let Some(app) = open_view()? else {
        return Ok(());
    };

    let title = value_or_prompt(args.title, Message::PromptTaskTitle, None)?;
    let description = value_or_prompt(args.description, Message::PromptTaskDescription, None)?;

    let outcome = app.mutations.create(&title, &description).await?;
    msg_success!(Message::TaskCreated);
    show(&app, &outcome);
    Ok(())
}

pub async fn edit(args: EditArgs) -> Result<()> {
    let Some(app) = open_view()? else {
        return Ok(());
    };

    let current = if args.title.is_none() || args.description.is_none() {
        find_on_page(&app, args.id).await?
    } else {
        None
    };
    let (title, description) = edit_fields(args.title, args.description, current.as_ref())?;

    let outcome = app.mutations.edit(args.id, &title, &description).await?;
    msg_success!(Message::TaskUpdated);
    show(&app, &outcome);
    Ok(())
}

pub async fn delete(args: DeleteArgs) -> Result<()> {
    let Some(app) = open_view()? else {
        return Ok(());
    };

    if !args.yes && !confirm_delete(args.id)? {
        msg_info!(Message::DeleteCancelled);
        return Ok(());
    }

    let before = app.view.params().page;
    let outcome = app.mutations.delete(args.id).await?;
    msg_success!(Message::TaskDeleted);
    report_step_back(&app, before);
    show(&app, &outcome);
    Ok(())
}

pub async fn toggle(args: ToggleArgs, completed: bool) -> Result<()> {
    let Some(app) = open_view()? else {
        return Ok(());
    };

    let outcome = app.mutations.toggle(args.id, completed).await?;
    if completed {
        msg_success!(Message::TaskMarkedDone(args.id));
    } else {
        msg_success!(Message::TaskMarkedPending(args.id));
    }
    show(&app, &outcome);
    Ok(())
}

pub(crate) fn value_or_prompt(value: Option<String>, prompt: Message, default: Option<String>) -> Result<String> {
    if let Some(value) = value {
        return Ok(value);
    }

    let theme = ColorfulTheme::default();
    let input = Input::<String>::with_theme(&theme)
        .with_prompt(prompt.to_string())
        .allow_empty(true);
    let input = match default {
        Some(default) => input.default(default),
        None => input,
    };
    Ok(input.interact_text()?)
}

pub(crate) fn edit_fields(
    title: Option<String>,
    description: Option<String>,
    current: Option<&Task>,
) -> Result<(String, String)> {
    let title = value_or_prompt(title, Message::PromptTaskTitle, current.map(|task| task.title.clone()))?;
    let description = value_or_prompt(
        description,
        Message::PromptTaskDescription,
        current.map(|task| task.description.clone()),
    )?;
    Ok((title, description))
}

pub(crate) fn confirm_delete(id: i64) -> Result<bool> {
    Ok(Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::ConfirmDeleteTask(id).to_string())
        .default(false)
        .interact()?)
}

pub(crate) fn report_step_back(app: &App, before: u32) {
    let after = app.view.params().page;
    if after < before {
        msg_info!(Message::PageSteppedBack(after));
    }
}

async fn find_on_page(app: &App, id: i64) -> Result<Option<Task>> {
    match app.query.run(app.view.params()).await {
        QueryOutcome::Loaded(page) => {
            let task = page.find(id).cloned();
            if task.is_none() {
                msg_warning!(Message::TaskNotOnPage(id));
            }
            Ok(task)
        }
        QueryOutcome::Failed(err) => Err(err.into()),
        QueryOutcome::Disabled | QueryOutcome::Superseded => Ok(None),
    }
}

//! Display implementation for taskly application messages.
//!
//! All user-facing text lives here, in one `match`. Notifications raised by
//! the API client, the session store and the task operations all end up as
//! a `Message`, so the wording stays consistent between the interactive
//! browser and the one-shot commands.
//!
//! ## Usage Integration
//!
//! ```rust,ignore
//! use taskly::{msg_error, msg_success};
//! use taskly::libs::messages::Message;
//!
//! msg_success!(Message::TaskCreated);
//! msg_error!(Message::SessionExpired);
//! ```

use super::types::Message;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let text = match self {
            // === TASK MESSAGES ===
            Message::TaskCreated => "Task created successfully".to_string(),
            Message::TaskUpdated => "Task updated successfully".to_string(),
            Message::TaskDeleted => "Task deleted successfully".to_string(),
            Message::TaskMarkedDone(id) => format!("Task {} marked as completed", id),
            Message::TaskMarkedPending(id) => format!("Task {} marked as not completed", id),
            Message::TaskNotOnPage(id) => format!("Task {} is not on the current page", id),
            Message::TasksEmpty => "No tasks available right now. Add a new one to get started!".to_string(),
            Message::TasksHeader => "Tasks:".to_string(),
            Message::FieldRequired(field) => format!("Task {} is required", field),
            Message::ConfirmDeleteTask(id) => format!("Are you sure you want to delete task {}?", id),
            Message::DeleteCancelled => "Deletion cancelled".to_string(),
            Message::PageSummary {
                current_page,
                total_pages,
                total_items,
            } => format!("Page {} of {} ({} tasks)", current_page, total_pages, total_items),
            Message::PageSteppedBack(page) => format!("Page is empty now, moved back to page {}", page),

            // === VIEW MESSAGES ===
            Message::Location(location) => format!("Location: {}", location),
            Message::SearchPending(draft) => format!("Searching for \"{}\"...", draft),
            Message::BrowseHeader => "Task browser".to_string(),
            Message::BrowseNextPage => "Next page".to_string(),
            Message::BrowsePreviousPage => "Previous page".to_string(),
            Message::BrowseSearch => "Search".to_string(),
            Message::BrowseFilter => "Filter by status".to_string(),
            Message::BrowseSort => "Sort".to_string(),
            Message::BrowseAdd => "Add task".to_string(),
            Message::BrowseEdit => "Edit task".to_string(),
            Message::BrowseToggle => "Toggle completion".to_string(),
            Message::BrowseDelete => "Delete task".to_string(),
            Message::BrowseQuit => "Quit".to_string(),
            Message::FilterAll => "All tasks".to_string(),
            Message::FilterCompleted => "Completed".to_string(),
            Message::FilterPending => "Not completed".to_string(),
            Message::SortNewest => "Newest first".to_string(),
            Message::SortOldest => "Oldest first".to_string(),
            Message::SortTitleAsc => "Title A-Z".to_string(),
            Message::SortTitleDesc => "Title Z-A".to_string(),
            Message::NoNextPage => "Already on the last page".to_string(),
            Message::NoPreviousPage => "Already on the first page".to_string(),

            // === SESSION MESSAGES ===
            Message::LoginSuccessful => "Login successful".to_string(),
            Message::LoginFailed => "Login failed".to_string(),
            Message::LogoutSuccessful => "Logout successful".to_string(),
            Message::RegistrationSuccessful => "Registration successful!".to_string(),
            Message::RegistrationFailed => "Registration failed".to_string(),
            Message::SessionExpired => "Your session has expired. Please log in again.".to_string(),
            Message::NotLoggedIn => "You are not logged in. Run `taskly login` first.".to_string(),
            Message::AlreadyLoggedIn => "You are already logged in.".to_string(),
            Message::SessionActive => "Logged in".to_string(),
            Message::SessionInactive => "Not logged in".to_string(),
            Message::TokenExpiresAt(at) => format!("Access token expires at {}", at),
            Message::TokenUndecodable => "Access token carries no readable expiry".to_string(),
            Message::RedirectTo(route) => format!("Redirecting to {}", route),

            // === API MESSAGES ===
            Message::ApiError => "API error".to_string(),
            Message::ApiMessage(message) => message.clone(),
            Message::ServerUnreachable => "Cannot reach server".to_string(),
            Message::ApiResponseInvalid => "Unexpected response from server".to_string(),

            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved => "Configuration saved successfully".to_string(),
            Message::ConfigModuleApi => "API settings".to_string(),
            Message::ConfigModuleView => "Task view settings".to_string(),
            Message::ApiUrlNotSet => "API URL is not configured. Run `taskly init` or set TASKLY_API_URL.".to_string(),

            // === PROMPTS ===
            Message::PromptSelectModules => "Select modules to configure".to_string(),
            Message::PromptApiUrl => "Enter the API URL".to_string(),
            Message::PromptPageLimit => "Enter tasks per page".to_string(),
            Message::PromptSearchDebounce => "Enter search debounce (milliseconds)".to_string(),
            Message::PromptUsername => "Username".to_string(),
            Message::PromptPassword => "Password".to_string(),
            Message::PromptTaskTitle => "Enter task title".to_string(),
            Message::PromptTaskDescription => "Enter task description".to_string(),
            Message::PromptTaskId => "Select task".to_string(),
            Message::PromptSearch => "Search".to_string(),
            Message::PromptSelectAction => "What next?".to_string(),
            Message::PromptSelectFilter => "Show".to_string(),
            Message::PromptSelectSort => "Order".to_string(),
        };
        write!(f, "{}", text)
    }
}

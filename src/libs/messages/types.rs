#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // === TASK MESSAGES ===
    TaskCreated,
    TaskUpdated,
    TaskDeleted,
    TaskMarkedDone(i64),
    TaskMarkedPending(i64),
    TaskNotOnPage(i64),
    TasksEmpty,
    TasksHeader,
    FieldRequired(String), // field name
    ConfirmDeleteTask(i64),
    DeleteCancelled,
    PageSummary {
        current_page: u32,
        total_pages: u32,
        total_items: u32,
    },
    PageSteppedBack(u32), // new page

    // === VIEW MESSAGES ===
    Location(String),
    SearchPending(String), // draft
    BrowseHeader,
    BrowseNextPage,
    BrowsePreviousPage,
    BrowseSearch,
    BrowseFilter,
    BrowseSort,
    BrowseAdd,
    BrowseEdit,
    BrowseToggle,
    BrowseDelete,
    BrowseQuit,
    FilterAll,
    FilterCompleted,
    FilterPending,
    SortNewest,
    SortOldest,
    SortTitleAsc,
    SortTitleDesc,
    NoNextPage,
    NoPreviousPage,

    // === SESSION MESSAGES ===
    LoginSuccessful,
    LoginFailed,
    LogoutSuccessful,
    RegistrationSuccessful,
    RegistrationFailed,
    SessionExpired,
    NotLoggedIn,
    AlreadyLoggedIn,
    SessionActive,
    SessionInactive,
    TokenExpiresAt(String),
    TokenUndecodable,
    RedirectTo(String), // route

    // === API MESSAGES ===
    ApiError,
    ApiMessage(String), // message from the server
    ServerUnreachable,
    ApiResponseInvalid,

    // === CONFIGURATION MESSAGES ===
    ConfigSaved,
    ConfigModuleApi,
    ConfigModuleView,
    ApiUrlNotSet,

    // === PROMPTS ===
    PromptSelectModules,
    PromptApiUrl,
    PromptPageLimit,
    PromptSearchDebounce,
    PromptUsername,
    PromptPassword,
    PromptTaskTitle,
    PromptTaskDescription,
    PromptTaskId,
    PromptSearch,
    PromptSelectAction,
    PromptSelectFilter,
    PromptSelectSort,
}

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "kb", about = concat!("kanban v", env!("CARGO_PKG_VERSION"), " - boards, columns and tasks in your terminal"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Directory holding the saved state and config.toml (default: .kanban)
    #[arg(short = 'C', long = "data-dir", global = true)]
    pub data_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Board management
    Board(BoardCmd),
    /// Task management
    Task(TaskCmd),
    /// Toggle a subtask's completion
    Toggle(ToggleArgs),
    /// Reorder the tasks of a column
    Reorder(ReorderArgs),
    /// Set the view mode (kanban, list, timeline)
    View(ViewArgs),
    /// Render the active board in the current view mode
    Show(ShowArgs),
    /// Show analytics across all boards
    Stats,
    /// Search tasks on every board
    Search(SearchArgs),
    /// People management
    Person(PersonCmd),
    /// Apply a raw JSON command event
    Apply(ApplyArgs),
}

// ---------------------------------------------------------------------------
// Boards
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct BoardCmd {
    #[command(subcommand)]
    pub action: BoardAction,
}

#[derive(Subcommand)]
pub enum BoardAction {
    /// Create a board with the standard columns and make it active
    Add(BoardAddArgs),
    /// Rename a board (also re-derives its columns)
    Edit(BoardEditArgs),
    /// Delete a board and all its tasks
    Rm(BoardRefArg),
    /// Make a board active
    Use(BoardRefArg),
    /// List boards
    List,
}

#[derive(Args)]
pub struct BoardAddArgs {
    /// Board name
    pub name: String,
}

#[derive(Args)]
pub struct BoardEditArgs {
    /// Board ID or name
    pub board: String,
    /// New name
    pub name: String,
}

#[derive(Args)]
pub struct BoardRefArg {
    /// Board ID or name
    pub board: String,
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct TaskCmd {
    #[command(subcommand)]
    pub action: TaskAction,
}

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task to the bottom of a column
    Add(TaskAddArgs),
    /// Edit task fields, optionally moving it to another column
    Edit(TaskEditArgs),
    /// Move a task to another column
    Mv(TaskMvArgs),
    /// Delete a task
    Rm(TaskRefArg),
    /// Show task details
    Show(TaskRefArg),
}

#[derive(Args)]
pub struct TaskAddArgs {
    /// Task title
    pub title: String,
    /// Target column (ID or name, default: TO DO)
    #[arg(long, default_value = "TO DO")]
    pub column: String,
    /// Target board (ID or name, default: active board)
    #[arg(long)]
    pub board: Option<String>,
    /// Description
    #[arg(long, short)]
    pub description: Option<String>,
    /// Priority (low, medium, high)
    #[arg(long, short)]
    pub priority: Option<String>,
    /// Due date (YYYY-MM-DD)
    #[arg(long)]
    pub due: Option<String>,
    /// Assignee person ID (repeatable)
    #[arg(long = "assignee", short = 'a')]
    pub assignees: Vec<String>,
    /// Subtask title (repeatable)
    #[arg(long = "subtask", short = 's')]
    pub subtasks: Vec<String>,
}

#[derive(Args)]
pub struct TaskEditArgs {
    /// Task ID
    pub id: String,
    /// New title
    #[arg(long)]
    pub title: Option<String>,
    /// New description
    #[arg(long, short)]
    pub description: Option<String>,
    /// New priority (low, medium, high)
    #[arg(long, short)]
    pub priority: Option<String>,
    /// New due date (YYYY-MM-DD)
    #[arg(long, conflicts_with = "clear_due")]
    pub due: Option<String>,
    /// Remove the due date
    #[arg(long)]
    pub clear_due: bool,
    /// Replace assignees with these person IDs (repeatable)
    #[arg(long = "assignee", short = 'a')]
    pub assignees: Vec<String>,
    /// Remove all assignees
    #[arg(long, conflicts_with = "assignees")]
    pub clear_assignees: bool,
    /// Append a subtask (repeatable)
    #[arg(long = "subtask", short = 's')]
    pub subtasks: Vec<String>,
    /// Move to this column (ID or name)
    #[arg(long)]
    pub column: Option<String>,
}

#[derive(Args)]
pub struct TaskMvArgs {
    /// Task ID
    pub id: String,
    /// Destination column (ID or name)
    pub column: String,
}

#[derive(Args)]
pub struct TaskRefArg {
    /// Task ID
    pub id: String,
}

#[derive(Args)]
pub struct ToggleArgs {
    /// Task ID
    pub task: String,
    /// Subtask ID, or its 1-based position
    pub subtask: String,
}

#[derive(Args)]
pub struct ReorderArgs {
    /// Column (ID or name) on the active board
    pub column: String,
    /// Task IDs in the new order; tasks not named keep their relative order after these
    #[arg(required = true)]
    pub ids: Vec<String>,
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ViewArgs {
    /// kanban, list or timeline
    pub mode: String,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Render in this mode instead of the saved one
    #[arg(long)]
    pub mode: Option<String>,
    /// Timeline: anchor the window on this date instead of today (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<String>,
    /// Timeline: move the window by this many steps (negative = earlier)
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub step: i32,
    /// List view: collapse these columns (repeatable)
    #[arg(long)]
    pub collapse: Vec<String>,
}

#[derive(Args)]
pub struct SearchArgs {
    /// Text to search for (case-insensitive)
    pub pattern: String,
    /// Treat the pattern as a regular expression
    #[arg(long)]
    pub regex: bool,
}

// ---------------------------------------------------------------------------
// People
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct PersonCmd {
    #[command(subcommand)]
    pub action: PersonAction,
}

#[derive(Subcommand)]
pub enum PersonAction {
    /// Add a person
    Add(PersonAddArgs),
    /// Edit a person
    Edit(PersonEditArgs),
    /// Remove a person (assignments are left dangling)
    Rm(PersonRefArg),
    /// List people
    List,
}

#[derive(Args)]
pub struct PersonAddArgs {
    /// Display name
    pub name: String,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub role: Option<String>,
}

#[derive(Args)]
pub struct PersonEditArgs {
    /// Person ID
    pub id: String,
    /// New display name
    pub name: String,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub role: Option<String>,
}

#[derive(Args)]
pub struct PersonRefArg {
    /// Person ID
    pub id: String,
}

#[derive(Args)]
pub struct ApplyArgs {
    /// Command as JSON, e.g. {"type":"addBoard","name":"Sprint 1"}; "-" reads stdin
    #[arg(id = "command_json", value_name = "JSON")]
    pub json: String,
}

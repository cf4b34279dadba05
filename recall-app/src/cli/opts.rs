use clap::{Args, Parser, Subcommand, ValueEnum};
use recall_core::ItemKind;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum KindArg {
    Choice,
    FreeText,
    Cloze,
}

impl From<KindArg> for ItemKind {
    fn from(k: KindArg) -> Self {
        match k {
            KindArg::Choice => ItemKind::Choice,
            KindArg::FreeText => ItemKind::FreeText,
            KindArg::Cloze => ItemKind::Cloze,
        }
    }
}

#[derive(Debug, Parser, Clone)]
#[command(name = "recall", version, about = "Recall spaced-repetition CLI/API")]
pub struct Cli {
    /// Deck file (defaults to the app data dir)
    #[arg(long, env = "RECALL_DECK")]
    pub deck: Option<PathBuf>,

    /// Command that answers interval-multiplier prompts on stdin/stdout
    #[arg(long, env = "RECALL_ADVISOR_CMD")]
    pub advisor_cmd: Option<String>,

    /// Give up on the advisor after this many milliseconds
    #[arg(long, env = "RECALL_ADVISOR_TIMEOUT_MS", default_value_t = 3000)]
    pub advisor_timeout_ms: u64,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Item operations
    #[command(subcommand)]
    Item(ItemCmd),
    /// Interactive study session
    Session(SessionCmd),
    /// Check an answer against the expected one
    Check { expected: String, actual: String },
    /// Render cloze markup and show its blanks
    Cloze { markup: String },
    /// Review statistics
    Stats,
    /// Launch Axum HTTP API
    Api(ApiCmd),
}

#[derive(Debug, Subcommand, Clone)]
pub enum ItemCmd {
    Add(ItemAdd),
    List {
        #[arg(long)]
        query: Option<String>,
    },
    Rm {
        item_id: String,
    },
}

#[derive(Debug, Args, Clone)]
pub struct ItemAdd {
    #[arg(long, value_enum, default_value_t = KindArg::FreeText)]
    pub kind: KindArg,
    #[arg(long)]
    pub prompt: String,
    #[arg(long)]
    pub answer: Option<String>,
    #[arg(long, default_value_t = 3)]
    pub difficulty: i64,
}

#[derive(Debug, Args, Clone)]
pub struct SessionCmd {
    #[arg(long, default_value_t = recall_core::DEFAULT_SESSION_LIMIT)]
    pub limit: usize,
    #[arg(long)]
    pub prioritize_hard: bool,
    #[arg(long)]
    pub due_only: bool,
    /// Rotate through the deck for this location instead of due order
    #[arg(long)]
    pub location: Option<String>,
}

#[derive(Debug, Args, Clone)]
pub struct ApiCmd {
    /// Bind address (host:port)
    #[arg(long, default_value = "127.0.0.1:8080")]
    pub addr: String,
}

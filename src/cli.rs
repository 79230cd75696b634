//! CLI front end — line commands over stdin, rendered as plain text.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::error::Error;
use crate::notices::NoticeBoard;
use crate::quotes::transfer::{export_to_dir, import_from_file};
use crate::quotes::{CategoryFilter, QuoteBook};
use crate::sync::{Reconciler, SyncOutcome};

const HELP: &str = "\
Commands:
  show                      show a random quote
  add <category> | <text>   add a quote
  list                      list quotes under the current filter
  filter <category|all>     select a category filter
  categories                list categories
  last                      last quote shown this session
  export [dir]              write quotes.json
  import <path>             append quotes from a JSON file
  sync                      sync with the server now
  notices                   show active notices
  help                      this text
  quit                      exit";

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Show,
    Add { category: String, text: String },
    List,
    Filter(CategoryFilter),
    Categories,
    Last,
    Export(Option<PathBuf>),
    Import(PathBuf),
    Sync,
    Notices,
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    /// Parse one input line. Returns `None` for a blank line.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let cmd = match verb {
            "show" | "random" => Self::Show,
            "add" => {
                // Missing separator leaves the text empty; the book rejects it.
                let (category, text) = rest.split_once('|').unwrap_or((rest, ""));
                Self::Add {
                    category: category.to_string(),
                    text: text.to_string(),
                }
            }
            "list" => Self::List,
            "filter" => Self::Filter(CategoryFilter::parse(rest)),
            "categories" => Self::Categories,
            "last" => Self::Last,
            "export" if rest.is_empty() => Self::Export(None),
            "export" => Self::Export(Some(PathBuf::from(rest))),
            "import" if rest.is_empty() => Self::Unknown(line.to_string()),
            "import" => Self::Import(PathBuf::from(rest)),
            "sync" => Self::Sync,
            "notices" => Self::Notices,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "/quit" => Self::Quit,
            _ => Self::Unknown(line.to_string()),
        };
        Some(cmd)
    }
}

/// Everything a command can act on.
pub struct Session {
    pub book: Arc<QuoteBook>,
    pub reconciler: Arc<Reconciler>,
    pub notices: Arc<NoticeBoard>,
    pub export_dir: PathBuf,
}

impl Session {
    /// Run a command and return the lines to print.
    pub async fn execute(&self, cmd: Command) -> Vec<String> {
        match cmd {
            Command::Show => match self.book.random_pick().await {
                Ok(Some(quote)) => vec![quote.render()],
                Ok(None) => vec!["No quotes available.".to_string()],
                Err(e) => vec![format!("Error: {e}")],
            },
            Command::Add { category, text } => match self.book.add(&text, &category).await {
                Ok(_) => vec!["Quote added successfully!".to_string()],
                Err(Error::Validation(_)) => {
                    vec!["Please enter both quote and category.".to_string()]
                }
                Err(e) => vec![format!("Error: {e}")],
            },
            Command::List => self.book.current_view().await.render(),
            Command::Filter(filter) => match self.book.select_filter(filter).await {
                Ok(view) => view.render(),
                Err(e) => vec![format!("Error: {e}")],
            },
            Command::Categories => {
                let mut lines = vec!["all".to_string()];
                lines.extend(self.book.categories().await);
                lines
            }
            Command::Last => match self.book.last_shown().await {
                Some(quote) => vec![quote.render()],
                None => vec!["No quote shown yet this session.".to_string()],
            },
            Command::Export(dir) => {
                let dir = dir.unwrap_or_else(|| self.export_dir.clone());
                match export_to_dir(&self.book, &dir).await {
                    Ok(path) => vec![format!("Exported to {}", path.display())],
                    Err(e) => vec![format!("Error: {e}")],
                }
            }
            Command::Import(path) => match import_from_file(&self.book, &path).await {
                Ok(count) => vec![format!("Quotes imported successfully! ({count} added)")],
                Err(e) => vec![format!("Error: {e}")],
            },
            Command::Sync => match self.reconciler.run_once().await {
                SyncOutcome::Completed(report) => {
                    let mut lines = Vec::new();
                    if report.fetch_failed {
                        lines.push("Server unreachable, nothing fetched.".to_string());
                    }
                    lines.push(format!(
                        "Synced: {} from server, {} total.",
                        report.fetched, report.total
                    ));
                    lines.extend(report.view.render());
                    lines
                }
                SyncOutcome::Skipped => vec!["A sync is already running.".to_string()],
                SyncOutcome::Failed(reason) => vec![format!("Sync failed: {reason}")],
            },
            Command::Notices => {
                let active = self.notices.active().await;
                if active.is_empty() {
                    vec!["No notices.".to_string()]
                } else {
                    active.into_iter().map(|n| n.message).collect()
                }
            }
            Command::Help => HELP.lines().map(str::to_string).collect(),
            Command::Quit => Vec::new(),
            Command::Unknown(input) => vec![format!("Unknown command: {input} (try 'help')")],
        }
    }

    /// Read commands from stdin until EOF or `quit`.
    pub async fn run(&self) {
        let stdin = tokio::io::stdin();
        let mut lines = BufReader::new(stdin).lines();

        eprint!("> ");
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    let Some(cmd) = Command::parse(&line) else {
                        eprint!("> ");
                        continue;
                    };
                    if cmd == Command::Quit {
                        break;
                    }
                    for out in self.execute(cmd).await {
                        println!("{out}");
                    }
                    eprint!("> ");
                }
                Ok(None) => break, // EOF
                Err(e) => {
                    tracing::error!("Error reading stdin: {}", e);
                    break;
                }
            }
        }
    }
}

use {
    crate::{
        data::MarketError,
        domain::Asset,
        models::FeedMode,
    },
    chrono::{DateTime, Utc},
    std::str::FromStr,
};

/// Everything that reaches the controller's event loop from background tasks.
#[derive(Debug)]
pub enum EngineEvent {
    /// The poller timer fired. `generation` identifies the timer that sent
    /// it; ticks from a torn-down timer are ignored.
    Tick { generation: u64, ids: Vec<String> },

    /// A batched price request finished.
    Prices {
        source: FeedMode,
        requested: Vec<String>,
        result: Result<Vec<Asset>, MarketError>,
    },
}

/// Poll status shown next to the chart.
#[derive(Debug, Clone, PartialEq)]
pub enum PollStatus {
    /// No favorites, no timer.
    Idle,
    /// A request is in flight.
    Updating,
    Ok { at: DateTime<Utc>, updated: usize },
    Error(String),
}

/// A user instruction for the interactive watcher (one per stdin line).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(String),
    Remove(String),
    Toggle(String),
    /// `new` is omitted when answering a replacement prompt.
    Replace { old: String, new: Option<String> },
    Clear,
    List,
    Assets,
    Search(String),
    Info(String),
    Chart,
    Help,
    Quit,
}

impl Command {
    pub const HELP: &'static str = "\
commands:
  add <id>              add an asset to the watchlist
  remove <id>           remove an asset from the watchlist
  toggle <id>           add if absent, remove if present
  replace <old> [new]   swap a favorite (new defaults to the pending asset)
  clear                 empty the watchlist
  list                  show the watchlist
  assets                show the loaded asset list
  search <text>         filter assets by name, symbol or id
  info <id>             asset details
  chart                 show live price series
  help                  this text
  quit                  exit";
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Err("empty command".to_string());
        };
        let arg = words.next().map(str::to_string);
        let extra = words.next().map(str::to_string);

        let need = |arg: Option<String>| arg.ok_or_else(|| format!("'{}' needs an asset id", verb));

        match verb.to_lowercase().as_str() {
            "add" | "a" => Ok(Command::Add(need(arg)?)),
            "remove" | "rm" => Ok(Command::Remove(need(arg)?)),
            "toggle" | "t" => Ok(Command::Toggle(need(arg)?)),
            "replace" => Ok(Command::Replace {
                old: need(arg)?,
                new: extra,
            }),
            "clear" => Ok(Command::Clear),
            "list" | "ls" | "favorites" => Ok(Command::List),
            "assets" => Ok(Command::Assets),
            "search" | "s" => {
                let query = line.trim_start()[verb.len()..].trim().to_string();
                Ok(Command::Search(query))
            }
            "info" | "i" => Ok(Command::Info(need(arg)?)),
            "chart" => Ok(Command::Chart),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            other => Err(format!("unknown command '{}' (try 'help')", other)),
        }
    }
}

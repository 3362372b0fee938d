// src/bot/command.rs

//! Parsing of slash commands and button callback data.

/// Slash commands understood by the bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Today,
    Yesterday,
    Date,
    Search,
    GetLink,
    Stats,
}

impl Command {
    /// Parse `/name` or `/name@botname`, ignoring trailing arguments.
    pub fn parse(text: &str) -> Option<Self> {
        let word = text.split_whitespace().next()?;
        let name = word.strip_prefix('/')?;
        let name = name.split('@').next().unwrap_or(name);

        match name.to_ascii_lowercase().as_str() {
            "start" | "help" => Some(Self::Start),
            "today" => Some(Self::Today),
            "yesterday" => Some(Self::Yesterday),
            "date" => Some(Self::Date),
            "search" => Some(Self::Search),
            "getlink" => Some(Self::GetLink),
            "stats" => Some(Self::Stats),
            _ => None,
        }
    }
}

const MOVIE_PREFIX: &str = "movie:";

/// Data attached to inline buttons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Callback {
    Today,
    Yesterday,
    Search,
    Stats,
    /// Selection of a cached movie by stable id
    Movie(String),
}

impl Callback {
    pub fn parse(data: &str) -> Option<Self> {
        match data {
            "today" => Some(Self::Today),
            "yesterday" => Some(Self::Yesterday),
            "search" => Some(Self::Search),
            "stats" => Some(Self::Stats),
            _ => data
                .strip_prefix(MOVIE_PREFIX)
                .filter(|id| !id.is_empty())
                .map(|id| Self::Movie(id.to_string())),
        }
    }

    /// Encode as button callback data.
    pub fn data(&self) -> String {
        match self {
            Self::Today => "today".to_string(),
            Self::Yesterday => "yesterday".to_string(),
            Self::Search => "search".to_string(),
            Self::Stats => "stats".to_string(),
            Self::Movie(id) => format!("{MOVIE_PREFIX}{id}"),
        }
    }
}

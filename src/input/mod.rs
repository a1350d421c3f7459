//! # Input Module
//!
//! Parsing for the interactive read-eval loop. One line of input becomes one
//! [`ReplCommand`]; blank lines parse to nothing and the loop reprompts.

/// Commands accepted by the interactive loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    /// Generate an encounter for a tile; `hard` raises the budget for this
    /// one request
    Generate { tile: String, hard: bool },
    /// List known tiles
    Tiles,
    /// Show help text
    Help,
    /// Leave the loop
    Quit,
}

impl ReplCommand {
    /// Parses one input line.
    ///
    /// Keywords (`quit`, `exit`, `help`, `?`, `tiles`) are case-insensitive.
    /// Hard mode is requested per tile with a `skull ` prefix or a trailing
    /// `!`. Anything else is a tile name (or partial name). Blank input
    /// yields `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use barrow::ReplCommand;
    ///
    /// assert_eq!(
    ///     ReplCommand::parse("skull crypt"),
    ///     Some(ReplCommand::Generate { tile: "crypt".to_string(), hard: true })
    /// );
    /// assert_eq!(ReplCommand::parse("QUIT"), Some(ReplCommand::Quit));
    /// assert_eq!(ReplCommand::parse("   "), None);
    /// ```
    pub fn parse(line: &str) -> Option<ReplCommand> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        match line.to_lowercase().as_str() {
            "quit" | "exit" | "q" => return Some(ReplCommand::Quit),
            "help" | "?" => return Some(ReplCommand::Help),
            "tiles" => return Some(ReplCommand::Tiles),
            // Hard mode with no tile is not a request.
            "skull" => return None,
            _ => {}
        }

        const SKULL: &str = "skull ";
        let has_skull_prefix = line
            .get(..SKULL.len())
            .map_or(false, |prefix| prefix.eq_ignore_ascii_case(SKULL));
        let (rest, mut hard) = if has_skull_prefix {
            (line[SKULL.len()..].trim(), true)
        } else {
            (line, false)
        };

        let tile = match rest.strip_suffix('!') {
            Some(stripped) => {
                hard = true;
                stripped.trim()
            }
            None => rest,
        };

        if tile.is_empty() {
            return None;
        }

        Some(ReplCommand::Generate {
            tile: tile.to_string(),
            hard,
        })
    }
}

//! Grid "attack the target" console game
//!
//! The player `O` walks a wrapping grid of rooms looking for the target `X`
//! and wins by attacking it. Commands are read one line at a time.

use std::fmt;
use std::io::{self, BufRead, Write};

use crate::settings::{DemoSettings, GridSettings};

/// Grid cell as (row, column)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    pub fn in_bounds(&self, rows: u32, columns: u32) -> bool {
        self.row >= 0 && self.col >= 0 && (self.row as u32) < rows && (self.col as u32) < columns
    }
}

impl From<(i32, i32)> for Position {
    fn from((row, col): (i32, i32)) -> Self {
        Self { row, col }
    }
}

/// Player commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    North,
    South,
    East,
    West,
    Attack,
    Exit,
}

impl Command {
    /// Case-insensitive, accepting full words and single-letter aliases
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "north" | "n" => Some(Command::North),
            "south" | "s" => Some(Command::South),
            "east" | "e" => Some(Command::East),
            "west" | "w" => Some(Command::West),
            "attack" | "a" => Some(Command::Attack),
            "exit" | "x" => Some(Command::Exit),
            _ => None,
        }
    }
}

/// What a command did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Moved,
    TargetAttacked,
    NothingToAttack,
    Quit,
}

impl Outcome {
    pub fn ends_game(&self) -> bool {
        matches!(self, Outcome::TargetAttacked | Outcome::Quit)
    }

    /// Line printed for this outcome, if any
    pub fn message(&self) -> Option<&'static str> {
        match self {
            Outcome::Moved => None,
            Outcome::TargetAttacked => Some("Target attacked!"),
            Outcome::NothingToAttack => Some("There's nothing to attack here!"),
            Outcome::Quit => Some("Goodbye!"),
        }
    }
}

/// Board state
#[derive(Debug, Clone)]
pub struct Grid {
    pub rows: u32,
    pub columns: u32,
    pub player: Position,
    pub target: Position,
}

impl Grid {
    /// Build from validated settings
    pub fn new(settings: &GridSettings) -> Self {
        Self {
            rows: settings.rows,
            columns: settings.columns,
            player: settings.player.into(),
            target: settings.target.into(),
        }
    }

    /// Room number shown to the player
    pub fn room(&self) -> i64 {
        self.player.row as i64 * self.columns as i64 + self.player.col as i64
    }

    pub fn on_target(&self) -> bool {
        self.player == self.target
    }

    /// Apply a command. Moves wrap around the edges.
    pub fn apply(&mut self, command: Command) -> Outcome {
        let rows = self.rows as i32;
        let cols = self.columns as i32;
        match command {
            Command::North => self.player.row = (self.player.row - 1).rem_euclid(rows),
            Command::South => self.player.row = (self.player.row + 1).rem_euclid(rows),
            Command::East => self.player.col = (self.player.col + 1).rem_euclid(cols),
            Command::West => self.player.col = (self.player.col - 1).rem_euclid(cols),
            Command::Attack => {
                return if self.on_target() {
                    Outcome::TargetAttacked
                } else {
                    Outcome::NothingToAttack
                };
            }
            Command::Exit => return Outcome::Quit,
        }
        Outcome::Moved
    }
}

/// Minimap: each cell is 3 characters wide and tall. Only the outer border
/// and the cell corners are drawn. `X` sits at offset (1, 1) inside its cell
/// and `O` at (2, 2), so both can share a room.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let height = self.rows as usize * 3 + 1;
        let width = self.columns as usize * 3 + 1;
        let x = (self.target.row as usize * 3 + 1, self.target.col as usize * 3 + 1);
        let o = (self.player.row as usize * 3 + 2, self.player.col as usize * 3 + 2);

        for i in 0..height {
            for j in 0..width {
                let c = if i % 3 == 0 && j % 3 == 0 {
                    '+'
                } else if i == 0 || i == height - 1 {
                    '-'
                } else if j == 0 || j == width - 1 {
                    '|'
                } else if (i, j) == x {
                    'X'
                } else if (i, j) == o {
                    'O'
                } else {
                    ' '
                };
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Setup choice offered before the game starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupChoice {
    SettingsFile,
    Prompt,
    Defaults,
}

impl SetupChoice {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "1" => Some(SetupChoice::SettingsFile),
            "2" => Some(SetupChoice::Prompt),
            "3" => Some(SetupChoice::Defaults),
            _ => None,
        }
    }
}

/// Console front end over any line reader and writer
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Next non-blank line, or `None` at end of input
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        loop {
            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            if !line.trim().is_empty() {
                return Ok(Some(line.trim().to_string()));
            }
        }
    }

    fn eof() -> io::Error {
        io::Error::new(io::ErrorKind::UnexpectedEof, "input closed during setup")
    }

    /// Prompt until `parse` accepts the answer
    fn ask<T>(
        &mut self,
        prompt: &str,
        invalid: &str,
        parse: impl Fn(&str) -> Option<T>,
    ) -> io::Result<T> {
        loop {
            write!(self.output, "{prompt}")?;
            self.output.flush()?;
            let line = self.read_line()?.ok_or_else(Self::eof)?;
            match parse(&line) {
                Some(value) => return Ok(value),
                None => writeln!(self.output, "{invalid}")?,
            }
        }
    }

    fn parse_position(s: &str) -> Option<Position> {
        let mut parts = s.split_whitespace().map(str::parse::<i32>);
        match (parts.next(), parts.next(), parts.next()) {
            (Some(Ok(row)), Some(Ok(col)), None) => Some(Position::new(row, col)),
            _ => None,
        }
    }

    /// Ask for board size and positions interactively
    pub fn prompt_settings(&mut self) -> io::Result<GridSettings> {
        let positive = |s: &str| s.parse::<u32>().ok().filter(|&n| n > 0);
        let rows = self.ask(
            "Input the maximum amount of rows the board has: ",
            "Please enter a non-negative, non-zero number.",
            positive,
        )?;
        let columns = self.ask(
            "Input the maximum amount of columns the board has: ",
            "Please enter a non-negative, non-zero number.",
            positive,
        )?;
        let player = self.ask(
            "Input the player's position (input as \"<row> <column>\" without quotes): ",
            "Player position is invalid.",
            |s| Self::parse_position(s).filter(|p| p.in_bounds(rows, columns)),
        )?;
        let target = self.ask(
            "Input the target's position (input as \"<row> <column>\" without quotes): ",
            "Target position is invalid.",
            |s| Self::parse_position(s).filter(|p| p.in_bounds(rows, columns)),
        )?;
        Ok(GridSettings {
            rows,
            columns,
            player: (player.row, player.col),
            target: (target.row, target.col),
        })
    }

    /// Offer the three setup options until one succeeds
    pub fn setup(&mut self, settings_path: &std::path::Path) -> io::Result<GridSettings> {
        loop {
            writeln!(self.output, "Select input option (1/2/3):")?;
            writeln!(self.output, "1. {}", settings_path.display())?;
            writeln!(self.output, "2. User input")?;
            writeln!(self.output, "3. Default settings")?;
            let line = self.read_line()?.ok_or_else(Self::eof)?;
            match SetupChoice::parse(&line) {
                Some(SetupChoice::SettingsFile) => {
                    if !settings_path.exists() {
                        writeln!(self.output, "{} not found.", settings_path.display())?;
                        continue;
                    }
                    match GridSettings::load(settings_path) {
                        Ok(settings) => {
                            writeln!(self.output, "{} found.", settings_path.display())?;
                            return Ok(settings);
                        }
                        Err(e) => {
                            log::warn!("{}: {}", settings_path.display(), e);
                            writeln!(self.output, "{} is invalid: {}", settings_path.display(), e)?;
                        }
                    }
                }
                Some(SetupChoice::Prompt) => return self.prompt_settings(),
                Some(SetupChoice::Defaults) => {
                    writeln!(self.output, "Using default settings.")?;
                    return Ok(GridSettings::default());
                }
                None => writeln!(self.output, "Invalid input.")?,
            }
        }
    }

    /// Run the command loop until the target is attacked, the player exits,
    /// or input runs out.
    pub fn play(&mut self, grid: &mut Grid) -> io::Result<Outcome> {
        writeln!(self.output, "Grid size is {} x {}.", grid.rows, grid.columns)?;
        loop {
            write!(self.output, "{grid}")?;
            writeln!(self.output, "You are in room {}.", grid.room())?;
            if grid.on_target() {
                writeln!(self.output, "Your target is here!")?;
            }
            write!(self.output, "> ")?;
            self.output.flush()?;

            let Some(line) = self.read_line()? else {
                log::info!("Input closed, leaving the game");
                writeln!(self.output)?;
                return Ok(Outcome::Quit);
            };

            let outcome = match Command::parse(&line) {
                Some(command) => grid.apply(command),
                None => {
                    writeln!(self.output, "Invalid command.")?;
                    continue;
                }
            };
            if let Some(message) = outcome.message() {
                writeln!(self.output, "{message}")?;
            }
            if outcome.ends_game() {
                writeln!(self.output, "Thanks for playing!")?;
                return Ok(outcome);
            }
        }
    }
}

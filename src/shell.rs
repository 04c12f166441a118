//! Numbered menu driving a bid table from a line-based input

use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
    time::Instant,
};

use log::{debug, error};

use crate::{
    ChainedHashTable,
    bid::Bid,
    loader::{ColumnLayout, load_bids},
};

/// Identifier used for find and remove when none is given on the menu line
pub const DEFAULT_BID_KEY: &str = "98223";

/// An entry of the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuChoice {
    /// Load the CSV file into the table
    Load,
    /// Print every bid
    DisplayAll,
    /// Look up one bid
    Find,
    /// Remove one bid
    Remove,
    /// Leave the menu
    Exit,
}

impl MenuChoice {
    /// Maps the number typed by the user onto a menu entry
    fn from_selection(selection: &str) -> Option<Self> {
        match selection {
            "1" => Some(Self::Load),
            "2" => Some(Self::DisplayAll),
            "3" => Some(Self::Find),
            "4" => Some(Self::Remove),
            "9" => Some(Self::Exit),
            _ => None,
        }
    }
}

/// Result of executing a menu line
enum CommandResult {
    /// Show the menu again
    Continue,
    /// Leave the loop
    Exit,
}

/// Interactive session over one bid table
#[derive(Debug)]
pub struct Shell {
    /// The table every command acts on
    table: ChainedHashTable<Bid>,
    /// File read by the load command
    csv_path: PathBuf,
    /// Identifier used when a find or remove line names none
    bid_key: String,
    /// Columns the loader reads
    layout: ColumnLayout,
}

impl Shell {
    /// Creates a session over `table`
    #[must_use]
    pub fn new(
        table: ChainedHashTable<Bid>,
        csv_path: impl Into<PathBuf>,
        bid_key: impl Into<String>,
    ) -> Self {
        Self {
            table,
            csv_path: csv_path.into(),
            bid_key: bid_key.into(),
            layout: ColumnLayout::default(),
        }
    }

    /// Replaces the column layout used by the load command
    #[must_use]
    pub fn with_layout(mut self, layout: ColumnLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Returns the table the session works on
    #[must_use]
    pub fn table(&self) -> &ChainedHashTable<Bid> {
        &self.table
    }

    /// Consumes the session and hands the table back
    #[must_use]
    pub fn into_table(self) -> ChainedHashTable<Bid> {
        self.table
    }

    /// Runs the menu until the user exits or the input ends
    ///
    /// Each line holds a selection, optionally followed by a bid id for find and
    /// remove (`3 12345`). Bad selections and failed loads are reported on `out`
    /// and the loop carries on.
    ///
    /// # Errors
    ///
    /// Only failures to read `input` or write `out` end the loop early.
    pub fn run<I: BufRead, W: Write>(&mut self, input: I, out: &mut W) -> io::Result<()> {
        let mut lines = input.lines();

        loop {
            print_menu(out)?;
            out.flush()?;

            let Some(line) = lines.next() else {
                writeln!(out)?;
                break;
            };

            if let CommandResult::Exit = self.run_line(&line?, out)? {
                break;
            }
        }

        writeln!(out, "Good bye.")
    }

    /// Parses and executes one menu line
    fn run_line<W: Write>(&mut self, line: &str, out: &mut W) -> io::Result<CommandResult> {
        let mut tokens = line.split_whitespace();
        let Some(selection) = tokens.next() else {
            return Ok(CommandResult::Continue);
        };

        let Some(choice) = MenuChoice::from_selection(selection) else {
            writeln!(out, "Invalid selection {selection:?}, enter 1, 2, 3, 4 or 9.")?;
            return Ok(CommandResult::Continue);
        };

        debug!("menu choice {choice:?}");
        let bid_id = tokens.next().unwrap_or(self.bid_key.as_str()).to_string();

        match choice {
            MenuChoice::Load => self.handle_load(out)?,
            MenuChoice::DisplayAll => self.table.print_all(out)?,
            MenuChoice::Find => self.handle_find(&bid_id, out)?,
            MenuChoice::Remove => self.handle_remove(&bid_id, out)?,
            MenuChoice::Exit => return Ok(CommandResult::Exit),
        }

        Ok(CommandResult::Continue)
    }

    /// Loads the CSV file and reports the header, counts and elapsed time
    fn handle_load<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        writeln!(out, "Loading CSV file {}", self.csv_path.display())?;

        let started = Instant::now();
        let result = load_bids(&self.csv_path, &mut self.table, &self.layout);
        let elapsed = started.elapsed();

        match result {
            Ok(report) => {
                writeln!(out, "{}", report.header.join(" | "))?;
                writeln!(out, "{} bids read", report.loaded)?;
                if report.skipped > 0 {
                    writeln!(out, "{} rows skipped", report.skipped)?;
                }
            }
            Err(err) => {
                error!("load of {} failed: {err}", self.csv_path.display());
                writeln!(out, "Error loading {}: {err}", self.csv_path.display())?;
            }
        }

        writeln!(out, "time: {:.6} seconds", elapsed.as_secs_f64())
    }

    /// Looks up one bid and reports it with the elapsed time
    fn handle_find<W: Write>(&self, bid_id: &str, out: &mut W) -> io::Result<()> {
        let started = Instant::now();
        let found = self.table.search(bid_id);
        let elapsed = started.elapsed();

        match found {
            Some(bid) => writeln!(out, "{bid}")?,
            None => writeln!(out, "Bid Id {bid_id} not found.")?,
        }

        writeln!(out, "time: {:.6} seconds", elapsed.as_secs_f64())
    }

    /// Removes one bid
    fn handle_remove<W: Write>(&mut self, bid_id: &str, out: &mut W) -> io::Result<()> {
        match self.table.remove(bid_id) {
            Some(_) => writeln!(out, "Bid Id {bid_id} removed."),
            None => writeln!(out, "Bid Id {bid_id} is not found!"),
        }
    }
}

/// Writes the numbered menu and the prompt
fn print_menu<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "Menu:")?;
    writeln!(out, "  1. Load Bids")?;
    writeln!(out, "  2. Display All Bids")?;
    writeln!(out, "  3. Find Bid")?;
    writeln!(out, "  4. Remove Bid")?;
    writeln!(out, "  9. Exit")?;
    write!(out, "Enter choice: ")
}

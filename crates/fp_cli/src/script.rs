//! Session scripts
//!
//! One command per line, `#` starts a comment:
//!
//! ```text
//! load                  # fetch the sidebar cards
//! init                  # random players, one per slot
//! reset                 # init after confirmation
//! formation 1-3-1-1
//! drag 2                # start dragging sidebar card #2
//! pick 0                # start dragging field card #0
//! drop 50 72            # drop at field percentages
//! pointer 0 0 800 600 400 300   # drop at a client point inside a field rect
//! end                   # cancel the drag
//! hover 0
//! remove 0
//! key ctrl+s
//! save
//! export
//! ratings
//! board
//! sidebar
//! ```

use std::str::FromStr;

use anyhow::{anyhow, bail, Context, Result};
use fp_core::{
    CardApi, CardId, FieldPosition, FieldRect, FormationName, KeyChord, KeyValueStore,
    PlannerApp, UiEffect,
};
use tracing::info;

use crate::report::{board_lines, describe_effect, ratings_line, sidebar_lines};

#[derive(Debug, Clone, PartialEq)]
pub enum ScriptCommand {
    Load,
    Init,
    Reset,
    Formation(FormationName),
    /// Sidebar index
    Drag(usize),
    /// Field card index, in board order
    Pick(usize),
    Drop(FieldPosition),
    Pointer { rect: FieldRect, client_x: f64, client_y: f64 },
    End,
    Hover(usize),
    Remove(usize),
    Key(KeyChord),
    Save,
    Export,
    Ratings,
    Board,
    Sidebar,
}

impl FromStr for ScriptCommand {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let mut words = line.split_whitespace();
        let verb = words.next().ok_or_else(|| anyhow!("empty command"))?;
        let args: Vec<&str> = words.collect();

        let command = match (verb.to_ascii_lowercase().as_str(), args.as_slice()) {
            ("load", []) => ScriptCommand::Load,
            ("init", []) => ScriptCommand::Init,
            ("reset", []) => ScriptCommand::Reset,
            ("formation", [name]) => {
                ScriptCommand::Formation(name.parse::<FormationName>().map_err(|e| anyhow!("{e}"))?)
            }
            ("drag", [index]) => ScriptCommand::Drag(number(index)?),
            ("pick", [index]) => ScriptCommand::Pick(number(index)?),
            ("drop", [x, y]) => ScriptCommand::Drop(FieldPosition::new(number(x)?, number(y)?)),
            ("pointer", [left, top, width, height, x, y]) => ScriptCommand::Pointer {
                rect: FieldRect::new(number(left)?, number(top)?, number(width)?, number(height)?),
                client_x: number(x)?,
                client_y: number(y)?,
            },
            ("end", []) => ScriptCommand::End,
            ("hover", [index]) => ScriptCommand::Hover(number(index)?),
            ("remove", [index]) => ScriptCommand::Remove(number(index)?),
            ("key", [chord]) => ScriptCommand::Key(chord.parse::<KeyChord>().map_err(anyhow::Error::msg)?),
            ("save", []) => ScriptCommand::Save,
            ("export", []) => ScriptCommand::Export,
            ("ratings", []) => ScriptCommand::Ratings,
            ("board", []) => ScriptCommand::Board,
            ("sidebar", []) => ScriptCommand::Sidebar,
            (other, _) => bail!("unknown command or wrong arguments: '{other}'"),
        };
        Ok(command)
    }
}

fn number<T>(word: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    word.parse().with_context(|| format!("'{word}' is not a number"))
}

/// Parse a whole script, skipping blank lines and comments.
pub fn parse_script(text: &str) -> Result<Vec<ScriptCommand>> {
    text.lines()
        .enumerate()
        .filter_map(|(index, raw)| {
            let line = raw.split('#').next().unwrap_or("").trim();
            (!line.is_empty()).then_some((index + 1, line))
        })
        .map(|(line_no, line)| line.parse().with_context(|| format!("line {line_no}: {line}")))
        .collect()
}

/// A planner driven by script commands. Confirmation prompts are answered
/// with `assume_yes`.
pub struct Session<A: CardApi, S: KeyValueStore> {
    app: PlannerApp<A, S>,
    assume_yes: bool,
}

impl<A: CardApi, S: KeyValueStore> Session<A, S> {
    pub fn new(app: PlannerApp<A, S>, assume_yes: bool) -> Self {
        Self { app, assume_yes }
    }

    pub fn app(&self) -> &PlannerApp<A, S> {
        &self.app
    }

    /// Run one command, returning the lines to print.
    pub fn run(&mut self, command: &ScriptCommand) -> Result<Vec<String>> {
        let answer = self.assume_yes;
        let mut confirm = move |prompt: &str| {
            info!(prompt, answer, "confirmation requested");
            answer
        };

        let effects = match command {
            ScriptCommand::Load => {
                let effects = self.app.load_player_cards();
                let mut lines = describe_all(&effects);
                lines.extend(sidebar_lines(self.app.sidebar()));
                return Ok(lines);
            }
            ScriptCommand::Init => self.app.initialize(),
            ScriptCommand::Reset => self.app.reset(&mut confirm),
            ScriptCommand::Formation(name) => self.app.change_formation(*name),
            ScriptCommand::Drag(index) => {
                if self.app.sidebar().card(*index).is_none() {
                    bail!("no sidebar card #{index}");
                }
                self.app.begin_sidebar_drag(*index)
            }
            ScriptCommand::Pick(index) => {
                let id = self.field_card(*index)?;
                self.app.begin_field_drag(id)
            }
            ScriptCommand::Drop(position) => self.app.drop_at(*position),
            ScriptCommand::Pointer { rect, client_x, client_y } => {
                self.app.drop_at_pointer(*rect, *client_x, *client_y)
            }
            ScriptCommand::End => {
                self.app.end_drag();
                Vec::new()
            }
            ScriptCommand::Hover(index) => {
                let id = self.field_card(*index)?;
                self.app.hover_card(id)
            }
            ScriptCommand::Remove(index) => {
                let id = self.field_card(*index)?;
                self.app.remove_card(id)
            }
            ScriptCommand::Key(chord) => self.app.handle_key(*chord, &mut confirm),
            ScriptCommand::Save => self.app.save_formation(),
            ScriptCommand::Export => self.app.export_formation(),
            ScriptCommand::Ratings => {
                return Ok(vec![ratings_line(&self.app.ratings(), self.app.board().len())]);
            }
            ScriptCommand::Board => return Ok(board_lines(self.app.board())),
            ScriptCommand::Sidebar => return Ok(sidebar_lines(self.app.sidebar())),
        };

        Ok(describe_all(&effects))
    }

    fn field_card(&self, index: usize) -> Result<CardId> {
        self.app
            .board()
            .cards()
            .get(index)
            .map(|card| card.id)
            .ok_or_else(|| anyhow!("no card #{index} on the field"))
    }
}

fn describe_all(effects: &[UiEffect]) -> Vec<String> {
    effects.iter().map(describe_effect).collect()
}

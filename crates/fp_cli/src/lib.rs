//! Formation Planner CLI Library
//!
//! Text front end for the formation board: a small line-based script
//! language that drives a [`fp_core::PlannerApp`], and the text rendering of
//! board state and UI effects.

pub mod report;
pub mod script;

pub use report::{board_lines, describe_effect, ratings_line, sidebar_lines};
pub use script::{parse_script, ScriptCommand, Session};

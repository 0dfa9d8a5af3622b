//! Fixed levels drawn as text.
//!
//! Each character is one cell. `@` marks the start and `>` the exit, both on
//! floor. The other accepted characters are the terrain glyphs:
//!
//! | char | terrain |
//! |------|---------|
//! | `#`  | wall    |
//! | `.`  | floor   |
//! | `+`  | door    |
//! | `~`  | water   |
//! | `-`  | horizontal wall |
//! | `\|` | vertical wall   |
//! | ` `  | nothing |

use std::fmt;

use delve_core::{Grid, Point};

use super::{BuildError, BuildResult, Builder};
use crate::rng::Dice;
use crate::terrain::Terrain;

/// A level read from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomMap {
    strata: Grid<Terrain>,
    start: Point,
    exit: Point,
}

impl CustomMap {
    /// Parse a layout. Leading and trailing blank lines are ignored and the
    /// indentation shared by all lines is removed. Other spaces are cells:
    /// every line must have the same width.
    pub fn new(text: &str) -> Result<Self, LayoutError> {
        let mut rows = dedent(text);
        while rows.last().is_some_and(|r| r.is_empty()) {
            rows.pop();
        }
        let first = rows.iter().position(|r| !r.is_empty()).unwrap_or(rows.len());
        let rows = &rows[first..];
        let width = rows.first().map_or(0, |r| r.chars().count());
        if rows.iter().any(|r| r.chars().count() != width) {
            return Err(LayoutError::InconsistentSize(text.to_string()));
        }

        let size = Point::new(width as i32, rows.len() as i32);
        let mut strata = Grid::new(size, Terrain::Unset);
        let mut start = None;
        let mut exit = None;
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                let pos = Point::new(x as i32, y as i32);
                let terrain = match ch {
                    '@' | '>' => {
                        let marker = if ch == '@' { &mut start } else { &mut exit };
                        if marker.replace(pos).is_some() {
                            return Err(LayoutError::DuplicateMarker(ch));
                        }
                        Terrain::Floor
                    }
                    _ => terrain_for(ch).ok_or(LayoutError::InvalidRune { ch, pos })?,
                };
                strata.set(pos, terrain);
            }
        }
        let start = start.ok_or(LayoutError::MissingMarker('@'))?;
        let exit = exit.ok_or(LayoutError::MissingMarker('>'))?;
        Ok(Self {
            strata,
            start,
            exit,
        })
    }

    pub fn size(&self) -> Point {
        self.strata.size()
    }
}

/// Strip the leading whitespace common to every non-blank line. Blank lines
/// become empty.
fn dedent(text: &str) -> Vec<&str> {
    let indent_of = |row: &str| row.len() - row.trim_start_matches([' ', '\t']).len();
    let mut indent: Option<&str> = None;
    for row in text.lines().filter(|r| !r.trim().is_empty()) {
        let own = &row[..indent_of(row)];
        indent = Some(match indent {
            None => own,
            Some(common) => {
                let n = common.bytes().zip(own.bytes()).take_while(|(a, b)| a == b).count();
                &common[..n]
            }
        });
    }
    let indent = indent.unwrap_or("");
    text.lines()
        .map(|row| {
            if row.trim().is_empty() {
                ""
            } else {
                row.strip_prefix(indent).unwrap_or(row)
            }
        })
        .collect()
}

fn terrain_for(ch: char) -> Option<Terrain> {
    let t = match ch {
        '#' => Terrain::Wall,
        '.' => Terrain::Floor,
        '+' => Terrain::Door,
        '~' => Terrain::Water,
        '-' => Terrain::WallH,
        '|' => Terrain::WallV,
        ' ' => Terrain::Unset,
        _ => return None,
    };
    Some(t)
}

impl Builder for CustomMap {
    /// Copy the layout. No dice are rolled, and the requested size is
    /// ignored: the level always has the layout's size.
    fn build(&self, _rng: &mut Dice, size: Point) -> Result<BuildResult, BuildError> {
        if size != self.size() {
            log::debug!("custom map: {size} requested, using layout size {}", self.size());
        }
        Ok(BuildResult {
            size: self.size(),
            strata: self.strata.clone(),
            start_pos: self.start,
            exit_pos: self.exit,
        })
    }
}

/// Errors that can occur when reading a text layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// Lines have different widths.
    InconsistentSize(String),
    /// A character with no terrain meaning.
    InvalidRune { ch: char, pos: Point },
    /// The start (`@`) or exit (`>`) marker is absent.
    MissingMarker(char),
    /// A marker appears more than once.
    DuplicateMarker(char),
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InconsistentSize(s) => write!(f, "layout: inconsistent size:\n{s}"),
            Self::InvalidRune { ch, pos } => {
                write!(f, "layout contains invalid rune \u{201c}{ch}\u{201d} at {pos}")
            }
            Self::MissingMarker(ch) => write!(f, "layout has no \u{201c}{ch}\u{201d} marker"),
            Self::DuplicateMarker(ch) => {
                write!(f, "layout has more than one \u{201c}{ch}\u{201d} marker")
            }
        }
    }
}

impl std::error::Error for LayoutError {}

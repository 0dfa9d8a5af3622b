//! Terrain tags and their attribute table.

use std::fmt;

use delve_core::Grid;

/// The closed set of terrain tags a builder can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Terrain {
    /// Never written by any builder (solid rock outside rooms).
    #[default]
    Unset,
    Floor,
    /// Corridor floor that forbids diagonal steps.
    TunnelFloor,
    Wall,
    WallH,
    WallV,
    Corner,
    Door,
    /// Rogue-style door: no diagonal steps, dark.
    RogueDoor,
    Passage,
    /// Rogue-style corridor: no diagonal steps, dark.
    RoguePassage,
    Water,
}

/// Static attributes of a terrain tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerrainInfo {
    pub glyph: char,
    pub passable: bool,
    pub allow_diagonal: bool,
    /// Dark cells are only seen through when standing on them.
    pub dark: bool,
    /// Glyph kept on screen after the cell leaves the field of view.
    pub remembered: Option<char>,
}

impl TerrainInfo {
    const fn new(glyph: char, passable: bool, remembered: Option<char>) -> Self {
        Self {
            glyph,
            passable,
            allow_diagonal: true,
            dark: false,
            remembered,
        }
    }

    const fn rogue(self) -> Self {
        Self {
            allow_diagonal: false,
            dark: true,
            ..self
        }
    }
}

impl Terrain {
    pub const ALL: [Terrain; 12] = [
        Terrain::Unset,
        Terrain::Floor,
        Terrain::TunnelFloor,
        Terrain::Wall,
        Terrain::WallH,
        Terrain::WallV,
        Terrain::Corner,
        Terrain::Door,
        Terrain::RogueDoor,
        Terrain::Passage,
        Terrain::RoguePassage,
        Terrain::Water,
    ];

    pub const fn info(self) -> TerrainInfo {
        match self {
            Terrain::Unset => TerrainInfo::new(' ', false, None),
            Terrain::Floor => TerrainInfo::new('.', true, None),
            Terrain::TunnelFloor => TerrainInfo {
                allow_diagonal: false,
                ..TerrainInfo::new('.', true, None)
            },
            Terrain::Wall => TerrainInfo::new('#', false, Some('#')),
            Terrain::WallH => TerrainInfo::new('-', false, Some('-')),
            Terrain::WallV => TerrainInfo::new('|', false, Some('|')),
            Terrain::Corner => TerrainInfo::new('+', false, Some('+')),
            Terrain::Door => TerrainInfo::new('+', true, Some('+')),
            Terrain::RogueDoor => TerrainInfo::new('+', true, Some('+')).rogue(),
            Terrain::Passage => TerrainInfo::new('#', true, Some('#')),
            Terrain::RoguePassage => TerrainInfo::new('#', true, Some('#')).rogue(),
            Terrain::Water => TerrainInfo::new('~', true, None),
        }
    }

    #[inline]
    pub const fn glyph(self) -> char {
        self.info().glyph
    }

    #[inline]
    pub const fn is_passable(self) -> bool {
        self.info().passable
    }

    #[inline]
    pub const fn allows_diagonal(self) -> bool {
        self.info().allow_diagonal
    }

    #[inline]
    pub const fn is_dark(self) -> bool {
        self.info().dark
    }
}

impl fmt::Display for Terrain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.glyph())
    }
}

/// Plain-text dump of a terrain grid: one glyph per cell, every row ended by
/// a newline.
pub fn render(strata: &Grid<Terrain>) -> String {
    strata.to_text(|t| t.glyph())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passability() {
        let passable: Vec<_> = Terrain::ALL.iter().filter(|t| t.is_passable()).collect();
        assert_eq!(
            passable,
            [
                &Terrain::Floor,
                &Terrain::TunnelFloor,
                &Terrain::Door,
                &Terrain::RogueDoor,
                &Terrain::Passage,
                &Terrain::RoguePassage,
                &Terrain::Water,
            ]
        );
    }

    #[test]
    fn rogue_variants_are_dark_and_straight() {
        for t in [Terrain::RogueDoor, Terrain::RoguePassage] {
            assert!(t.is_dark());
            assert!(!t.allows_diagonal());
        }
        assert!(!Terrain::TunnelFloor.allows_diagonal());
        assert!(!Terrain::TunnelFloor.is_dark());
        assert!(Terrain::Door.allows_diagonal());
    }

    #[test]
    fn glyphs() {
        let s: String = Terrain::ALL.iter().map(|t| t.glyph()).collect();
        assert_eq!(s, " ..#-|+++##~");
        assert_eq!(Terrain::Corner.info().remembered, Some('+'));
        assert_eq!(Terrain::Floor.info().remembered, None);
    }

    #[test]
    fn render_rows() {
        let mut g = Grid::new(delve_core::Point::new(3, 2), Terrain::Wall);
        g.set(delve_core::Point::new(1, 1), Terrain::Water);
        assert_eq!(render(&g), "###\n#~#\n");
    }
}

//! # Map File Module
//!
//! Reads the plain-text map format into a [`VoxelGrid`].
//!
//! ```text
//! 2 2 1          <- width height depth
//!
//! 2              <- number of legend lines
//! 1 wall         <- legend, kept for diagnostics only
//! 2 grass
//!
//! 1 0            <- layer z = 0, row y = 0
//! 0 2            <- layer z = 0, row y = 1
//! ```
//!
//! Each layer holds `height` rows of `width` tile ids. Layers are separated by
//! blank lines. Any structural problem is reported with the line it was found on
//! instead of producing a partially filled grid.

use std::{
    iter::Peekable,
    path::{Path, PathBuf},
};

use log::{debug, info};
use thiserror::Error;

use super::{
    grid::{GridDimensions, GridError, VoxelGrid},
    tile::{tile_type::TileType, TileTypeSize},
};

/// Errors raised while loading a map file. Line numbers are 1-based.
#[derive(Debug, Error)]
pub enum MapLoadError {
    /// The file could not be read.
    #[error("failed to read map file {path}")]
    Io {
        /// Path that was opened.
        path: PathBuf,
        /// Underlying io error.
        #[source]
        source: std::io::Error,
    },

    /// The file has no dimension line.
    #[error("map file is empty, expected a `width height depth` line")]
    MissingHeader,

    /// The dimension line is not three unsigned integers.
    #[error("line {line}: expected `width height depth`, found `{found}`")]
    InvalidHeader {
        /// Line number.
        line: usize,
        /// Offending text.
        found: String,
    },

    /// The dimensions do not describe a usable grid.
    #[error("line {line}: {source}")]
    InvalidDimensions {
        /// Line number of the header.
        line: usize,
        /// Why the dimensions were rejected.
        #[source]
        source: GridError,
    },

    /// The legend count line is missing or not a number.
    #[error("line {line}: expected the number of legend lines, found `{found}`")]
    InvalidLegendCount {
        /// Line number.
        line: usize,
        /// Offending text, empty at end of file.
        found: String,
    },

    /// The file ended inside the legend.
    #[error("line {line}: expected {expected} legend lines, found {found}")]
    MissingLegend {
        /// Line number where the file ended.
        line: usize,
        /// Legend lines announced.
        expected: usize,
        /// Legend lines present.
        found: usize,
    },

    /// A layer has fewer rows than the grid height.
    #[error("line {line}: layer {layer} has {found} rows, expected {expected}")]
    MissingRows {
        /// Line number where the layer ended.
        line: usize,
        /// Layer (grid z) being read.
        layer: u32,
        /// Rows per layer.
        expected: u32,
        /// Rows read.
        found: u32,
    },

    /// A row does not hold exactly `width` tile ids.
    #[error("line {line}: expected {expected} tile ids, found {found}")]
    WrongColumnCount {
        /// Line number.
        line: usize,
        /// Grid width.
        expected: u32,
        /// Ids on the line.
        found: usize,
    },

    /// A token in a row is not an integer in tile id range.
    #[error("line {line}: `{token}` is not a tile id")]
    InvalidTileId {
        /// Line number.
        line: usize,
        /// Offending token.
        token: String,
    },

    /// A tile id is a number but names no tile type.
    #[error("line {line}: unknown tile id {id}")]
    UnknownTileId {
        /// Line number.
        line: usize,
        /// Offending id.
        id: TileTypeSize,
    },

    /// Non-blank content follows the last layer.
    #[error("line {line}: unexpected content after the last layer")]
    TrailingData {
        /// Line number.
        line: usize,
    },
}

/// A parsed map: the grid plus the legend lines that preceded it.
#[derive(Clone, Debug)]
pub struct MapFile {
    /// The tile grid.
    pub grid: VoxelGrid,
    /// Legend lines, trimmed, in file order.
    pub legend: Vec<String>,
}

/// Reads and parses the map file at `path`.
pub fn load_map(path: impl AsRef<Path>) -> Result<MapFile, MapLoadError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| MapLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let map = parse_map(&text)?;
    let dimensions = map.grid.dimensions();
    info!(
        "Loaded map {} ({}x{}x{}, {} occupied cells)",
        path.display(),
        dimensions.width,
        dimensions.height,
        dimensions.depth,
        map.grid.iter_occupied().count()
    );
    for entry in &map.legend {
        debug!("Map legend: {}", entry);
    }
    Ok(map)
}

type Lines<'a> = Peekable<std::vec::IntoIter<(usize, &'a str)>>;

/// Advances past blank lines without consuming the next non-blank one.
fn skip_blank(lines: &mut Lines<'_>) {
    while lines.next_if(|(_, line)| line.is_empty()).is_some() {}
}

/// Parses map text already read into memory.
pub fn parse_map(text: &str) -> Result<MapFile, MapLoadError> {
    let numbered: Vec<(usize, &str)> = text
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .collect();
    let line_total = numbered.len();
    let mut lines: Lines<'_> = numbered.into_iter().peekable();

    let (header_line, header) = lines.next().ok_or(MapLoadError::MissingHeader)?;
    let dimensions = parse_header(header_line, header)?;
    let mut grid = VoxelGrid::new(dimensions).map_err(|source| MapLoadError::InvalidDimensions {
        line: header_line,
        source,
    })?;

    skip_blank(&mut lines);
    let legend = parse_legend(&mut lines, line_total)?;

    let mut index = 0;
    for layer in 0..dimensions.depth {
        skip_blank(&mut lines);
        for row in 0..dimensions.height {
            let Some((line_number, line)) = lines.next_if(|(_, line)| !line.is_empty()) else {
                return Err(MapLoadError::MissingRows {
                    line: lines.peek().map_or(line_total + 1, |(n, _)| *n),
                    layer,
                    expected: dimensions.height,
                    found: row,
                });
            };
            for tile in parse_row(line_number, line, dimensions.width)? {
                grid.set(index, tile);
                index += 1;
            }
        }
    }

    skip_blank(&mut lines);
    if let Some((line, _)) = lines.next() {
        return Err(MapLoadError::TrailingData { line });
    }

    Ok(MapFile { grid, legend })
}

fn parse_header(line: usize, text: &str) -> Result<GridDimensions, MapLoadError> {
    let invalid = || MapLoadError::InvalidHeader {
        line,
        found: text.to_string(),
    };
    let values = text
        .split_whitespace()
        .map(|token| token.parse::<u32>().map_err(|_| invalid()))
        .collect::<Result<Vec<_>, _>>()?;
    match values.as_slice() {
        &[width, height, depth] => Ok(GridDimensions::new(width, height, depth)),
        _ => Err(invalid()),
    }
}

fn parse_legend(lines: &mut Lines<'_>, line_total: usize) -> Result<Vec<String>, MapLoadError> {
    let (count_line, count_text) = lines.next().unwrap_or((line_total + 1, ""));
    let expected = count_text
        .parse::<usize>()
        .map_err(|_| MapLoadError::InvalidLegendCount {
            line: count_line,
            found: count_text.to_string(),
        })?;

    let mut legend = Vec::with_capacity(expected);
    while legend.len() < expected {
        let Some((_, entry)) = lines.next() else {
            return Err(MapLoadError::MissingLegend {
                line: line_total + 1,
                expected,
                found: legend.len(),
            });
        };
        legend.push(entry.to_string());
    }
    Ok(legend)
}

fn parse_row(line: usize, text: &str, width: u32) -> Result<Vec<TileType>, MapLoadError> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.len() != width as usize {
        return Err(MapLoadError::WrongColumnCount {
            line,
            expected: width,
            found: tokens.len(),
        });
    }

    tokens
        .into_iter()
        .map(|token| {
            let id = token
                .parse::<TileTypeSize>()
                .map_err(|_| MapLoadError::InvalidTileId {
                    line,
                    token: token.to_string(),
                })?;
            TileType::from_id(id).ok_or(MapLoadError::UnknownTileId { line, id })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUSE: &str = "3 2 2\n\n2\n1 wall\n4 wood\n\n1 1 1\n4 4 4\n\n0 1 0\n0 0 8\n";

    #[test]
    fn parses_layers_in_linear_order() {
        let map = parse_map(HOUSE).unwrap();
        let grid = &map.grid;
        assert_eq!(grid.dimensions(), GridDimensions::new(3, 2, 2));
        assert_eq!(map.legend, vec!["1 wall".to_string(), "4 wood".to_string()]);
        assert_eq!(grid.get_at(0, 0, 0), Some(TileType::Wall));
        assert_eq!(grid.get_at(2, 1, 0), Some(TileType::Wood));
        assert_eq!(grid.get_at(1, 0, 1), Some(TileType::Wall));
        assert_eq!(grid.get_at(0, 0, 1), Some(TileType::Empty));
        assert_eq!(grid.get_at(2, 1, 1), Some(TileType::Tree));
    }

    #[test]
    fn accepts_missing_blank_lines_and_crlf() {
        let map = parse_map("2 1 1\r\n0\r\n1 2\r\n").unwrap();
        assert_eq!(map.grid.tiles(), &[TileType::Wall, TileType::Grass]);
        assert!(map.legend.is_empty());
    }

    #[test]
    fn rejects_bad_header() {
        assert!(matches!(parse_map(""), Err(MapLoadError::MissingHeader)));
        assert!(matches!(
            parse_map("2 x 1\n0\n"),
            Err(MapLoadError::InvalidHeader { line: 1, .. })
        ));
        assert!(matches!(
            parse_map("2 2\n0\n"),
            Err(MapLoadError::InvalidHeader { line: 1, .. })
        ));
        assert!(matches!(
            parse_map("0 2 2\n0\n"),
            Err(MapLoadError::InvalidDimensions { line: 1, .. })
        ));
        assert!(matches!(
            parse_map("2048 2048 2048\n0\n"),
            Err(MapLoadError::InvalidDimensions {
                source: GridError::TooLarge { .. },
                ..
            })
        ));
    }

    #[test]
    fn rejects_short_legend() {
        assert!(matches!(
            parse_map("1 1 1\n\nmany\n"),
            Err(MapLoadError::InvalidLegendCount { line: 3, .. })
        ));
        assert!(matches!(
            parse_map("1 1 1\n\n3\na\nb\n"),
            Err(MapLoadError::MissingLegend {
                expected: 3,
                found: 2,
                ..
            })
        ));
    }

    #[test]
    fn rejects_short_layers_and_rows() {
        assert!(matches!(
            parse_map("2 2 1\n0\n1 1\n"),
            Err(MapLoadError::MissingRows {
                layer: 0,
                expected: 2,
                found: 1,
                ..
            })
        ));
        assert!(matches!(
            parse_map("2 2 1\n0\n1 1\n\n1 1\n"),
            Err(MapLoadError::MissingRows { line: 4, .. })
        ));
        assert!(matches!(
            parse_map("2 1 1\n0\n1\n"),
            Err(MapLoadError::WrongColumnCount {
                line: 3,
                expected: 2,
                found: 1
            })
        ));
    }

    #[test]
    fn rejects_bad_tile_ids() {
        assert!(matches!(
            parse_map("2 1 1\n0\n1 z\n"),
            Err(MapLoadError::InvalidTileId { line: 3, .. })
        ));
        assert!(matches!(
            parse_map("2 1 1\n0\n1 300\n"),
            Err(MapLoadError::InvalidTileId { line: 3, .. })
        ));
        assert!(matches!(
            parse_map("2 1 1\n0\n1 42\n"),
            Err(MapLoadError::UnknownTileId { line: 3, id: 42 })
        ));
    }

    #[test]
    fn rejects_trailing_rows() {
        assert!(matches!(
            parse_map("1 1 1\n0\n1\n\n1\n"),
            Err(MapLoadError::TrailingData { line: 5 })
        ));
    }
}

use serde::{Deserialize, Serialize};

use crate::error::{SceneError, SceneResult};

/// A rectangular map of wall codes for the raycaster.
///
/// Code 0 is empty space. Any other code is a wall whose texture is
/// `code - 1` in the raycaster's texture list. Rows run along +y, columns
/// along +x, so `cell(x, y)` reads `rows[y][x]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<u32>>", into = "Vec<Vec<u32>>")]
pub struct GridMap {
    width: usize,
    height: usize,
    cells: Vec<u32>,
}

impl GridMap {
    /// Build a map from rows of equal length.
    pub fn from_rows(rows: Vec<Vec<u32>>) -> SceneResult<Self> {
        let width = rows.first().map(Vec::len).unwrap_or(0);
        if width == 0 {
            return Err(SceneError::EmptyGrid);
        }

        let height = rows.len();
        let mut cells = Vec::with_capacity(width * height);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != width {
                return Err(SceneError::RaggedGrid {
                    row,
                    expected: width,
                    found: values.len(),
                });
            }
            cells.extend(values);
        }

        Ok(Self { width, height, cells })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Cell code at `(x, y)`, or `None` outside the map.
    pub fn cell(&self, x: i32, y: i32) -> Option<u32> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells.get(y * self.width + x).copied()
    }

    /// True when the cell holds a wall. Cells outside the map are not walls.
    pub fn is_wall(&self, x: i32, y: i32) -> bool {
        matches!(self.cell(x, y), Some(code) if code > 0)
    }

    /// Largest wall code used, i.e. how many textures the map needs.
    pub fn max_code(&self) -> u32 {
        self.cells.iter().copied().max().unwrap_or(0)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u32]> {
        self.cells.chunks_exact(self.width)
    }
}

impl TryFrom<Vec<Vec<u32>>> for GridMap {
    type Error = SceneError;

    fn try_from(rows: Vec<Vec<u32>>) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}

impl From<GridMap> for Vec<Vec<u32>> {
    fn from(map: GridMap) -> Self {
        map.rows().map(<[u32]>::to_vec).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> GridMap {
        GridMap::from_rows(vec![vec![1, 1, 1], vec![1, 0, 2], vec![1, 1, 1]]).unwrap()
    }

    #[test]
    fn test_cell_lookup() {
        let map = sample();
        assert_eq!(map.width(), 3);
        assert_eq!(map.height(), 3);
        assert_eq!(map.cell(1, 1), Some(0));
        assert_eq!(map.cell(2, 1), Some(2));
        assert!(map.is_wall(0, 0));
        assert!(!map.is_wall(1, 1));
        assert_eq!(map.max_code(), 2);
    }

    #[test]
    fn test_out_of_bounds() {
        let map = sample();
        assert_eq!(map.cell(-1, 0), None);
        assert_eq!(map.cell(0, 3), None);
        assert_eq!(map.cell(3, 0), None);
        assert!(!map.is_wall(5, 5));
    }

    #[test]
    fn test_invalid_rows() {
        assert_eq!(GridMap::from_rows(Vec::new()), Err(SceneError::EmptyGrid));
        assert_eq!(GridMap::from_rows(vec![Vec::new()]), Err(SceneError::EmptyGrid));
        assert_eq!(
            GridMap::from_rows(vec![vec![1, 1], vec![1]]),
            Err(SceneError::RaggedGrid {
                row: 1,
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn test_json_rows() {
        let map: GridMap = serde_json::from_str("[[1, 1], [0, 3]]").unwrap();
        assert_eq!(map.cell(1, 1), Some(3));
        assert_eq!(serde_json::to_string(&map).unwrap(), "[[1,1],[0,3]]");

        assert!(serde_json::from_str::<GridMap>("[[1, 1], [0]]").is_err());
    }
}

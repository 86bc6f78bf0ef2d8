use crate::{Order, Position};

/// A fixed-size, row-major 2-dimensional array.
///
/// `Grid<T>` backs both the solution and player-state boards of a puzzle,
/// as well as any per-square extra data (rebus keys, style bitmasks).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Grid<T> {
    cols: usize,
    rows: usize,
    data: Vec<T>,
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("the length of the data ({len}) is not a multiple of the column count ({cols})")]
    ColDivisibility { len: usize, cols: usize },

    #[error("row {row} has width {found}, expected {expected}")]
    InvalidWidth { row: usize, found: usize, expected: usize },

    #[error("grid has height {found}, expected {expected}")]
    InvalidHeight { found: usize, expected: usize },
}

impl<T> Grid<T> {
    /// Builds a grid from row-major data, failing if `cols` doesn't divide `data.len()`.
    pub fn from_vec(data: Vec<T>, cols: usize) -> Result<Self, GridError> {
        if cols == 0 || !data.len().is_multiple_of(cols) {
            return Err(GridError::ColDivisibility { len: data.len(), cols });
        }

        let rows = data.len() / cols;
        Ok(Self { cols, rows, data })
    }

    /// Builds a grid from one `Vec<T>` per row, checking each row's width and
    /// the total row count against the caller's expected dimensions.
    pub fn from_rows(rows: Vec<Vec<T>>, expected_cols: usize, expected_rows: usize) -> Result<Self, GridError> {
        if rows.len() != expected_rows {
            return Err(GridError::InvalidHeight { found: rows.len(), expected: expected_rows });
        }

        let mut data = Vec::with_capacity(expected_rows * expected_cols);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != expected_cols {
                return Err(GridError::InvalidWidth { row: i, found: row.len(), expected: expected_cols });
            }
            data.extend(row);
        }

        Ok(Self { cols: expected_cols, rows: expected_rows, data })
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn into_data(self) -> Vec<T> {
        self.data
    }

    fn index(&self, pos: Position) -> Option<usize> {
        if pos.row >= self.rows || pos.col >= self.cols {
            return None;
        }

        Some(pos.row * self.cols + pos.col)
    }

    /// Recovers the [`Position`] of a flat row-major index.
    pub fn position_of(&self, idx: usize) -> Option<Position> {
        if idx >= self.data.len() {
            return None;
        }

        Some(Position::new(idx / self.cols, idx % self.cols))
    }

    pub fn get(&self, pos: Position) -> Option<&T> {
        let idx = self.index(pos)?;
        self.data.get(idx)
    }

    pub fn get_mut(&mut self, pos: Position) -> Option<&mut T> {
        let idx = self.index(pos)?;
        self.data.get_mut(idx)
    }

    /// Row-major iteration, i.e. left-to-right within each row, top row first.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.data.iter_mut()
    }

    pub fn iter_indexed(&self) -> impl Iterator<Item = (Position, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(move |(idx, val)| (Position::new(idx / self.cols, idx % self.cols), val))
    }

    /// Column-major iteration: walks column 0 top-to-bottom, then column 1, etc.
    ///
    /// This is the order the scrambler's canonical solution is built in.
    pub fn iter_col_major(&self) -> impl Iterator<Item = &T> {
        self.iter_indexed_ordered(Order::ColMajor).map(|(_, val)| val)
    }

    /// Iterates in either [`Order`], yielding each element paired with its [`Position`].
    pub fn iter_indexed_ordered(&self, order: Order) -> Box<dyn Iterator<Item = (Position, &T)> + '_> {
        match order {
            Order::RowMajor => Box::new(self.iter_indexed()),
            Order::ColMajor => Box::new((0..self.cols).flat_map(move |col| {
                (0..self.rows).map(move |row| {
                    let pos = Position::new(row, col);
                    (pos, &self.data[row * self.cols + col])
                })
            })),
        }
    }
}

impl<T: Clone> Grid<T> {
    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        Self {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }
}

impl<T: Default + Clone> Grid<T> {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self::filled(rows, cols, T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn col_major_visits_top_to_bottom_then_next_column() {
        let grid = Grid::from_vec(vec!['A', 'B', 'C', 'D', 'E', 'F'], 3).unwrap();
        // A B C
        // D E F
        let order: Vec<char> = grid.iter_indexed_ordered(Order::ColMajor).map(|(_, &c)| c).collect();
        assert_eq!(order, vec!['A', 'D', 'B', 'E', 'C', 'F']);
    }

    #[test]
    fn rejects_non_dividing_column_count() {
        let err = Grid::from_vec(vec![1, 2, 3], 2).unwrap_err();
        assert_eq!(err, GridError::ColDivisibility { len: 3, cols: 2 });
    }

    #[test]
    fn from_rows_accepts_matching_dimensions() {
        let grid = Grid::from_rows(vec![vec!['A', 'B'], vec!['C', 'D']], 2, 2).unwrap();
        assert_eq!(grid.data(), &['A', 'B', 'C', 'D']);
    }

    #[test]
    fn from_rows_rejects_wrong_row_count() {
        let err = Grid::from_rows(vec![vec!['A', 'B']], 2, 2).unwrap_err();
        assert_eq!(err, GridError::InvalidHeight { found: 1, expected: 2 });
    }

    #[test]
    fn from_rows_rejects_wrong_row_width() {
        let err = Grid::from_rows(vec![vec!['A', 'B'], vec!['C']], 2, 2).unwrap_err();
        assert_eq!(err, GridError::InvalidWidth { row: 1, found: 1, expected: 2 });
    }
}

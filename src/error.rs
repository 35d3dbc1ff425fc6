use core::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LayoutError {
    RowCount { expected: usize, actual: usize },
    RowWidth { row: usize, expected: usize, actual: usize },
    UnknownCell { row: usize, col: usize, found: char },
    OpenBorder { row: usize, col: usize },
    BlockedSpawn { row: usize, col: usize },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RowCount { expected, actual } => {
                write!(f, "layout has {actual} rows, expected {expected}")
            }
            Self::RowWidth {
                row,
                expected,
                actual,
            } => write!(
                f,
                "layout row {row} has {actual} columns, expected {expected}"
            ),
            Self::UnknownCell { row, col, found } => {
                write!(f, "unknown cell {found:?} at row {row}, col {col}")
            }
            Self::OpenBorder { row, col } => {
                write!(f, "border cell at row {row}, col {col} must be a wall or tunnel")
            }
            Self::BlockedSpawn { row, col } => {
                write!(f, "spawn cell at row {row}, col {col} is a wall")
            }
        }
    }
}

impl std::error::Error for LayoutError {}

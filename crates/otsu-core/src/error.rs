/// Errors returned when an intensity matrix or histogram violates the input contract.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum OtsuError {
    #[error("intensity matrix has no rows")]
    EmptyImage,

    #[error("invalid intensity matrix dimensions (width={width}, height={height})")]
    ZeroDimension { width: usize, height: usize },

    #[error("invalid intensity buffer length (expected {expected} values, got {got})")]
    BufferLength { expected: usize, got: usize },

    #[error("ragged intensity matrix: row {row} has {got} values, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        got: usize,
    },

    #[error("intensity {value} at row {row}, column {col} is outside [0, 255]")]
    IntensityOutOfRange { row: usize, col: usize, value: i64 },

    #[error("histogram holds no samples")]
    EmptyHistogram,
}

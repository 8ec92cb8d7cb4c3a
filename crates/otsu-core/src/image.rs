use crate::OtsuError;

/// Borrowed row-major 8-bit intensity matrix.
#[derive(Clone, Copy, Debug)]
pub struct GrayImageView<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [u8], // row-major, len = w*h
}

/// Owned row-major 8-bit intensity matrix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrayImage {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

fn check_dims(width: usize, height: usize, len: usize) -> Result<(), OtsuError> {
    if width == 0 || height == 0 {
        return Err(OtsuError::ZeroDimension { width, height });
    }
    let Some(expected) = width.checked_mul(height) else {
        return Err(OtsuError::ZeroDimension { width, height });
    };
    if len != expected {
        return Err(OtsuError::BufferLength { expected, got: len });
    }
    Ok(())
}

impl<'a> GrayImageView<'a> {
    /// Wrap a raw buffer, checking that it holds exactly `width * height` values.
    pub fn new(width: usize, height: usize, data: &'a [u8]) -> Result<Self, OtsuError> {
        check_dims(width, height, data.len())?;
        Ok(Self {
            width,
            height,
            data,
        })
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.width + x]
    }

    #[inline]
    pub fn row(&self, y: usize) -> &'a [u8] {
        let start = y * self.width;
        &self.data[start..start + self.width]
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl GrayImage {
    /// Take ownership of a raw buffer, checking that it holds exactly `width * height` values.
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Result<Self, OtsuError> {
        check_dims(width, height, data.len())?;
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A `width x height` matrix filled with `value`.
    pub fn filled(width: usize, height: usize, value: u8) -> Result<Self, OtsuError> {
        let len = width
            .checked_mul(height)
            .ok_or(OtsuError::ZeroDimension { width, height })?;
        Self::new(width, height, vec![value; len])
    }

    /// Build a matrix from nested integer rows.
    ///
    /// Rejects an empty outer slice, zero-width rows, rows of differing length
    /// and any value outside `[0, 255]`.
    pub fn from_rows<R: AsRef<[i32]>>(rows: &[R]) -> Result<Self, OtsuError> {
        let Some(first) = rows.first() else {
            return Err(OtsuError::EmptyImage);
        };
        let width = first.as_ref().len();
        let height = rows.len();
        if width == 0 {
            return Err(OtsuError::ZeroDimension { width, height });
        }

        // shape first, so a ragged input never sizes the buffer
        if let Some((y, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.as_ref().len() != width)
        {
            return Err(OtsuError::RaggedRow {
                row: y,
                expected: width,
                got: row.as_ref().len(),
            });
        }
        let len = width
            .checked_mul(height)
            .ok_or(OtsuError::ZeroDimension { width, height })?;

        let mut data = Vec::with_capacity(len);
        for (y, row) in rows.iter().enumerate() {
            for (x, &v) in row.as_ref().iter().enumerate() {
                let px = u8::try_from(v).map_err(|_| OtsuError::IntensityOutOfRange {
                    row: y,
                    col: x,
                    value: i64::from(v),
                })?;
                data.push(px);
            }
        }

        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn view(&self) -> GrayImageView<'_> {
        GrayImageView {
            width: self.width,
            height: self.height,
            data: &self.data,
        }
    }

    /// Copy back into nested rows, the inverse of [`GrayImage::from_rows`].
    ///
    /// A zero-width matrix yields no rows.
    pub fn to_rows(&self) -> Vec<Vec<i32>> {
        if self.width == 0 {
            return Vec::new();
        }
        self.data
            .chunks_exact(self.width)
            .map(|row| row.iter().map(|&v| i32::from(v)).collect())
            .collect()
    }
}

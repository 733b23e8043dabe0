//! Sobol low-discrepancy sequence.
//!
//! Direction numbers from Joe and Kuo (new-joe-kuo-6.21201), Gray-code ordering.
//! The first dimension uses the van der Corput sequence in base 2.

use crate::error::{SensitivityError, SensitivityResult};

const BITS: usize = 32;
const SCALE: f64 = 1.0 / 4_294_967_296.0;

/// `(s, a, m_1..m_s)` for dimensions 2, 3, ….
const DIRECTIONS: [(u32, u32, &[u32]); 20] = [
    (1, 0, &[1]),
    (2, 1, &[1, 3]),
    (3, 1, &[1, 3, 1]),
    (3, 2, &[1, 1, 1]),
    (4, 1, &[1, 1, 3, 3]),
    (4, 4, &[1, 3, 5, 13]),
    (5, 2, &[1, 1, 5, 5, 17]),
    (5, 4, &[1, 1, 5, 5, 5]),
    (5, 7, &[1, 1, 7, 11, 19]),
    (5, 11, &[1, 1, 5, 1, 1]),
    (5, 13, &[1, 1, 1, 3, 11]),
    (5, 14, &[1, 3, 5, 5, 31]),
    (6, 1, &[1, 3, 3, 9, 7, 49]),
    (6, 13, &[1, 1, 1, 15, 21, 21]),
    (6, 16, &[1, 3, 1, 13, 27, 49]),
    (6, 19, &[1, 1, 1, 15, 7, 5]),
    (6, 22, &[1, 3, 1, 15, 13, 25]),
    (6, 25, &[1, 1, 5, 5, 19, 61]),
    (7, 1, &[1, 3, 7, 11, 23, 15, 103]),
    (7, 4, &[1, 3, 7, 13, 13, 15, 69]),
];

/// Largest supported dimension.
pub const MAX_DIMENSION: usize = DIRECTIONS.len() + 1;

fn direction_numbers(dim: usize) -> [u32; BITS] {
    let mut v = [0u32; BITS];
    if dim == 0 {
        for (i, vi) in v.iter_mut().enumerate() {
            *vi = 1 << (BITS - 1 - i);
        }
        return v;
    }

    let (s, a, m) = DIRECTIONS[dim - 1];
    let s = s as usize;
    for i in 0..s.min(BITS) {
        v[i] = m[i] << (BITS - 1 - i);
    }
    for i in s..BITS {
        let mut value = v[i - s] ^ (v[i - s] >> s);
        for k in 1..s {
            if (a >> (s - 1 - k)) & 1 == 1 {
                value ^= v[i - k];
            }
        }
        v[i] = value;
    }
    v
}

/// Incremental Sobol generator.
#[derive(Debug, Clone)]
pub struct SobolSequence {
    directions: Vec<[u32; BITS]>,
    state: Vec<u32>,
    index: u64,
}

impl SobolSequence {
    pub fn new(dimension: usize) -> SensitivityResult<Self> {
        if dimension == 0 {
            return Err(SensitivityError::InvalidArg {
                what: "Sobol dimension must be positive".to_string(),
            });
        }
        if dimension > MAX_DIMENSION {
            return Err(SensitivityError::UnsupportedDimension {
                requested: dimension,
                max: MAX_DIMENSION,
            });
        }
        Ok(Self {
            directions: (0..dimension).map(direction_numbers).collect(),
            state: vec![0; dimension],
            index: 0,
        })
    }

    pub fn dimension(&self) -> usize {
        self.state.len()
    }

    /// Return the current point and move to the next one. The first point is the origin.
    pub fn next_point(&mut self) -> Vec<f64> {
        let point = self.state.iter().map(|&x| x as f64 * SCALE).collect();
        // Gray code: flip the direction number of the lowest zero bit of the index.
        let c = (!self.index).trailing_zeros() as usize;
        if c < BITS {
            for (x, v) in self.state.iter_mut().zip(&self.directions) {
                *x ^= v[c];
            }
        }
        self.index += 1;
        point
    }

    pub fn skip(&mut self, n: usize) {
        for _ in 0..n {
            self.next_point();
        }
    }

    /// `n` points after skipping the first `skip`.
    pub fn sample(dimension: usize, n: usize, skip: usize) -> SensitivityResult<Vec<Vec<f64>>> {
        let mut seq = Self::new(dimension)?;
        seq.skip(skip);
        Ok((0..n).map(|_| seq.next_point()).collect())
    }
}

use crate::vectorizer::SparseVector;
use serde::{Deserialize, Serialize};

/// Dense, symmetric `dim × dim` cosine similarity matrix stored row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityMatrix {
    dim: usize,
    data: Vec<f32>,
}

impl SimilarityMatrix {
    /// Pairwise cosine similarity over L2-normalised rows.
    ///
    /// The upper triangle is computed and mirrored, values are clamped to `[0, 1]`
    /// and the diagonal is exactly 1.0 even for empty rows.
    pub fn from_rows(rows: &[SparseVector]) -> Self {
        let dim = rows.len();
        let mut data = vec![0.0f32; dim * dim];
        for i in 0..dim {
            data[i * dim + i] = 1.0;
            for j in (i + 1)..dim {
                let s = sparse_dot(&rows[i], &rows[j]).clamp(0.0, 1.0);
                data[i * dim + j] = s;
                data[j * dim + i] = s;
            }
        }
        Self { dim, data }
    }

    pub fn dim(&self) -> usize { self.dim }

    pub fn get(&self, i: usize, j: usize) -> Option<f32> {
        if i < self.dim && j < self.dim { Some(self.data[i * self.dim + j]) } else { None }
    }

    pub fn row(&self, i: usize) -> Option<&[f32]> {
        if i < self.dim { Some(&self.data[i * self.dim..(i + 1) * self.dim]) } else { None }
    }

    /// True when the backing buffer matches `dim × dim`. Decoded blobs are checked with this.
    pub fn is_well_formed(&self) -> bool {
        self.data.len() == self.dim * self.dim
    }
}

/// Dot product of two rows sorted by term id.
fn sparse_dot(a: &SparseVector, b: &SparseVector) -> f32 {
    let (mut i, mut j) = (0, 0);
    let mut acc = 0.0f32;
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                acc += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_rows_score_one() {
        let r = vec![(0, 0.6), (3, 0.8)];
        let m = SimilarityMatrix::from_rows(&[r.clone(), r, vec![(1, 1.0)]]);
        assert!((m.get(0, 1).unwrap() - 1.0).abs() < 1e-6);
        assert_eq!(m.get(0, 2), Some(0.0));
        assert_eq!(m.get(2, 2), Some(1.0));
        assert_eq!(m.get(3, 0), None);
    }

    #[test]
    fn empty_rows_keep_unit_diagonal() {
        let m = SimilarityMatrix::from_rows(&[vec![], vec![]]);
        assert_eq!(m.row(0), Some(&[1.0, 0.0][..]));
        assert!(m.is_well_formed());
    }
}

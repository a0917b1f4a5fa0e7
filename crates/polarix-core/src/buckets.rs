use crate::statement::Statement;

/// A three-dimensional array of statement buckets, indexed by variable-1
/// label, variable-2 label, and qualifier level. The qualifier axis has size
/// one when no qualifier is configured.
#[derive(Clone, Debug)]
pub struct BucketArray {
    dims: (usize, usize, usize),
    cells: Vec<Vec<Statement>>,
}

impl BucketArray {
    pub fn new(n1: usize, n2: usize, nq: usize) -> Self {
        BucketArray {
            dims: (n1, n2, nq),
            cells: vec![Vec::new(); n1 * n2 * nq],
        }
    }

    pub fn dims(&self) -> (usize, usize, usize) {
        self.dims
    }

    #[inline]
    fn offset(&self, i1: usize, i2: usize, q: usize) -> usize {
        (i1 * self.dims.1 + i2) * self.dims.2 + q
    }

    pub fn get(&self, i1: usize, i2: usize, q: usize) -> &[Statement] {
        &self.cells[self.offset(i1, i2, q)]
    }

    pub fn push(&mut self, i1: usize, i2: usize, q: usize, statement: Statement) {
        let offset = self.offset(i1, i2, q);
        self.cells[offset].push(statement);
    }

    /// Total number of statements across all buckets.
    pub fn num_statements(&self) -> usize {
        self.cells.iter().map(|cell| cell.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_empty())
    }
}

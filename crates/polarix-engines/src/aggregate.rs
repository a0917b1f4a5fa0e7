use crate::slicing::TimeSlice;
use polarix_core::{BucketArray, Matrix, norm1};
use polarix_error::{PolarixResult, polarix_bail};
use std::fmt::{self, Display, Formatter};

/// Which signed one-mode projection an aggregator call produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NetworkRole {
    /// Weights pairs that agree on the qualifier.
    Congruence,
    /// Weights pairs that disagree on the qualifier.
    Conflict,
}

impl Display for NetworkRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            NetworkRole::Congruence => write!(f, "congruence"),
            NetworkRole::Conflict => write!(f, "conflict"),
        }
    }
}

/// The network-construction collaborator.
///
/// Given a slice's skeleton matrix and bucketed statements, an implementation
/// fills in the one-mode projection for the requested role. How qualifier
/// agreement is combined and normalized is the adapter's business; the engine
/// only requires the result to match the skeleton's labels.
pub trait Aggregator: Send + Sync {
    fn build(
        &self,
        skeleton: &Matrix,
        buckets: &BucketArray,
        role: NetworkRole,
    ) -> PolarixResult<Matrix>;
}

/// The paired networks of one slice, sharing dimensions and labels.
#[derive(Clone, Debug)]
pub struct MatrixPair {
    pub congruence: Matrix,
    pub conflict: Matrix,
}

impl MatrixPair {
    pub fn size(&self) -> usize {
        self.congruence.size()
    }

    pub fn combined_norm(&self) -> PolarixResult<f64> {
        Ok(norm1(&self.congruence)? + norm1(&self.conflict)?)
    }
}

/// Builds the congruence/conflict pair for one slice: two aggregator calls,
/// a shape check against the skeleton, and a zeroed diagonal on each result.
pub fn build_pair(aggregator: &dyn Aggregator, slice: &TimeSlice) -> PolarixResult<MatrixPair> {
    let mut congruence = aggregator.build(&slice.skeleton, &slice.buckets, NetworkRole::Congruence)?;
    let mut conflict = aggregator.build(&slice.skeleton, &slice.buckets, NetworkRole::Conflict)?;

    for (matrix, role) in [
        (&mut congruence, NetworkRole::Congruence),
        (&mut conflict, NetworkRole::Conflict),
    ] {
        if !matrix.is_well_formed() || matrix.labels() != slice.skeleton.labels() {
            polarix_bail!(
                InvalidInput: "aggregator returned a {} matrix that does not match the {}-node skeleton",
                role,
                slice.skeleton.size(),
            );
        }
        matrix.zero_diagonal();
    }

    Ok(MatrixPair {
        congruence,
        conflict,
    })
}

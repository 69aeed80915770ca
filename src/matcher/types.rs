/// Best reference row for one input
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BestMatch {
    /// Index into the reference map
    pub index: usize,
    /// Cosine similarity in [0, 1]
    pub score: f64,
}

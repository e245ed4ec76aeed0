use kzg_dleq::KzgDleqError;
use oblivious_transfer::error::OTError;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub enum ThresholdError {
    NoNodes,
    /// Locally recomputed challenge differs from the aggregator's; the
    /// node must not release its response share
    ChallengeMismatch,
    /// Aggregated statement does not match the one this node proved
    StatementMismatch,
    DuplicateOleIndex(u32),
    /// Node claimed one OLE index, the aggregator's sample has another
    OleIndexMismatch(u32, u32),
    /// OLE sample was evaluated at a point other than the challenge
    WrongOleEvaluationPoint(u32),
    IncorrectNumberOfResponses(usize, usize),
    IncorrectNumberOfOleSamples(usize, usize),
    KzgDleq(KzgDleqError),
    Ot(OTError),
}

impl From<KzgDleqError> for ThresholdError {
    fn from(e: KzgDleqError) -> Self {
        Self::KzgDleq(e)
    }
}

impl From<OTError> for ThresholdError {
    fn from(e: OTError) -> Self {
        Self::Ot(e)
    }
}

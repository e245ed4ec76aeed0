use serde::Serialize;

#[derive(Debug, Serialize, PartialEq, Eq)]
pub enum OTError {
    NeedNonZeroNumberOfOTs,
    SecurityParameterMustBeMultipleOf8(u16),
    ExtensionCountMustBeMultipleOf8(u32),
    IncorrectNumberOfPublicKeys(usize, usize),
    IncorrectNumberOfMessagePairs(usize, usize),
    IncorrectNumberOfCiphertexts(usize, usize),
    IncorrectNumberOfChoices(usize, usize),
    IncorrectNumberOfBaseOTKeys(usize, usize),
    IncorrectColumnLength(usize, usize),
    /// Receiver public key or derived shared point was the identity
    InvalidPublicKeyAtIndex(u32),
    /// Ciphertext tag did not verify
    MacFailed(u32),
    /// 2^bit_length must stay below the group order
    BitLengthTooLargeForField(u16),
    /// Chosen OLE input does not fit in `bit_length` bits
    ChosenValueOutOfRange(u32),
    IncorrectNumberOfChosenValues(usize, usize),
    /// Monotone pool index ran past the pool size
    PoolExhausted(u32, u32),
}

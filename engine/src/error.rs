use anchor_lang::prelude::*;

#[error_code]
pub enum DuelError {
    #[msg("No game exists with this id")]
    GameNotFound,
    #[msg("Operation is not allowed in the current game status")]
    InvalidGameState,
    #[msg("Game already has a second player")]
    GameAlreadyFull,
    #[msg("Caller is not a participant of this game")]
    NotAParticipant,
    #[msg("A player cannot play against themselves")]
    CannotPlaySelf,
    #[msg("Player has already committed a move")]
    MoveAlreadyCommitted,
    #[msg("Encrypted input was rejected by the encryption backend")]
    InvalidInputProof,
    #[msg("Request id does not map to a pending decryption")]
    UnknownRequest,
    #[msg("Decryption result was already applied to this game")]
    CallbackReplayed,
    #[msg("Results have not been decrypted yet")]
    ResultsNotReady,
    #[msg("Callback signature does not match the oracle identity")]
    InvalidOracleSignature,
    #[msg("Decrypted cleartext is not a valid game outcome")]
    MalformedCleartext,
    #[msg("Decryption request has not timed out yet")]
    ResolutionNotExpired,
    #[msg("Ciphertext handle is unknown to the backend")]
    UnknownCiphertext,
    #[msg("Ciphertext handle has not been granted for decryption")]
    DecryptionNotAllowed,
    #[msg("Request id is already recorded")]
    DuplicateRequestId,
    #[msg("Counter overflow")]
    CounterOverflow,
}

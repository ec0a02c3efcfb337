// Number of choices a player can commit to (0, 1 and 2)
pub const MOVE_COUNT: u8 = 3;

// Seconds a game may sit in DecryptionPending before a participant can re-request decryption
pub const DEFAULT_DECRYPTION_TIMEOUT_SECS: i64 = 300;

// Request ids start here so that zero never names a live request
pub const FIRST_REQUEST_ID: u64 = 1;

// Domain separators for the keyed hashes
pub const ORACLE_SIGNATURE_DOMAIN: &[u8] = b"sealed-duel/oracle-callback";
pub const INPUT_PROOF_DOMAIN: &[u8] = b"sealed-duel/input-proof";

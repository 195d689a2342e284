/// Concrete error taxonomy: protocol errors surface as
/// `error_msg` to the offending socket only; illegal-action semantics drop the command
/// and leave the timer running; invariant violations halt the table rather than
/// panicking the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    SeatOccupied,
    SeatNotFound,
    NotYourTurn,
    UnknownIdentity,
    AlreadySeated,
    TableNotIdle,
    NotEnoughPlayers,
    IllegalAction(String),
    InvariantViolation(String),
}

impl TableError {
    /// Protocol errors and illegal actions never mutate state and are reported back
    /// to the originating socket; invariant violations are a bug and are logged and
    /// halt the table instead.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, TableError::InvariantViolation(_))
    }
}

impl std::fmt::Display for TableError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableError::SeatOccupied => write!(f, "seat is already occupied"),
            TableError::SeatNotFound => write!(f, "no such seat"),
            TableError::NotYourTurn => write!(f, "it is not your turn"),
            TableError::UnknownIdentity => write!(f, "identity does not match this seat"),
            TableError::AlreadySeated => write!(f, "identity already occupies a seat"),
            TableError::TableNotIdle => write!(f, "a hand is already in progress"),
            TableError::NotEnoughPlayers => write!(f, "not enough players to start a hand"),
            TableError::IllegalAction(reason) => write!(f, "illegal action: {reason}"),
            TableError::InvariantViolation(reason) => write!(f, "invariant violation: {reason}"),
        }
    }
}

impl std::error::Error for TableError {}

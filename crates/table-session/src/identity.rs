/// The opaque participant key the engine authorizes actions against. Authentication
/// itself (challenge/signature verification, token-gated eligibility) is an external
/// collaborator; this deliberately carries just the one field the table engine
/// actually needs instead of a full JWT claims shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity(String);

impl Identity {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketError {
    Malformed,
    Expired,
}

impl std::fmt::Display for TicketError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed => write!(f, "malformed ticket"),
            Self::Expired => write!(f, "ticket expired"),
        }
    }
}

impl std::error::Error for TicketError {}

/// Ambient stub for ticket validation, wired up for `authenticate_with_ticket` but not
/// a real identity system: a ticket is `<identity>` or `<identity>:<unix_exp>`.
/// The real external collaborator is expected to mint and verify these; this crate
/// only needs to parse the identity out and reject stale ones.
pub fn validate_ticket(ticket: &str, now_unix: i64) -> Result<Identity, TicketError> {
    match ticket.split_once(':') {
        None => {
            if ticket.is_empty() {
                return Err(TicketError::Malformed);
            }
            Ok(Identity(ticket.to_string()))
        }
        Some((identity, exp)) => {
            if identity.is_empty() {
                return Err(TicketError::Malformed);
            }
            let exp: i64 = exp.parse().map_err(|_| TicketError::Malformed)?;
            if now_unix >= exp {
                return Err(TicketError::Expired);
            }
            Ok(Identity(identity.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_identity_ticket_is_accepted() {
        assert_eq!(validate_ticket("alice", 0).unwrap().as_str(), "alice");
    }

    #[test]
    fn ticket_with_future_expiry_is_accepted() {
        assert_eq!(validate_ticket("alice:1000", 500).unwrap().as_str(), "alice");
    }

    #[test]
    fn ticket_past_expiry_is_rejected() {
        assert_eq!(validate_ticket("alice:1000", 1000), Err(TicketError::Expired));
    }

    #[test]
    fn empty_ticket_is_rejected() {
        assert_eq!(validate_ticket("", 0), Err(TicketError::Malformed));
    }
}

use tokio::sync::mpsc::UnboundedSender;

use crate::protocol::ServerMessage;

/// Maps seats to the outbound channel of whatever socket is currently bound to them.
/// `table-engine::Seat` only ever stores the opaque `SocketId`; this registry is what
/// actually owns the channel.
#[derive(Debug, Default)]
pub struct SocketRegistry {
    senders: Vec<Option<UnboundedSender<ServerMessage>>>,
}

impl SocketRegistry {
    pub fn new(seats: usize) -> Self {
        Self { senders: vec![None; seats] }
    }

    pub fn bind(&mut self, seat: usize, sender: UnboundedSender<ServerMessage>) {
        if let Some(slot) = self.senders.get_mut(seat) {
            *slot = Some(sender);
        }
    }

    pub fn unbind(&mut self, seat: usize) {
        if let Some(slot) = self.senders.get_mut(seat) {
            *slot = None;
        }
    }

    pub fn is_bound(&self, seat: usize) -> bool {
        self.senders.get(seat).is_some_and(Option::is_some)
    }

    pub fn unicast(&self, seat: usize, message: ServerMessage) {
        match self.senders.get(seat).and_then(Option::as_ref) {
            Some(sender) => {
                if sender.send(message).is_err() {
                    log::warn!("unicast to seat {seat} failed: receiver dropped");
                }
            }
            None => log::debug!("unicast to seat {seat}: no bound socket"),
        }
    }

    pub fn broadcast(&self, message: ServerMessage) {
        for (seat, sender) in self.senders.iter().enumerate() {
            if let Some(sender) = sender {
                if sender.send(message.clone()).is_err() {
                    log::warn!("broadcast to seat {seat} failed: receiver dropped");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::unbounded_channel;

    #[test]
    fn unbound_registry_reports_no_sockets() {
        let registry = SocketRegistry::new(6);
        assert!(!registry.is_bound(0));
    }

    #[test]
    fn bind_then_unbind_clears_the_slot() {
        let mut registry = SocketRegistry::new(6);
        let (tx, _rx) = unbounded_channel();
        registry.bind(0, tx);
        assert!(registry.is_bound(0));
        registry.unbind(0);
        assert!(!registry.is_bound(0));
    }
}

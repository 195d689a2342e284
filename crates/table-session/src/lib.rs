mod actor;
mod command;
mod config;
mod identity;
mod lobby;
mod protocol;
mod registry;
mod timer;

pub use actor::TableActor;
pub use command::{TableCommand, TableHandle};
pub use config::TableConfig;
pub use identity::{validate_ticket, Identity, TicketError};
pub use lobby::Lobby;
pub use protocol::{ClientMessage, PotWinners, Protocol, ProtocolError, ServerMessage, ShowdownExtras};
pub use registry::SocketRegistry;
pub use timer::{Timer, TimerConfig};

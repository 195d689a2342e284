use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use table_cards::{Board, Hand as CardHand, Hole};
use table_core::{Chips, ID};
use table_engine::Action;

use crate::schema;
use crate::snapshot::TableKey;

/// A completed hand, as it is recorded after showdown.
#[derive(Debug, Clone)]
pub struct HandRecord {
    id: ID<HandRecord>,
    table: TableKey,
    board: Board,
    pot: Chips,
    dealer: usize,
}

impl HandRecord {
    pub fn new(table: TableKey, board: Board, pot: Chips, dealer: usize) -> Self {
        Self { id: ID::default(), table, board, pot, dealer }
    }

    pub fn id(&self) -> ID<HandRecord> {
        self.id
    }
    pub fn table(&self) -> TableKey {
        self.table
    }
    pub fn board(&self) -> &Board {
        &self.board
    }
    pub fn pot(&self) -> Chips {
        self.pot
    }
    pub fn dealer(&self) -> usize {
        self.dealer
    }
}

/// One seat's participation in a recorded hand. Composite key `(hand, seat)`.
#[derive(Debug, Clone)]
pub struct Participant {
    hand: ID<HandRecord>,
    identity: String,
    seat: usize,
    hole: Hole,
    stack: Chips,
    showed: bool,
    mucked: bool,
}

impl Participant {
    pub fn new(hand: ID<HandRecord>, identity: String, seat: usize, hole: Hole, stack: Chips) -> Self {
        Self { hand, identity, seat, hole, stack, showed: false, mucked: false }
    }

    pub fn hand(&self) -> ID<HandRecord> {
        self.hand
    }
    pub fn identity(&self) -> &str {
        &self.identity
    }
    pub fn seat(&self) -> usize {
        self.seat
    }
    pub fn hole(&self) -> Hole {
        self.hole
    }
    pub fn stack(&self) -> Chips {
        self.stack
    }
    pub fn showed(&self) -> bool {
        self.showed
    }
    pub fn mucked(&self) -> bool {
        self.mucked
    }
    pub fn show(&mut self) {
        self.showed = true;
    }
    pub fn muck(&mut self) {
        self.mucked = true;
    }
}

/// One action taken during a recorded hand. Composite key `(hand, seq)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Play {
    hand: ID<HandRecord>,
    seq: i32,
    identity: Option<String>,
    action: Action,
}

impl Play {
    pub fn new(hand: ID<HandRecord>, seq: i32, identity: Option<String>, action: Action) -> Self {
        Self { hand, seq, identity, action }
    }

    pub fn hand(&self) -> ID<HandRecord> {
        self.hand
    }
    pub fn seq(&self) -> i32 {
        self.seq
    }
    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }
    pub fn action(&self) -> Action {
        self.action
    }
}

/// Hand-history persistence. Single-table scope: no `rooms` row, and
/// `identity` (an opaque string) in place of a foreign key into a members table,
/// since authentication is an external collaborator this repo does not own.
#[allow(async_fn_in_trait)]
pub trait HistoryRepository {
    async fn create_hand(&self, hand: &HandRecord) -> Result<()>;
    async fn create_participant(&self, participant: &Participant) -> Result<()>;
    async fn create_play(&self, play: &Play) -> Result<()>;
    async fn mark_showed(&self, hand: ID<HandRecord>, seat: usize) -> Result<()>;
    async fn mark_mucked(&self, hand: ID<HandRecord>, seat: usize) -> Result<()>;
    async fn get_hand(&self, hand: ID<HandRecord>) -> Result<Option<HandRecord>>;
    async fn get_participants(&self, hand: ID<HandRecord>) -> Result<Vec<Participant>>;
    async fn get_plays(&self, hand: ID<HandRecord>) -> Result<Vec<Play>>;
}

/// Null object used by a server run without a configured database (matching
/// `MemorySnapshots`'s role for `SnapshotStore`): the engine still calls into a
/// `HistoryRepository` after every hand, but there is nowhere durable to put the
/// record. Dropping it on the floor here keeps `table-session` from needing to know
/// whether history recording is wired up.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHistory;

impl HistoryRepository for NoopHistory {
    async fn create_hand(&self, _hand: &HandRecord) -> Result<()> {
        Ok(())
    }
    async fn create_participant(&self, _participant: &Participant) -> Result<()> {
        Ok(())
    }
    async fn create_play(&self, _play: &Play) -> Result<()> {
        Ok(())
    }
    async fn mark_showed(&self, _hand: ID<HandRecord>, _seat: usize) -> Result<()> {
        Ok(())
    }
    async fn mark_mucked(&self, _hand: ID<HandRecord>, _seat: usize) -> Result<()> {
        Ok(())
    }
    async fn get_hand(&self, _hand: ID<HandRecord>) -> Result<Option<HandRecord>> {
        Ok(None)
    }
    async fn get_participants(&self, _hand: ID<HandRecord>) -> Result<Vec<Participant>> {
        Ok(Vec::new())
    }
    async fn get_plays(&self, _hand: ID<HandRecord>) -> Result<Vec<Play>> {
        Ok(Vec::new())
    }
}

impl HistoryRepository for std::sync::Arc<tokio_postgres::Client> {
    async fn create_hand(&self, hand: &HandRecord) -> Result<()> {
        let board: CardHand = hand.board().cards().iter().copied().collect();
        self.execute(
            const_format::concatcp!(
                "INSERT INTO ",
                schema::HANDS,
                " (id, table_id, board, pot, dealer) VALUES ($1, $2, $3, $4, $5)"
            ),
            &[&hand.id().inner(), &hand.table().inner(), &(u64::from(board) as i64), &hand.pot(), &(hand.dealer() as i16)],
        )
        .await
        .context("insert hand record")?;
        Ok(())
    }

    async fn create_participant(&self, participant: &Participant) -> Result<()> {
        let hole: CardHand = participant.hole().cards().into_iter().collect();
        self.execute(
            const_format::concatcp!(
                "INSERT INTO ",
                schema::PLAYERS,
                " (hand_id, identity, seat, hole, stack, showed, mucked) VALUES ($1, $2, $3, $4, $5, $6, $7)"
            ),
            &[
                &participant.hand().inner(),
                &participant.identity(),
                &(participant.seat() as i16),
                &(u64::from(hole) as i64),
                &participant.stack(),
                &participant.showed(),
                &participant.mucked(),
            ],
        )
        .await
        .context("insert participant record")?;
        Ok(())
    }

    async fn create_play(&self, play: &Play) -> Result<()> {
        let encoded = serde_json::to_string(&play.action()).context("encode action")?;
        self.execute(
            const_format::concatcp!(
                "INSERT INTO ",
                schema::ACTIONS,
                " (hand_id, seq, identity, encoded) VALUES ($1, $2, $3, $4)"
            ),
            &[&play.hand().inner(), &play.seq(), &play.identity(), &encoded],
        )
        .await
        .context("insert play record")?;
        Ok(())
    }

    async fn mark_showed(&self, hand: ID<HandRecord>, seat: usize) -> Result<()> {
        self.execute(
            const_format::concatcp!("UPDATE ", schema::PLAYERS, " SET showed = TRUE WHERE hand_id = $1 AND seat = $2"),
            &[&hand.inner(), &(seat as i16)],
        )
        .await
        .context("mark participant showed")?;
        Ok(())
    }

    async fn mark_mucked(&self, hand: ID<HandRecord>, seat: usize) -> Result<()> {
        self.execute(
            const_format::concatcp!("UPDATE ", schema::PLAYERS, " SET mucked = TRUE WHERE hand_id = $1 AND seat = $2"),
            &[&hand.inner(), &(seat as i16)],
        )
        .await
        .context("mark participant mucked")?;
        Ok(())
    }

    async fn get_hand(&self, hand: ID<HandRecord>) -> Result<Option<HandRecord>> {
        let row = self
            .query_opt(
                const_format::concatcp!("SELECT id, table_id, board, pot, dealer FROM ", schema::HANDS, " WHERE id = $1"),
                &[&hand.inner()],
            )
            .await
            .context("read hand record")?;
        Ok(row.map(|row| {
            let board_bits: i64 = row.get(2);
            let board = CardHand::from(board_bits as u64).cards().into_iter().fold(Board::new(), |mut b, c| {
                b.push(c);
                b
            });
            HandRecord {
                id: ID::from(row.get::<_, uuid::Uuid>(0)),
                table: ID::from(row.get::<_, uuid::Uuid>(1)),
                board,
                pot: row.get(3),
                dealer: row.get::<_, i16>(4) as usize,
            }
        }))
    }

    async fn get_participants(&self, hand: ID<HandRecord>) -> Result<Vec<Participant>> {
        let rows = self
            .query(
                const_format::concatcp!(
                    "SELECT hand_id, identity, seat, hole, stack, showed, mucked FROM ",
                    schema::PLAYERS,
                    " WHERE hand_id = $1 ORDER BY seat"
                ),
                &[&hand.inner()],
            )
            .await
            .context("read participant records")?;
        Ok(rows
            .iter()
            .map(|row| {
                let hole_bits: i64 = row.get(3);
                let cards = CardHand::from(hole_bits as u64).cards();
                let hole = Hole::new(cards[0], cards[1]);
                let mut participant = Participant::new(
                    ID::from(row.get::<_, uuid::Uuid>(0)),
                    row.get(1),
                    row.get::<_, i16>(2) as usize,
                    hole,
                    row.get(4),
                );
                if row.get::<_, bool>(5) {
                    participant.show();
                }
                if row.get::<_, bool>(6) {
                    participant.muck();
                }
                participant
            })
            .collect())
    }

    async fn get_plays(&self, hand: ID<HandRecord>) -> Result<Vec<Play>> {
        let rows = self
            .query(
                const_format::concatcp!(
                    "SELECT hand_id, seq, identity, encoded FROM ",
                    schema::ACTIONS,
                    " WHERE hand_id = $1 ORDER BY seq"
                ),
                &[&hand.inner()],
            )
            .await
            .context("read play records")?;
        rows.iter()
            .map(|row| {
                let encoded: String = row.get(3);
                let action: Action = serde_json::from_str(&encoded).context("decode action")?;
                Ok(Play::new(ID::from(row.get::<_, uuid::Uuid>(0)), row.get(1), row.get(2), action))
            })
            .collect()
    }
}

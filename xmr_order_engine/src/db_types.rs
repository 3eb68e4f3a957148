//! Data types for the order ledger.
//!
//! The central type is [`Order`]. All lifecycle mutations go through the `mark_*` methods, which
//! are pure: they take the current order value and return either a new, internally consistent
//! order value or a [`TransitionError`]. Callers persist the new value afterwards; nothing is
//! written on failure.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;
use xog_common::Piconero;

//--------------------------------------    OrderState      ----------------------------------------------------------
/// The lifecycle state of an order.
///
/// Forward transitions are strictly `Created → Paid → Purchased → Arrived → Completed`. Any
/// non-terminal state may also drop to `Lost`, which is absorbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum OrderState {
    /// The order has been placed and is waiting for payment to its receiving address.
    Created,
    /// Payment has been received in full.
    Paid,
    /// The goods have been bought from the supplier. The mailing address is wiped at this point.
    Purchased,
    /// The goods have arrived at the buyer.
    Arrived,
    /// The order is closed.
    Completed,
    /// The order was abandoned or failed and will never progress. Terminal.
    Lost,
}

impl OrderState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderState::Completed | OrderState::Lost)
    }

    /// Position of the state on the forward path. `Lost` is off-path and returns `None`.
    fn stage(&self) -> Option<u8> {
        match self {
            OrderState::Created => Some(0),
            OrderState::Paid => Some(1),
            OrderState::Purchased => Some(2),
            OrderState::Arrived => Some(3),
            OrderState::Completed => Some(4),
            OrderState::Lost => None,
        }
    }
}

impl Display for OrderState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderState::Created => write!(f, "Created"),
            OrderState::Paid => write!(f, "Paid"),
            OrderState::Purchased => write!(f, "Purchased"),
            OrderState::Arrived => write!(f, "Arrived"),
            OrderState::Completed => write!(f, "Completed"),
            OrderState::Lost => write!(f, "Lost"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid order state: {0}")]
pub struct StateConversionError(String);

impl FromStr for OrderState {
    type Err = StateConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Created" => Ok(Self::Created),
            "Paid" => Ok(Self::Paid),
            "Purchased" => Ok(Self::Purchased),
            "Arrived" => Ok(Self::Arrived),
            "Completed" => Ok(Self::Completed),
            "Lost" => Ok(Self::Lost),
            s => Err(StateConversionError(s.to_string())),
        }
    }
}

//--------------------------------------  TransitionError   ----------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Order cannot move from {from} to {to}")]
    InvalidTransition { from: OrderState, to: OrderState },
    #[error("Order is inconsistent: {0}")]
    InvariantViolation(String),
}

//--------------------------------------   RateSnapshot     ----------------------------------------------------------
/// An immutable, timestamped exchange-rate record.
///
/// The rate is expressed in piconero per US cent. Snapshots are append-only; the snapshot copied
/// into an order at placement is what freezes the order's conversion rate for life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct RateSnapshot {
    pub rate: Piconero,
    pub recorded_at: DateTime<Utc>,
}

impl RateSnapshot {
    pub fn new(rate: Piconero, recorded_at: Option<DateTime<Utc>>) -> Self {
        let recorded_at = recorded_at.unwrap_or_else(Utc::now);
        Self { rate, recorded_at }
    }

    /// Build a snapshot from an oracle quote given in XMR per USD.
    pub fn from_xmr_per_usd(xmr_per_usd: f64) -> Self {
        #[allow(clippy::cast_possible_truncation)]
        let per_cent = (xmr_per_usd * 10_000_000_000.0).round() as i64;
        Self::new(Piconero::from(per_cent), None)
    }

    /// Convert an amount in US cents to piconero at this rate.
    pub fn convert_cents(&self, cents: i64) -> Piconero {
        self.rate * cents
    }
}

impl Display for RateSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "1 USD => {} @ {}", self.rate * 100, self.recorded_at)
    }
}

//--------------------------------------    StoreItem       ----------------------------------------------------------
/// A catalog entry. Prices are in US cents and are only a quote: the price an order actually pays
/// is frozen into its [`OrderLine`]s at placement.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct StoreItem {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub supplier_url: String,
    pub price: i64,
    pub visible: bool,
    pub active: bool,
    pub date_added: DateTime<Utc>,
}

impl StoreItem {
    pub fn is_sellable(&self) -> bool {
        self.visible && self.active
    }
}

//--------------------------------------    OrderLine       ----------------------------------------------------------
/// One line of an order. `unit_price` is the catalog price in US cents at the moment the order was
/// placed; later catalog changes never touch it.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct OrderLine {
    pub id: i64,
    pub order_id: i64,
    pub item_id: i64,
    pub quantity: i64,
    pub unit_price: i64,
}

//--------------------------------------      Order         ----------------------------------------------------------
/// An order for physical goods, paid in Monero.
///
/// Field presence is tied to the state and checked by [`Order::verify_invariants`]:
/// * `mailing_address` (ciphertext) exists only while the goods still need to be sent for
///   purchase, i.e. in `Created` and `Paid`.
/// * `receiving_address` exists only in `Created`; it is wiped as soon as payment is detected.
/// * `payment_txid` and `date_paid` exist from `Paid` onwards.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub email: String,
    pub state: OrderState,
    pub mailing_address: Option<String>,
    pub receiving_address: Option<String>,
    pub payment_txid: Option<String>,
    /// Exchange rate frozen at placement, in piconero per US cent.
    pub rate: Piconero,
    pub rate_recorded_at: DateTime<Utc>,
    /// Fixed surcharge in US cents, set at placement.
    pub processing_fee: i64,
    pub date_placed: DateTime<Utc>,
    pub date_paid: Option<DateTime<Utc>>,
    pub date_purchased: Option<DateTime<Utc>>,
    pub date_arrived: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
    #[sqlx(skip)]
    #[serde(default)]
    pub items: Vec<OrderLine>,
}

impl Order {
    /// The rate snapshot this order was placed under.
    pub fn rate_snapshot(&self) -> RateSnapshot {
        RateSnapshot { rate: self.rate, recorded_at: self.rate_recorded_at }
    }

    /// Goods subtotal plus processing fee, in US cents.
    pub fn total_cents(&self) -> i64 {
        let goods: i64 = self.items.iter().map(|line| line.quantity * line.unit_price).sum();
        goods + self.processing_fee
    }

    /// The amount that settles this order, converted with the frozen rate.
    pub fn expected_total(&self) -> Piconero {
        self.rate_snapshot().convert_cents(self.total_cents())
    }

    /// `Created → Paid`. Records the settling transaction and wipes the receiving address so the
    /// subaddress can never be correlated with the order afterwards.
    pub fn mark_paid(&self, txid: &str, at: DateTime<Utc>) -> Result<Order, TransitionError> {
        self.require_state(OrderState::Created, OrderState::Paid)?;
        let mut next = self.clone();
        next.state = OrderState::Paid;
        next.payment_txid = Some(txid.to_string());
        next.date_paid = Some(at);
        next.receiving_address = None;
        next.verify_invariants()?;
        Ok(next)
    }

    /// `Paid → Purchased`. The mailing address ciphertext is discarded here, irreversibly.
    pub fn mark_purchased(&self, at: DateTime<Utc>) -> Result<Order, TransitionError> {
        self.require_state(OrderState::Paid, OrderState::Purchased)?;
        let mut next = self.clone();
        next.state = OrderState::Purchased;
        next.date_purchased = Some(at);
        next.mailing_address = None;
        next.verify_invariants()?;
        Ok(next)
    }

    /// `Purchased → Arrived`.
    pub fn mark_arrived(&self, at: DateTime<Utc>) -> Result<Order, TransitionError> {
        self.require_state(OrderState::Purchased, OrderState::Arrived)?;
        let mut next = self.clone();
        next.state = OrderState::Arrived;
        next.date_arrived = Some(at);
        next.verify_invariants()?;
        Ok(next)
    }

    /// `Arrived → Completed`.
    pub fn mark_completed(&self) -> Result<Order, TransitionError> {
        self.require_state(OrderState::Arrived, OrderState::Completed)?;
        let mut next = self.clone();
        next.state = OrderState::Completed;
        next.verify_invariants()?;
        Ok(next)
    }

    /// Drop to `Lost` from any non-terminal state. Both privacy-sensitive fields are wiped.
    pub fn mark_lost(&self) -> Result<Order, TransitionError> {
        if self.state.is_terminal() {
            return Err(TransitionError::InvalidTransition { from: self.state, to: OrderState::Lost });
        }
        let mut next = self.clone();
        next.state = OrderState::Lost;
        next.receiving_address = None;
        next.mailing_address = None;
        next.verify_invariants()?;
        Ok(next)
    }

    fn require_state(&self, expected: OrderState, target: OrderState) -> Result<(), TransitionError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(TransitionError::InvalidTransition { from: self.state, to: target })
        }
    }

    /// The commit-time consistency check. Run after every mutation; a violation means the new
    /// value must not be persisted.
    pub fn verify_invariants(&self) -> Result<(), TransitionError> {
        if self.items.is_empty() {
            return Err(TransitionError::InvariantViolation("an order must have at least one line item".into()));
        }
        let wants_mailing = matches!(self.state, OrderState::Created | OrderState::Paid);
        if self.mailing_address.is_some() != wants_mailing {
            return Err(TransitionError::InvariantViolation(format!(
                "mailing address must be {} in state {}",
                if wants_mailing { "present" } else { "cleared" },
                self.state
            )));
        }
        let wants_receiving = self.state == OrderState::Created;
        if self.receiving_address.is_some() != wants_receiving {
            return Err(TransitionError::InvariantViolation(format!(
                "receiving address must be {} in state {}",
                if wants_receiving { "present" } else { "cleared" },
                self.state
            )));
        }
        // Paid-stage fields travel together, in every state.
        if self.payment_txid.is_some() != self.date_paid.is_some() {
            return Err(TransitionError::InvariantViolation(
                "payment txid and paid date must be set together".into(),
            ));
        }
        if let Some(stage) = self.state.stage() {
            self.verify_stage_fields(stage)?;
        }
        self.verify_date_order()?;
        Ok(())
    }

    /// Stage fields must be populated exactly up to the reached stage. A `Lost` order skips this:
    /// it keeps whatever stages it reached before it was lost.
    fn verify_stage_fields(&self, stage: u8) -> Result<(), TransitionError> {
        let checks: [(u8, bool, &str); 3] = [
            (1, self.date_paid.is_some(), "paid"),
            (2, self.date_purchased.is_some(), "purchased"),
            (3, self.date_arrived.is_some(), "arrived"),
        ];
        for (boundary, present, name) in checks {
            if stage >= boundary && !present {
                return Err(TransitionError::InvariantViolation(format!(
                    "order in state {} is missing its {name} date",
                    self.state
                )));
            }
            if stage < boundary && present {
                return Err(TransitionError::InvariantViolation(format!(
                    "order in state {} must not carry a {name} date",
                    self.state
                )));
            }
        }
        Ok(())
    }

    fn verify_date_order(&self) -> Result<(), TransitionError> {
        let mut last = self.date_placed;
        for date in [self.date_paid, self.date_purchased, self.date_arrived].into_iter().flatten() {
            if date < last {
                return Err(TransitionError::InvariantViolation("stage dates must be non-decreasing".into()));
            }
            last = date;
        }
        Ok(())
    }
}

//--------------------------------------     NewOrder       ----------------------------------------------------------
/// An order as requested by a buyer, before validation, pricing and address issuance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrder {
    pub email: String,
    /// Plaintext mailing address. It is encrypted before it ever reaches storage.
    pub mailing_address: String,
    pub items: Vec<NewOrderLine>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct NewOrderLine {
    pub item_id: i64,
    pub quantity: i64,
}

//--------------------------------------    OrderDraft      ----------------------------------------------------------
/// A fully priced order, ready for insertion. Produced by the order-flow API once the rate is
/// frozen, the catalog has been consulted and the mailing address encrypted.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    pub email: String,
    /// Ciphertext of the buyer's mailing address.
    pub mailing_address: String,
    pub receiving_address: String,
    pub rate: RateSnapshot,
    pub processing_fee: i64,
    pub items: Vec<DraftLine>,
}

#[derive(Debug, Clone, Copy)]
pub struct DraftLine {
    pub item_id: i64,
    pub quantity: i64,
    /// Frozen catalog price in US cents.
    pub unit_price: i64,
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::prelude::*;

    fn test_order() -> Order {
        let placed = Utc::now();
        Order {
            id: 1,
            email: "buyer@example.com".to_string(),
            state: OrderState::Created,
            mailing_address: Some("ciphertext".to_string()),
            receiving_address: Some("9xogSub0001".to_string()),
            payment_txid: None,
            rate: Piconero::from(2_000_000_000),
            rate_recorded_at: placed,
            processing_fee: 150,
            date_placed: placed,
            date_paid: None,
            date_purchased: None,
            date_arrived: None,
            updated_at: placed,
            items: vec![OrderLine { id: 1, order_id: 1, item_id: 7, quantity: 2, unit_price: 1250 }],
        }
    }

    #[test]
    fn expected_total_uses_frozen_rate() {
        let order = test_order();
        // 2 x 12.50 + 1.50 fee = 26.50 => 2650 cents * 2e9 piconero
        assert_eq!(order.total_cents(), 2650);
        assert_eq!(order.expected_total(), Piconero::from(5_300_000_000_000));
    }

    #[test]
    fn happy_path_walk() {
        let order = test_order();
        let paid = order.mark_paid("txn-abc", Utc::now()).unwrap();
        assert_eq!(paid.state, OrderState::Paid);
        assert_eq!(paid.payment_txid.as_deref(), Some("txn-abc"));
        assert!(paid.receiving_address.is_none());
        assert!(paid.mailing_address.is_some());

        let purchased = paid.mark_purchased(Utc::now()).unwrap();
        assert_eq!(purchased.state, OrderState::Purchased);
        assert!(purchased.mailing_address.is_none());

        let arrived = purchased.mark_arrived(Utc::now()).unwrap();
        let completed = arrived.mark_completed().unwrap();
        assert_eq!(completed.state, OrderState::Completed);
    }

    #[test]
    fn paid_is_only_reachable_from_created() {
        let order = test_order();
        let paid = order.mark_paid("txn-abc", Utc::now()).unwrap();
        let before = paid.clone();
        let err = paid.mark_paid("txn-def", Utc::now()).unwrap_err();
        assert_eq!(err, TransitionError::InvalidTransition { from: OrderState::Paid, to: OrderState::Paid });
        // The order value the caller holds is untouched by a failed transition.
        assert_eq!(paid, before);
    }

    #[test]
    fn stage_skips_are_rejected() {
        let order = test_order();
        assert!(matches!(
            order.mark_purchased(Utc::now()).unwrap_err(),
            TransitionError::InvalidTransition { from: OrderState::Created, to: OrderState::Purchased }
        ));
        assert!(matches!(
            order.mark_arrived(Utc::now()).unwrap_err(),
            TransitionError::InvalidTransition { from: OrderState::Created, to: OrderState::Arrived }
        ));
        assert!(order.mark_completed().is_err());
    }

    #[test]
    fn lost_is_reachable_from_any_non_terminal_state() {
        let order = test_order();
        let lost = order.mark_lost().unwrap();
        assert_eq!(lost.state, OrderState::Lost);
        assert!(lost.mailing_address.is_none());
        assert!(lost.receiving_address.is_none());

        let paid = test_order().mark_paid("txn", Utc::now()).unwrap();
        let lost = paid.mark_lost().unwrap();
        // A lost order keeps the record of stages it actually reached.
        assert!(lost.payment_txid.is_some());
        assert!(lost.mark_lost().is_err());
        assert!(test_order().mark_paid("t", Utc::now()).unwrap().mark_purchased(Utc::now()).unwrap().mark_completed().is_err());
    }

    #[test]
    fn invariants_catch_inconsistent_orders() {
        let mut order = test_order();
        order.items.clear();
        assert!(matches!(order.verify_invariants(), Err(TransitionError::InvariantViolation(_))));

        let mut order = test_order();
        order.mailing_address = None;
        assert!(order.verify_invariants().is_err());

        let mut order = test_order();
        order.date_paid = Some(Utc::now());
        assert!(order.verify_invariants().is_err());

        let order = test_order().mark_paid("txn", Utc::now()).unwrap();
        let mut tampered = order.clone();
        tampered.receiving_address = Some("9xogSub0002".to_string());
        assert!(tampered.verify_invariants().is_err());
    }

    #[test]
    fn dates_must_be_monotonic() {
        let order = test_order();
        let earlier = order.date_placed - chrono::Duration::hours(1);
        assert!(matches!(order.mark_paid("txn", earlier), Err(TransitionError::InvariantViolation(_))));
    }

    /// Random valid transition sequences always pass the invariant check at every step.
    #[test]
    fn random_walks_preserve_invariants() {
        let mut rng = StdRng::seed_from_u64(0xdecaf);
        for _ in 0..200 {
            let mut order = test_order();
            let mut step = order.date_placed;
            while !order.state.is_terminal() {
                step += chrono::Duration::minutes(rng.gen_range(1..120));
                // A coin toss between the forward transition and dropping the order.
                let next = if rng.gen_bool(0.2) {
                    order.mark_lost()
                } else {
                    match order.state {
                        OrderState::Created => order.mark_paid(&format!("txn-{}", rng.gen::<u32>()), step),
                        OrderState::Paid => order.mark_purchased(step),
                        OrderState::Purchased => order.mark_arrived(step),
                        OrderState::Arrived => order.mark_completed(),
                        OrderState::Completed | OrderState::Lost => unreachable!(),
                    }
                };
                order = next.unwrap();
                order.verify_invariants().unwrap();
            }
        }
    }

    #[test]
    fn orders_serialize_for_the_api() {
        let order = test_order();
        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["state"], "Created");
        assert_eq!(json["items"][0]["unit_price"], 1250);
        assert_eq!(json["processing_fee"], 150);
    }

    #[test]
    fn order_state_round_trips_as_text() {
        for state in
            [OrderState::Created, OrderState::Paid, OrderState::Purchased, OrderState::Arrived, OrderState::Completed, OrderState::Lost]
        {
            assert_eq!(state.to_string().parse::<OrderState>().unwrap(), state);
        }
        assert!("Refunded".parse::<OrderState>().is_err());
    }
}

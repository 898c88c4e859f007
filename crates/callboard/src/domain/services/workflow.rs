//! Call Workflow - State machine for one call session
//!
//! Drives a call from room entry to a finalized [`CallRecord`]:
//!
//! ```text
//! RoomEntry -> OutcomeSelection -[picked]-> OrderCheck -[yes]-> ItemSelection -[submit]-> done
//!                      |                         |
//!                      +-[not picked]-> done     +-[no]-> done
//! ```
//!
//! Every completion returns exactly one record and puts the session back in
//! `RoomEntry`. Inputs that are not legal in the current state, malformed
//! room numbers and submitting an empty cart are ignored, never errors.

use std::sync::Arc;

use crate::domain::entities::{CallRecord, Cart, MenuItem};
use crate::domain::value_objects::{CallOutcome, RoomNumber};
use crate::ports::Clock;

/// Observable workflow state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    RoomEntry,
    OutcomeSelection,
    OrderCheck,
    ItemSelection,
}

impl std::fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkflowState::RoomEntry => write!(f, "room_entry"),
            WorkflowState::OutcomeSelection => write!(f, "outcome_selection"),
            WorkflowState::OrderCheck => write!(f, "order_check"),
            WorkflowState::ItemSelection => write!(f, "item_selection"),
        }
    }
}

/// Operator inputs the machine understands
#[derive(Debug, Clone)]
pub enum WorkflowInput {
    EnterRoom(String),
    SelectOutcome(CallOutcome),
    ConfirmOrderPresence(bool),
    AddItem(MenuItem),
    RemoveItem(String),
    SubmitOrder,
    Cancel,
}

/// Result of feeding one input to the machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Not legal here, or malformed; nothing changed
    Ignored,
    /// Moved to a new state
    Advanced(WorkflowState),
    /// Cart contents changed, state unchanged
    CartUpdated,
    /// Session finished with this record and is back in `RoomEntry`
    Completed(CallRecord),
    /// Session discarded without a record
    Cancelled,
}

impl Transition {
    pub fn is_ignored(&self) -> bool {
        matches!(self, Transition::Ignored)
    }

    pub fn record(&self) -> Option<&CallRecord> {
        match self {
            Transition::Completed(record) => Some(record),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
enum Step {
    #[default]
    RoomEntry,
    OutcomeSelection {
        room: RoomNumber,
    },
    OrderCheck {
        room: RoomNumber,
    },
    ItemSelection {
        room: RoomNumber,
        cart: Cart,
    },
}

impl Step {
    fn state(&self) -> WorkflowState {
        match self {
            Step::RoomEntry => WorkflowState::RoomEntry,
            Step::OutcomeSelection { .. } => WorkflowState::OutcomeSelection,
            Step::OrderCheck { .. } => WorkflowState::OrderCheck,
            Step::ItemSelection { .. } => WorkflowState::ItemSelection,
        }
    }
}

/// One operator's call session
pub struct CallWorkflow {
    step: Step,
    clock: Arc<dyn Clock>,
}

impl CallWorkflow {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            step: Step::RoomEntry,
            clock,
        }
    }

    pub fn state(&self) -> WorkflowState {
        self.step.state()
    }

    /// Room of the session in progress
    pub fn room_number(&self) -> Option<&RoomNumber> {
        match &self.step {
            Step::RoomEntry => None,
            Step::OutcomeSelection { room }
            | Step::OrderCheck { room }
            | Step::ItemSelection { room, .. } => Some(room),
        }
    }

    /// Cart, only while selecting items
    pub fn cart(&self) -> Option<&Cart> {
        match &self.step {
            Step::ItemSelection { cart, .. } => Some(cart),
            _ => None,
        }
    }

    /// Whether `submit_order` would complete the session right now
    pub fn can_submit(&self) -> bool {
        self.cart().is_some_and(|cart| !cart.is_empty())
    }

    pub fn enter_room(&mut self, room_number: &str) -> Transition {
        self.apply(WorkflowInput::EnterRoom(room_number.to_string()))
    }

    pub fn select_outcome(&mut self, outcome: CallOutcome) -> Transition {
        self.apply(WorkflowInput::SelectOutcome(outcome))
    }

    pub fn confirm_order_presence(&mut self, did_order: bool) -> Transition {
        self.apply(WorkflowInput::ConfirmOrderPresence(did_order))
    }

    pub fn add_item(&mut self, item: &MenuItem) -> Transition {
        self.apply(WorkflowInput::AddItem(item.clone()))
    }

    pub fn remove_item(&mut self, item_id: &str) -> Transition {
        self.apply(WorkflowInput::RemoveItem(item_id.to_string()))
    }

    pub fn submit_order(&mut self) -> Transition {
        self.apply(WorkflowInput::SubmitOrder)
    }

    pub fn cancel(&mut self) -> Transition {
        self.apply(WorkflowInput::Cancel)
    }

    /// Feed one input through the transition table
    pub fn apply(&mut self, input: WorkflowInput) -> Transition {
        let from = self.step.state();
        let step = std::mem::take(&mut self.step);
        let (next, transition) = self.transition(step, input);
        self.step = next;

        match &transition {
            Transition::Ignored => {
                tracing::debug!(state = %from, "workflow input ignored");
            }
            Transition::Completed(record) => {
                tracing::debug!(
                    room = %record.room_number(),
                    outcome = %record.outcome(),
                    status = %record.order_status(),
                    "call session completed"
                );
            }
            _ => {}
        }

        transition
    }

    fn transition(&self, step: Step, input: WorkflowInput) -> (Step, Transition) {
        match (step, input) {
            (Step::RoomEntry, WorkflowInput::EnterRoom(raw)) => match RoomNumber::parse(&raw) {
                Ok(room) => (
                    Step::OutcomeSelection { room },
                    Transition::Advanced(WorkflowState::OutcomeSelection),
                ),
                Err(e) => {
                    tracing::debug!("room number rejected: {}", e);
                    (Step::RoomEntry, Transition::Ignored)
                }
            },

            (Step::OutcomeSelection { room }, WorkflowInput::SelectOutcome(outcome)) => {
                match outcome.missed_attempt() {
                    None => (
                        Step::OrderCheck { room },
                        Transition::Advanced(WorkflowState::OrderCheck),
                    ),
                    Some(attempt) => {
                        let record = CallRecord::missed(room, attempt, self.clock.now());
                        (Step::RoomEntry, Transition::Completed(record))
                    }
                }
            }

            (Step::OrderCheck { room }, WorkflowInput::ConfirmOrderPresence(false)) => {
                let record = CallRecord::not_ordered(room, self.clock.now());
                (Step::RoomEntry, Transition::Completed(record))
            }

            (Step::OrderCheck { room }, WorkflowInput::ConfirmOrderPresence(true)) => (
                Step::ItemSelection {
                    room,
                    cart: Cart::new(),
                },
                Transition::Advanced(WorkflowState::ItemSelection),
            ),

            (Step::ItemSelection { room, mut cart }, WorkflowInput::AddItem(item)) => {
                cart.add(&item);
                (Step::ItemSelection { room, cart }, Transition::CartUpdated)
            }

            (Step::ItemSelection { room, mut cart }, WorkflowInput::RemoveItem(item_id)) => {
                let transition = if cart.remove(&item_id) {
                    Transition::CartUpdated
                } else {
                    Transition::Ignored
                };
                (Step::ItemSelection { room, cart }, transition)
            }

            (Step::ItemSelection { room, cart }, WorkflowInput::SubmitOrder) => {
                if cart.is_empty() {
                    return (Step::ItemSelection { room, cart }, Transition::Ignored);
                }
                match CallRecord::ordered(room.clone(), cart.lines().to_vec(), self.clock.now()) {
                    Ok(record) => (Step::RoomEntry, Transition::Completed(record)),
                    Err(e) => {
                        tracing::warn!("order for room {} could not be recorded: {}", room, e);
                        (Step::ItemSelection { room, cart }, Transition::Ignored)
                    }
                }
            }

            (Step::RoomEntry, WorkflowInput::Cancel) => (Step::RoomEntry, Transition::Ignored),
            (_, WorkflowInput::Cancel) => (Step::RoomEntry, Transition::Cancelled),

            (step, _) => (step, Transition::Ignored),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::FixedClock;
    use crate::domain::value_objects::OrderStatus;

    fn workflow() -> CallWorkflow {
        CallWorkflow::new(Arc::new(FixedClock::ymd_hm(2026, 3, 14, 10, 15).unwrap()))
    }

    fn tea() -> MenuItem {
        MenuItem::new("hb2", "HOT BEVERAGE", "Tea", 10)
    }

    fn mixed_grill() -> MenuItem {
        MenuItem::new("ar4", "Arabian Taste", "Mixed Grilled", 50).with_served_with("Fries-Bread")
    }

    #[test]
    fn test_not_picked_completes_immediately() {
        let mut wf = workflow();
        assert_eq!(
            wf.enter_room("305"),
            Transition::Advanced(WorkflowState::OutcomeSelection)
        );

        let record = match wf.select_outcome(CallOutcome::NotPickedFinal) {
            Transition::Completed(record) => record,
            other => panic!("Expected completion, got {:?}", other),
        };

        assert_eq!(record.room_number().as_str(), "305");
        assert_eq!(record.order_status(), OrderStatus::NoResponse);
        assert!(record.ordered_lines().is_empty());
        assert_eq!(record.total_amount(), 0);
        assert_eq!(record.attempt_number(), 1);
        assert_eq!(wf.state(), WorkflowState::RoomEntry);
        assert!(wf.room_number().is_none());
    }

    #[test]
    fn test_picked_without_order() {
        let mut wf = workflow();
        wf.enter_room("101");
        assert_eq!(
            wf.select_outcome(CallOutcome::Picked),
            Transition::Advanced(WorkflowState::OrderCheck)
        );

        let transition = wf.confirm_order_presence(false);
        let record = transition.record().expect("record");
        assert_eq!(record.outcome(), CallOutcome::Picked);
        assert_eq!(record.order_status(), OrderStatus::NotOrdered);
        assert_eq!(record.total_amount(), 0);
        assert_eq!(wf.state(), WorkflowState::RoomEntry);
    }

    #[test]
    fn test_full_order_flow() {
        let mut wf = workflow();
        wf.enter_room("1204");
        wf.select_outcome(CallOutcome::Picked);
        assert_eq!(
            wf.confirm_order_presence(true),
            Transition::Advanced(WorkflowState::ItemSelection)
        );
        assert!(!wf.can_submit());

        assert_eq!(wf.add_item(&tea()), Transition::CartUpdated);
        wf.add_item(&tea());
        wf.add_item(&mixed_grill());
        assert_eq!(wf.cart().unwrap().lines().len(), 2);

        let record = match wf.submit_order() {
            Transition::Completed(record) => record,
            other => panic!("Expected completion, got {:?}", other),
        };

        assert_eq!(record.order_status(), OrderStatus::Ordered);
        assert_eq!(record.ordered_lines()[0].quantity, 2);
        assert_eq!(record.total_amount(), 2 * 10 + 50);
        assert_eq!(wf.state(), WorkflowState::RoomEntry);
        assert!(wf.cart().is_none());
    }

    #[test]
    fn test_empty_cart_submit_is_ignored() {
        let mut wf = workflow();
        wf.enter_room("101");
        wf.select_outcome(CallOutcome::Picked);
        wf.confirm_order_presence(true);

        assert!(wf.submit_order().is_ignored());
        assert_eq!(wf.state(), WorkflowState::ItemSelection);

        wf.add_item(&tea());
        wf.remove_item("hb2");
        assert!(wf.submit_order().is_ignored());
        assert!(wf.remove_item("hb2").is_ignored());
    }

    #[test]
    fn test_invalid_room_stays_in_room_entry() {
        let mut wf = workflow();
        assert!(wf.enter_room("").is_ignored());
        assert!(wf.enter_room("   ").is_ignored());
        assert_eq!(wf.state(), WorkflowState::RoomEntry);
    }

    #[test]
    fn test_out_of_order_inputs_are_ignored() {
        let mut wf = workflow();
        assert!(wf.select_outcome(CallOutcome::Picked).is_ignored());
        assert!(wf.confirm_order_presence(true).is_ignored());
        assert!(wf.add_item(&tea()).is_ignored());
        assert!(wf.submit_order().is_ignored());
        assert!(wf.cancel().is_ignored());

        wf.enter_room("101");
        assert!(wf.enter_room("102").is_ignored());
        assert_eq!(wf.room_number().unwrap().as_str(), "101");
        assert!(wf.add_item(&tea()).is_ignored());

        wf.select_outcome(CallOutcome::Picked);
        assert!(wf.select_outcome(CallOutcome::NotPickedAttempt1).is_ignored());
        assert_eq!(wf.state(), WorkflowState::OrderCheck);
    }

    #[test]
    fn test_cancel_discards_session() {
        let mut wf = workflow();
        wf.enter_room("101");
        wf.select_outcome(CallOutcome::Picked);
        wf.confirm_order_presence(true);
        wf.add_item(&tea());

        assert_eq!(wf.cancel(), Transition::Cancelled);
        assert_eq!(wf.state(), WorkflowState::RoomEntry);
        assert!(wf.cart().is_none());

        // The next session starts clean
        wf.enter_room("102");
        wf.select_outcome(CallOutcome::Picked);
        wf.confirm_order_presence(true);
        assert!(wf.cart().unwrap().is_empty());
    }
}

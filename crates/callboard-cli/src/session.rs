//! Interactive call session
//!
//! Prompts the operator through one call on top of a [`CallDesk`]. The desk
//! owns every state decision; this module only renders and reads.

use anyhow::{Context, Result};
use callboard::{
    CallDesk, CallOutcome, CallRecord, Catalog, DomainError, KeyValueStore, MenuItem, Transition,
    WorkflowInput, WorkflowState,
};
use colored::Colorize;
use dialoguer::{Confirm, Input, Select};

use crate::config::Config;

/// How a session ended
pub enum SessionEnd {
    Saved(CallRecord),
    /// Completed, but the operator gave up on saving it
    Unsaved,
    Cancelled,
    /// Operator left without starting a call
    Quit,
}

/// Run one call from room entry to a saved record
pub async fn run_call<S: KeyValueStore>(
    desk: &mut CallDesk<S>,
    catalog: &Catalog,
    config: &Config,
) -> Result<SessionEnd> {
    loop {
        let input = match desk.workflow().state() {
            WorkflowState::RoomEntry => match prompt_room()? {
                Some(room) => WorkflowInput::EnterRoom(room),
                None => return Ok(SessionEnd::Quit),
            },
            WorkflowState::OutcomeSelection => prompt_outcome(desk)?,
            WorkflowState::OrderCheck => prompt_order_check()?,
            WorkflowState::ItemSelection => match prompt_item_action(desk, catalog, config)? {
                Some(input) => input,
                None => continue,
            },
        };

        let is_room_entry = matches!(input, WorkflowInput::EnterRoom(_));
        match desk.handle(input).await {
            Ok(Transition::Ignored) if is_room_entry => {
                println!(
                    "{} Room numbers are up to 10 letters, digits or '-', with at least one digit",
                    "✗".red()
                );
            }
            Ok(Transition::Ignored) => {
                println!("{}", "Nothing to submit yet: add at least one item".yellow());
            }
            Ok(Transition::Completed(record)) => {
                print_saved(&record, config);
                return Ok(SessionEnd::Saved(record));
            }
            Ok(Transition::Cancelled) => {
                println!("{}", "Call cancelled".dimmed());
                return Ok(SessionEnd::Cancelled);
            }
            Ok(_) => {}
            Err(e) => return resolve_pending(desk, e, config).await,
        }
    }
}

fn prompt_room() -> Result<Option<String>> {
    let room: String = Input::new()
        .with_prompt("Room number (empty to finish)")
        .allow_empty(true)
        .interact_text()
        .context("Failed to read input")?;

    let room = room.trim().to_string();
    Ok(if room.is_empty() { None } else { Some(room) })
}

fn prompt_outcome<S: KeyValueStore>(desk: &CallDesk<S>) -> Result<WorkflowInput> {
    let room = desk
        .workflow()
        .room_number()
        .map(|r| r.to_string())
        .unwrap_or_default();

    let mut labels: Vec<&str> = CallOutcome::ALL.iter().map(|o| o.label()).collect();
    labels.push("Cancel call");

    let choice = Select::new()
        .with_prompt(format!("Room {} - call outcome", room))
        .items(&labels)
        .default(0)
        .interact()
        .context("Failed to read selection")?;

    Ok(match CallOutcome::ALL.get(choice) {
        Some(outcome) => WorkflowInput::SelectOutcome(*outcome),
        None => WorkflowInput::Cancel,
    })
}

fn prompt_order_check() -> Result<WorkflowInput> {
    let choice = Select::new()
        .with_prompt("Did the guest order?")
        .items(&["Yes, take the order", "No order", "Cancel call"])
        .default(0)
        .interact()
        .context("Failed to read selection")?;

    Ok(match choice {
        0 => WorkflowInput::ConfirmOrderPresence(true),
        1 => WorkflowInput::ConfirmOrderPresence(false),
        _ => WorkflowInput::Cancel,
    })
}

/// One action in the item picker; `None` when the operator backed out
fn prompt_item_action<S: KeyValueStore>(
    desk: &CallDesk<S>,
    catalog: &Catalog,
    config: &Config,
) -> Result<Option<WorkflowInput>> {
    print_cart(desk, config);

    let actions = [
        "Browse by category",
        "Search menu",
        "Remove an item",
        "Submit order",
        "Cancel call",
    ];
    let choice = Select::new()
        .with_prompt("Order")
        .items(&actions)
        .default(0)
        .interact()
        .context("Failed to read selection")?;

    Ok(match choice {
        0 => browse(catalog, config)?.map(WorkflowInput::AddItem),
        1 => search(catalog, config)?.map(WorkflowInput::AddItem),
        2 => pick_line_to_remove(desk)?.map(WorkflowInput::RemoveItem),
        3 => Some(WorkflowInput::SubmitOrder),
        _ => Some(WorkflowInput::Cancel),
    })
}

fn browse(catalog: &Catalog, config: &Config) -> Result<Option<MenuItem>> {
    let mut labels: Vec<&str> = catalog.categories().iter().map(String::as_str).collect();
    labels.push("Back");

    let choice = Select::new()
        .with_prompt("Category")
        .items(&labels)
        .default(0)
        .interact()
        .context("Failed to read selection")?;

    let Some(category) = catalog.categories().get(choice) else {
        return Ok(None);
    };
    let items: Vec<&MenuItem> = catalog.items_in(category).collect();
    pick_item(&items, config)
}

fn search(catalog: &Catalog, config: &Config) -> Result<Option<MenuItem>> {
    let term: String = Input::new()
        .with_prompt("Search")
        .allow_empty(true)
        .interact_text()
        .context("Failed to read input")?;

    let items = catalog.search(&term);
    if items.is_empty() {
        println!("No menu items match '{}'", term);
        return Ok(None);
    }
    pick_item(&items, config)
}

fn pick_item(items: &[&MenuItem], config: &Config) -> Result<Option<MenuItem>> {
    let mut labels: Vec<String> = items.iter().map(|item| item_label(item, config)).collect();
    labels.push("Back".to_string());

    let choice = Select::new()
        .with_prompt("Add item")
        .items(&labels)
        .default(0)
        .interact()
        .context("Failed to read selection")?;

    Ok(items.get(choice).map(|item| (*item).clone()))
}

fn pick_line_to_remove<S: KeyValueStore>(desk: &CallDesk<S>) -> Result<Option<String>> {
    let Some(cart) = desk.workflow().cart().filter(|c| !c.is_empty()) else {
        println!("{}", "The order is empty".dimmed());
        return Ok(None);
    };

    let mut labels: Vec<String> = cart
        .lines()
        .iter()
        .map(|line| format!("{}x {}", line.quantity, line.name))
        .collect();
    labels.push("Back".to_string());

    let choice = Select::new()
        .with_prompt("Remove")
        .items(&labels)
        .default(0)
        .interact()
        .context("Failed to read selection")?;

    Ok(cart.lines().get(choice).map(|line| line.id.clone()))
}

pub fn item_label(item: &MenuItem, config: &Config) -> String {
    let mut label = format!("{} ({})", item.name, config.money(item.unit_price));
    if let Some(side) = &item.served_with {
        label.push_str(&format!(" with {}", side));
    }
    if item.is_vegetarian {
        label.push_str(" [veg]");
    }
    if item.is_spicy {
        label.push_str(" [spicy]");
    }
    label
}

fn print_cart<S: KeyValueStore>(desk: &CallDesk<S>, config: &Config) {
    let Some(cart) = desk.workflow().cart() else {
        return;
    };

    if cart.is_empty() {
        println!("{}", "Order: (empty)".dimmed());
        return;
    }

    println!("{}", "Order:".bold());
    for line in cart.lines() {
        println!(
            "  {}x {} {}",
            line.quantity,
            line.name,
            config.money(line.line_total()).dimmed()
        );
    }
    println!("  {} {}", "Total:".bold(), config.money(cart.total()).green());
}

fn print_saved(record: &CallRecord, config: &Config) {
    println!(
        "{} Room {} saved: {} / {} ({})",
        "✓".green(),
        record.room_number().to_string().cyan(),
        record.outcome().label(),
        record.order_status().label(),
        config.money(record.total_amount())
    );
}

/// A completed record could not be saved; retry until it is or the operator gives up
async fn resolve_pending<S: KeyValueStore>(
    desk: &mut CallDesk<S>,
    error: DomainError,
    config: &Config,
) -> Result<SessionEnd> {
    let mut error = error;
    loop {
        println!("{} Could not save the record: {}", "✗".red(), error);

        let retry = Confirm::new()
            .with_prompt("Retry saving?")
            .default(true)
            .interact()
            .context("Failed to read confirmation")?;

        if !retry {
            desk.discard_pending();
            println!("{}", "Record discarded".yellow());
            return Ok(SessionEnd::Unsaved);
        }

        let record = desk.pending().cloned();
        match desk.retry_pending().await {
            Ok(_) => {
                return Ok(match record {
                    Some(record) => {
                        print_saved(&record, config);
                        SessionEnd::Saved(record)
                    }
                    None => SessionEnd::Unsaved,
                });
            }
            Err(e) => error = e,
        }
    }
}

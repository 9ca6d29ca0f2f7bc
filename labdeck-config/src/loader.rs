//! Deck loading
//!
//! Reads a layout from raw bytes or text and returns a populated,
//! calibrated deck.

use core::str;

use labdeck_core::{Catalog, Deck};

use crate::error::ConfigError;
use crate::layout::parse_layout;

/// Load a deck from raw layout bytes
pub fn load_deck(input: &[u8], catalog: &Catalog) -> Result<Deck, ConfigError> {
    debug!("read {} bytes of layout", input.len());
    let text = str::from_utf8(input).map_err(|_| ConfigError::InvalidUtf8)?;
    load_deck_str(text, catalog)
}

/// Load a deck from layout text
pub fn load_deck_str(input: &str, catalog: &Catalog) -> Result<Deck, ConfigError> {
    info!("loading deck layout...");

    let layout = parse_layout(input)?;
    let deck = layout.build(catalog).inspect_err(|e| {
        warn!("failed to build deck: {}", e);
    })?;

    log_deck_summary(&deck);
    Ok(deck)
}

/// Log a summary of the loaded deck
fn log_deck_summary(deck: &Deck) {
    info!("deck loaded: {} slot(s)", deck.len());
    for (position, module) in deck.slots() {
        debug!(
            "  {}: {} (calibrated: {})",
            position,
            module.kind(),
            module.calibration_origin().is_some()
        );
    }
}

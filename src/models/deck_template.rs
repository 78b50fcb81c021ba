//! Deck templates - named archetypes with a display theme category.
//!
//! Templates exist purely so the display layer can color deck names
//! consistently; they never participate in aggregation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::DeckTemplateId;

/// Placeholder label meaning "none": the default theme category (renders
/// grey) and the value the form uses for "no sub archetype".
pub const NONE_LABEL: &str = "無";

/// Which deck axis a template names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeckType {
    #[default]
    Main,
    Sub,
}

/// A named archetype with its display theme.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckTemplate {
    pub id: DeckTemplateId,

    /// Archetype label shown in deck pickers
    pub name: String,

    /// Theme category used for display coloring
    pub theme: String,

    pub deck_type: DeckType,

    pub created_at: DateTime<Utc>,
}

impl DeckTemplate {
    pub fn new(name: impl Into<String>, theme: impl Into<String>, deck_type: DeckType) -> Self {
        Self {
            id: DeckTemplateId::generate(),
            name: name.into(),
            theme: theme.into(),
            deck_type,
            created_at: Utc::now(),
        }
    }

    /// Template auto-registered the first time a deck name appears on a
    /// match, so pickers and coloring work without manual setup.
    pub fn auto(name: &str) -> Self {
        Self {
            id: DeckTemplateId::generate_with_prefix("tpl-auto-"),
            name: name.to_string(),
            theme: NONE_LABEL.to_string(),
            deck_type: DeckType::Main,
            created_at: Utc::now(),
        }
    }
}

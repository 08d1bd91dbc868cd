//! Rendering of command results as text, JSON or tables.

use anyhow::Result;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use dtk_core::DataTypeServices;
use dtk_model::{ComparisonResult, DataTypeResolution, culture_language_code};
use serde::Serialize;

/// Machine-readable outcome of one command.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report<T> {
    pub command: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lookup_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub culture_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl<T> Report<T> {
    pub fn new(command: &'static str, resolution: DataTypeResolution<T>) -> Self {
        let (value, error_message) = match resolution {
            DataTypeResolution::Value(value) => (Some(value), None),
            DataTypeResolution::Error(message) => (None, Some(message)),
        };
        Self {
            command,
            lookup_key: None,
            culture_id: None,
            value,
            error_message,
        }
    }

    #[must_use]
    pub fn with_lookup_key(mut self, lookup_key: Option<&str>) -> Self {
        self.lookup_key = lookup_key.map(str::to_string);
        self
    }

    #[must_use]
    pub fn with_culture_id(mut self, culture_id: &str) -> Self {
        self.culture_id = Some(culture_id.to_string());
        self
    }

    pub fn is_error(&self) -> bool {
        self.error_message.is_some()
    }
}

impl<T: Serialize> Report<T> {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl<T: std::fmt::Display> Report<T> {
    /// One line: the value, or `error: <message>`.
    pub fn to_text(&self) -> String {
        match (&self.value, &self.error_message) {
            (_, Some(message)) => format!("error: {message}"),
            (Some(value), None) => value.to_string(),
            (None, None) => String::new(),
        }
    }
}

/// Same spelling as the JSON form.
pub fn comparison_label(result: ComparisonResult) -> &'static str {
    match result {
        ComparisonResult::Equal => "equal",
        ComparisonResult::NotEqual => "notEqual",
        ComparisonResult::LessThan => "lessThan",
        ComparisonResult::GreaterThan => "greaterThan",
        ComparisonResult::Undetermined => "undetermined",
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label).add_attribute(Attribute::Bold)
}

/// Registered cultures with their fallback, language and active marker.
pub fn cultures_table(services: &DataTypeServices) -> Result<Table> {
    let cultures = services.cultures();
    let active = cultures.active_culture_id()?;
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Culture"),
        header_cell("Fallback"),
        header_cell("Language"),
        header_cell("Active"),
    ]);
    apply_table_style(&mut table);
    for culture_id in cultures.available_cultures()? {
        let fallback = cultures
            .find(&culture_id)?
            .and_then(|entry| entry.fallback_culture_id.clone())
            .unwrap_or_else(|| "-".to_string());
        let marker = if culture_id == active {
            Cell::new("*").fg(Color::Green)
        } else {
            Cell::new("")
        };
        table.add_row(vec![
            Cell::new(&culture_id),
            Cell::new(fallback),
            Cell::new(culture_language_code(&culture_id)),
            marker,
        ]);
    }
    Ok(table)
}

/// Lookup key fallbacks sorted by custom key.
pub fn lookup_keys_table(services: &DataTypeServices) -> Result<Table> {
    let entries = services.lookup_key_fallbacks().entries()?;
    let mut table = Table::new();
    table.set_header(vec![header_cell("Lookup key"), header_cell("Falls back to")]);
    apply_table_style(&mut table);
    for (custom, general) in entries {
        table.add_row(vec![custom, general]);
    }
    Ok(table)
}

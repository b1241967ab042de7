use serde::{Deserialize, Serialize};

use super::{TransactionType, ValidationError};

/// Glyph shown for transactions and budgets whose category no longer exists.
pub const FALLBACK_ICON: &str = "❔";

/// Glyphs offered when creating or editing a category.
pub const ICON_CHOICES: &[&str] = &[
    "💼", "🎉", "📈", "💰", "🍔", "🚗", "🎬", "⚕️", "🛍️", "💡", "📄", "💳", "✈️", "🏠",
    "📚", "⚽", "🎵", "🎮", "📱", "🍕",
];

pub const DEFAULT_ICON: &str = "📊";
pub const DEFAULT_COLOR: &str = "#10b981";

/// Display colors offered for categories.
pub const COLOR_CHOICES: &[&str] = &[
    "#10b981", "#3b82f6", "#f59e0b", "#ef4444", "#8b5cf6", "#ec4899", "#06b6d4", "#6366f1",
    "#f97316", "#64748b",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub icon: String,
    pub color: String,
}

impl Category {
    pub fn from_draft(id: String, draft: CategoryDraft) -> Self {
        Self {
            id,
            name: draft.name,
            kind: draft.kind,
            icon: draft.icon,
            color: draft.color,
        }
    }

    /// The ten categories every fresh install starts with.
    pub fn defaults() -> Vec<Category> {
        use TransactionType::{Expense, Income};
        let seed = [
            ("1", "Gaji", Income, "💼", "#10b981"),
            ("2", "Bonus", Income, "🎉", "#3b82f6"),
            ("3", "Investasi", Income, "📈", "#8b5cf6"),
            ("4", "Makanan", Expense, "🍔", "#f59e0b"),
            ("5", "Transportasi", Expense, "🚗", "#06b6d4"),
            ("6", "Hiburan", Expense, "🎬", "#ec4899"),
            ("7", "Kesehatan", Expense, "⚕️", "#ef4444"),
            ("8", "Belanja", Expense, "🛍️", "#a78bfa"),
            ("9", "Utilitas", Expense, "💡", "#fbbf24"),
            ("10", "Tagihan", Expense, "📄", "#64748b"),
        ];
        seed.iter()
            .map(|(id, name, kind, icon, color)| Category {
                id: (*id).to_string(),
                name: (*name).to_string(),
                kind: *kind,
                icon: (*icon).to_string(),
                color: (*color).to_string(),
            })
            .collect()
    }

    /// Find a category by exact name, the join key transactions and budgets use.
    pub fn find_by_name<'a>(categories: &'a [Category], name: &str) -> Option<&'a Category> {
        categories.iter().find(|c| c.name == name)
    }

    /// Case-insensitive lookup, used when resolving names typed by the user.
    pub fn find_by_name_loose<'a>(categories: &'a [Category], name: &str) -> Option<&'a Category> {
        let lower = name.to_lowercase();
        categories.iter().find(|c| c.name.to_lowercase() == lower)
    }

    pub fn find_by_id<'a>(categories: &'a [Category], id: &str) -> Option<&'a Category> {
        categories.iter().find(|c| c.id == id)
    }

    /// Icon for a category name, or the fallback glyph for orphaned references.
    pub fn icon_for<'a>(categories: &'a [Category], name: &str) -> &'a str {
        Self::find_by_name(categories, name)
            .map(|c| c.icon.as_str())
            .unwrap_or(FALLBACK_ICON)
    }

    #[cfg(test)]
    pub fn to_draft(&self) -> CategoryDraft {
        CategoryDraft {
            name: self.name.clone(),
            kind: self.kind,
            icon: self.icon.clone(),
            color: self.color.clone(),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.icon, self.name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryDraft {
    pub name: String,
    pub kind: TransactionType,
    pub icon: String,
    pub color: String,
}

impl CategoryDraft {
    pub fn new(name: String, kind: TransactionType) -> Self {
        Self {
            name,
            kind,
            icon: DEFAULT_ICON.to_string(),
            color: DEFAULT_COLOR.to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name"));
        }
        Ok(())
    }
}

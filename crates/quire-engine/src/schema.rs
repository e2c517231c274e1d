//! Element classification used by editing commands.
//!
//! Commands only ever ask two questions: "may this element be split or merged"
//! ([`LimitCheck`]) and "may this child live here" ([`Schema::check_child`]).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::editing::soft_break::SOFT_BREAK;
use crate::model::ROOT_NAME;

/// Context name in `allow_in` matching every block element
pub const BLOCK_CONTEXT: &str = "$block";
/// Schema name under which text is registered
pub const TEXT_NAME: &str = "$text";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Element `{0}` is already registered")]
    AlreadyRegistered(String),

    #[error("Element `{0}` is not registered")]
    NotRegistered(String),
}

/// Rules for one element name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemDefinition {
    /// Content may not be split or merged across this element's boundary
    pub is_limit: bool,
    /// Self-contained unit; implies limit
    pub is_object: bool,
    pub is_block: bool,
    pub is_inline: bool,
    /// Element names (or `$block`) this item may be a child of
    pub allow_in: Vec<String>,
}

impl ItemDefinition {
    pub fn block() -> Self {
        Self {
            is_block: true,
            ..Self::default()
        }
    }

    pub fn limit() -> Self {
        Self {
            is_limit: true,
            ..Self::default()
        }
    }

    pub fn allowed_in(mut self, contexts: &[&str]) -> Self {
        self.allow_in = contexts.iter().map(|context| context.to_string()).collect();
        self
    }
}

/// Answers whether an element is a limit.
///
/// Any `Fn(&str) -> bool` works, so a command can be driven by a plain
/// predicate instead of a full [`Schema`].
pub trait LimitCheck {
    fn is_limit(&self, name: &str) -> bool;
}

impl<F> LimitCheck for F
where
    F: Fn(&str) -> bool,
{
    fn is_limit(&self, name: &str) -> bool {
        self(name)
    }
}

/// Registry of element definitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    items: BTreeMap<String, ItemDefinition>,
}

impl Schema {
    /// Schema that only knows the root element
    pub fn new() -> Self {
        let mut items = BTreeMap::new();
        items.insert(ROOT_NAME.to_string(), ItemDefinition::limit());
        Self { items }
    }

    pub fn register(
        &mut self,
        name: impl Into<String>,
        definition: ItemDefinition,
    ) -> Result<(), SchemaError> {
        let name = name.into();
        if self.items.contains_key(&name) {
            return Err(SchemaError::AlreadyRegistered(name));
        }
        self.items.insert(name, definition);
        Ok(())
    }

    /// Change an existing definition in place
    pub fn extend(
        &mut self,
        name: &str,
        change: impl FnOnce(&mut ItemDefinition),
    ) -> Result<(), SchemaError> {
        let definition = self
            .items
            .get_mut(name)
            .ok_or_else(|| SchemaError::NotRegistered(name.to_string()))?;
        change(definition);
        Ok(())
    }

    /// Register `name`, or replace its definition when already present
    pub fn upsert(&mut self, name: impl Into<String>, definition: ItemDefinition) {
        self.items.insert(name.into(), definition);
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.items.contains_key(name)
    }

    pub fn is_block(&self, name: &str) -> bool {
        self.items.get(name).is_some_and(|item| item.is_block)
    }

    pub fn is_object(&self, name: &str) -> bool {
        self.items.get(name).is_some_and(|item| item.is_object)
    }

    /// Whether `child` may be placed directly inside `parent`
    pub fn check_child(&self, parent: &str, child: &str) -> bool {
        let Some(definition) = self.items.get(child) else {
            return false;
        };
        definition.allow_in.iter().any(|context| {
            context == parent || (context == BLOCK_CONTEXT && self.is_block(parent))
        })
    }
}

impl LimitCheck for Schema {
    fn is_limit(&self, name: &str) -> bool {
        if name == ROOT_NAME {
            return true;
        }
        self.items
            .get(name)
            .is_some_and(|item| item.is_limit || item.is_object)
    }
}

impl Default for Schema {
    /// Paragraphs, headings, block quotes, tables and soft breaks
    fn default() -> Self {
        let mut schema = Self::new();
        let block_parents = [ROOT_NAME, "blockQuote", "tableCell"];

        schema.upsert("paragraph", ItemDefinition::block().allowed_in(&block_parents));
        schema.upsert("heading", ItemDefinition::block().allowed_in(&block_parents));
        schema.upsert(
            "blockQuote",
            ItemDefinition::default().allowed_in(&[ROOT_NAME]),
        );
        schema.upsert(
            "table",
            ItemDefinition {
                is_object: true,
                is_block: true,
                ..ItemDefinition::default()
            }
            .allowed_in(&[ROOT_NAME, "blockQuote"]),
        );
        schema.upsert("tableRow", ItemDefinition::limit().allowed_in(&["table"]));
        schema.upsert("tableCell", ItemDefinition::limit().allowed_in(&["tableRow"]));
        schema.upsert(
            SOFT_BREAK,
            ItemDefinition {
                is_object: true,
                is_inline: true,
                ..ItemDefinition::default()
            }
            .allowed_in(&[BLOCK_CONTEXT]),
        );
        schema.upsert(
            TEXT_NAME,
            ItemDefinition {
                is_inline: true,
                ..ItemDefinition::default()
            }
            .allowed_in(&[BLOCK_CONTEXT]),
        );

        schema
    }
}

//! Domain types: lists, sections, and todos.
//!
//! These are the records handed to the presenter by the data store. The
//! presenter never creates them itself; it only copies them into state.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an identifier from a UUID
            #[must_use]
            pub const fn from_uuid(id: Uuid) -> Self {
                Self(id)
            }

            /// Returns the inner UUID
            #[must_use]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

uuid_id!(
    /// Identifier of a todo list
    ListId
);
uuid_id!(
    /// Identifier of a section within a list
    SectionId
);
uuid_id!(
    /// Identifier of a single todo
    TodoId
);

/// A named subdivision of a list
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Unique identifier
    pub id: SectionId,
    /// The list this section belongs to
    pub list_id: ListId,
    /// Display title
    pub title: String,
}

/// Top-level grouping of sections
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoList {
    /// Unique identifier
    pub id: ListId,
    /// Display title
    pub title: String,
    /// Sections in display order
    pub sections: Vec<Section>,
}

impl TodoList {
    /// Creates an empty list
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: ListId::new(),
            title: title.into(),
            sections: Vec::new(),
        }
    }

    /// Appends a section and returns its identifier
    pub fn add_section(&mut self, title: impl Into<String>) -> SectionId {
        let section = Section {
            id: SectionId::new(),
            list_id: self.id,
            title: title.into(),
        };
        let id = section.id;
        self.sections.push(section);
        id
    }

    /// Identifiers of every section, in order
    #[must_use]
    pub fn section_ids(&self) -> Vec<SectionId> {
        self.sections.iter().map(|s| s.id).collect()
    }
}

/// A single actionable item
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Unique identifier
    pub id: TodoId,
    /// The section this todo belongs to
    pub section_id: SectionId,
    /// Title/description of the todo
    pub title: String,
    /// Completion status
    pub completed: bool,
}

impl Todo {
    /// Creates an open todo in `section_id`
    #[must_use]
    pub fn new(section_id: SectionId, title: impl Into<String>) -> Self {
        Self {
            id: TodoId::new(),
            section_id,
            title: title.into(),
            completed: false,
        }
    }

    /// Flips the completion status
    pub const fn toggle(&mut self) {
        self.completed = !self.completed;
    }
}

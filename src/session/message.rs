//! Transcript and gallery entries
//!
//! This module defines the records held by the conversation store:
//! transcript [`Message`]s, gallery [`GeneratedShip`]s and the single
//! [`GenerationStatus`] flag.

use crate::error::CruiseSimError;
use crate::providers::ProviderRole;
use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::fmt;
use ulid::Ulid;

/// Author of a transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The person at the keyboard
    User,
    /// The captain persona
    Assistant,
    /// Local notices that never reach the provider
    System,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
            Self::System => write!(f, "system"),
        }
    }
}

impl TryFrom<Role> for ProviderRole {
    type Error = CruiseSimError;

    /// Maps transcript roles onto provider roles
    ///
    /// The provider only knows a user side and a model side, so `System`
    /// has no counterpart.
    ///
    /// # Examples
    ///
    /// ```
    /// use cruisesim::providers::ProviderRole;
    /// use cruisesim::session::Role;
    ///
    /// assert_eq!(ProviderRole::try_from(Role::Assistant).unwrap(), ProviderRole::Model);
    /// assert!(ProviderRole::try_from(Role::System).is_err());
    /// ```
    fn try_from(role: Role) -> Result<Self, Self::Error> {
        match role {
            Role::User => Ok(ProviderRole::User),
            Role::Assistant => Ok(ProviderRole::Model),
            Role::System => Err(CruiseSimError::UnmappedRole(role.to_string())),
        }
    }
}

/// Image attached to an assistant turn
///
/// The image reference and the ship name travel together so a message can
/// never carry one without the other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipAttachment {
    /// Data URI or resolvable URL of the generated image
    pub image_url: String,
    /// Display label derived from the prompt
    pub ship_name: String,
}

/// One turn in the transcript
///
/// Messages are immutable once created; the fields are private and only
/// readable through accessors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    id: Ulid,
    role: Role,
    content: String,
    #[serde(flatten)]
    attachment: Option<ShipAttachment>,
    timestamp: DateTime<Utc>,
}

impl Message {
    /// Creates a message stamped with the current time
    pub fn new(id: Ulid, role: Role, content: impl Into<String>) -> Self {
        Self {
            id,
            role,
            content: content.into(),
            attachment: None,
            timestamp: Utc::now(),
        }
    }

    /// Creates a user message
    ///
    /// # Examples
    ///
    /// ```
    /// use cruisesim::session::{Message, Role};
    ///
    /// let msg = Message::user(ulid::Ulid::new(), "build me a ship");
    /// assert_eq!(msg.role(), Role::User);
    /// assert!(msg.image_url().is_none());
    /// ```
    pub fn user(id: Ulid, content: impl Into<String>) -> Self {
        Self::new(id, Role::User, content)
    }

    /// Creates an assistant message without an image
    pub fn assistant(id: Ulid, content: impl Into<String>) -> Self {
        Self::new(id, Role::Assistant, content)
    }

    /// Creates an assistant message with an attached ship image
    ///
    /// # Examples
    ///
    /// ```
    /// use cruisesim::session::{Message, ShipAttachment};
    ///
    /// let msg = Message::assistant_with_ship(
    ///     ulid::Ulid::new(),
    ///     "Here she is!",
    ///     ShipAttachment {
    ///         image_url: "data:image/png;base64,AAAA".to_string(),
    ///         ship_name: "SS Party Boat".to_string(),
    ///     },
    /// );
    /// assert_eq!(msg.ship_name(), Some("SS Party Boat"));
    /// assert_eq!(msg.image_url(), Some("data:image/png;base64,AAAA"));
    /// ```
    pub fn assistant_with_ship(
        id: Ulid,
        content: impl Into<String>,
        attachment: ShipAttachment,
    ) -> Self {
        Self {
            attachment: Some(attachment),
            ..Self::new(id, Role::Assistant, content)
        }
    }

    /// Creates a system notice
    pub fn system(id: Ulid, content: impl Into<String>) -> Self {
        Self::new(id, Role::System, content)
    }

    pub fn id(&self) -> Ulid {
        self.id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn attachment(&self) -> Option<&ShipAttachment> {
        self.attachment.as_ref()
    }

    pub fn image_url(&self) -> Option<&str> {
        self.attachment.as_ref().map(|a| a.image_url.as_str())
    }

    pub fn ship_name(&self) -> Option<&str> {
        self.attachment.as_ref().map(|a| a.ship_name.as_str())
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// One gallery entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedShip {
    /// Unique identifier, distinct from every message id
    pub id: Ulid,
    /// Derived display name
    pub name: String,
    /// The captain's text for the turn that produced the image
    pub description: String,
    /// Same image reference as the triggering message
    pub image_url: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

impl GeneratedShip {
    /// Creates a gallery entry stamped with the current time
    pub fn new(
        id: Ulid,
        name: impl Into<String>,
        description: impl Into<String>,
        image_url: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
            image_url: image_url.into(),
            created_at: Utc::now(),
        }
    }
}

/// Session-wide generation status
///
/// Only `Idle` accepts new submissions. A successful cycle returns straight
/// to `Idle`; `Error` is reported and then folded back into `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GenerationStatus {
    #[default]
    Idle,
    Thinking,
    GeneratingImage,
    Error,
}

impl fmt::Display for GenerationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "IDLE"),
            Self::Thinking => write!(f, "THINKING"),
            Self::GeneratingImage => write!(f, "GENERATING_IMAGE"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

impl GenerationStatus {
    /// Whether a new submission may start a cycle
    pub fn accepts_input(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Text shown by the terminal while a cycle is in flight
    pub fn activity_label(&self) -> Option<&'static str> {
        match self {
            Self::Idle => None,
            Self::Thinking => Some("Captain is charting a course..."),
            Self::GeneratingImage => Some("Drafting the ship blueprints..."),
            Self::Error => Some("Stormy seas ahead!"),
        }
    }

    /// Get a colored tag representation of this status
    pub fn colored_tag(&self) -> String {
        match self {
            Self::Idle => format!("[{}]", "IDLE".green()),
            Self::Thinking => format!("[{}]", "THINKING".yellow()),
            Self::GeneratingImage => format!("[{}]", "GENERATING".purple()),
            Self::Error => format!("[{}]", "ERROR".red()),
        }
    }
}

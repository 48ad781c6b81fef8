//! Team member model.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::ids::MemberId;

/// Seniority level of a team member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Level {
    #[default]
    Junior,
    #[serde(rename = "Mid-level")]
    MidLevel,
    Senior,
}

impl Level {
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Junior => "Junior",
            Level::MidLevel => "Mid-level",
            Level::Senior => "Senior",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Junior" => Ok(Level::Junior),
            "Mid-level" => Ok(Level::MidLevel),
            "Senior" => Ok(Level::Senior),
            other => Err(format!("unknown level: {other}")),
        }
    }
}

/// Role of a team member.
///
/// The six marketing roles are recognized; anything else is kept verbatim as
/// `Custom`, so the wire form stays plain text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Role {
    #[default]
    ContentCreator,
    SocialMediaManager,
    SeoSpecialist,
    PpcSpecialist,
    GraphicDesigner,
    MarketingAnalyst,
    Custom(String),
}

impl Role {
    pub const RECOGNIZED: [Role; 6] = [
        Role::ContentCreator,
        Role::SocialMediaManager,
        Role::SeoSpecialist,
        Role::PpcSpecialist,
        Role::GraphicDesigner,
        Role::MarketingAnalyst,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Role::ContentCreator => "Content Creator",
            Role::SocialMediaManager => "Social Media Manager",
            Role::SeoSpecialist => "SEO Specialist",
            Role::PpcSpecialist => "PPC Specialist",
            Role::GraphicDesigner => "Graphic Designer",
            Role::MarketingAnalyst => "Marketing Analyst",
            Role::Custom(s) => s,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Role::Custom(_))
    }
}

impl From<&str> for Role {
    fn from(s: &str) -> Self {
        Role::RECOGNIZED
            .iter()
            .find(|role| role.as_str() == s)
            .cloned()
            .unwrap_or_else(|| Role::Custom(s.to_string()))
    }
}

impl From<String> for Role {
    fn from(s: String) -> Self {
        Role::from(s.as_str())
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Role::from)
    }
}

/// A registered team member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: MemberId,
    pub name: String,
    pub role: Role,
    pub email: String,
    pub level: Level,
}

/// Input for registering a member. Fields are validated by the registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMember {
    pub name: String,
    pub role: Role,
    pub email: String,
    pub level: Level,
}

impl NewMember {
    pub fn new(
        name: impl Into<String>,
        role: impl Into<Role>,
        email: impl Into<String>,
        level: Level,
    ) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
            email: email.into(),
            level,
        }
    }
}

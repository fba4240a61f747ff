use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::error::ApiError;

/// Skill attributes of a player, each in `[0, 10]`.
///
/// Every component may be missing on legacy records. Missing components count
/// as zero wherever a score is computed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct Skills {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 10.0, message = "strength must be between 0 and 10"))]
    pub strength: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 10.0, message = "speed must be between 0 and 10"))]
    pub speed: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 10.0, message = "drible must be between 0 and 10"))]
    pub drible: Option<f64>,
}

impl Skills {
    pub fn new(strength: f64, speed: f64, drible: f64) -> Self {
        Self {
            strength: Some(strength),
            speed: Some(speed),
            drible: Some(drible),
        }
    }

    /// Sum of all components, missing ones counted as zero.
    pub fn score(&self) -> f64 {
        self.strength.unwrap_or(0.0) + self.speed.unwrap_or(0.0) + self.drible.unwrap_or(0.0)
    }

    /// Fills every missing component with its default of zero.
    pub fn with_defaults(self) -> Self {
        Self::new(
            self.strength.unwrap_or(0.0),
            self.speed.unwrap_or(0.0),
            self.drible.unwrap_or(0.0),
        )
    }

    /// Overwrites only the components present in `patch`.
    pub fn merge(&mut self, patch: Skills) {
        if patch.strength.is_some() {
            self.strength = patch.strength;
        }
        if patch.speed.is_some() {
            self.speed = patch.speed;
        }
        if patch.drible.is_some() {
            self.drible = patch.drible;
        }
    }
}

/// Full player record as stored and returned by the detail, rank and divide endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    pub creation_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<Skills>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Player {
    /// Applies a partial update. Fields absent from the patch keep their value.
    pub fn apply(&mut self, patch: PlayerUpdate, now: DateTime<Utc>) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(nickname) = patch.nickname {
            self.nickname = nickname;
        }
        if let Some(skills) = patch.skills {
            self.skills.get_or_insert_with(Skills::default).merge(skills);
        }
        self.updated_at = now;
    }
}

/// Projection used by the paginated listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSummary {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    pub creation_date: DateTime<Utc>,
}

/// Row from the players table
#[derive(Debug, sqlx::FromRow)]
pub struct PlayerRow {
    pub id: String,
    pub name: String,
    pub nickname: Option<String>,
    pub creation_date: DateTime<Utc>,
    pub strength: Option<f64>,
    pub speed: Option<f64>,
    pub drible: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PlayerRow {
    /// Convert database row to API response format.
    /// A row with no skill columns set is a record without skills.
    pub fn into_player(self) -> Player {
        let skills = if self.strength.is_none() && self.speed.is_none() && self.drible.is_none() {
            None
        } else {
            Some(Skills {
                strength: self.strength,
                speed: self.speed,
                drible: self.drible,
            })
        };

        Player {
            id: self.id,
            name: self.name,
            nickname: self.nickname,
            creation_date: self.creation_date,
            skills,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Body of POST /api/players
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewPlayer {
    #[validate(
        required(message = "Please enter the player's name"),
        length(min = 1, message = "Please enter the player's name")
    )]
    pub name: Option<String>,
    pub nickname: Option<String>,
    pub creation_date: Option<DateTime<Utc>>,
    #[validate(nested)]
    pub skills: Option<Skills>,
}

impl NewPlayer {
    /// Validates the payload and materialises a record with defaults applied.
    pub fn into_player(self, id: String, now: DateTime<Utc>) -> Result<Player, ApiError> {
        self.validate()?;
        let name = self
            .name
            .ok_or_else(|| ApiError::validation("Please enter the player's name"))?;

        Ok(Player {
            id,
            name,
            nickname: self.nickname,
            creation_date: self.creation_date.unwrap_or(now),
            skills: Some(self.skills.unwrap_or_default().with_defaults()),
            created_at: now,
            updated_at: now,
        })
    }
}

/// Body of PUT /api/players/{id}
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PlayerUpdate {
    #[validate(length(min = 1, message = "Please enter the player's name"))]
    pub name: Option<String>,
    /// `None` leaves the nickname alone, `Some(None)` (an explicit `null`) clears it.
    #[serde(default, deserialize_with = "present")]
    pub nickname: Option<Option<String>>,
    #[validate(nested)]
    pub skills: Option<Skills>,
}

// Marks a field as present even when its value is null.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Response of GET /api/players
#[derive(Debug, Serialize, Deserialize)]
pub struct PlayerPage {
    pub total: i64,
    pub page: u64,
    pub limit: u64,
    pub players: Vec<PlayerSummary>,
}

/// Body of POST /api/players/divide-teams.
/// Kept as a raw JSON value so that a bad count is reported as a validation error.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DivideTeamsRequest {
    #[serde(default)]
    pub players_per_team: Option<serde_json::Value>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TeamsResponse {
    pub teams: Vec<Vec<Player>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

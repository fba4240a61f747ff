//! Translation of listing query parameters into a store filter and a page window.

use std::num::IntErrorKind;

use serde::Deserialize;

use crate::error::ApiError;

/// Fewest players a listing filter must match before results are returned.
pub const MIN_POPULATION: i64 = 10;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;

/// Query parameters of GET /api/players
#[derive(Debug, Default, Deserialize)]
pub struct ListPlayersQuery {
    #[serde(default)]
    pub page: Option<String>,
    #[serde(default)]
    pub limit: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Name,
    Nickname,
}

impl FilterField {
    pub fn column(self) -> &'static str {
        match self {
            FilterField::Name => "name",
            FilterField::Nickname => "nickname",
        }
    }

    /// Lowercased copy of the column, used for case-insensitive matching.
    pub fn folded_column(self) -> &'static str {
        match self {
            FilterField::Name => "name_folded",
            FilterField::Nickname => "nickname_folded",
        }
    }
}

/// Unanchored substring match on a text field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstringFilter {
    pub field: FilterField,
    pub substring: String,
    pub case_sensitive: bool,
}

impl SubstringFilter {
    pub fn case_insensitive(field: FilterField, substring: impl Into<String>) -> Self {
        Self {
            field,
            substring: substring.into(),
            case_sensitive: false,
        }
    }
}

/// Conjunction of all supplied criteria. An empty filter matches every player.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerFilter {
    pub substrings: Vec<SubstringFilter>,
    pub id: Option<String>,
}

impl PlayerFilter {
    pub fn is_empty(&self) -> bool {
        self.substrings.is_empty() && self.id.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Pagination {
    /// Number of records before the requested page, clamped to what SQLite accepts.
    pub fn skip(&self) -> i64 {
        clamp_to_i64(self.page.saturating_sub(1).saturating_mul(self.limit))
    }

    /// Page size, clamped to what SQLite accepts.
    pub fn sql_limit(&self) -> i64 {
        clamp_to_i64(self.limit)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerQuery {
    pub filter: PlayerFilter,
    pub pagination: Pagination,
}

impl ListPlayersQuery {
    pub fn build(self) -> Result<PlayerQuery, ApiError> {
        let pagination = Pagination {
            page: parse_positive("page", self.page.as_deref(), DEFAULT_PAGE)?,
            limit: parse_positive("limit", self.limit.as_deref(), DEFAULT_LIMIT)?,
        };

        let mut filter = PlayerFilter::default();
        if let Some(name) = non_empty(self.name) {
            filter
                .substrings
                .push(SubstringFilter::case_insensitive(FilterField::Name, name));
        }
        if let Some(nickname) = non_empty(self.nickname) {
            filter
                .substrings
                .push(SubstringFilter::case_insensitive(FilterField::Nickname, nickname));
        }
        filter.id = non_empty(self.id);

        Ok(PlayerQuery { filter, pagination })
    }
}

/// Fails when a filter matches fewer than [`MIN_POPULATION`] players.
pub fn ensure_min_population(total: i64) -> Result<(), ApiError> {
    if total < MIN_POPULATION {
        return Err(ApiError::validation(format!(
            "Minimum of {} players required.",
            MIN_POPULATION
        )));
    }
    Ok(())
}

fn clamp_to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

// No upper bound: integers past u64::MAX saturate.
fn parse_positive(param: &str, raw: Option<&str>, default: u64) -> Result<u64, ApiError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(default);
    };

    match raw.parse::<u64>() {
        Ok(value) if value > 0 => Ok(value),
        Err(err) if *err.kind() == IntErrorKind::PosOverflow => Ok(u64::MAX),
        _ => Err(ApiError::validation(format!(
            "{} must be a positive integer",
            param
        ))),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

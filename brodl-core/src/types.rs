/// Workshop filter identifiers (gameplay type, difficulty, time period).
///
/// This module centralizes the filter vocabulary in one place: single-char
/// config codes, the tag strings the workshop listing expects, and display
/// names for the settings panel.

/// A selection code that doesn't map to any known filter value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown filter code: '{0}'")]
pub struct FilterParseError(pub char);

/// Gameplay categories a workshop map can be tagged with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GameplayType {
    Standard,
    Puzzle,
    Story,
    Experimental,
    Challenge,
    Deathmatch,
}

/// All gameplay types in config-code order.
const ALL_GAMEPLAY_TYPES: &[GameplayType] = &[
    GameplayType::Standard,
    GameplayType::Puzzle,
    GameplayType::Story,
    GameplayType::Experimental,
    GameplayType::Challenge,
    GameplayType::Deathmatch,
];

impl GameplayType {
    /// Single-digit config code; also the first character of artifact prefixes.
    pub fn code(&self) -> char {
        match self {
            Self::Standard => '1',
            Self::Puzzle => '2',
            Self::Story => '3',
            Self::Experimental => '4',
            Self::Challenge => '5',
            Self::Deathmatch => '6',
        }
    }

    /// The `requiredtags[]` value the workshop listing filter expects.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Standard => "Standard",
            Self::Puzzle => "Puzzle",
            Self::Story => "Story",
            Self::Experimental => "Experimental",
            Self::Challenge => "Challenge",
            Self::Deathmatch => "Deathmatch",
        }
    }

    pub fn all() -> &'static [GameplayType] {
        ALL_GAMEPLAY_TYPES
    }

    pub fn from_code(code: char) -> Result<Self, FilterParseError> {
        ALL_GAMEPLAY_TYPES
            .iter()
            .copied()
            .find(|g| g.code() == code)
            .ok_or(FilterParseError(code))
    }
}

/// Difficulty levels a workshop map can be tagged with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Difficulty {
    Normal,
    Challenging,
    Brotal,
}

const ALL_DIFFICULTIES: &[Difficulty] = &[
    Difficulty::Normal,
    Difficulty::Challenging,
    Difficulty::Brotal,
];

impl Difficulty {
    /// Single-digit config code; also the second character of artifact prefixes.
    pub fn code(&self) -> char {
        match self {
            Self::Normal => '1',
            Self::Challenging => '2',
            Self::Brotal => '3',
        }
    }

    /// The `requiredtags[]` value the workshop listing filter expects.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Challenging => "Challenging",
            Self::Brotal => "Brotal",
        }
    }

    pub fn all() -> &'static [Difficulty] {
        ALL_DIFFICULTIES
    }

    pub fn from_code(code: char) -> Result<Self, FilterParseError> {
        ALL_DIFFICULTIES
            .iter()
            .copied()
            .find(|d| d.code() == code)
            .ok_or(FilterParseError(code))
    }
}

/// Recency filter for the listing, expressed in days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimePeriod {
    AllTime,
    Today,
    OneWeek,
    ThreeMonths,
    SixMonths,
    OneYear,
}

impl TimePeriod {
    /// The `days` query parameter value. `-1` means no recency filter.
    pub fn days(&self) -> i32 {
        match self {
            Self::AllTime => -1,
            Self::Today => 1,
            Self::OneWeek => 7,
            Self::ThreeMonths => 90,
            Self::SixMonths => 180,
            Self::OneYear => 365,
        }
    }

    /// Display name for the settings panel.
    pub fn label(&self) -> &'static str {
        match self {
            Self::AllTime => "All Time",
            Self::Today => "Today",
            Self::OneWeek => "1 Week",
            Self::ThreeMonths => "3 Months",
            Self::SixMonths => "6 Months",
            Self::OneYear => "1 Year",
        }
    }

    pub fn from_days(days: i32) -> Option<Self> {
        match days {
            -1 => Some(Self::AllTime),
            1 => Some(Self::Today),
            7 => Some(Self::OneWeek),
            90 => Some(Self::ThreeMonths),
            180 => Some(Self::SixMonths),
            365 => Some(Self::OneYear),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gameplay_codes_round_trip() {
        for &g in GameplayType::all() {
            assert_eq!(GameplayType::from_code(g.code()).unwrap(), g);
        }
    }

    #[test]
    fn difficulty_codes_round_trip() {
        for &d in Difficulty::all() {
            assert_eq!(Difficulty::from_code(d.code()).unwrap(), d);
        }
    }

    #[test]
    fn unknown_codes_are_rejected() {
        assert_eq!(GameplayType::from_code('7'), Err(FilterParseError('7')));
        assert_eq!(Difficulty::from_code('0'), Err(FilterParseError('0')));
        assert_eq!(TimePeriod::from_days(30), None);
    }

    #[test]
    fn time_period_days_round_trip() {
        for days in [-1, 1, 7, 90, 180, 365] {
            assert_eq!(TimePeriod::from_days(days).unwrap().days(), days);
        }
    }
}

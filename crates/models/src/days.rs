use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Not},
    str::FromStr,
};

#[cfg(feature = "database")]
use sea_orm::Value;

/// Weekdays on which a campus allows sessions to be scheduled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[repr(transparent)]
pub struct DaySet(u8);

impl DaySet {
    // Constants for individual days
    pub const MONDAY: Self = DaySet(1 << 0);
    pub const TUESDAY: Self = DaySet(1 << 1);
    pub const WEDNESDAY: Self = DaySet(1 << 2);
    pub const THURSDAY: Self = DaySet(1 << 3);
    pub const FRIDAY: Self = DaySet(1 << 4);
    pub const SATURDAY: Self = DaySet(1 << 5);
    pub const SUNDAY: Self = DaySet(1 << 6);

    // Constants for common day combinations
    pub const WEEKDAYS: Self = DaySet(0b0011111);
    pub const WEEKEND: Self = DaySet(0b1100000);
    pub const ALL: Self = DaySet(0b1111111);
    pub const NONE: Self = DaySet(0);

    /// Day-to-char mapping for parsing and display
    const DAY_CHARS: [(Self, char); 7] = [
        (Self::MONDAY, 'M'),
        (Self::TUESDAY, 'T'),
        (Self::WEDNESDAY, 'W'),
        (Self::THURSDAY, 'R'),
        (Self::FRIDAY, 'F'),
        (Self::SATURDAY, 'S'),
        (Self::SUNDAY, 'U'),
    ];

    pub fn new() -> Self {
        Self::NONE
    }

    pub fn contains(self, day: Self) -> bool {
        (self & day) == day
    }

    pub fn is_empty(self) -> bool {
        self == Self::NONE
    }

    pub fn set(&mut self, day: Self, value: bool) {
        if value {
            *self |= day;
        } else {
            *self &= !day;
        }
    }

    pub fn add(&mut self, day: Self) {
        *self |= day;
    }

    pub fn remove(&mut self, day: Self) {
        *self &= !day;
    }

    /// Maps an ISO weekday number (1=Monday .. 7=Sunday) to its day bit.
    pub fn from_iso_weekday(weekday: u32) -> Option<Self> {
        match weekday {
            1 => Some(Self::MONDAY),
            2 => Some(Self::TUESDAY),
            3 => Some(Self::WEDNESDAY),
            4 => Some(Self::THURSDAY),
            5 => Some(Self::FRIDAY),
            6 => Some(Self::SATURDAY),
            7 => Some(Self::SUNDAY),
            _ => None,
        }
    }

    /// Whether the given ISO weekday (1=Monday .. 7=Sunday) is in the set.
    pub fn allows_iso_weekday(self, weekday: u32) -> bool {
        Self::from_iso_weekday(weekday).is_some_and(|day| self.contains(day))
    }
}

impl FromStr for DaySet {
    type Err = ();

    fn from_str(days: &str) -> Result<Self, Self::Err> {
        let mut result = Self::NONE;

        for c in days.chars() {
            for &(day, day_char) in &Self::DAY_CHARS {
                if c == day_char {
                    result |= day;
                    break;
                }
            }
        }

        Ok(result)
    }
}

impl Display for DaySet {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let mut result = String::new();

        for &(day, day_char) in &Self::DAY_CHARS {
            if self.contains(day) {
                result.push(day_char);
            }
        }

        write!(f, "{result}")
    }
}

// Serialized as the day-char pattern ("MTWRF"), both over the wire and in
// the database column.
impl Serialize for DaySet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for DaySet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let pattern = String::deserialize(deserializer)?;
        Ok(pattern.parse().unwrap_or_default())
    }
}

// Bitwise operators
impl BitOr for DaySet {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        DaySet(self.0 | rhs.0)
    }
}

impl BitAnd for DaySet {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        DaySet(self.0 & rhs.0)
    }
}

impl Not for DaySet {
    type Output = Self;

    fn not(self) -> Self::Output {
        // Apply mask to keep only 7 bits
        DaySet((!self.0) & 0x7F)
    }
}

impl BitOrAssign for DaySet {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAndAssign for DaySet {
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0;
    }
}

#[cfg(feature = "database")]
impl sea_orm::sea_query::ValueType for DaySet {
    fn try_from(v: Value) -> Result<Self, sea_orm::sea_query::ValueTypeErr> {
        match v {
            Value::String(Some(s)) => s.parse().map_err(|_| sea_orm::sea_query::ValueTypeErr),
            _ => Err(sea_orm::sea_query::ValueTypeErr),
        }
    }

    fn type_name() -> String {
        "DaySet".to_string()
    }

    fn array_type() -> sea_orm::sea_query::ArrayType {
        sea_orm::sea_query::ArrayType::String
    }

    fn column_type() -> sea_orm::sea_query::ColumnType {
        sea_orm::sea_query::ColumnType::Text
    }
}

#[cfg(feature = "database")]
impl From<DaySet> for Value {
    fn from(days: DaySet) -> Self {
        Value::String(Some(Box::new(days.to_string())))
    }
}

#[cfg(feature = "database")]
impl sea_orm::TryGetable for DaySet {
    fn try_get_by<I: sea_orm::ColIdx>(
        res: &sea_orm::QueryResult,
        index: I,
    ) -> Result<Self, sea_orm::TryGetError> {
        let val: String = res.try_get_by(index)?;

        val.parse().map_err(|_| {
            sea_orm::TryGetError::DbErr(sea_orm::DbErr::Type(
                "Failed to parse DaySet pattern".to_string(),
            ))
        })
    }
}

#[cfg(feature = "database")]
impl sea_orm::sea_query::Nullable for DaySet {
    fn null() -> Value {
        Value::String(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_set_from_str() {
        let days = DaySet::from_str("MWF").unwrap();
        assert!(days.contains(DaySet::MONDAY));
        assert!(!days.contains(DaySet::TUESDAY));
        assert!(days.contains(DaySet::WEDNESDAY));
        assert!(!days.contains(DaySet::THURSDAY));
        assert!(days.contains(DaySet::FRIDAY));
        assert!(!days.contains(DaySet::SATURDAY));
        assert!(!days.contains(DaySet::SUNDAY));
    }

    #[test]
    fn test_day_set_display() {
        let mut days = DaySet::new();
        days.add(DaySet::MONDAY);
        days.add(DaySet::WEDNESDAY);
        days.add(DaySet::FRIDAY);

        assert_eq!(days.to_string(), "MWF");
    }

    #[test]
    fn test_day_set_bitwise_operations() {
        let mwf = DaySet::MONDAY | DaySet::WEDNESDAY | DaySet::FRIDAY;
        assert!(mwf.contains(DaySet::MONDAY));
        assert!(!mwf.contains(DaySet::TUESDAY));
        assert!(mwf.contains(DaySet::WEDNESDAY));

        let weekdays = DaySet::WEEKDAYS;
        assert_eq!(weekdays.to_string(), "MTWRF");
    }

    #[test]
    fn test_iso_weekday_mapping() {
        let mon_to_sat = DaySet::WEEKDAYS | DaySet::SATURDAY;
        for weekday in 1..=6 {
            assert!(mon_to_sat.allows_iso_weekday(weekday), "weekday {weekday}");
        }
        assert!(!mon_to_sat.allows_iso_weekday(7));
        assert!(!mon_to_sat.allows_iso_weekday(0));
        assert!(!mon_to_sat.allows_iso_weekday(8));
    }
}

//! Calendar-date (de)serialization helpers.
//!
//! `OffsetDateTime` fields use `time::serde::rfc3339`; plain dates (hire
//! dates, leave ranges) are serialized as `YYYY-MM-DD` strings via these
//! modules.

/// Serde adapter for `time::Date` as an ISO `[year]-[month]-[day]` string.
pub mod iso_date {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::Date;
    use time::macros::format_description;

    pub fn serialize<S>(date: &Date, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let formatted = date
            .format(format_description!("[year]-[month]-[day]"))
            .map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&formatted)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Date, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Date::parse(&raw, format_description!("[year]-[month]-[day]"))
            .map_err(serde::de::Error::custom)
    }

    /// `Option<Date>` variant for optional fields and query filters.
    pub mod option {
        use serde::{Deserialize, Deserializer, Serializer};
        use time::Date;
        use time::macros::format_description;

        pub fn serialize<S>(date: &Option<Date>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match date {
                Some(date) => super::serialize(date, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Date>, D::Error>
        where
            D: Deserializer<'de>,
        {
            let raw = Option::<String>::deserialize(deserializer)?;
            raw.map(|s| Date::parse(&s, format_description!("[year]-[month]-[day]")))
                .transpose()
                .map_err(serde::de::Error::custom)
        }
    }
}

use chrono::{DateTime, NaiveDate, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Provider weather condition (e.g. id 803, "Clouds", "broken clouds", "04d").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub id: u32,
    /// Primary condition label, e.g. "Rain".
    pub main: String,
    pub description: String,
    pub icon: String,
}

impl Condition {
    /// Placeholder used when the provider sends an empty `weather` array.
    pub fn unknown() -> Self {
        Self {
            id: 0,
            main: "Unknown".to_string(),
            description: "Unknown".to_string(),
            icon: String::new(),
        }
    }

    pub fn icon_url(&self) -> Option<String> {
        if self.icon.is_empty() {
            return None;
        }
        let icon = &self.icon;
        Some(format!("https://openweathermap.org/img/wn/{icon}@2x.png"))
    }
}

/// Current conditions for a single city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub name: String,
    pub country: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity_pct: u8,
    pub wind_speed: f64,
    pub condition: Condition,
}

impl WeatherSnapshot {
    /// The `{name, country}` pair remembered in the recent-search list.
    pub fn recent_entry(&self) -> RecentCity {
        RecentCity::new(self.name.clone(), self.country.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub timestamp: DateTime<Utc>,
    /// Provider-formatted time, e.g. "2024-05-01 12:00:00".
    pub display_time: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity_pct: u8,
    pub wind_speed: f64,
    pub condition: Condition,
}

/// Multi-day forecast. `entries` are kept in the order the provider returned
/// them, which is chronological.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSnapshot {
    pub name: String,
    pub country: String,
    pub entries: Vec<ForecastEntry>,
}

impl ForecastSnapshot {
    /// One entry per calendar day (UTC), the one closest to midday.
    pub fn daily_outlook(&self) -> Vec<&ForecastEntry> {
        let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default();
        let mut days: Vec<(NaiveDate, &ForecastEntry)> = Vec::new();

        for entry in &self.entries {
            let date = entry.timestamp.date_naive();
            let distance = seconds_from(entry.timestamp.time(), noon);

            match days.iter_mut().find(|(d, _)| *d == date) {
                Some((_, best)) => {
                    if distance < seconds_from(best.timestamp.time(), noon) {
                        *best = entry;
                    }
                }
                None => days.push((date, entry)),
            }
        }

        days.into_iter().map(|(_, e)| e).collect()
    }
}

fn seconds_from(time: NaiveTime, target: NaiveTime) -> i64 {
    let time = i64::from(time.num_seconds_from_midnight());
    let target = i64::from(target.num_seconds_from_midnight());
    (time - target).abs()
}

/// A remembered search. Two entries denote the same city when their names
/// match ignoring case; the country is not part of the identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentCity {
    pub name: String,
    pub country: String,
}

impl RecentCity {
    pub fn new(name: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            country: country.into(),
        }
    }

    pub fn same_city(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

impl std::fmt::Display for RecentCity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.country.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{}, {}", self.name, self.country)
        }
    }
}

pub const MAX_RECENT_SEARCHES: usize = 5;

/// Most-recent-first list of cities, at most [`MAX_RECENT_SEARCHES`] long,
/// never holding two entries with the same (case-insensitive) name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecentSearches(Vec<RecentCity>);

impl RecentSearches {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a list from arbitrary entries, keeping the first occurrence of
    /// each name and dropping anything past capacity.
    pub fn from_entries(entries: impl IntoIterator<Item = RecentCity>) -> Self {
        let mut list: Vec<RecentCity> = Vec::with_capacity(MAX_RECENT_SEARCHES);
        for entry in entries {
            if list.len() == MAX_RECENT_SEARCHES {
                break;
            }
            if !list.iter().any(|e| e.same_city(&entry.name)) {
                list.push(entry);
            }
        }
        Self(list)
    }

    /// Returns a new list with `entry` at the front.
    pub fn with_recorded(&self, entry: RecentCity) -> Self {
        let mut rest = self.0.clone();
        rest.retain(|e| !e.same_city(&entry.name));
        Self::from_entries(std::iter::once(entry).chain(rest))
    }

    pub fn entries(&self) -> &[RecentCity] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RecentCity> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<&RecentCity> {
        self.0.first()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|e| e.same_city(name))
    }
}

impl<'a> IntoIterator for &'a RecentSearches {
    type Item = &'a RecentCity;
    type IntoIter = std::slice::Iter<'a, RecentCity>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

//! Plain-text rendering of dashboard state.

use weather_dash_core::{
    ForecastSlot, LookupState, Notification, RecentSearches, Units, WeatherSnapshot,
};

pub fn banner() -> &'static str {
    "Weather Dashboard · data provided by OpenWeatherMap"
}

pub fn progress(verb: &str, city: &str) -> String {
    format!("{verb} {}...", city.trim())
}

pub fn notification(note: &Notification) -> String {
    format!("✔ {}: {}", note.title, note.description)
}

pub fn weather_card(weather: &WeatherSnapshot, units: Units) -> String {
    let t = units.temperature_suffix();
    let speed = units.speed_suffix();
    let condition = &weather.condition;

    let mut out = format!("{}, {}\n", weather.name, weather.country);
    out.push_str(&format!(
        "  {:.0}{t}  {} ({})\n",
        weather.temperature, condition.main, condition.description
    ));
    out.push_str(&format!("  Feels like {:.0}{t}\n", weather.feels_like));
    out.push_str(&format!("  Humidity   {}%\n", weather.humidity_pct));
    out.push_str(&format!("  Wind       {:.1} {speed}\n", weather.wind_speed));
    out
}

pub fn forecast_section(slot: &ForecastSlot, units: Units) -> String {
    let t = units.temperature_suffix();
    let mut out = String::from("Forecast\n");

    match slot {
        ForecastSlot::Absent => out.push_str("  No forecast available\n"),
        ForecastSlot::Loading => out.push_str("  Loading forecast...\n"),
        ForecastSlot::Failed(reason) => {
            out.push_str(&format!("  Forecast unavailable: {reason}\n"));
        }
        ForecastSlot::Ready(forecast) => {
            let days = forecast.daily_outlook();
            if days.is_empty() {
                out.push_str("  No forecast available\n");
            }
            for entry in days {
                let day = entry.timestamp.format("%a %d %b");
                out.push_str(&format!(
                    "  {day}  {:>4.0}{t}  {}\n",
                    entry.temperature, entry.condition.description
                ));
            }
        }
    }
    out
}

pub fn state(state: &LookupState, units: Units) -> String {
    if state.is_loading() {
        return "Loading weather data...\n".to_string();
    }
    if let Some(error) = &state.error {
        return format!("Error: {error}\n");
    }

    match &state.weather {
        Some(weather) => {
            let mut out = weather_card(weather, units);
            if state.is_refreshing() {
                out.push_str("  (refreshing...)\n");
            }
            out.push('\n');
            out.push_str(&forecast_section(&state.forecast, units));
            out
        }
        None => "Search for a city to see the current weather conditions.\n".to_string(),
    }
}

pub fn recent_list(recent: &RecentSearches) -> String {
    if recent.is_empty() {
        return "No recent searches\n".to_string();
    }

    let mut out = String::from("Recent searches\n");
    for (i, city) in recent.iter().enumerate() {
        out.push_str(&format!("  {}. {city}\n", i + 1));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use weather_dash_core::{Activity, Condition, ForecastEntry, ForecastSnapshot, RecentCity};

    fn paris() -> WeatherSnapshot {
        WeatherSnapshot {
            name: "Paris".into(),
            country: "FR".into(),
            temperature: 18.4,
            feels_like: 17.6,
            humidity_pct: 64,
            wind_speed: 3.25,
            condition: Condition {
                id: 803,
                main: "Clouds".into(),
                description: "broken clouds".into(),
                icon: "04d".into(),
            },
        }
    }

    #[test]
    fn weather_card_uses_unit_suffixes() {
        let card = weather_card(&paris(), Units::Imperial);
        assert!(card.starts_with("Paris, FR\n"));
        assert!(card.contains("18°F  Clouds (broken clouds)"));
        assert!(card.contains("3.2 mph") || card.contains("3.3 mph"));
    }

    #[test]
    fn error_takes_precedence_over_empty_state() {
        let state = LookupState {
            error: Some("City \"Atlantis\" not found".into()),
            ..Default::default()
        };
        let out = super::state(&state, Units::Metric);
        assert_eq!(out, "Error: City \"Atlantis\" not found\n");
    }

    #[test]
    fn idle_without_weather_prompts_for_search() {
        let out = super::state(&LookupState::default(), Units::Metric);
        assert!(out.starts_with("Search for a city"));
    }

    #[test]
    fn loading_hides_previous_weather() {
        let state = LookupState {
            activity: Activity::Loading,
            weather: Some(paris()),
            ..Default::default()
        };
        let out = super::state(&state, Units::Metric);
        assert_eq!(out, "Loading weather data...\n");
    }

    #[test]
    fn failed_forecast_is_reported_under_weather() {
        let state = LookupState {
            weather: Some(paris()),
            forecast: ForecastSlot::Failed("boom".into()),
            ..Default::default()
        };
        let out = super::state(&state, Units::Metric);
        assert!(out.contains("Paris, FR"));
        assert!(out.contains("Forecast unavailable: boom"));
    }

    #[test]
    fn ready_forecast_lists_one_line_per_day() {
        let entry = |day: u32| ForecastEntry {
            timestamp: Utc.with_ymd_and_hms(2024, 5, day, 12, 0, 0).unwrap(),
            display_time: format!("2024-05-0{day} 12:00:00"),
            temperature: 15.0,
            feels_like: 14.0,
            humidity_pct: 50,
            wind_speed: 1.0,
            condition: Condition::unknown(),
        };
        let slot = ForecastSlot::Ready(ForecastSnapshot {
            name: "Paris".into(),
            country: "FR".into(),
            entries: vec![entry(1), entry(2), entry(3)],
        });

        let out = forecast_section(&slot, Units::Metric);
        assert_eq!(out.lines().count(), 4);
        assert!(out.contains("Wed 01 May"));
    }

    #[test]
    fn recent_list_is_numbered() {
        let recent = RecentSearches::from_entries([
            RecentCity::new("Paris", "FR"),
            RecentCity::new("Rome", "IT"),
        ]);
        assert_eq!(
            recent_list(&recent),
            "Recent searches\n  1. Paris, FR\n  2. Rome, IT\n"
        );
        assert_eq!(recent_list(&RecentSearches::new()), "No recent searches\n");
    }
}

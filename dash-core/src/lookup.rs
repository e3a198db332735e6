//! Lookup orchestration: turns a city query into dashboard state.
//!
//! A lookup fetches current conditions first and, only once that succeeded,
//! the forecast. A failed primary fetch is the only error the dashboard
//! shows; a failed forecast leaves the current conditions on screen.
//!
//! Every command takes a sequence number when it starts. Results that come
//! back after a newer command started are dropped, so the dashboard always
//! ends up showing the most recently requested city.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, info, warn};

use crate::{
    client::WeatherClient,
    error::LookupError,
    model::{ForecastSnapshot, RecentSearches, WeatherSnapshot},
    recent::RecentSearchStore,
};

/// What the primary fetch is doing right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Activity {
    #[default]
    Idle,
    /// Fresh search in flight.
    Loading,
    /// Refresh of the displayed city in flight.
    Refreshing,
}

/// Outcome of the secondary (forecast) fetch.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ForecastSlot {
    #[default]
    Absent,
    Loading,
    Ready(ForecastSnapshot),
    Failed(String),
}

/// Everything the presentation layer needs to render the dashboard.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LookupState {
    pub activity: Activity,
    pub weather: Option<WeatherSnapshot>,
    pub forecast: ForecastSlot,
    pub error: Option<String>,
}

impl LookupState {
    pub fn is_loading(&self) -> bool {
        self.activity == Activity::Loading
    }

    pub fn is_refreshing(&self) -> bool {
        self.activity == Activity::Refreshing
    }

    pub fn is_forecast_loading(&self) -> bool {
        self.forecast == ForecastSlot::Loading
    }

    pub fn forecast(&self) -> Option<&ForecastSnapshot> {
        match &self.forecast {
            ForecastSlot::Ready(forecast) => Some(forecast),
            _ => None,
        }
    }

    pub fn displayed_city(&self) -> Option<&str> {
        self.weather.as_ref().map(|w| w.name.as_str())
    }
}

/// User-facing message, e.g. a toast after a refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
}

impl Notification {
    fn refreshed(city: &str) -> Self {
        Self {
            title: "Weather Updated".to_string(),
            description: format!("Latest weather data for {city} has been loaded."),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    /// Weather is on screen (forecast may still have failed).
    Loaded,
    Failed(LookupError),
    /// A newer command started before this one finished; its results were dropped.
    Superseded,
    /// Refresh requested with nothing on screen.
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Search,
    Refresh,
}

#[derive(Debug, Default)]
struct Inner {
    state: LookupState,
    recent: RecentSearches,
    notifications: Vec<Notification>,
    latest: u64,
}

/// Owns the lookup state and the recent-search history.
#[derive(Debug)]
pub struct Dashboard {
    client: Arc<dyn WeatherClient>,
    recent_store: RecentSearchStore,
    inner: Mutex<Inner>,
}

impl Dashboard {
    /// Restores the recent-search history; unreadable history starts empty.
    pub fn new(client: Arc<dyn WeatherClient>, recent_store: RecentSearchStore) -> Self {
        let recent = recent_store.load_or_default();
        debug!(count = recent.len(), "restored recent searches");

        Self {
            client,
            recent_store,
            inner: Mutex::new(Inner {
                recent,
                ..Inner::default()
            }),
        }
    }

    pub fn state(&self) -> LookupState {
        self.lock().state.clone()
    }

    pub fn recent(&self) -> RecentSearches {
        self.lock().recent.clone()
    }

    /// Drains queued notifications, oldest first.
    pub fn take_notifications(&self) -> Vec<Notification> {
        std::mem::take(&mut self.lock().notifications)
    }

    /// Fresh search for `city`; records it in the recent history on success.
    pub async fn search(&self, city: &str) -> LookupOutcome {
        self.run(city.trim(), Mode::Search).await
    }

    /// Same as [`search`](Self::search): picking a recent city is a fresh search.
    pub async fn select_recent(&self, city: &str) -> LookupOutcome {
        self.search(city).await
    }

    /// Re-fetches the displayed city without touching the recent history.
    pub async fn refresh(&self) -> LookupOutcome {
        let Some(city) = self.lock().state.displayed_city().map(str::to_owned) else {
            debug!("refresh requested with nothing displayed");
            return LookupOutcome::Skipped;
        };
        self.run(&city, Mode::Refresh).await
    }

    async fn run(&self, city: &str, mode: Mode) -> LookupOutcome {
        let seq = self.begin(mode);
        debug!(seq, city, ?mode, "lookup started");

        let weather = match self.client.fetch_current(city).await {
            Ok(weather) => weather,
            Err(err) => return self.fail(seq, err),
        };

        {
            let mut inner = self.lock();
            if inner.latest != seq {
                debug!(seq, city, "dropping superseded weather result");
                return LookupOutcome::Superseded;
            }

            if mode == Mode::Search {
                let updated = self.recent_store.record(weather.recent_entry(), &inner.recent);
                inner.recent = updated;
            }

            inner.state.weather = Some(weather);
            inner.state.forecast = ForecastSlot::Loading;
        }

        let forecast = self.client.fetch_forecast(city).await;

        let mut inner = self.lock();
        if inner.latest != seq {
            debug!(seq, city, "dropping superseded forecast result");
            return LookupOutcome::Superseded;
        }

        inner.state.forecast = match forecast {
            Ok(forecast) => ForecastSlot::Ready(forecast),
            Err(err) => {
                warn!(city, error = %err, "forecast fetch failed");
                ForecastSlot::Failed(err.to_string())
            }
        };
        inner.state.activity = Activity::Idle;

        let shown = inner.state.displayed_city().unwrap_or(city).to_owned();
        if mode == Mode::Refresh {
            inner.notifications.push(Notification::refreshed(&shown));
        }

        info!(seq, city = %shown, ?mode, "lookup finished");
        LookupOutcome::Loaded
    }

    fn begin(&self, mode: Mode) -> u64 {
        let mut inner = self.lock();
        inner.latest += 1;
        inner.state.activity = match mode {
            Mode::Search => Activity::Loading,
            Mode::Refresh => Activity::Refreshing,
        };
        inner.state.error = None;
        inner.latest
    }

    fn fail(&self, seq: u64, err: LookupError) -> LookupOutcome {
        let mut inner = self.lock();
        if inner.latest != seq {
            debug!(seq, error = %err, "dropping superseded failure");
            return LookupOutcome::Superseded;
        }

        info!(seq, error = %err, "lookup failed");
        inner.state = LookupState {
            error: Some(err.to_string()),
            ..LookupState::default()
        };
        LookupOutcome::Failed(err)
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

//! Device and time-window selectors consumed by the filter stage.

/// Which machines to include in the filtered set.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DeviceSelector {
    /// Every machine in the working set.
    All,
    /// A single machine by id.
    Device(String),
}

impl DeviceSelector {
    /// Parse a selector token: `"all"` selects every machine, anything else
    /// is taken as a device id.
    pub fn parse(token: &str) -> Self {
        if token == "all" {
            DeviceSelector::All
        } else {
            DeviceSelector::Device(token.to_string())
        }
    }

    /// Whether a record with this device id passes the selector.
    pub fn matches(&self, device_id: &str) -> bool {
        match self {
            DeviceSelector::All => true,
            DeviceSelector::Device(id) => id == device_id,
        }
    }

    /// The selector token: `"all"` or the device id.
    pub fn token(&self) -> &str {
        match self {
            DeviceSelector::All => "all",
            DeviceSelector::Device(id) => id,
        }
    }
}

impl Default for DeviceSelector {
    fn default() -> Self {
        DeviceSelector::All
    }
}

/// Rolling time window anchored at the newest record in the working set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TimeWindow {
    /// Trailing 24 hours.
    Day,
    /// Trailing 7 days.
    Week,
    /// Trailing 30 days.
    Month,
    /// No lower bound.
    All,
}

impl TimeWindow {
    /// Parse a window token. Unknown tokens fall back to the 7-day window
    /// rather than failing.
    pub fn parse(token: &str) -> Self {
        match token {
            "24h" => TimeWindow::Day,
            "7d" => TimeWindow::Week,
            "30d" => TimeWindow::Month,
            "all" => TimeWindow::All,
            _ => TimeWindow::Week,
        }
    }

    /// Days the window bounds the filtered set to, `None` for [`All`].
    ///
    /// [`All`]: TimeWindow::All
    pub fn bound_days(&self) -> Option<f64> {
        match self {
            TimeWindow::Day => Some(1.0),
            TimeWindow::Week => Some(7.0),
            TimeWindow::Month => Some(30.0),
            TimeWindow::All => None,
        }
    }

    /// Days used as the availability denominator in idle/active splits.
    ///
    /// `All` reports 7 here: an unbounded window has no finite span, so the
    /// split falls back to a week of available time.
    pub fn span_days(&self) -> f64 {
        self.bound_days().unwrap_or(7.0)
    }

    /// The selector token for this window.
    pub fn token(&self) -> &'static str {
        match self {
            TimeWindow::Day => "24h",
            TimeWindow::Week => "7d",
            TimeWindow::Month => "30d",
            TimeWindow::All => "all",
        }
    }
}

impl Default for TimeWindow {
    fn default() -> Self {
        TimeWindow::Week
    }
}

use chrono::Local;
use weather_core::{ViewState, WeatherSummary};

const INITIAL_TITLE: &str = "No City Selected";
const INITIAL_SUBTITLE: &str = "Please Search For A City";

/// Human-friendly text for one view state.
pub fn render(view: &ViewState, summary: Option<&WeatherSummary>) -> String {
    match (view, summary) {
        (ViewState::Initial, _) => format!("{INITIAL_TITLE}\n{INITIAL_SUBTITLE}"),
        (ViewState::Loading, _) => "Searching...".to_string(),
        (ViewState::Error(message), _) => message.clone(),
        (ViewState::Loaded, Some(s)) => compact(s),
        (ViewState::Detailed, Some(s)) => detailed(s),
        (ViewState::Loaded | ViewState::Detailed, None) => {
            format!("{INITIAL_TITLE}\n{INITIAL_SUBTITLE}")
        }
    }
}

fn compact(s: &WeatherSummary) -> String {
    format!("{}  {}°", s.location_name, s.temperature_celsius)
}

fn detailed(s: &WeatherSummary) -> String {
    let mut lines = vec![
        format!("{}  {}°", s.location_name, s.temperature_celsius),
        format!(
            "Humidity {}%   UV {}   Feels Like {}°",
            s.humidity_percent, s.uv_index, s.feels_like_celsius
        ),
    ];

    if let Some(icon) = s.icon_https_url() {
        lines.push(format!("Icon: {icon}"));
    }
    if let Some(at) = s.fetched_at() {
        lines.push(format!("Updated {}", at.with_timezone(&Local).format("%Y-%m-%d %H:%M")));
    }

    lines.join("\n")
}

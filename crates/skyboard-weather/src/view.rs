//! View data derived from the dashboard state, plus a plain-text rendering.
//!
//! Nothing here holds state; each function re-derives from whatever city
//! array is current.

use crate::dashboard::Dashboard;
use crate::history::date_label;
use crate::storage::Storage;
use crate::types::{CityWeather, ForecastPoint, HistoricalPoint};

/// Number of forecast points shown
pub const FORECAST_DAYS: usize = 7;

const BAR_WIDTH: usize = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct CityCard {
    pub city: String,
    pub country: String,
    pub temperature: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub precipitation: f64,
    pub condition: String,
    pub is_selected: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TemperatureBar {
    pub city: String,
    pub temperature: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapMarker {
    pub city: String,
    pub lat: f64,
    pub lon: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrendSeries {
    pub labels: Vec<String>,
    /// One entry per city, values aligned with `labels`. Days without a
    /// value for that city are `None`.
    pub series: Vec<(String, Vec<Option<f64>>)>,
}

pub fn city_cards(cities: &[CityWeather], selected: &str) -> Vec<CityCard> {
    cities
        .iter()
        .map(|c| CityCard {
            city: c.city.clone(),
            country: c.country.clone(),
            temperature: c.temperature,
            humidity: c.humidity,
            wind_speed: c.wind_speed,
            precipitation: c.precipitation,
            condition: c.condition.clone(),
            is_selected: c.city == selected,
        })
        .collect()
}

pub fn temperature_bars(cities: &[CityWeather]) -> Vec<TemperatureBar> {
    cities
        .iter()
        .map(|c| TemperatureBar {
            city: c.city.clone(),
            temperature: c.temperature,
        })
        .collect()
}

pub fn map_markers(cities: &[CityWeather]) -> Vec<MapMarker> {
    cities
        .iter()
        .map(|c| MapMarker {
            city: c.city.clone(),
            lat: c.lat,
            lon: c.lon,
            label: format!("{}: {}°C", c.city, c.temperature),
        })
        .collect()
}

pub fn trend_series(points: &[HistoricalPoint], cities: &[String]) -> TrendSeries {
    TrendSeries {
        labels: points.iter().map(|p| p.date.clone()).collect(),
        series: cities
            .iter()
            .map(|city| (city.clone(), points.iter().map(|p| p.value(city)).collect()))
            .collect(),
    }
}

/// The last `FORECAST_DAYS` points
pub fn forecast_window(points: &[ForecastPoint]) -> &[ForecastPoint] {
    &points[points.len().saturating_sub(FORECAST_DAYS)..]
}

fn forecast_label(point: &ForecastPoint) -> String {
    point
        .day()
        .map(date_label)
        .unwrap_or_else(|| point.ds.clone())
}

fn bar(value: f64, max: f64) -> String {
    if max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let len = ((value / max) * BAR_WIDTH as f64).round() as usize;
    "█".repeat(len.min(BAR_WIDTH))
}

/// Join rendered lines into one block ending in a newline.
fn block(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

pub fn render_card<S: Storage>(dashboard: &Dashboard<S>) -> String {
    let Some(c) = dashboard.selected_city() else {
        return block(vec!["No weather data".to_string()]);
    };
    block(vec![
        format!("Current Weather - {}, {}", c.city, c.country),
        format!("  Temperature:   {}°C", c.temperature),
        format!("  Humidity:      {}%", c.humidity),
        format!("  Wind Speed:    {} m/s", c.wind_speed),
        format!("  Precipitation: {} mm", c.precipitation),
        format!("  Condition:     {}", c.condition),
    ])
}

pub fn render_cities<S: Storage>(dashboard: &Dashboard<S>) -> String {
    let mut lines = vec![format!("Cities ({})", dashboard.source().description())];
    lines.extend(
        city_cards(dashboard.cities(), dashboard.selected_name())
            .into_iter()
            .map(|card| {
                format!(
                    "{} {:<12} {:<10} {:>6.1}°C {:>5.0}% {:>5.1} m/s {:>5.1} mm  {}",
                    if card.is_selected { '*' } else { ' ' },
                    card.city,
                    card.country,
                    card.temperature,
                    card.humidity,
                    card.wind_speed,
                    card.precipitation,
                    card.condition
                )
            }),
    );
    block(lines)
}

pub fn render_comparison(cities: &[CityWeather]) -> String {
    let bars = temperature_bars(cities);
    let max = bars.iter().map(|b| b.temperature).fold(0.0_f64, f64::max);
    let mut lines = vec!["Temperature Comparison".to_string()];
    lines.extend(bars.iter().map(|b| {
        format!(
            "  {:<12} {:>6.1}°C {}",
            b.city,
            b.temperature,
            bar(b.temperature, max)
        )
    }));
    block(lines)
}

pub fn render_forecast<S: Storage>(dashboard: &Dashboard<S>) -> String {
    let window = forecast_window(dashboard.forecast());
    let mut lines = vec![format!(
        "{}-Day Forecast - {}",
        FORECAST_DAYS,
        dashboard.selected_name()
    )];
    if window.is_empty() {
        lines.push("  No forecast available".to_string());
        return block(lines);
    }
    let max = window.iter().map(|p| p.yhat).fold(0.0_f64, f64::max);
    lines.extend(window.iter().map(|p| {
        format!(
            "  {:<8} {:>6.1}°C ({:.1} to {:.1}) {}",
            forecast_label(p),
            p.yhat,
            p.yhat_lower,
            p.yhat_upper,
            bar(p.yhat, max)
        )
    }));
    block(lines)
}

fn trend_line(city: &str, values: &[Option<f64>]) -> String {
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    if present.is_empty() {
        return format!("  {:<12} no data", city);
    }
    let min = present.iter().copied().fold(f64::INFINITY, f64::min);
    let max = present.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let avg = present.iter().sum::<f64>() / present.len() as f64;
    format!(
        "  {:<12} min {:>5.1}  avg {:>5.1}  max {:>5.1}",
        city, min, avg, max
    )
}

pub fn render_history<S: Storage>(dashboard: &Dashboard<S>) -> String {
    let names: Vec<String> = dashboard.cities().iter().map(|c| c.city.clone()).collect();
    let trends = trend_series(dashboard.historical(), &names);
    let header = match (trends.labels.first(), trends.labels.last()) {
        (Some(first), Some(last)) => format!("Temperature Trends ({} to {})", first, last),
        _ => "Temperature Trends".to_string(),
    };
    let mut lines = vec![header];
    lines.extend(
        trends
            .series
            .iter()
            .map(|(city, values)| trend_line(city, values)),
    );
    block(lines)
}

pub fn render_map<S: Storage>(dashboard: &Dashboard<S>) -> String {
    let mut lines = vec!["Map Markers".to_string()];
    lines.extend(
        map_markers(dashboard.cities())
            .into_iter()
            .map(|m| format!("  ({:>8.4}, {:>9.4})  {}", m.lat, m.lon, m.label)),
    );
    block(lines)
}

/// Full report: selected card, comparison, forecast, trends, markers.
pub fn render_text<S: Storage>(dashboard: &Dashboard<S>) -> String {
    [
        format!("Global Weather Dashboard ({})\n", dashboard.source().description()),
        render_card(dashboard),
        render_comparison(dashboard.cities()),
        render_forecast(dashboard),
        render_history(dashboard),
        render_map(dashboard),
    ]
    .join("\n")
}

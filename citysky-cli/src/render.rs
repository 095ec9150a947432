use chrono::{DateTime, Local};
use citysky_core::{ConditionKind, GeoCandidate, SearchHistory, Theme, WeatherSnapshot};
use console::Style;

/// Colours for one theme.
struct Palette {
    heading: Style,
    muted: Style,
    accent: Style,
    error: Style,
}

impl Palette {
    fn for_theme(theme: Theme) -> Self {
        if theme.is_dark() {
            Self {
                heading: Style::new().bold().white(),
                muted: Style::new().white().dim(),
                accent: Style::new().magenta(),
                error: Style::new().red().bright(),
            }
        } else {
            Self {
                heading: Style::new().bold().black(),
                muted: Style::new().black().dim(),
                accent: Style::new().cyan(),
                error: Style::new().red(),
            }
        }
    }
}

fn glyph(kind: ConditionKind, is_day: bool) -> &'static str {
    match kind {
        ConditionKind::Clear if is_day => "☀",
        ConditionKind::Clear => "☾",
        ConditionKind::Rain => "🌧",
        ConditionKind::Snow => "❄",
        ConditionKind::Clouds => "☁",
        ConditionKind::Mist => "🌫",
    }
}

/// Nearest whole degree, halves rounded up towards +inf.
fn whole_degrees(celsius: f64) -> i64 {
    (celsius + 0.5).floor() as i64
}

pub fn weather_card(
    snapshot: &WeatherSnapshot,
    theme: Theme,
    is_day: bool,
    today: DateTime<Local>,
) -> String {
    let p = Palette::for_theme(theme);

    let metrics = [
        ("Humidity", format!("{}%", snapshot.humidity_pct)),
        ("Wind Speed", format!("{:.1} km/h", snapshot.wind_speed_kmh())),
        ("Pressure", format!("{} hPa", snapshot.pressure_hpa)),
        ("Feels Like", format!("{}°C", whole_degrees(snapshot.feels_like_c))),
    ];

    let mut out = String::new();
    out.push_str(&format!(
        "{}  {}\n",
        p.heading.apply_to(format!("{}, {}", snapshot.location_name, snapshot.country)),
        glyph(snapshot.condition_kind(), is_day),
    ));
    out.push_str(&format!("{}\n\n", p.muted.apply_to(today.format("%A, %b %-d"))));
    let temperature = format!("{}°C", whole_degrees(snapshot.temperature_c));
    out.push_str(&format!("{}\n", p.heading.apply_to(temperature)));
    out.push_str(&format!("{}\n\n", p.muted.apply_to(&snapshot.condition.description)));

    for (label, value) in metrics {
        out.push_str(&format!("  {}{value}\n", p.accent.apply_to(format!("{label:<12}"))));
    }

    out
}

pub fn error_banner(message: &str, theme: Theme) -> String {
    Palette::for_theme(theme).error.apply_to(format!("⚠️ {message}")).to_string()
}

pub fn history(history: &SearchHistory, theme: Theme) -> Option<String> {
    if history.is_empty() {
        return None;
    }

    let p = Palette::for_theme(theme);
    let entries = history
        .iter()
        .enumerate()
        .map(|(i, city)| format!("[{i}] {}", p.accent.apply_to(city)))
        .collect::<Vec<_>>()
        .join("  ");

    Some(format!("{} {entries}", p.muted.apply_to("Recent Searches:")))
}

pub fn suggestion_lines(candidates: &[GeoCandidate]) -> Vec<String> {
    candidates.iter().map(GeoCandidate::label).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use citysky_core::model::Condition;

    fn snapshot() -> WeatherSnapshot {
        WeatherSnapshot {
            location_name: "Reykjavik".into(),
            country: "IS".into(),
            sunrise: 0,
            sunset: 1,
            observation_time: Utc::now(),
            temperature_c: -2.4,
            feels_like_c: -7.6,
            humidity_pct: 64,
            pressure_hpa: 998,
            wind_speed_mps: 7.5,
            condition: Condition { main: "Clear".into(), description: "clear sky".into() },
        }
    }

    #[test]
    fn card_shows_rounded_and_converted_metrics() {
        console::set_colors_enabled(false);
        let today = Local.with_ymd_and_hms(2026, 1, 5, 12, 0, 0).unwrap();

        let card = weather_card(&snapshot(), Theme::Light, false, today);

        assert!(card.contains("Reykjavik, IS"));
        assert!(card.contains("☾"));
        assert!(card.contains("Monday, Jan 5"));
        assert!(card.contains("-2°C"));
        assert!(card.contains("27.0 km/h"));
        assert!(card.contains("998 hPa"));
        assert!(card.contains("-8°C"));
        assert!(card.contains("64%"));
    }

    #[test]
    fn history_is_hidden_when_empty() {
        assert!(history(&SearchHistory::new(), Theme::Dark).is_none());

        console::set_colors_enabled(false);
        let mut h = SearchHistory::new();
        h.record("Oslo");
        h.record("Bergen");
        let line = history(&h, Theme::Dark).unwrap();
        assert!(line.contains("[0] Bergen"));
        assert!(line.contains("[1] Oslo"));
    }

    #[test]
    fn halves_round_up_towards_positive() {
        assert_eq!(whole_degrees(-0.4), 0);
        assert_eq!(whole_degrees(-0.5), 0);
        assert_eq!(whole_degrees(-2.5), -2);
        assert_eq!(whole_degrees(2.5), 3);
        assert_eq!(whole_degrees(-2.6), -3);
    }

    #[test]
    fn dark_theme_uses_its_own_palette() {
        let dark = Palette::for_theme(Theme::Dark);
        let light = Palette::for_theme(Theme::Light);
        assert_ne!(dark.heading, light.heading);
        assert_ne!(dark.accent, light.accent);
        assert_eq!(Palette::for_theme(Theme::default()).accent, light.accent);
    }

    #[test]
    fn day_and_night_clear_glyphs_differ() {
        assert_ne!(glyph(ConditionKind::Clear, true), glyph(ConditionKind::Clear, false));
        assert_eq!(glyph(ConditionKind::Rain, false), glyph(ConditionKind::Rain, true));
    }
}

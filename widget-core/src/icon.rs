use serde::{Deserialize, Serialize};

use crate::error::IconLookupError;

/// Icon category drawn next to a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IconRef {
    #[default]
    ClearDay,
    ClearNight,
    PartlyCloudyDay,
    PartlyCloudyNight,
    Cloudy,
    Fog,
    Drizzle,
    Rain,
    HeavyRain,
    Sleet,
    Snow,
    Thunderstorm,
}

impl IconRef {
    /// Drawable resource name the host resolves.
    pub fn resource_name(&self) -> &'static str {
        match self {
            IconRef::ClearDay => "ic_weather_clear_day",
            IconRef::ClearNight => "ic_weather_clear_night",
            IconRef::PartlyCloudyDay => "ic_weather_partly_cloudy_day",
            IconRef::PartlyCloudyNight => "ic_weather_partly_cloudy_night",
            IconRef::Cloudy => "ic_weather_cloudy",
            IconRef::Fog => "ic_weather_fog",
            IconRef::Drizzle => "ic_weather_drizzle",
            IconRef::Rain => "ic_weather_rain",
            IconRef::HeavyRain => "ic_weather_heavy_rain",
            IconRef::Sleet => "ic_weather_sleet",
            IconRef::Snow => "ic_weather_snow",
            IconRef::Thunderstorm => "ic_weather_thunderstorm",
        }
    }

    pub const fn all() -> &'static [IconRef] {
        &[
            IconRef::ClearDay,
            IconRef::ClearNight,
            IconRef::PartlyCloudyDay,
            IconRef::PartlyCloudyNight,
            IconRef::Cloudy,
            IconRef::Fog,
            IconRef::Drizzle,
            IconRef::Rain,
            IconRef::HeavyRain,
            IconRef::Sleet,
            IconRef::Snow,
            IconRef::Thunderstorm,
        ]
    }
}

impl std::fmt::Display for IconRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.resource_name())
    }
}

/// Maps a weather code and day flag to an icon.
///
/// Implementations may fail (or even panic); the renderer contains both.
/// Lookups must stay in memory: they run once per visible row.
pub trait IconLookup: Send + Sync {
    fn lookup(&self, weather_code: i32, is_day: bool) -> Result<IconRef, IconLookupError>;
}

impl<F> IconLookup for F
where
    F: Fn(i32, bool) -> Result<IconRef, IconLookupError> + Send + Sync,
{
    fn lookup(&self, weather_code: i32, is_day: bool) -> Result<IconRef, IconLookupError> {
        self(weather_code, is_day)
    }
}

/// Default lookup over WMO weather interpretation codes.
/// See: https://open-meteo.com/en/docs#weathervariables
#[derive(Debug, Clone, Copy, Default)]
pub struct WmoIconLookup;

impl IconLookup for WmoIconLookup {
    fn lookup(&self, weather_code: i32, is_day: bool) -> Result<IconRef, IconLookupError> {
        let icon = match weather_code {
            0 if is_day => IconRef::ClearDay,
            0 => IconRef::ClearNight,
            1 | 2 if is_day => IconRef::PartlyCloudyDay,
            1 | 2 => IconRef::PartlyCloudyNight,
            3 => IconRef::Cloudy,
            45 | 48 => IconRef::Fog,
            51 | 53 | 55 => IconRef::Drizzle,
            56 | 57 | 66 | 67 => IconRef::Sleet, // freezing drizzle / rain
            61 | 63 | 80 => IconRef::Rain,
            65 | 81 | 82 => IconRef::HeavyRain,
            71 | 73 | 75 | 77 | 85 | 86 => IconRef::Snow,
            95 | 96 | 99 => IconRef::Thunderstorm,
            // Unknown codes fall back to clear sky
            _ if is_day => IconRef::ClearDay,
            _ => IconRef::ClearNight,
        };

        Ok(icon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_sky_follows_day_flag() {
        assert_eq!(WmoIconLookup.lookup(0, true), Ok(IconRef::ClearDay));
        assert_eq!(WmoIconLookup.lookup(0, false), Ok(IconRef::ClearNight));
    }

    #[test]
    fn partly_cloudy_follows_day_flag() {
        assert_eq!(WmoIconLookup.lookup(1, true), Ok(IconRef::PartlyCloudyDay));
        assert_eq!(WmoIconLookup.lookup(2, false), Ok(IconRef::PartlyCloudyNight));
    }

    #[test]
    fn precipitation_codes() {
        assert_eq!(WmoIconLookup.lookup(53, true), Ok(IconRef::Drizzle));
        assert_eq!(WmoIconLookup.lookup(63, true), Ok(IconRef::Rain));
        assert_eq!(WmoIconLookup.lookup(82, false), Ok(IconRef::HeavyRain));
        assert_eq!(WmoIconLookup.lookup(66, true), Ok(IconRef::Sleet));
        assert_eq!(WmoIconLookup.lookup(75, true), Ok(IconRef::Snow));
        assert_eq!(WmoIconLookup.lookup(99, false), Ok(IconRef::Thunderstorm));
    }

    #[test]
    fn unknown_codes_default_to_clear() {
        assert_eq!(WmoIconLookup.lookup(999, true), Ok(IconRef::ClearDay));
        assert_eq!(WmoIconLookup.lookup(-1, false), Ok(IconRef::ClearNight));
    }

    #[test]
    fn closures_are_lookups() {
        let always_fog = |_: i32, _: bool| Ok::<_, IconLookupError>(IconRef::Fog);
        assert_eq!(always_fog.lookup(0, true), Ok(IconRef::Fog));
    }

    #[test]
    fn display_respects_width() {
        assert_eq!(format!("{:<16}|", IconRef::Fog), "ic_weather_fog  |");
    }

    #[test]
    fn resource_names_are_unique() {
        let mut names: Vec<_> = IconRef::all().iter().map(IconRef::resource_name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), IconRef::all().len());
    }
}

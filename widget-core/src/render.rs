//! Record-to-row mapping.
//!
//! [`ItemViewRenderer::render`] is total: any failure while building a row,
//! including a failing or panicking icon lookup, yields the fallback row.
//! A contained panic still runs the process panic hook, so with the default
//! hook its message is printed to stderr next to the logged error.

use std::{
    panic::{self, AssertUnwindSafe},
    sync::Arc,
};

use serde::{Deserialize, Serialize};

use crate::{
    error::RenderError,
    icon::{IconLookup, IconRef, WmoIconLookup},
    model::{ClickPayload, RowDescriptor, RowKind, WeatherRecord},
};

pub const DEGREE_SUFFIX: char = '°';

/// Shown where no temperature is available (fallback and placeholder rows).
pub const BLANK_TEMPERATURE: &str = "--°";

/// Localized strings used by the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RowLabels {
    /// Name shown when a record has no location name.
    pub unknown_location: String,
    /// Name shown on rows that failed to render.
    pub error_loading: String,
}

impl Default for RowLabels {
    fn default() -> Self {
        Self {
            unknown_location: "Unknown".to_string(),
            error_loading: "Error loading".to_string(),
        }
    }
}

/// Maps records to rows for a list provider.
pub trait RowRenderer: Send + Sync {
    fn render(&self, record: &WeatherRecord) -> RowDescriptor;

    /// Row used when rendering a record failed.
    fn fallback_row(&self) -> RowDescriptor;
}

#[derive(Clone)]
pub struct ItemViewRenderer {
    icons: Arc<dyn IconLookup>,
    labels: RowLabels,
}

impl std::fmt::Debug for ItemViewRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItemViewRenderer").field("labels", &self.labels).finish_non_exhaustive()
    }
}

impl Default for ItemViewRenderer {
    fn default() -> Self {
        Self::new(Arc::new(WmoIconLookup), RowLabels::default())
    }
}

impl ItemViewRenderer {
    pub fn new(icons: Arc<dyn IconLookup>, labels: RowLabels) -> Self {
        Self { icons, labels }
    }

    pub fn labels(&self) -> &RowLabels {
        &self.labels
    }

    /// Render one record, substituting the fallback row on any failure.
    pub fn render(&self, record: &WeatherRecord) -> RowDescriptor {
        match self.try_render(record) {
            Ok(row) => row,
            Err(err) => {
                tracing::error!(
                    location = record.location_name.as_deref().unwrap_or("<none>"),
                    "Failed to render widget row: {err}"
                );
                self.fallback_row()
            }
        }
    }

    /// Render one record, reporting why it could not be rendered.
    pub fn try_render(&self, record: &WeatherRecord) -> Result<RowDescriptor, RenderError> {
        let resolved = record.resolve(&self.labels.unknown_location);
        let icon = self.lookup_icon(resolved.weather_code, resolved.is_day)?;

        Ok(RowDescriptor {
            kind: RowKind::Item,
            display_temperature: format_temperature(resolved.temperature),
            display_name: resolved.location_name,
            display_description: resolved.description,
            icon,
            click_payload: Some(ClickPayload::default()),
        })
    }

    /// Row substituted for a record that failed to render.
    pub fn fallback_row(&self) -> RowDescriptor {
        RowDescriptor {
            kind: RowKind::Fallback,
            display_name: self.labels.error_loading.clone(),
            display_temperature: BLANK_TEMPERATURE.to_string(),
            display_description: String::new(),
            icon: IconRef::default(),
            click_payload: None,
        }
    }

    fn lookup_icon(&self, weather_code: i32, is_day: bool) -> Result<IconRef, RenderError> {
        let icons = &self.icons;
        match panic::catch_unwind(AssertUnwindSafe(|| icons.lookup(weather_code, is_day))) {
            Ok(result) => Ok(result?),
            Err(payload) => Err(RenderError::IconPanicked(panic_message(payload.as_ref()))),
        }
    }
}

impl RowRenderer for ItemViewRenderer {
    fn render(&self, record: &WeatherRecord) -> RowDescriptor {
        ItemViewRenderer::render(self, record)
    }

    fn fallback_row(&self) -> RowDescriptor {
        ItemViewRenderer::fallback_row(self)
    }
}

/// Blank row returned for positions outside the current list.
pub fn placeholder_row() -> RowDescriptor {
    RowDescriptor {
        kind: RowKind::Placeholder,
        display_name: String::new(),
        display_temperature: BLANK_TEMPERATURE.to_string(),
        display_description: String::new(),
        icon: IconRef::default(),
        click_payload: None,
    }
}

/// Whole degrees, rounded half away from zero. Non-finite values show as `0°`.
pub fn format_temperature(celsius: f64) -> String {
    let whole = if celsius.is_finite() { celsius.round() as i64 } else { 0 };
    format!("{whole}{DEGREE_SUFFIX}")
}

pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IconLookupError;

    fn record(name: &str, temperature: f64, code: i32, is_day: bool) -> WeatherRecord {
        WeatherRecord {
            location_name: Some(name.to_string()),
            temperature: Some(temperature),
            weather_code: Some(code),
            is_day: Some(is_day),
            description: Some("Overcast".to_string()),
        }
    }

    #[test]
    fn renders_complete_record() {
        let row = ItemViewRenderer::default().render(&record("Lima", 18.6, 3, true));

        assert_eq!(row.kind, RowKind::Item);
        assert_eq!(row.display_name, "Lima");
        assert_eq!(row.display_temperature, "19°");
        assert_eq!(row.display_description, "Overcast");
        assert_eq!(row.icon, IconRef::Cloudy);
        assert_eq!(row.click_payload, Some(ClickPayload::default()));
    }

    #[test]
    fn all_absent_record_renders_defaults() {
        let row = ItemViewRenderer::default().render(&WeatherRecord::default());

        assert_eq!(row.kind, RowKind::Item);
        assert_eq!(row.display_name, "Unknown");
        assert_eq!(row.display_temperature, "0°");
        assert_eq!(row.display_description, "");
        assert_eq!(row.icon, IconRef::ClearDay);
    }

    #[test]
    fn unknown_label_is_localizable() {
        let labels = RowLabels {
            unknown_location: "Desconocido".into(),
            error_loading: "Error al cargar".into(),
        };
        let renderer = ItemViewRenderer::new(Arc::new(WmoIconLookup), labels);

        assert_eq!(renderer.render(&WeatherRecord::default()).display_name, "Desconocido");
        assert_eq!(renderer.fallback_row().display_name, "Error al cargar");
    }

    #[test]
    fn failing_lookup_yields_fallback_row() {
        let lookup = |code: i32, is_day: bool| -> Result<IconRef, IconLookupError> {
            Err(IconLookupError::UnknownCode { code, is_day })
        };
        let renderer = ItemViewRenderer::new(Arc::new(lookup), RowLabels::default());

        let row = renderer.render(&record("Lima", 20.0, 61, true));

        assert_eq!(row.kind, RowKind::Fallback);
        assert_eq!(row.display_name, "Error loading");
        assert_eq!(row.display_description, "");
        assert_eq!(row.icon, IconRef::default());
        assert_eq!(row.click_payload, None);

        let err = renderer.try_render(&record("Lima", 20.0, 61, true)).unwrap_err();
        assert_eq!(err, RenderError::Icon(IconLookupError::UnknownCode { code: 61, is_day: true }));
    }

    #[test]
    fn panicking_lookup_yields_fallback_row() {
        let lookup = |_: i32, _: bool| -> Result<IconRef, IconLookupError> {
            panic!("icon table not loaded")
        };
        let renderer = ItemViewRenderer::new(Arc::new(lookup), RowLabels::default());

        let err = renderer.try_render(&record("Lima", 20.0, 0, true)).unwrap_err();
        assert_eq!(err, RenderError::IconPanicked("icon table not loaded".into()));
        assert_eq!(renderer.render(&record("Lima", 20.0, 0, true)).kind, RowKind::Fallback);
    }

    #[test]
    fn temperature_rounds_to_whole_degrees() {
        assert_eq!(format_temperature(0.0), "0°");
        assert_eq!(format_temperature(21.5), "22°");
        assert_eq!(format_temperature(21.49), "21°");
        assert_eq!(format_temperature(-2.5), "-3°");
        assert_eq!(format_temperature(-0.4), "0°");
    }

    #[test]
    fn non_finite_temperature_renders_zero() {
        assert_eq!(format_temperature(f64::NAN), "0°");
        assert_eq!(format_temperature(f64::INFINITY), "0°");
    }

    #[test]
    fn every_row_kind_carries_degree_suffix() {
        let renderer = ItemViewRenderer::default();
        for row in [renderer.fallback_row(), placeholder_row()] {
            assert!(row.display_temperature.ends_with(DEGREE_SUFFIX));
        }
    }
}

//! Host registration and refresh handling.
//!
//! The coordinator is stateless: it builds view templates, hands them to the
//! host and asks the host to mark list content stale. Data loading belongs to
//! [`WidgetListDataProvider`].

use serde::{Deserialize, Serialize};

use crate::{
    model::ClickPayload,
    provider::WidgetListDataProvider,
    render::ItemViewRenderer,
    store::{CACHE_KEY, KeyValueStore},
};

pub type WidgetId = i32;

/// Broadcast action that asks widgets to refresh.
pub const WIDGET_UPDATE_ACTION: &str = "appwidget.action.APPWIDGET_UPDATE";

/// Component name the host registers this widget type under.
pub const WIDGET_COMPONENT: &str = "weather_widget";
/// Service that hands out list providers.
pub const LIST_SERVICE: &str = "weather_widget_service";

pub const WIDGET_LAYOUT: &str = "widget_layout";
pub const LIST_VIEW: &str = "widget_list_view";
pub const EMPTY_VIEW: &str = "widget_empty_view";
pub const ITEM_LAYOUT: &str = "widget_list_item";
pub const ITEM_ROOT: &str = "widget_item_root";

/// Points a list view at the service that builds its provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdapterBinding {
    pub widget_id: WidgetId,
    pub service: String,
    /// Unique per widget, so the host keeps one provider per instance
    /// instead of sharing one across all placed widgets.
    pub data_uri: String,
}

impl AdapterBinding {
    pub fn for_widget(widget_id: WidgetId) -> Self {
        Self {
            widget_id,
            service: LIST_SERVICE.to_string(),
            data_uri: format!("widget://{LIST_SERVICE}/{widget_id}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClickTarget {
    PrimaryApp,
}

/// Action template shared by every row; rows merge their payload into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickTemplate {
    pub target: ClickTarget,
    pub request_code: i32,
    pub update_current: bool,
    /// Rows may fill in extras.
    pub mutable: bool,
    pub payload: Option<ClickPayload>,
}

impl Default for ClickTemplate {
    fn default() -> Self {
        Self {
            target: ClickTarget::PrimaryApp,
            request_code: 0,
            update_current: true,
            mutable: true,
            payload: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewTemplate {
    pub layout: String,
    pub list_view: String,
    pub adapter: AdapterBinding,
    pub empty_view: String,
    pub click_template: ClickTemplate,
}

impl ViewTemplate {
    pub fn for_widget(widget_id: WidgetId) -> Self {
        Self {
            layout: WIDGET_LAYOUT.to_string(),
            list_view: LIST_VIEW.to_string(),
            adapter: AdapterBinding::for_widget(widget_id),
            empty_view: EMPTY_VIEW.to_string(),
            click_template: ClickTemplate::default(),
        }
    }
}

/// System event delivered to the widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEvent {
    pub action: String,
}

impl HostEvent {
    pub fn new(action: impl Into<String>) -> Self {
        Self { action: action.into() }
    }

    pub fn widget_update() -> Self {
        Self::new(WIDGET_UPDATE_ACTION)
    }

    pub fn is_widget_update(&self) -> bool {
        self.action == WIDGET_UPDATE_ACTION
    }
}

/// Operations the host shell exposes to the coordinator.
pub trait WidgetHost {
    /// Ids of the placed widgets registered under `component`.
    fn widget_ids(&self, component: &str) -> Vec<WidgetId>;

    fn update_widget(&self, widget_id: WidgetId, template: ViewTemplate);

    /// Mark list content stale; the host then reloads each affected provider.
    fn notify_list_data_changed(&self, widget_ids: &[WidgetId], list_view: &str);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WidgetUpdateCoordinator;

impl WidgetUpdateCoordinator {
    /// (Re)register the view template of each widget.
    pub fn on_update<H: WidgetHost + ?Sized>(&self, host: &H, widget_ids: &[WidgetId]) {
        for &widget_id in widget_ids {
            host.update_widget(widget_id, ViewTemplate::for_widget(widget_id));
        }
    }

    /// Handle a host event. Returns whether the event was a widget update.
    pub fn on_refresh_signal<H: WidgetHost + ?Sized>(&self, host: &H, event: &HostEvent) -> bool {
        if !event.is_widget_update() {
            tracing::trace!(action = %event.action, "Ignoring host event");
            return false;
        }

        let widget_ids = host.widget_ids(WIDGET_COMPONENT);
        tracing::debug!(?widget_ids, "Refreshing weather widgets");

        self.on_update(host, &widget_ids);
        host.notify_list_data_changed(&widget_ids, LIST_VIEW);

        true
    }
}

/// Hands out one fresh provider per adapter binding.
///
/// Providers share the store handle but never their list state.
#[derive(Debug, Clone)]
pub struct ListService<S> {
    store: S,
    renderer: ItemViewRenderer,
    cache_key: String,
}

impl<S: KeyValueStore + Clone> ListService<S> {
    pub fn new(store: S, renderer: ItemViewRenderer) -> Self {
        Self::with_cache_key(store, renderer, CACHE_KEY)
    }

    pub fn with_cache_key(store: S, renderer: ItemViewRenderer, cache_key: &str) -> Self {
        Self { store, renderer, cache_key: cache_key.to_string() }
    }

    pub fn provider_for(&self, binding: &AdapterBinding) -> WidgetListDataProvider<S> {
        tracing::debug!(widget_id = binding.widget_id, "Creating widget list provider");
        WidgetListDataProvider::with_cache_key(
            self.store.clone(),
            self.renderer.clone(),
            &self.cache_key,
        )
    }
}

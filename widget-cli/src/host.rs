use std::{collections::BTreeMap, sync::Arc};

use parking_lot::Mutex;
use weather_widget_core::{
    KeyValueStore, ListAdapter, ListService, RowDescriptor, ViewTemplate, WidgetHost, WidgetId,
    WidgetListDataProvider,
};

/// Host shell stand-in that keeps one list provider per placed widget.
pub struct ConsoleHost<S> {
    placed: Vec<WidgetId>,
    service: ListService<S>,
    lists: Mutex<BTreeMap<WidgetId, Arc<WidgetListDataProvider<S>>>>,
}

impl<S: KeyValueStore + Clone> ConsoleHost<S> {
    pub fn new(service: ListService<S>, placed: Vec<WidgetId>) -> Self {
        Self { placed, service, lists: Mutex::new(BTreeMap::new()) }
    }

    /// Rows currently shown by a widget, or `None` if it was never registered.
    pub fn rows(&self, widget_id: WidgetId) -> Option<Vec<RowDescriptor>> {
        let list = self.lists.lock().get(&widget_id).cloned()?;
        Some((0..list.count()).map(|i| list.row_at(i as i32)).collect())
    }

    pub fn placed(&self) -> &[WidgetId] {
        &self.placed
    }

    /// Tear down every registered list.
    pub fn shutdown(&self) {
        for (_, list) in std::mem::take(&mut *self.lists.lock()) {
            list.on_destroy();
        }
    }
}

impl<S: KeyValueStore + Clone> WidgetHost for ConsoleHost<S> {
    fn widget_ids(&self, _component: &str) -> Vec<WidgetId> {
        self.placed.clone()
    }

    fn update_widget(&self, widget_id: WidgetId, template: ViewTemplate) {
        tracing::debug!(widget_id, uri = %template.adapter.data_uri, "Widget template registered");
        self.lists.lock().entry(widget_id).or_insert_with(|| {
            let list = self.service.provider_for(&template.adapter);
            list.on_create();
            Arc::new(list)
        });
    }

    fn notify_list_data_changed(&self, widget_ids: &[WidgetId], _list_view: &str) {
        for widget_id in widget_ids {
            let list = self.lists.lock().get(widget_id).cloned();
            if let Some(list) = list {
                list.on_data_set_changed();
            }
        }
    }
}

pub fn format_row(row: &RowDescriptor) -> String {
    format!(
        "{:<30} {:<20} {:>5}  {}",
        row.icon,
        row.display_name,
        row.display_temperature,
        row.display_description
    )
}

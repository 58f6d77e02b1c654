use std::collections::VecDeque;

use shoppu_core::api_models::Notification;
use tracing::debug;


/// Default number of records shown per table page.
pub const DEFAULT_ITEMS_PER_PAGE: u32 = 30;


/// The admin interface's modules.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Module {
    Category,
    Product,
}

/// What the user is currently doing within the selected module.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Action {
    #[default]
    Index,
    Create,
    Update,
    Show,
    Destroy,
}


/// Non-presentational state of the admin interface.
#[derive(Clone, Debug)]
pub struct UiState {
    selected_module: Option<Module>,

    selected_action: Action,

    notifications: VecDeque<Notification>,

    query: String,

    items_per_page: u32,

    active_page: u32,

    total_pages: u32,
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}

impl UiState {
    pub fn new() -> Self {
        Self {
            selected_module: None,
            selected_action: Action::Index,
            notifications: VecDeque::new(),
            query: String::new(),
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
            active_page: 1,
            total_pages: 0,
        }
    }


    pub fn selected_module(&self) -> Option<Module> {
        self.selected_module
    }

    pub fn select_module(&mut self, module: Module) {
        debug!(?module, "Selecting module.");
        self.selected_module = Some(module);
    }

    pub fn selected_action(&self) -> Action {
        self.selected_action
    }

    pub fn select_action(&mut self, action: Action) {
        debug!(?action, "Selecting action.");
        self.selected_action = action;
    }


    /* NOTIFICATIONS */

    /// Queues the given notifications. Queues a generic
    /// "Unknown error happened." alert if none are given.
    pub fn add_notifications<I>(&mut self, notifications: I)
    where
        I: IntoIterator<Item = Notification>,
    {
        let length_before = self.notifications.len();
        self.notifications.extend(notifications);

        if self.notifications.len() == length_before {
            self.notifications.push_back(Notification::unknown_error());
        }
    }

    pub fn has_notifications(&self) -> bool {
        !self.notifications.is_empty()
    }

    pub fn next_notification(&self) -> Option<&Notification> {
        self.notifications.front()
    }

    pub fn dequeue_notification(&mut self) -> Option<Notification> {
        self.notifications.pop_front()
    }

    pub fn clear_notifications(&mut self) {
        self.notifications.clear();
    }


    /* PAGINATION */

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query<S>(&mut self, query: S)
    where
        S: Into<String>,
    {
        self.query = query.into();
    }

    /// The search query, or `None` if it is empty.
    pub fn query_filter(&self) -> Option<&str> {
        if self.query.is_empty() {
            None
        } else {
            Some(&self.query)
        }
    }

    pub fn items_per_page(&self) -> u32 {
        self.items_per_page
    }

    /// Values below 1 are clamped to 1.
    pub fn set_items_per_page(&mut self, items_per_page: u32) {
        self.items_per_page = items_per_page.max(1);
    }

    pub fn active_page(&self) -> u32 {
        self.active_page
    }

    pub fn set_active_page(&mut self, page: u32) {
        self.active_page = page;
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Recomputes the number of pages for `num_elements` records.
    pub fn update_pagination(&mut self, num_elements: u64) {
        let total_pages = num_elements.div_ceil(u64::from(self.items_per_page));
        self.total_pages = u32::try_from(total_pages).unwrap_or(u32::MAX);

        debug!(
            total_pages = self.total_pages,
            items_per_page = self.items_per_page,
            num_elements,
            "Updated pagination."
        );
    }
}



#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn starts_on_the_first_page_of_the_index() {
        let ui_state = UiState::new();

        assert_eq!(ui_state.active_page(), 1);
        assert_eq!(ui_state.items_per_page(), 30);
        assert_eq!(ui_state.selected_action(), Action::Index);
        assert_eq!(ui_state.selected_module(), None);
        assert!(!ui_state.has_notifications());
    }

    #[test]
    fn notifications_are_queued_in_order() {
        let mut ui_state = UiState::new();

        ui_state.add_notifications([
            Notification::error("first"),
            Notification::alert("second"),
        ]);

        assert_eq!(
            ui_state.next_notification(),
            Some(&Notification::error("first"))
        );
        assert_eq!(
            ui_state.dequeue_notification(),
            Some(Notification::error("first"))
        );
        assert_eq!(
            ui_state.dequeue_notification(),
            Some(Notification::alert("second"))
        );
        assert_eq!(ui_state.dequeue_notification(), None);
    }

    #[test]
    fn adding_no_notifications_queues_an_unknown_error() {
        let mut ui_state = UiState::new();

        ui_state.add_notifications([]);

        assert_eq!(
            ui_state.next_notification(),
            Some(&Notification::unknown_error())
        );

        ui_state.clear_notifications();
        assert!(!ui_state.has_notifications());
    }

    #[test]
    fn total_pages_round_up() {
        let mut ui_state = UiState::new();

        ui_state.update_pagination(0);
        assert_eq!(ui_state.total_pages(), 0);

        ui_state.update_pagination(30);
        assert_eq!(ui_state.total_pages(), 1);

        ui_state.update_pagination(31);
        assert_eq!(ui_state.total_pages(), 2);

        ui_state.set_items_per_page(0);
        ui_state.update_pagination(3);
        assert_eq!(ui_state.total_pages(), 3);
    }

    #[test]
    fn empty_query_means_no_filter() {
        let mut ui_state = UiState::new();
        assert_eq!(ui_state.query_filter(), None);

        ui_state.set_query("sho");
        assert_eq!(ui_state.query_filter(), Some("sho"));
    }
}

//! The employee list screen.
//!
//! [`ListView`] owns the loaded collection, the search query, paging, row
//! selection, and the confirmation modal shared by the delete and edit
//! actions. Page and view changes go through [`AppState`] so they survive a
//! restart.

use std::time::Duration;

use tracing::{debug, info};

use crate::config::Config;
use crate::directory::Directory;
use crate::employee::{Employee, EmployeeId};
use crate::error::{Error, Result};
use crate::i18n::Messages;
use crate::notify::Notifier;
use crate::router::Route;
use crate::state::{AppState, ViewMode};

/// Largest number of numbered page buttons shown at once.
const WINDOW_SIZE: usize = 5;

/// Paging and timing settings for the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListSettings {
    /// Rows per page in the table view.
    pub list_page_size: usize,
    /// Cards per page in the card view.
    pub cards_page_size: usize,
    /// Delay before the collection is read.
    pub load_delay: Duration,
    /// Lifetime of list notifications.
    pub toast_duration: Duration,
}

impl ListSettings {
    /// Take the list settings from `config`.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            list_page_size: config.ui.list_page_size,
            cards_page_size: config.ui.cards_page_size,
            load_delay: config.load_delay(),
            toast_duration: config.list_toast_duration(),
        }
    }

    /// Page size for `view`.
    #[must_use]
    pub fn page_size(&self, view: ViewMode) -> usize {
        match view {
            ViewMode::List => self.list_page_size,
            ViewMode::Cards => self.cards_page_size,
        }
    }
}

impl Default for ListSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Action awaiting confirmation in the modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    /// Delete the employee.
    Delete(EmployeeId),
    /// Open the employee in the edit form.
    Edit(EmployeeId),
}

impl ConfirmAction {
    /// The employee the action targets.
    #[must_use]
    pub fn id(&self) -> &EmployeeId {
        match self {
            Self::Delete(id) | Self::Edit(id) => id,
        }
    }
}

/// What happened when the modal was confirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// The employee was removed and the collection saved.
    Deleted(Employee),
    /// The caller should navigate to this route.
    Navigate(Route),
}

/// Numbered page buttons around the current page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageWindow {
    /// Current page.
    pub current: usize,
    /// Number of pages.
    pub total: usize,
    /// Numbered buttons, in order.
    pub pages: Vec<usize>,
    /// Show a shortcut to page 1 before the buttons.
    pub first: bool,
    /// Show an ellipsis between the first shortcut and the buttons.
    pub leading_gap: bool,
    /// Show an ellipsis between the buttons and the last shortcut.
    pub trailing_gap: bool,
    /// Show a shortcut to the last page after the buttons.
    pub last: bool,
}

/// Compute the page buttons for `current` of `total` pages.
///
/// Returns `None` when there is at most one page.
#[must_use]
pub fn page_window(current: usize, total: usize) -> Option<PageWindow> {
    if total <= 1 {
        return None;
    }
    let current = current.clamp(1, total);
    let span = WINDOW_SIZE - 1;
    let mut start = current.saturating_sub(2).max(1);
    let end = (start + span).min(total);
    start = end.saturating_sub(span).max(1);

    Some(PageWindow {
        current,
        total,
        pages: (start..=end).collect(),
        first: start > 1,
        leading_gap: start > 2,
        trailing_gap: end + 1 < total,
        last: end < total,
    })
}

/// Number of pages needed for `count` items; never less than one.
#[must_use]
pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1)).max(1)
}

/// State of the list screen.
#[derive(Debug)]
pub struct ListView {
    state: AppState,
    notifier: Notifier,
    settings: ListSettings,
    employees: Vec<Employee>,
    search: String,
    current_page: usize,
    view: ViewMode,
    is_loading: bool,
    confirm: Option<ConfirmAction>,
}

impl ListView {
    /// Create the screen with the persisted view and page. Nothing is
    /// loaded until [`ListView::load`] runs.
    ///
    /// # Errors
    ///
    /// Returns an error if the application state cannot be read.
    pub fn new(state: AppState, notifier: Notifier, settings: ListSettings) -> Result<Self> {
        let prefs = state.preferences()?;
        Ok(Self {
            state,
            notifier,
            settings,
            employees: Vec::new(),
            search: String::new(),
            current_page: prefs.page_index,
            view: prefs.view,
            is_loading: true,
            confirm: None,
        })
    }

    /// Wait for the load delay, then read the collection and clamp the page.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub async fn load(&mut self, directory: &Directory) -> Result<()> {
        tokio::time::sleep(self.settings.load_delay).await;
        self.employees = directory.load()?;
        self.is_loading = false;
        debug!(count = self.employees.len(), "List loaded");

        let total = self.total_pages();
        if self.current_page > total {
            self.current_page = total;
        }
        Ok(())
    }

    /// Whether the collection is still being loaded.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Every loaded employee.
    #[must_use]
    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    /// The search query.
    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    /// The current view mode.
    #[must_use]
    pub fn view(&self) -> ViewMode {
        self.view
    }

    /// The current one-based page.
    #[must_use]
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Items per page in the current view.
    #[must_use]
    pub fn page_size(&self) -> usize {
        self.settings.page_size(self.view)
    }

    /// Employees matching the search query.
    #[must_use]
    pub fn filtered(&self) -> Vec<&Employee> {
        self.employees
            .iter()
            .filter(|e| e.matches(&self.search))
            .collect()
    }

    /// Number of pages for the filtered employees.
    #[must_use]
    pub fn total_pages(&self) -> usize {
        total_pages(self.filtered().len(), self.page_size())
    }

    /// Employees on the current page.
    #[must_use]
    pub fn page_items(&self) -> Vec<&Employee> {
        let size = self.page_size();
        self.filtered()
            .into_iter()
            .skip((self.current_page - 1) * size)
            .take(size)
            .collect()
    }

    /// Page buttons for the current page, or `None` with a single page.
    #[must_use]
    pub fn pagination(&self) -> Option<PageWindow> {
        page_window(self.current_page, self.total_pages())
    }

    /// Filter by `query` and go back to the first page.
    ///
    /// # Errors
    ///
    /// Returns an error if the page index cannot be persisted.
    pub fn set_search(&mut self, query: impl Into<String>) -> Result<()> {
        self.search = query.into();
        self.go_to_page(1)?;
        Ok(())
    }

    /// Switch the view mode and go back to the first page.
    ///
    /// # Errors
    ///
    /// Returns an error if the view or page cannot be persisted.
    pub fn set_view(&mut self, view: ViewMode) -> Result<()> {
        self.view = view;
        self.state.set_view(view)?;
        self.go_to_page(1)?;
        Ok(())
    }

    /// Flip between table and cards.
    ///
    /// # Errors
    ///
    /// Returns an error if the view or page cannot be persisted.
    pub fn toggle_view(&mut self) -> Result<ViewMode> {
        let next = match self.view {
            ViewMode::List => ViewMode::Cards,
            ViewMode::Cards => ViewMode::List,
        };
        self.set_view(next)?;
        Ok(next)
    }

    /// Move to `page`, clamped to the valid range, and persist it.
    ///
    /// # Errors
    ///
    /// Returns an error if the page index cannot be persisted.
    pub fn go_to_page(&mut self, page: usize) -> Result<usize> {
        let page = page.clamp(1, self.total_pages());
        self.current_page = page;
        self.state.set_page_index(page)?;
        Ok(page)
    }

    /// Move one page forward; stays put on the last page.
    ///
    /// # Errors
    ///
    /// Returns an error if the page index cannot be persisted.
    pub fn next_page(&mut self) -> Result<usize> {
        if self.current_page >= self.total_pages() {
            return Ok(self.current_page);
        }
        self.go_to_page(self.current_page + 1)
    }

    /// Move one page back; stays put on the first page.
    ///
    /// # Errors
    ///
    /// Returns an error if the page index cannot be persisted.
    pub fn prev_page(&mut self) -> Result<usize> {
        if self.current_page <= 1 {
            return Ok(self.current_page);
        }
        self.go_to_page(self.current_page - 1)
    }

    /// Jump to the first page.
    ///
    /// # Errors
    ///
    /// Returns an error if the page index cannot be persisted.
    pub fn first_page(&mut self) -> Result<usize> {
        self.go_to_page(1)
    }

    /// Jump to the last page.
    ///
    /// # Errors
    ///
    /// Returns an error if the page index cannot be persisted.
    pub fn last_page(&mut self) -> Result<usize> {
        self.go_to_page(self.total_pages())
    }

    /// Flip the selection of one row. Returns the new state, or `None` if
    /// no such employee is loaded.
    pub fn toggle_row(&mut self, id: &EmployeeId) -> Option<bool> {
        let employee = self.employees.iter_mut().find(|e| &e.id == id)?;
        employee.selected = !employee.selected;
        Some(employee.selected)
    }

    /// Select or clear every row.
    pub fn select_all(&mut self, selected: bool) {
        for employee in &mut self.employees {
            employee.selected = selected;
        }
    }

    /// Select every row unless all are selected already, then clear them.
    /// Returns the new state.
    pub fn toggle_all(&mut self) -> bool {
        let selected = !self.employees.iter().all(|e| e.selected);
        self.select_all(selected);
        selected
    }

    /// Identifiers of the selected rows.
    #[must_use]
    pub fn selected_ids(&self) -> Vec<&EmployeeId> {
        self.employees
            .iter()
            .filter(|e| e.selected)
            .map(|e| &e.id)
            .collect()
    }

    /// Ask for confirmation before deleting `id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmployeeNotFound`] if no such employee is loaded.
    pub fn request_delete(&mut self, id: &EmployeeId) -> Result<()> {
        self.open_confirm(ConfirmAction::Delete(id.clone()))
    }

    /// Ask for confirmation before editing `id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmployeeNotFound`] if no such employee is loaded.
    pub fn request_edit(&mut self, id: &EmployeeId) -> Result<()> {
        self.open_confirm(ConfirmAction::Edit(id.clone()))
    }

    fn open_confirm(&mut self, action: ConfirmAction) -> Result<()> {
        if self.find(action.id()).is_none() {
            return Err(Error::EmployeeNotFound(action.id().clone()));
        }
        self.confirm = Some(action);
        Ok(())
    }

    /// The action awaiting confirmation.
    #[must_use]
    pub fn pending_confirm(&self) -> Option<&ConfirmAction> {
        self.confirm.as_ref()
    }

    /// Text of the confirmation modal in the language of `messages`.
    #[must_use]
    pub fn confirm_message(&self, messages: &Messages) -> Option<String> {
        let action = self.confirm.as_ref()?;
        let name = self.find(action.id())?.full_name();
        Some(match action {
            ConfirmAction::Delete(_) => format!(
                "{} {name} {}",
                messages.get("confirmdel1"),
                messages.get("confirmdel2")
            ),
            ConfirmAction::Edit(_) => format!("{} {name}?", messages.get("confirmEdit")),
        })
    }

    /// Close the modal without acting.
    pub fn cancel_confirm(&mut self) {
        self.confirm = None;
    }

    /// Carry out the pending action.
    ///
    /// Deleting removes the record, saves the whole collection, shows a
    /// toast, and pulls the page back into range. Editing hands back the
    /// route to navigate to. Returns `None` when nothing is pending.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection or page cannot be persisted.
    pub fn proceed_confirm(&mut self, directory: &Directory) -> Result<Option<ConfirmOutcome>> {
        let Some(action) = self.confirm.take() else {
            return Ok(None);
        };

        match action {
            ConfirmAction::Edit(id) => Ok(Some(ConfirmOutcome::Navigate(Route::Edit(id)))),
            ConfirmAction::Delete(id) => {
                let index = self
                    .employees
                    .iter()
                    .position(|e| e.id == id)
                    .ok_or_else(|| Error::EmployeeNotFound(id.clone()))?;
                let removed = self.employees.remove(index);
                if let Err(e) = directory.save(&self.employees) {
                    self.employees.insert(index, removed);
                    return Err(e);
                }
                info!(%id, "Deleted employee from list");

                let messages = Messages::for_lang(self.state.lang()?);
                self.notifier
                    .show(messages.get("employeeDeleted"), self.settings.toast_duration)?;

                let total = self.total_pages();
                if self.current_page > total {
                    self.go_to_page(total)?;
                }
                Ok(Some(ConfirmOutcome::Deleted(removed)))
            }
        }
    }

    fn find(&self, id: &EmployeeId) -> Option<&Employee> {
        self.employees.iter().find(|e| &e.id == id)
    }
}

//! The application root.
//!
//! [`App`] wires the store, application state, router, and notifier
//! together and swaps between the list and form screens as the current path
//! changes.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::Config;
use crate::directory::Directory;
use crate::error::{Error, Result};
use crate::form::{FormSettings, FormView, SaveOutcome};
use crate::i18n::{Lang, Messages};
use crate::list::{ConfirmOutcome, ListSettings, ListView};
use crate::notify::Notifier;
use crate::router::{Route, Router, LIST_PATH, NEW_PATH};
use crate::state::AppState;
use crate::storage::KeyValueStore;

/// The screen currently shown.
#[derive(Debug)]
pub enum Screen {
    /// The employee list.
    List(ListView),
    /// The create or edit form.
    Form(FormView),
}

/// An entry in the navigation bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    /// Message key of the label.
    pub label_key: &'static str,
    /// Logical path the entry leads to.
    pub path: &'static str,
    /// Whether the current path is this entry's target.
    pub active: bool,
}

/// The running application.
#[derive(Debug)]
pub struct App {
    directory: Directory,
    state: AppState,
    router: Router,
    notifier: Notifier,
    list_settings: ListSettings,
    form_settings: FormSettings,
    screen: Option<Screen>,
}

impl App {
    /// Build the application over `store`, seeding it on first run and
    /// installing the routes.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or seeded.
    pub fn new(store: Arc<dyn KeyValueStore>, config: &Config) -> Result<Self> {
        let directory = Directory::new(store.clone(), config.storage.seed_count);
        directory.ensure_seeded()?;

        let state = AppState::load(store)?;
        let notifier = Notifier::new(state.clone());
        let mut router = Router::new(config.base_path());
        router.install();

        Ok(Self {
            directory,
            state,
            router,
            notifier,
            list_settings: ListSettings::from_config(config),
            form_settings: FormSettings::from_config(config),
            screen: None,
        })
    }

    /// The employee collection.
    #[must_use]
    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    /// The application state.
    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// The router.
    #[must_use]
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// The notifier.
    #[must_use]
    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// The screen on display, if any navigation has happened.
    #[must_use]
    pub fn screen(&self) -> Option<&Screen> {
        self.screen.as_ref()
    }

    /// The list screen, if it is on display.
    pub fn list_mut(&mut self) -> Option<&mut ListView> {
        match &mut self.screen {
            Some(Screen::List(list)) => Some(list),
            _ => None,
        }
    }

    /// The form screen, if it is on display.
    pub fn form_mut(&mut self) -> Option<&mut FormView> {
        match &mut self.screen {
            Some(Screen::Form(form)) => Some(form),
            _ => None,
        }
    }

    /// Messages in the current language.
    ///
    /// # Errors
    ///
    /// Returns an error if the state lock is poisoned.
    pub fn messages(&self) -> Result<Messages> {
        Ok(Messages::for_lang(self.state.lang()?))
    }

    /// Navigate to `path` and show the matching screen.
    ///
    /// Editing an employee that does not exist lands on the list.
    ///
    /// # Errors
    ///
    /// Returns an error if the screen's data cannot be loaded.
    pub async fn navigate(&mut self, path: &str) -> Result<Option<&Screen>> {
        let mut target = path.to_string();
        loop {
            let Some(route) = self.router.go(&target) else {
                return Ok(self.screen.as_ref());
            };
            match self.build_screen(route).await? {
                Some(screen) => {
                    self.screen = Some(screen);
                    return Ok(self.screen.as_ref());
                }
                None => target = LIST_PATH.to_string(),
            }
        }
    }

    /// Go back one history entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the screen's data cannot be loaded.
    pub async fn back(&mut self) -> Result<Option<&Screen>> {
        match self.router.back() {
            Some(route) => self.show(route).await,
            None => Ok(self.screen.as_ref()),
        }
    }

    /// Go forward one history entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the screen's data cannot be loaded.
    pub async fn forward(&mut self) -> Result<Option<&Screen>> {
        match self.router.forward() {
            Some(route) => self.show(route).await,
            None => Ok(self.screen.as_ref()),
        }
    }

    async fn show(&mut self, route: Route) -> Result<Option<&Screen>> {
        match self.build_screen(route).await? {
            Some(screen) => {
                self.screen = Some(screen);
                Ok(self.screen.as_ref())
            }
            None => self.navigate(LIST_PATH).await,
        }
    }

    /// Build the screen for `route`; `None` when the route must fall back
    /// to the list.
    async fn build_screen(&self, route: Route) -> Result<Option<Screen>> {
        debug!(?route, "Building screen");
        match route {
            Route::List => {
                let mut list =
                    ListView::new(self.state.clone(), self.notifier.clone(), self.list_settings)?;
                list.load(&self.directory).await?;
                Ok(Some(Screen::List(list)))
            }
            Route::New => Ok(Some(Screen::Form(FormView::create(self.form_settings)))),
            Route::Edit(id) => match FormView::edit(&self.directory, &id, self.form_settings) {
                Ok(form) => Ok(Some(Screen::Form(form))),
                Err(Error::EmployeeNotFound(_)) => {
                    warn!(%id, "Employee not found, returning to list");
                    Ok(None)
                }
                Err(e) => Err(e),
            },
        }
    }

    /// Navigation bar entries with their active state.
    #[must_use]
    pub fn nav_items(&self) -> Vec<NavItem> {
        let current = self.router.current_path();
        [("employees", LIST_PATH), ("addEmployee", NEW_PATH)]
            .into_iter()
            .map(|(label_key, path)| NavItem {
                label_key,
                path,
                active: current == path,
            })
            .collect()
    }

    /// Flip the UI language.
    ///
    /// # Errors
    ///
    /// Returns an error if the language cannot be persisted.
    pub fn toggle_lang(&self) -> Result<Lang> {
        self.state.toggle_lang()
    }

    /// Confirm the list's pending action.
    ///
    /// A confirmed edit navigates to the form.
    ///
    /// # Errors
    ///
    /// Returns an error if the list is not on display or the action fails.
    pub async fn confirm_list(&mut self) -> Result<Option<ConfirmOutcome>> {
        let directory = self.directory.clone();
        let list = self
            .list_mut()
            .ok_or_else(|| Error::internal("list screen is not active"))?;
        let outcome = list.proceed_confirm(&directory)?;

        if let Some(ConfirmOutcome::Navigate(route)) = &outcome {
            self.navigate(&route.path()).await?;
        }
        Ok(outcome)
    }

    /// Confirm the form's pending save.
    ///
    /// Success shows a notification and returns to the list. A duplicate or
    /// missing record shows an error notification and keeps the form open.
    ///
    /// # Errors
    ///
    /// Returns an error if the form is not on display or the save fails.
    pub async fn confirm_form(&mut self) -> Result<Option<SaveOutcome>> {
        let directory = self.directory.clone();
        let form = self
            .form_mut()
            .ok_or_else(|| Error::internal("form screen is not active"))?;
        let duration = form.toast_duration();

        match form.proceed_confirm(&directory) {
            Ok(Some(outcome)) => {
                let messages = self.messages()?;
                self.notifier
                    .show(messages.get(outcome.message_key()), duration)?;
                self.navigate(LIST_PATH).await?;
                Ok(Some(outcome))
            }
            Ok(None) => Ok(None),
            Err(e) => {
                if let Some(key) = e.message_key() {
                    let messages = self.messages()?;
                    let text = format!("{}{}", messages.get("error"), messages.get(key));
                    self.notifier.show(text, duration)?;
                }
                Err(e)
            }
        }
    }

    /// Leave the form for the list without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the list cannot be loaded.
    pub async fn cancel_form(&mut self) -> Result<()> {
        let target = match &self.screen {
            Some(Screen::Form(form)) => form.cancel().path(),
            _ => LIST_PATH.to_string(),
        };
        self.navigate(&target).await?;
        Ok(())
    }
}

use crate::api::PersistenceClient;
use crate::config::{Bootstrap, EnvConfig};
use crate::interaction::Interaction;
use crate::schema::{ExpandedPaths, Outcome};
use crate::session::{EditorSession, InFlight};
use leptos::prelude::*;

#[derive(Clone, Copy)]
pub(crate) struct AppState {
    pub config: StoredValue<EnvConfig>,
    pub client: StoredValue<PersistenceClient>,

    /// The tree under edit. Field edits write through untracked so open
    /// inputs survive; structural edits notify and re-render the tree.
    pub session: RwSignal<EditorSession>,

    /// Panel open/closed state, kept across re-renders.
    pub expanded: RwSignal<ExpandedPaths>,

    /// Documents the host page offers in the file picker.
    pub files: RwSignal<Vec<String>>,
    pub picked_file: RwSignal<String>,

    /// Save controls.
    pub overwrite: RwSignal<bool>,
    pub new_file_name: RwSignal<String>,

    pub saving: RwSignal<InFlight>,
    pub deleting: RwSignal<InFlight>,

    pub load_error: RwSignal<Option<String>>,
}

impl AppState {
    pub fn new(config: EnvConfig, bootstrap: Bootstrap) -> Self {
        let client = PersistenceClient::new(
            config.save_metadata_url.clone(),
            config.delete_file_url.clone(),
            config.csrf_token.clone(),
        );
        let session = EditorSession::from_bootstrap(&bootstrap);
        let picked = bootstrap.selected_file.clone().unwrap_or_default();

        Self {
            config: StoredValue::new(config),
            client: StoredValue::new(client),
            // Nothing loaded means there is nothing to overwrite.
            overwrite: RwSignal::new(!session.is_new_file()),
            session: RwSignal::new(session),
            expanded: RwSignal::new(ExpandedPaths::default()),
            files: RwSignal::new(bootstrap.files),
            picked_file: RwSignal::new(picked),
            new_file_name: RwSignal::new(String::new()),
            saving: RwSignal::new(InFlight::default()),
            deleting: RwSignal::new(InFlight::default()),
            load_error: RwSignal::new(bootstrap.load_error),
        }
    }

    pub fn from_window() -> Self {
        Self::new(EnvConfig::from_window(), Bootstrap::from_window())
    }

    /// Confirm, then drop the current document and every control tied to it.
    pub fn start_new_schema(&self, ui: &impl Interaction) -> Outcome {
        let outcome = self
            .session
            .try_update_untracked(|s| s.new_schema(ui))
            .unwrap_or(Outcome::Cancelled);
        if outcome != Outcome::Applied {
            return outcome;
        }

        self.session.notify();
        self.overwrite.set(false);
        self.new_file_name.set(String::new());
        self.picked_file.set(String::new());
        self.load_error.set(None);
        self.expanded.update(|e| e.collapse_all());
        outcome
    }
}

#[derive(Clone, Copy)]
pub(crate) struct AppContext(pub AppState);

use crate::pages::SchemaEditorPage;
use crate::state::{AppContext, AppState};
use leptos::prelude::*;
use leptos_router::components::Router;

#[component]
pub fn App() -> impl IntoView {
    provide_context(AppContext(AppState::from_window()));

    // The host serves the editor under its own path, so there is no route
    // table; the router only provides query access.
    view! {
        <Router>
            <SchemaEditorPage />
        </Router>
    }
}

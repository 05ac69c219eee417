use crate::components::ui::{Button, ButtonSize, ButtonVariant};
use crate::error::EditorResult;
use crate::interaction::BrowserInteraction;
use crate::models::{Field, Status};
use crate::schema::{self, outline, NodePath, Outcome, Outline, OutlineRow};
use crate::session::EditorSession;
use crate::state::{AppContext, AppState};
use leptos::prelude::*;
use std::str::FromStr;
use strum::IntoEnumIterator;

/// Run a structural command and re-render the tree when it changed.
///
/// Validation failures have already been shown to the user by the command;
/// lookup failures stay silent.
pub(crate) fn run_structural(
    state: AppState,
    command: impl FnOnce(&mut EditorSession) -> EditorResult<Outcome>,
) -> Option<Outcome> {
    match state.session.try_update_untracked(command)? {
        Ok(outcome) => {
            if matches!(outcome, Outcome::Applied | Outcome::Renamed(_)) {
                state.session.notify();
            }
            Some(outcome)
        }
        Err(e) => {
            if e.is_lookup() {
                log::debug!("editor: {}", e);
            }
            None
        }
    }
}

fn add_node(state: AppState, parent: &NodePath) {
    run_structural(state, |s| {
        schema::add_child(&mut s.tree, parent, &BrowserInteraction)
    });
}

fn rename_node(state: AppState, parent: &NodePath, old: &str) {
    let outcome = run_structural(state, |s| {
        schema::rename_child(&mut s.tree, parent, old, &BrowserInteraction)
    });
    if let Some(Outcome::Renamed(new)) = outcome {
        state.expanded.update(|e| e.renamed(parent, old, &new));
    }
}

fn remove_node(state: AppState, parent: &NodePath, name: &str) {
    let outcome = run_structural(state, |s| {
        schema::remove_child(&mut s.tree, parent, name, &BrowserInteraction)
    });
    if outcome == Some(Outcome::Applied) {
        state.expanded.update(|e| e.removed(&parent.child(name)));
    }
}

/// Write one field into the tree without re-rendering it.
fn apply_field_edit(state: AppState, path: &NodePath, field: Field, value: &str) -> bool {
    match state
        .session
        .try_update_untracked(|s| s.tree.set_field(path, field, value))
    {
        Some(Ok(())) => true,
        Some(Err(e)) if e.is_lookup() => {
            log::debug!("editor: {} edit dropped: {}", field, e);
            false
        }
        Some(Err(e)) => {
            log::warn!("editor: {} edit rejected: {}", field, e);
            false
        }
        None => false,
    }
}

pub(crate) fn expand_all(state: AppState) {
    state
        .session
        .with_untracked(|s| state.expanded.update(|e| e.expand_all(&s.tree)));
}

pub(crate) fn collapse_all(state: AppState) {
    state.expanded.update(|e| e.collapse_all());
}

fn panel_class(status: Option<Status>) -> String {
    match status {
        Some(s) => format!("metadata-box {}", s.as_ref()),
        None => "metadata-box".to_string(),
    }
}

#[component]
pub fn SchemaTreeView() -> impl IntoView {
    let state = expect_context::<AppContext>().0;

    view! {
        <div id="metadata-tree" class="space-y-2">
            {move || match state.session.with(|s| outline(&s.tree)) {
                Outline::Empty => view! {
                    <div class="mb-2">
                        <AddNodeButton parent=NodePath::root() />
                    </div>
                }
                .into_any(),
                Outline::Rows(rows) => view! {
                    <div>
                        {rows
                            .into_iter()
                            .map(|row| view! { <SchemaRow row=row /> })
                            .collect_view()}
                        <div class="mt-2">
                            <AddNodeButton parent=NodePath::root() />
                        </div>
                    </div>
                }
                .into_any(),
            }}
        </div>
    }
}

#[component]
fn AddNodeButton(parent: NodePath) -> impl IntoView {
    let state = expect_context::<AppContext>().0;

    view! {
        <Button
            variant=ButtonVariant::Outline
            size=ButtonSize::Sm
            on:click=move |_| add_node(state, &parent)
        >
            "New node"
        </Button>
    }
}

/// One collapsible panel: toggle, colored name, node controls, and the
/// nested fields and children.
#[component]
fn SchemaRow(row: OutlineRow) -> impl IntoView {
    let state = expect_context::<AppContext>().0;

    let OutlineRow {
        name,
        path,
        label_status,
        panel_status,
        fields,
        children,
        is_leaf,
    } = row;

    // Status edits recolor in place instead of re-rendering the tree.
    let label_status = RwSignal::new(label_status);
    let panel_status = RwSignal::new(panel_status);

    let data_path = path.to_string();
    let parent_sv = StoredValue::new(path.parent().unwrap_or_default());
    let name_sv = StoredValue::new(name.clone());
    let path_sv = StoredValue::new(path);

    let is_open = move || {
        state
            .expanded
            .with(|e| path_sv.with_value(|p| e.is_expanded(p)))
    };

    let field_views = fields
        .into_iter()
        .map(|(field, value)| {
            view! {
                <FieldEditor
                    field=field
                    value=value
                    path=path_sv.get_value()
                    label_status=label_status
                    panel_status=panel_status
                />
            }
        })
        .collect_view();

    let child_views = children
        .into_iter()
        .map(|child| view! { <SchemaRow row=child /> }.into_any())
        .collect_view();

    view! {
        <div class="mb-2">
            <span
                class="toggle-icon inline-block w-4 cursor-pointer select-none font-mono"
                on:click=move |_| state.expanded.update(|e| path_sv.with_value(|p| e.toggle(p)))
            >
                {move || state.expanded.with(|e| path_sv.with_value(|p| e.glyph(p)))}
            </span>
            <span
                class="status-label font-medium"
                data-path=data_path.clone()
                style:color=move || label_status.get().color()
            >
                {name}
            </span>
            <span class="node-controls ml-2 inline-flex gap-1">
                <Button
                    variant=ButtonVariant::Outline
                    size=ButtonSize::Sm
                    on:click=move |_| path_sv.with_value(|p| add_node(state, p))
                >
                    "New node"
                </Button>
                <Button
                    variant=ButtonVariant::Ghost
                    size=ButtonSize::Sm
                    on:click=move |_| {
                        parent_sv.with_value(|parent| {
                            name_sv.with_value(|old| rename_node(state, parent, old))
                        })
                    }
                >
                    "Rename"
                </Button>
                <Button
                    variant=ButtonVariant::Destructive
                    size=ButtonSize::Sm
                    on:click=move |_| {
                        parent_sv.with_value(|parent| {
                            name_sv.with_value(|name| remove_node(state, parent, name))
                        })
                    }
                >
                    "Remove"
                </Button>
            </span>
            <div
                class="nested ml-6 mt-1"
                style:display=move || if is_open() { "block" } else { "none" }
            >
                <div class=move || panel_class(panel_status.get()) data-node-path=data_path>
                    {field_views}
                </div>
                {child_views}
                {is_leaf.then(|| view! {
                    <div class="mb-2">
                        <AddNodeButton parent=path_sv.get_value() />
                    </div>
                })}
            </div>
        </div>
    }
    .into_any()
}

/// Editor for one field; changes are written straight into the tree.
#[component]
fn FieldEditor(
    field: Field,
    value: String,
    path: NodePath,
    label_status: RwSignal<Status>,
    panel_status: RwSignal<Option<Status>>,
) -> impl IntoView {
    let state = expect_context::<AppContext>().0;
    let data_path = path.to_string();

    let on_change = move |ev: web_sys::Event| {
        let value = event_target_value(&ev);
        if !apply_field_edit(state, &path, field, &value) || field != Field::Status {
            return;
        }
        if let Ok(status) = Status::from_str(&value) {
            label_status.set(status);
            panel_status.set(Some(status));
        }
    };

    let input = match field {
        Field::Status => view! {
            <select
                class="rounded-md border px-2 py-1 text-sm"
                data-path=data_path
                data-field=field.to_string()
                on:change=on_change
            >
                {Status::iter()
                    .map(|s| view! {
                        <option value=s.to_string() selected=value == s.as_ref()>
                            {s.label()}
                        </option>
                    })
                    .collect_view()}
            </select>
        }
        .into_any(),
        Field::Comment | Field::Mapping => view! {
            <input
                type="text"
                class="rounded-md border px-2 py-1 text-sm"
                data-path=data_path
                data-field=field.to_string()
                value=value.clone()
                on:change=on_change
            />
        }
        .into_any(),
    };

    view! {
        <div class="mb-1 flex items-center gap-2">
            <label class="text-xs text-muted-foreground">{format!("{field}: ")}</label>
            {input}
        </div>
    }
}

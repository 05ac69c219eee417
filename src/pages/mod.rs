use crate::components::ui::{
    Alert, AlertDescription, Button, ButtonSize, ButtonVariant, Card, CardContent,
    CardDescription, CardHeader, CardTitle, Input, Label, Spinner,
};
use crate::editor::{collapse_all, expand_all, SchemaTreeView};
use crate::error::EditorError;
use crate::interaction::{BrowserInteraction, Interaction};
use crate::session::{
    after_delete, plan_delete, AfterResponse, SaveForm, DELETE_FAILED_MESSAGE,
    SAVE_FAILED_MESSAGE,
};
use crate::state::{AppContext, AppState};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_query_map;

fn go_home(state: AppState) {
    let href = state.config.with_value(|c| c.homepage_url.clone());
    if let Err(e) = window().location().set_href(&href) {
        log::error!("pages: navigation to {} failed: {:?}", href, e);
    }
}

/// Ask the host page to serve another document.
fn open_file(name: &str) {
    let href = format!("?file_name={}", urlencoding::encode(name));
    if let Err(e) = window().location().set_href(&href) {
        log::error!("pages: navigation to {} failed: {:?}", href, e);
    }
}

fn report(e: &EditorError) {
    log::info!("pages: {}", e);
    BrowserInteraction.alert(&e.to_string());
}

fn save(state: AppState) {
    let form = SaveForm {
        overwrite: state.overwrite.get_untracked(),
        new_file_name: state.new_file_name.get_untracked(),
    };
    // Snapshot so edits made while the request is out do not leak into it.
    let snapshot = state.session.get_untracked();
    let target = match snapshot.plan_save(&form) {
        Ok(target) => target,
        Err(e) => return report(&e),
    };
    if let Some(Err(e)) = state.saving.try_update(|g| g.begin()) {
        log::debug!("pages: save ignored: {}", e);
        return;
    }

    let client = state.client.get_value();
    log::debug!("pages: saving {} (overwrite={})", target.file_name, target.overwrite);

    spawn_local(async move {
        let req = target.request(snapshot.tree.root());
        match client.save_metadata(&req).await {
            Ok(resp) => {
                BrowserInteraction.alert(&resp.message);
                if snapshot.after_save(&resp) == AfterResponse::GoHome {
                    go_home(state);
                }
            }
            Err(e) => {
                log::error!("pages: save failed: {}", e);
                BrowserInteraction.alert(SAVE_FAILED_MESSAGE);
            }
        }
        state.saving.update(|g| g.finish());
    });
}

fn delete(state: AppState) {
    let picked = state.picked_file.get_untracked();
    let req = match plan_delete(&picked, &BrowserInteraction) {
        Ok(Some(req)) => req,
        Ok(None) => return,
        Err(e) => return report(&e),
    };
    if let Some(Err(e)) = state.deleting.try_update(|g| g.begin()) {
        log::debug!("pages: delete ignored: {}", e);
        return;
    }

    let client = state.client.get_value();
    log::debug!("pages: deleting {}", req.file_name);

    spawn_local(async move {
        match client.delete_file(&req).await {
            Ok(resp) => {
                BrowserInteraction.alert(&resp.message);
                if after_delete(&resp) == AfterResponse::GoHome {
                    go_home(state);
                }
            }
            Err(e) => {
                log::error!("pages: delete failed: {}", e);
                BrowserInteraction.alert(DELETE_FAILED_MESSAGE);
            }
        }
        state.deleting.update(|g| g.finish());
    });
}

#[component]
pub fn SchemaEditorPage() -> impl IntoView {
    let state = expect_context::<AppContext>().0;

    // The host may pass the document name in the query instead of a global.
    let query = use_query_map();
    if state.picked_file.with_untracked(|f| f.is_empty()) {
        if let Some(name) = query.with_untracked(|q| q.get("file_name")) {
            state.picked_file.set(name);
        }
    }

    let title = move || state.session.with(|s| s.title());
    let file_loaded = move || state.session.with(|s| !s.is_new_file());
    let wants_new_name = move || !file_loaded() || !state.overwrite.get();

    view! {
        <div class="min-h-screen bg-background">
            <div class="mx-auto w-full max-w-4xl space-y-4 px-4 py-8">
                <h1 class="text-xl font-semibold">{title}</h1>

                <Show when=move || state.load_error.with(|e| e.is_some()) fallback=|| ().into_view()>
                    <Alert class="border-destructive/50 text-destructive">
                        <AlertDescription>
                            {move || state.load_error.get().unwrap_or_default()}
                        </AlertDescription>
                    </Alert>
                </Show>

                <Card>
                    <CardHeader>
                        <CardTitle class="text-base">"Metadata"</CardTitle>
                        <CardDescription class="text-xs">
                            "Required fields are red, recommended orange, optional green."
                        </CardDescription>
                    </CardHeader>
                    <CardContent>
                        <div class="mb-3 flex gap-2">
                            <Button
                                variant=ButtonVariant::Outline
                                size=ButtonSize::Sm
                                on:click=move |_| expand_all(state)
                            >
                                "Expand all"
                            </Button>
                            <Button
                                variant=ButtonVariant::Outline
                                size=ButtonSize::Sm
                                on:click=move |_| collapse_all(state)
                            >
                                "Collapse all"
                            </Button>
                            <Button
                                variant=ButtonVariant::Ghost
                                size=ButtonSize::Sm
                                on:click=move |_| { state.start_new_schema(&BrowserInteraction); }
                            >
                                "New schema"
                            </Button>
                        </div>
                        <SchemaTreeView />
                    </CardContent>
                </Card>

                <Card>
                    <CardHeader>
                        <CardTitle class="text-base">"Save"</CardTitle>
                    </CardHeader>
                    <CardContent>
                        <div class="flex flex-col gap-3">
                            <Show when=file_loaded fallback=|| ().into_view()>
                                <div class="flex flex-col gap-1.5">
                                    <Label html_for="overwrite" class="text-xs">"Overwrite existing file?"</Label>
                                    <select
                                        id="overwrite"
                                        class="h-9 rounded-md border px-2 text-sm"
                                        on:change=move |ev| state.overwrite.set(event_target_value(&ev) == "true")
                                    >
                                        <option value="true" selected=move || state.overwrite.get()>"Yes"</option>
                                        <option value="false" selected=move || !state.overwrite.get()>"No"</option>
                                    </select>
                                </div>
                            </Show>
                            <Show when=wants_new_name fallback=|| ().into_view()>
                                <div class="flex flex-col gap-1.5">
                                    <Label html_for="new-file-name" class="text-xs">"New file name"</Label>
                                    <Input
                                        id="new-file-name"
                                        placeholder="metadata.json"
                                        bind_value=state.new_file_name
                                    />
                                </div>
                            </Show>
                            <div>
                                <Button
                                    attr:disabled=move || state.saving.with(|g| g.is_active())
                                    on:click=move |_| save(state)
                                >
                                    <Show when=move || state.saving.with(|g| g.is_active()) fallback=|| ().into_view()>
                                        <Spinner />
                                    </Show>
                                    "Save"
                                </Button>
                            </div>
                        </div>
                    </CardContent>
                </Card>

                <Card>
                    <CardHeader>
                        <CardTitle class="text-base">"Files"</CardTitle>
                    </CardHeader>
                    <CardContent>
                        <div class="flex items-end gap-2">
                            <div class="flex flex-1 flex-col gap-1.5">
                                <Label html_for="file-picker" class="text-xs">"Metadata file"</Label>
                                <select
                                    id="file-picker"
                                    class="h-9 rounded-md border px-2 text-sm"
                                    on:change=move |ev| {
                                        let name = event_target_value(&ev);
                                        state.picked_file.set(name.clone());
                                        if !name.trim().is_empty() {
                                            open_file(&name);
                                        }
                                    }
                                >
                                    <option value="">"Select a file"</option>
                                    {move || {
                                        let picked = state.picked_file.get();
                                        state
                                            .files
                                            .get()
                                            .into_iter()
                                            .map(|f| {
                                                let selected = f == picked;
                                                let value = f.clone();
                                                view! {
                                                    <option value=value selected=selected>{f}</option>
                                                }
                                            })
                                            .collect_view()
                                    }}
                                </select>
                            </div>
                            <Show
                                when=move || state.picked_file.with(|f| !f.trim().is_empty())
                                fallback=|| ().into_view()
                            >
                                <Button
                                    variant=ButtonVariant::Destructive
                                    attr:disabled=move || state.deleting.with(|g| g.is_active())
                                    on:click=move |_| delete(state)
                                >
                                    <Show when=move || state.deleting.with(|g| g.is_active()) fallback=|| ().into_view()>
                                        <Spinner />
                                    </Show>
                                    "Delete"
                                </Button>
                            </Show>
                        </div>
                    </CardContent>
                </Card>
            </div>
        </div>
    }
}

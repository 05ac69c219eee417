use crate::models::Node;
use crate::schema::SchemaTree;
use serde::{Deserialize, Serialize};
use wasm_bindgen::{JsCast, JsValue};

const DEFAULT_SAVE_URL: &str = "/metadata/save/";
const DEFAULT_DELETE_URL: &str = "/delete_file/";
const DEFAULT_HOMEPAGE_URL: &str = "/";
const DEFAULT_LOG_LEVEL: &str = "info";
const CSRF_COOKIE: &str = "csrftoken";

/// Endpoint and runtime settings supplied by the host page.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct EnvConfig {
    pub save_metadata_url: String,
    pub delete_file_url: String,
    pub homepage_url: String,
    pub csrf_token: Option<String>,
    pub log_level: String,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            save_metadata_url: DEFAULT_SAVE_URL.to_string(),
            delete_file_url: DEFAULT_DELETE_URL.to_string(),
            homepage_url: DEFAULT_HOMEPAGE_URL.to_string(),
            csrf_token: None,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl EnvConfig {
    /// Read settings from the page.
    ///
    /// We support BOTH `window.ENV.<KEY>` and the bare globals the server
    /// template defines (`saveMetadataUrl`, `csrfToken`, ...).
    pub fn from_window() -> Self {
        let defaults = Self::default();
        let Some(window) = web_sys::window() else {
            return defaults;
        };

        let env = window
            .get("ENV")
            .filter(|env| !env.is_undefined() && env.is_object());
        let lookup = |env_key: &str, global: Option<&str>| -> Option<String> {
            env.as_ref()
                .and_then(|env| js_sys::Reflect::get(env, &env_key.into()).ok())
                .and_then(|v| v.as_string())
                .or_else(|| global.and_then(|g| window.get(g)).and_then(|v| v.as_string()))
        };

        let origin = window.location().origin().unwrap_or_default();
        let csrf_token = lookup("CSRF_TOKEN", Some("csrfToken")).or_else(|| {
            window
                .document()
                .and_then(|d| d.dyn_into::<web_sys::HtmlDocument>().ok())
                .and_then(|d| d.cookie().ok())
                .and_then(|c| csrf_from_cookie(&c))
        });

        Self {
            save_metadata_url: resolve_url(
                &origin,
                &lookup("SAVE_METADATA_URL", Some("saveMetadataUrl"))
                    .unwrap_or(defaults.save_metadata_url),
            ),
            delete_file_url: resolve_url(
                &origin,
                &lookup("DELETE_FILE_URL", Some("deleteFileUrl"))
                    .unwrap_or(defaults.delete_file_url),
            ),
            homepage_url: lookup("HOMEPAGE_URL", Some("homepageUrl"))
                .unwrap_or(defaults.homepage_url),
            csrf_token,
            log_level: lookup("LOG_LEVEL", None).unwrap_or(defaults.log_level),
        }
    }
}

/// Make a page-relative endpoint absolute; the HTTP client needs a full URL.
pub fn resolve_url(origin: &str, url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") || origin.is_empty() {
        return url.to_string();
    }
    let origin = origin.trim_end_matches('/');
    if let Some(rest) = url.strip_prefix('/') {
        format!("{origin}/{rest}")
    } else {
        format!("{origin}/{url}")
    }
}

/// Pull the CSRF token out of a `document.cookie` string.
pub fn csrf_from_cookie(cookie: &str) -> Option<String> {
    cookie
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == CSRF_COOKIE)
        .map(|(_, v)| v.to_string())
        .filter(|v| !v.is_empty())
}

/// Initial editor state handed over by the host page.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Bootstrap {
    pub tree: SchemaTree,
    pub selected_file: Option<String>,
    pub files: Vec<String>,
    /// Set when the supplied document could not be read.
    pub load_error: Option<String>,
}

impl Bootstrap {
    /// Build from the JSON text of the `metadata` and `metadataFiles` globals.
    pub fn from_parts(
        metadata_json: Option<&str>,
        selected_file: Option<String>,
        files_json: Option<&str>,
    ) -> Self {
        let selected_file = selected_file
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty());

        let files = files_json
            .and_then(|s| serde_json::from_str::<Vec<String>>(s).ok())
            .unwrap_or_default();

        let (tree, load_error) = match metadata_json.map(serde_json::from_str::<Option<Node>>) {
            Some(Ok(Some(root))) => (SchemaTree::new(root), None),
            Some(Ok(None)) | None => (SchemaTree::fresh(), None),
            Some(Err(e)) => {
                log::error!("config: could not read metadata document: {}", e);
                (
                    SchemaTree::fresh(),
                    Some(format!("Could not read the metadata document: {e}")),
                )
            }
        };

        // The editor cannot show what it failed to read, so it must not be
        // able to overwrite it either.
        let selected_file = match (&load_error, selected_file) {
            (Some(_), Some(file)) => {
                log::warn!("config: {} not opened for overwrite after a failed load", file);
                None
            }
            (_, file) => file,
        };

        Self {
            tree,
            selected_file,
            files,
            load_error,
        }
    }

    pub fn from_window() -> Self {
        let Some(window) = web_sys::window() else {
            return Self::from_parts(None, None, None);
        };

        let metadata = window.get("metadata").and_then(|v| stringify(&v));
        let selected_file = window.get("selectedFile").and_then(|v| v.as_string());
        let files = window.get("metadataFiles").and_then(|v| stringify(&v));

        Self::from_parts(metadata.as_deref(), selected_file, files.as_deref())
    }
}

fn stringify(v: &JsValue) -> Option<String> {
    if v.is_undefined() {
        return None;
    }
    // The template may hand the document over as an object or as JSON text.
    if let Some(s) = v.as_string() {
        return Some(s);
    }
    js_sys::JSON::stringify(v).ok().and_then(|s| s.as_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{EditorSession, SaveForm};

    #[test]
    fn test_resolve_url() {
        assert_eq!(
            resolve_url("http://host:8000", "/metadata/save/"),
            "http://host:8000/metadata/save/"
        );
        assert_eq!(
            resolve_url("http://host:8000/", "delete_file/"),
            "http://host:8000/delete_file/"
        );
        assert_eq!(resolve_url("http://host", "https://other/x"), "https://other/x");
        assert_eq!(resolve_url("", "/x"), "/x");
    }

    #[test]
    fn test_csrf_from_cookie() {
        assert_eq!(
            csrf_from_cookie("sessionid=abc; csrftoken=tok123; theme=dark").as_deref(),
            Some("tok123")
        );
        assert_eq!(csrf_from_cookie("sessionid=abc"), None);
        assert_eq!(csrf_from_cookie("csrftoken="), None);
    }

    #[test]
    fn test_bootstrap_null_document_gets_default_leaf() {
        let b = Bootstrap::from_parts(Some("null"), None, None);
        assert_eq!(b.tree, SchemaTree::fresh());
        assert!(b.load_error.is_none());
        assert!(b.selected_file.is_none());
    }

    #[test]
    fn test_bootstrap_reads_document_and_file() {
        let b = Bootstrap::from_parts(
            Some(r#"{"children": {"a": {"status": "required"}}}"#),
            Some("tem.json".to_string()),
            Some(r#"["tem.json", "sem.json"]"#),
        );
        assert!(b.tree.root().children().is_some());
        assert_eq!(b.selected_file.as_deref(), Some("tem.json"));
        assert_eq!(b.files.len(), 2);
    }

    #[test]
    fn test_bootstrap_bad_document_reports_error() {
        let b = Bootstrap::from_parts(Some(r#"{"children": [1, 2]}"#), Some("  ".to_string()), None);
        assert_eq!(b.tree, SchemaTree::fresh());
        assert!(b.load_error.is_some());
        assert!(b.selected_file.is_none());
    }

    #[test]
    fn test_bootstrap_bad_document_cannot_be_overwritten() {
        let b = Bootstrap::from_parts(
            Some(r#"{"children": {"sample": "not a node"}}"#),
            Some("tem.json".to_string()),
            None,
        );
        assert!(b.load_error.is_some());
        assert!(b.selected_file.is_none());

        let session = EditorSession::from_bootstrap(&b);
        let form = SaveForm {
            overwrite: !session.is_new_file(),
            new_file_name: String::new(),
        };
        assert!(session.plan_save(&form).is_err());
    }

    #[test]
    fn test_bootstrap_keeps_unusual_status_text() {
        let doc = r#"{"children": {"sample": {"status": "Required", "comment": "keep me"}}}"#;
        let b = Bootstrap::from_parts(Some(doc), Some("tem.json".to_string()), None);
        assert!(b.load_error.is_none());
        assert_eq!(b.selected_file.as_deref(), Some("tem.json"));

        let session = EditorSession::from_bootstrap(&b);
        let target = session
            .plan_save(&SaveForm {
                overwrite: true,
                new_file_name: String::new(),
            })
            .expect("should plan");
        let body = serde_json::to_value(target.request(session.tree.root())).expect("should serialize");
        assert_eq!(body["file_name"], "tem.json");
        assert_eq!(
            body["metadata"],
            serde_json::from_str::<serde_json::Value>(doc).expect("valid json")
        );
    }

    #[test]
    fn test_env_config_defaults() {
        let c = EnvConfig::default();
        assert_eq!(c.save_metadata_url, "/metadata/save/");
        assert_eq!(c.delete_file_url, "/delete_file/");
        assert_eq!(c.homepage_url, "/");
        assert_eq!(c.log_level, "info");
    }
}

// WASM-only tests (run with `cargo test --target wasm32-unknown-unknown` + wasm-bindgen-test-runner)
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_env_config_reads_window_env() {
        let window = web_sys::window().expect("window");
        let env = js_sys::Object::new();
        js_sys::Reflect::set(&env, &"SAVE_METADATA_URL".into(), &"https://h/save/".into())
            .expect("set");
        js_sys::Reflect::set(&window, &"ENV".into(), &env).expect("set ENV");
        js_sys::Reflect::set(&window, &"csrfToken".into(), &"tok".into()).expect("set token");

        let c = EnvConfig::from_window();
        assert_eq!(c.save_metadata_url, "https://h/save/");
        assert_eq!(c.csrf_token.as_deref(), Some("tok"));
        assert!(c.delete_file_url.ends_with("/delete_file/"));
    }

    #[wasm_bindgen_test]
    fn test_bootstrap_reads_globals() {
        let window = web_sys::window().expect("window");
        let doc = js_sys::JSON::parse(r#"{"children": {"a": {}}}"#).expect("json");
        js_sys::Reflect::set(&window, &"metadata".into(), &doc).expect("set metadata");
        js_sys::Reflect::set(&window, &"selectedFile".into(), &"a.json".into()).expect("set file");

        let b = Bootstrap::from_window();
        assert_eq!(b.selected_file.as_deref(), Some("a.json"));
        assert!(b.tree.root().children().is_some());
    }
}

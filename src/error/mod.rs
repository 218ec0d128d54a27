#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NavErrorKind {
    UnsupportedSite,
    MissingViewerIdentity,
    Dom,
    Config,
}

#[derive(Clone, Debug)]
pub struct NavError {
    pub kind: NavErrorKind,
    pub message: String,
}

impl std::fmt::Display for NavError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for NavError {}

impl NavError {
    pub(crate) fn unsupported_site(site: &str) -> Self {
        Self {
            kind: NavErrorKind::UnsupportedSite,
            message: format!("site `{site}` is not in the allow-list"),
        }
    }

    pub(crate) fn missing_viewer_identity() -> Self {
        Self {
            kind: NavErrorKind::MissingViewerIdentity,
            message: "no USER_ID cookie on this page".to_string(),
        }
    }

    pub(crate) fn dom(ctx: &str) -> Self {
        Self {
            kind: NavErrorKind::Dom,
            message: ctx.to_string(),
        }
    }

    pub(crate) fn dom_js(ctx: &str, err: wasm_bindgen::JsValue) -> Self {
        let detail = err.as_string().unwrap_or_else(|| format!("{err:?}"));
        Self {
            kind: NavErrorKind::Dom,
            message: format!("{ctx}: {detail}"),
        }
    }

    pub(crate) fn config(e: impl std::fmt::Display) -> Self {
        Self {
            kind: NavErrorKind::Config,
            message: format!("invalid MEFI_NAV config: {e}"),
        }
    }
}

pub type NavResult<T> = Result<T, NavError>;

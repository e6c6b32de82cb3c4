//! The adapter instance shared by every request.

use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;

use crate::config::{Config, ConfigError};
use crate::props::{Props, SharedProps};
use crate::render::{AssetTags, FileTemplates, RouteTable, TemplateRenderer, ViteAssets};
use crate::version::{FingerprintError, Fingerprinter};

/// Setup-time configuration plus props shared by every render.
///
/// Cloning is cheap; all clones see the same shared props. Nothing
/// request-scoped is stored here.
#[derive(Clone)]
pub struct Inertia {
    inner: Arc<InertiaInner>,
}

struct InertiaInner {
    config: Config,
    fingerprinter: Fingerprinter,
    shared: SharedProps,
    view_data: RwLock<Props>,
    templates: Arc<dyn TemplateRenderer>,
    assets: Arc<dyn AssetTags>,
    routes: RouteTable,
}

impl Inertia {
    /// Builds the adapter with the default collaborators. Fails on invalid
    /// configuration.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        Self::builder(config).build()
    }

    /// Starts a builder for swapping collaborators before the adapter is
    /// shared.
    ///
    /// ```ignore
    /// let inertia = Inertia::builder(config)
    ///     .with_routes(RouteTable::new().route("home", "/", Method::GET))
    ///     .build()?;
    /// ```
    pub fn builder(config: Config) -> InertiaBuilder {
        InertiaBuilder {
            config,
            templates: None,
            assets: None,
            routes: RouteTable::new(),
        }
    }

    /// Adds a prop to every page rendered from now on.
    pub fn share(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.inner.shared.insert(key, value.into());
    }

    /// Adds a template-only value to every HTML shell.
    pub fn share_view_data(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.inner.view_data.write().insert(key.into(), value.into());
    }

    pub fn shared_props(&self) -> Props {
        self.inner.shared.snapshot()
    }

    pub fn shared_view_data(&self) -> Props {
        self.inner.view_data.read().clone()
    }

    /// Current asset version. Recomputed from disk on every call.
    pub fn version(&self) -> Result<String, FingerprintError> {
        self.inner.fingerprinter.compute()
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub fn routes(&self) -> &RouteTable {
        &self.inner.routes
    }

    pub(crate) fn templates(&self) -> &dyn TemplateRenderer {
        self.inner.templates.as_ref()
    }

    pub(crate) fn assets(&self) -> &dyn AssetTags {
        self.inner.assets.as_ref()
    }

    /// Entry points emitted for a full load of `component`: the configured
    /// entries, then the page component itself.
    pub fn entrypoints(&self, component: &str) -> Vec<String> {
        let config = &self.inner.config;
        let assets = Path::new(&config.inertia.assets_path);
        let as_entry = |path: &Path| path.to_string_lossy().replace('\\', "/");

        let mut entries: Vec<String> = config
            .vite
            .entrypoints
            .iter()
            .map(|entry| as_entry(&assets.join(entry)))
            .collect();

        if let Some(ext) = &config.vite.page_extension {
            let page = assets.join("Pages").join(format!("{}{}", component, ext));
            entries.push(as_entry(&page));
        }

        entries
    }
}

/// Builder for [`Inertia`].
///
/// Collaborators not set here default to [`FileTemplates`] over
/// `inertia.root` and [`ViteAssets`] over the `[vite]` section.
pub struct InertiaBuilder {
    config: Config,
    templates: Option<Arc<dyn TemplateRenderer>>,
    assets: Option<Arc<dyn AssetTags>>,
    routes: RouteTable,
}

impl InertiaBuilder {
    pub fn with_templates(mut self, templates: impl TemplateRenderer + 'static) -> Self {
        let templates: Arc<dyn TemplateRenderer> = Arc::new(templates);
        self.templates = Some(templates);
        self
    }

    pub fn with_assets(mut self, assets: impl AssetTags + 'static) -> Self {
        let assets: Arc<dyn AssetTags> = Arc::new(assets);
        self.assets = Some(assets);
        self
    }

    /// Named routes exported to the client.
    pub fn with_routes(mut self, routes: RouteTable) -> Self {
        self.routes = routes;
        self
    }

    /// Validates the configuration and builds the adapter.
    pub fn build(self) -> Result<Inertia, ConfigError> {
        let config = self.config;
        config.validate()?;

        let fingerprinter = Fingerprinter::new(&config.inertia.assets_path)
            .with_prefix_bytes(config.inertia.prefix_bytes);
        let templates: Arc<dyn TemplateRenderer> = match self.templates {
            Some(templates) => templates,
            None => Arc::new(FileTemplates::new(&config.inertia.root)),
        };
        let assets: Arc<dyn AssetTags> = match self.assets {
            Some(assets) => assets,
            None => Arc::new(ViteAssets::new(&config.vite.build_dir, &config.vite.hot_file)),
        };

        if self.routes.is_empty() {
            tracing::debug!("No named routes registered; the client route table will be empty");
        }
        tracing::debug!(
            assets = %config.inertia.assets_path,
            template = %config.inertia.template,
            routes = self.routes.len(),
            "Inertia adapter configured"
        );

        Ok(Inertia {
            inner: Arc::new(InertiaInner {
                config,
                fingerprinter,
                shared: SharedProps::new(),
                view_data: RwLock::new(Props::new()),
                templates,
                assets,
                routes: self.routes,
            }),
        })
    }
}

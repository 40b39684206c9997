//! Section registry.
//!
//! Maps section keys to resolvers and resolves a page's sections
//! concurrently. A failing or panicking resolver costs its own section and
//! nothing else; `render_sections` itself never fails.

use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::join_all;
use tracing::{debug, warn};

use crate::observability::DIAGNOSTICS_TARGET;
use crate::sections::resolvers::{builtin, files};
use crate::sections::{LoaderContext, Renderable, ResolverEnv, SectionKey, SectionResolver};

/// Resolver map plus the services resolvers run against.
pub struct SectionRegistry {
    resolvers: HashMap<SectionKey, Arc<dyn SectionResolver>>,
    env: ResolverEnv,
}

impl std::fmt::Debug for SectionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SectionRegistry")
            .field("sections", &self.keys())
            .field("env", &self.env)
            .finish()
    }
}

impl SectionRegistry {
    /// Creates a registry with no resolvers.
    #[must_use]
    pub fn new(env: ResolverEnv) -> Self {
        Self {
            resolvers: HashMap::new(),
            env,
        }
    }

    /// Creates a registry with every built-in resolver.
    #[must_use]
    pub fn with_defaults(env: ResolverEnv) -> Self {
        let resolvers: HashMap<SectionKey, Arc<dyn SectionResolver>> = SectionKey::ALL
            .into_iter()
            .map(|key| (key, Arc::from(builtin(key))))
            .collect();
        Self { resolvers, env }
    }

    /// Installs `resolver` for `key`, replacing any existing one.
    pub fn register<R>(&mut self, key: SectionKey, resolver: R) -> &mut Self
    where
        R: SectionResolver + 'static,
    {
        self.resolvers.insert(key, Arc::new(resolver));
        self
    }

    /// Registered keys, in default page order.
    #[must_use]
    pub fn keys(&self) -> Vec<SectionKey> {
        SectionKey::ALL
            .into_iter()
            .filter(|key| self.resolvers.contains_key(key))
            .collect()
    }

    /// The services handed to resolvers.
    #[must_use]
    pub const fn env(&self) -> &ResolverEnv {
        &self.env
    }

    /// Resolves `keys` for one component.
    ///
    /// Unknown or unregistered keys are dropped before anything runs. The
    /// rest run concurrently; element `i` of the result belongs to the
    /// `i`-th surviving key. A resolver error or panic yields `None` at its
    /// position.
    pub async fn render_sections<S: AsRef<str>>(
        &self,
        keys: &[S],
        ctx: &LoaderContext,
    ) -> Vec<Option<Renderable>> {
        self.resolve_keys(keys, ctx)
            .await
            .into_iter()
            .map(|(_, renderable)| renderable)
            .collect()
    }

    /// Section keys for a component page.
    ///
    /// Uses the component's `sections.yml` list when present, otherwise
    /// every section in default order.
    pub async fn page_sections(&self, ctx: &LoaderContext) -> Vec<String> {
        match self
            .env
            .loader
            .find_data::<Vec<String>>(&ctx.slug, files::SECTIONS)
            .await
        {
            Some(keys) => Vec::clone(&keys),
            None => SectionKey::ALL
                .iter()
                .map(|key| key.as_str().to_string())
                .collect(),
        }
    }

    /// Resolves the page's sections and keeps the non-empty ones.
    pub async fn render_page(&self, ctx: &LoaderContext) -> Vec<(SectionKey, Renderable)> {
        let keys = self.page_sections(ctx).await;
        self.resolve_keys(keys.as_slice(), ctx)
            .await
            .into_iter()
            .filter_map(|(key, renderable)| renderable.map(|r| (key, r)))
            .collect()
    }

    async fn resolve_keys<S: AsRef<str>>(
        &self,
        keys: &[S],
        ctx: &LoaderContext,
    ) -> Vec<(SectionKey, Option<Renderable>)> {
        let selected: Vec<(SectionKey, Arc<dyn SectionResolver>)> = keys
            .iter()
            .filter_map(|raw| {
                let raw = raw.as_ref();
                let Ok(key) = raw.parse::<SectionKey>() else {
                    warn!(target: DIAGNOSTICS_TARGET, slug = %ctx.slug, section = raw, "unknown section key dropped");
                    return None;
                };
                let Some(resolver) = self.resolvers.get(&key) else {
                    warn!(target: DIAGNOSTICS_TARGET, slug = %ctx.slug, section = raw, "no resolver registered for section");
                    return None;
                };
                Some((key, Arc::clone(resolver)))
            })
            .collect();

        debug!(slug = %ctx.slug, sections = selected.len(), "resolving sections");

        let calls = selected.into_iter().map(|(key, resolver)| async move {
            let outcome = AssertUnwindSafe(resolver.resolve(ctx, &self.env))
                .catch_unwind()
                .await;
            let renderable = match outcome {
                Ok(Ok(renderable)) => renderable,
                Ok(Err(e)) => {
                    warn!(target: DIAGNOSTICS_TARGET, slug = %ctx.slug, section = %key, error = %e, "section failed to resolve");
                    None
                }
                Err(_) => {
                    warn!(target: DIAGNOSTICS_TARGET, slug = %ctx.slug, section = %key, "section resolver panicked");
                    None
                }
            };
            (key, renderable)
        });

        join_all(calls).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use serde_json::json;

    use crate::catalog::CatalogManager;
    use crate::content::{ContentCache, ContentIndex, ContentLoader, MemorySource};
    use crate::error::SectionError;

    fn env(files: &[(&str, &str)]) -> ResolverEnv {
        let mut source = MemorySource::new();
        let mut entries = Vec::new();
        for (key, text) in files {
            let path = format!("/content/{key}");
            source = source.with_file(&path, *text);
            entries.push(((*key).to_string(), path));
        }
        ResolverEnv::new(
            ContentLoader::new(
                Arc::new(ContentIndex::from_entries(entries)),
                Arc::new(source),
                Arc::new(ContentCache::new()),
            ),
            Arc::new(CatalogManager::new("/catalogs", Arc::new(MemorySource::new()))),
        )
    }

    fn ctx() -> LoaderContext {
        LoaderContext::new("button", "/components/button")
    }

    struct Fixed(&'static str, Duration);

    #[async_trait]
    impl SectionResolver for Fixed {
        async fn resolve(
            &self,
            _ctx: &LoaderContext,
            _env: &ResolverEnv,
        ) -> Result<Option<Renderable>, SectionError> {
            tokio::time::sleep(self.1).await;
            Ok(Some(Renderable::island(self.0, [("value", json!(self.0))])))
        }
    }

    struct Failing;

    #[async_trait]
    impl SectionResolver for Failing {
        async fn resolve(
            &self,
            _ctx: &LoaderContext,
            _env: &ResolverEnv,
        ) -> Result<Option<Renderable>, SectionError> {
            Err(SectionError::Failed {
                section: "anatomy".to_string(),
                message: "boom".to_string(),
            })
        }
    }

    struct Panicking;

    #[async_trait]
    impl SectionResolver for Panicking {
        async fn resolve(
            &self,
            _ctx: &LoaderContext,
            _env: &ResolverEnv,
        ) -> Result<Option<Renderable>, SectionError> {
            panic!("resolver bug")
        }
    }

    struct Counting(Arc<AtomicUsize>);

    #[async_trait]
    impl SectionResolver for Counting {
        async fn resolve(
            &self,
            _ctx: &LoaderContext,
            _env: &ResolverEnv,
        ) -> Result<Option<Renderable>, SectionError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(None)
        }
    }

    #[tokio::test]
    async fn unknown_keys_are_dropped() {
        let registry =
            SectionRegistry::with_defaults(env(&[("button/overview.yml", "summary: Hi")]));
        let result = registry
            .render_sections(&["overview", "bogusKey"], &ctx())
            .await;
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].as_ref().and_then(Renderable::kind), Some("overview"));
    }

    #[tokio::test]
    async fn failure_is_isolated_and_order_kept() {
        let mut registry = SectionRegistry::new(env(&[]));
        registry
            .register(SectionKey::Anatomy, Failing)
            .register(SectionKey::Props, Fixed("props", Duration::ZERO));

        let result = registry
            .render_sections(&["anatomy", "props"], &ctx())
            .await;
        assert_eq!(result.len(), 2);
        assert!(result[0].is_none());
        assert_eq!(result[1].as_ref().and_then(Renderable::kind), Some("props"));

        let result = registry
            .render_sections(&["props", "anatomy"], &ctx())
            .await;
        assert_eq!(result[0].as_ref().and_then(Renderable::kind), Some("props"));
        assert!(result[1].is_none());
    }

    #[tokio::test]
    async fn panic_is_isolated() {
        let mut registry = SectionRegistry::new(env(&[]));
        registry
            .register(SectionKey::Kpis, Panicking)
            .register(SectionKey::Props, Fixed("props", Duration::ZERO));

        let result = registry.render_sections(&["kpis", "props"], &ctx()).await;
        assert!(result[0].is_none());
        assert!(result[1].is_some());
    }

    #[tokio::test]
    async fn order_follows_keys_not_completion() {
        let mut registry = SectionRegistry::new(env(&[]));
        registry
            .register(SectionKey::Overview, Fixed("slow", Duration::from_millis(40)))
            .register(SectionKey::Props, Fixed("fast", Duration::ZERO));

        let result = registry
            .render_sections(&["overview", "props"], &ctx())
            .await;
        let kinds: Vec<_> = result
            .iter()
            .map(|r| r.as_ref().and_then(Renderable::kind))
            .collect();
        assert_eq!(kinds, vec![Some("slow"), Some("fast")]);
    }

    #[tokio::test(start_paused = true)]
    async fn sections_run_concurrently() {
        let mut registry = SectionRegistry::new(env(&[]));
        registry
            .register(SectionKey::Overview, Fixed("a", Duration::from_millis(200)))
            .register(SectionKey::Props, Fixed("b", Duration::from_millis(200)))
            .register(SectionKey::Kpis, Fixed("c", Duration::from_millis(200)));

        // Paused clock: three sequential sleeps would advance it by 600ms.
        let started = tokio::time::Instant::now();
        registry
            .render_sections(&["overview", "props", "kpis"], &ctx())
            .await;
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(200), "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(400), "{elapsed:?}");
    }

    #[tokio::test]
    async fn unregistered_key_is_dropped_before_running() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut registry = SectionRegistry::new(env(&[]));
        registry.register(SectionKey::Props, Counting(Arc::clone(&calls)));

        let result = registry
            .render_sections(&["overview", "props", "props"], &ctx())
            .await;
        assert_eq!(result, vec![None, None]);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn empty_key_list() {
        let registry = SectionRegistry::with_defaults(env(&[]));
        let keys: [&str; 0] = [];
        assert!(registry.render_sections(&keys, &ctx()).await.is_empty());
    }

    #[tokio::test]
    async fn page_sections_default_to_all() {
        let registry = SectionRegistry::with_defaults(env(&[]));
        let keys = registry.page_sections(&ctx()).await;
        assert_eq!(keys.len(), SectionKey::ALL.len());
        assert_eq!(keys[0], "overview");
    }

    #[tokio::test]
    async fn render_page_uses_sections_file() {
        let registry = SectionRegistry::with_defaults(env(&[
            ("button/sections.yml", "- kpis\n- nonsense\n- overview\n"),
            ("button/overview.yml", "summary: Hi"),
            ("button/kpis.yml", "adoption: 4"),
            ("button/anatomy.yml", "parts:\n  - name: Label\n"),
        ]));
        let page = registry.render_page(&ctx()).await;
        let keys: Vec<SectionKey> = page.iter().map(|(key, _)| *key).collect();
        assert_eq!(keys, vec![SectionKey::Kpis, SectionKey::Overview]);
    }

    #[test]
    fn defaults_register_every_key() {
        let registry = SectionRegistry::with_defaults(env(&[]));
        assert_eq!(registry.keys(), SectionKey::ALL.to_vec());
    }
}

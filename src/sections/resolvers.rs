//! Built-in section resolvers.
//!
//! Each resolver reads a fixed file from the component directory; the two
//! reference sections additionally join against a global catalog.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::catalog::{CatalogName, Reference};
use crate::error::SectionError;
use crate::sections::{LoaderContext, Renderable, ResolverEnv, SectionKey, SectionResolver};

/// Content file names, per section.
pub mod files {
    /// Overview data.
    pub const OVERVIEW: &str = "overview.yml";
    /// Anatomy data.
    pub const ANATOMY: &str = "anatomy.yml";
    /// Code props.
    pub const PROPS: &str = "code-props.yml";
    /// Design layers.
    pub const DESIGN_LAYERS: &str = "design-layers.yml";
    /// Accessibility notes.
    pub const ACCESSIBILITY: &str = "accessibility.yml";
    /// KPIs.
    pub const KPIS: &str = "kpis.yml";
    /// References into the systems catalog.
    pub const IMPLEMENTATIONS: &str = "implementations.yml";
    /// References into the Figma-kits catalog.
    pub const FIGMA_KITS: &str = "figma.yml";
    /// Long-form MDX.
    pub const CONTENT: &str = "index.mdx";
    /// Optional per-component section order.
    pub const SECTIONS: &str = "sections.yml";
}

/// Returns the built-in resolver for `key`.
#[must_use]
pub fn builtin(key: SectionKey) -> Box<dyn SectionResolver> {
    match key {
        SectionKey::Overview => Box::new(OverviewSection),
        SectionKey::Anatomy => Box::new(AnatomySection),
        SectionKey::Props => Box::new(PropsSection),
        SectionKey::DesignLayers => Box::new(DataSection::new(
            files::DESIGN_LAYERS,
            "design-layers",
            "layers",
        )),
        SectionKey::Accessibility => Box::new(DataSection::new(
            files::ACCESSIBILITY,
            "accessibility",
            "accessibility",
        )),
        SectionKey::Kpis => Box::new(DataSection::new(files::KPIS, "kpis", "kpis")),
        SectionKey::Implementations => Box::new(CatalogSection::new(
            files::IMPLEMENTATIONS,
            CatalogName::Systems,
            "implementations",
            "systems",
        )),
        SectionKey::FigmaKits => Box::new(CatalogSection::new(
            files::FIGMA_KITS,
            CatalogName::FigmaKits,
            "figma-kits",
            "kits",
        )),
        SectionKey::Content => Box::new(ContentSection),
    }
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
        Value::String(s) => s.trim().is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

// ============================================================================
// Overview
// ============================================================================

/// `overview.yml`: a mapping of summary fields, plus title and status from
/// the page context.
#[derive(Debug, Clone, Copy, Default)]
pub struct OverviewSection;

#[async_trait]
impl SectionResolver for OverviewSection {
    async fn resolve(
        &self,
        ctx: &LoaderContext,
        env: &ResolverEnv,
    ) -> Result<Option<Renderable>, SectionError> {
        let Some(overview) = env.loader.find_data::<Value>(&ctx.slug, files::OVERVIEW).await
        else {
            return Ok(None);
        };
        if is_empty_value(&overview) {
            return Ok(None);
        }
        if !overview.is_object() {
            return Err(SectionError::Schema {
                section: SectionKey::Overview.to_string(),
                message: "overview.yml must be a mapping".to_string(),
            });
        }

        let mut data = vec![("overview", Value::clone(&overview))];
        if let Some(title) = &ctx.title {
            data.push(("title", json!(title)));
        }
        if let Some(status) = &ctx.status {
            data.push(("status", json!(status)));
        }
        Ok(Some(Renderable::island("overview", data)))
    }
}

// ============================================================================
// Anatomy
// ============================================================================

/// Parsed `anatomy.yml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anatomy {
    /// Annotated illustration, relative to the component directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Named parts, in callout order.
    #[serde(default)]
    pub parts: Vec<AnatomyPart>,
}

/// One named part of a component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnatomyPart {
    /// Part name.
    pub name: String,

    /// What the part is for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Whether every instance has this part.
    #[serde(default)]
    pub required: bool,
}

/// `anatomy.yml`; empty when there are no parts.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnatomySection;

#[async_trait]
impl SectionResolver for AnatomySection {
    async fn resolve(
        &self,
        ctx: &LoaderContext,
        env: &ResolverEnv,
    ) -> Result<Option<Renderable>, SectionError> {
        let Some(anatomy) = env.loader.find_data::<Anatomy>(&ctx.slug, files::ANATOMY).await
        else {
            return Ok(None);
        };
        if anatomy.parts.is_empty() {
            return Ok(None);
        }
        let data = serde_json::to_value(&*anatomy).map_err(|e| SectionError::Failed {
            section: SectionKey::Anatomy.to_string(),
            message: e.to_string(),
        })?;
        Ok(Some(Renderable::island("anatomy", [("anatomy", data)])))
    }
}

// ============================================================================
// Props
// ============================================================================

/// One code-level prop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropSpec {
    /// Prop name.
    pub name: String,

    /// Type expression as shown in docs.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub ty: Option<String>,

    /// Default value, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    /// Whether the prop must be given.
    #[serde(default)]
    pub required: bool,

    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// `code-props.yml` is either a bare list or `{ props: [...] }`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PropsFile {
    /// `- name: ...`
    List(Vec<PropSpec>),
    /// `props: [...]`
    Wrapped {
        /// The props.
        props: Vec<PropSpec>,
    },
}

impl PropsFile {
    /// The props, whichever form was used.
    #[must_use]
    pub fn props(&self) -> &[PropSpec] {
        match self {
            Self::List(props) | Self::Wrapped { props } => props,
        }
    }
}

/// `code-props.yml`; nameless props are a content error.
#[derive(Debug, Clone, Copy, Default)]
pub struct PropsSection;

#[async_trait]
impl SectionResolver for PropsSection {
    async fn resolve(
        &self,
        ctx: &LoaderContext,
        env: &ResolverEnv,
    ) -> Result<Option<Renderable>, SectionError> {
        let Some(file) = env.loader.find_data::<PropsFile>(&ctx.slug, files::PROPS).await else {
            return Ok(None);
        };
        let props = file.props();
        if props.is_empty() {
            return Ok(None);
        }
        if let Some(index) = props.iter().position(|p| p.name.trim().is_empty()) {
            return Err(SectionError::Schema {
                section: SectionKey::Props.to_string(),
                message: format!("prop #{} has an empty name", index + 1),
            });
        }
        let data = serde_json::to_value(props).map_err(|e| SectionError::Failed {
            section: SectionKey::Props.to_string(),
            message: e.to_string(),
        })?;
        Ok(Some(Renderable::island("props", [("props", data)])))
    }
}

// ============================================================================
// Free-form data sections
// ============================================================================

/// A section that passes one data file through unchanged.
#[derive(Debug, Clone, Copy)]
pub struct DataSection {
    filename: &'static str,
    kind: &'static str,
    field: &'static str,
}

impl DataSection {
    /// Reads `filename` and exposes it as `field` of an island of `kind`.
    #[must_use]
    pub const fn new(filename: &'static str, kind: &'static str, field: &'static str) -> Self {
        Self {
            filename,
            kind,
            field,
        }
    }
}

#[async_trait]
impl SectionResolver for DataSection {
    async fn resolve(
        &self,
        ctx: &LoaderContext,
        env: &ResolverEnv,
    ) -> Result<Option<Renderable>, SectionError> {
        let value = env.loader.find_data::<Value>(&ctx.slug, self.filename).await;
        Ok(value
            .filter(|v| !is_empty_value(v))
            .map(|v| Renderable::island(self.kind, [(self.field, Value::clone(&v))])))
    }
}

// ============================================================================
// Catalog-joined sections
// ============================================================================

/// A list of references joined against a global catalog.
#[derive(Debug, Clone, Copy)]
pub struct CatalogSection {
    filename: &'static str,
    catalog: CatalogName,
    kind: &'static str,
    field: &'static str,
}

impl CatalogSection {
    /// Reads references from `filename` and joins them against `catalog`.
    #[must_use]
    pub const fn new(
        filename: &'static str,
        catalog: CatalogName,
        kind: &'static str,
        field: &'static str,
    ) -> Self {
        Self {
            filename,
            catalog,
            kind,
            field,
        }
    }
}

#[async_trait]
impl SectionResolver for CatalogSection {
    async fn resolve(
        &self,
        ctx: &LoaderContext,
        env: &ResolverEnv,
    ) -> Result<Option<Renderable>, SectionError> {
        let Some(references) = env
            .loader
            .find_data::<Vec<Reference>>(&ctx.slug, self.filename)
            .await
        else {
            return Ok(None);
        };

        let merged = env
            .catalogs
            .resolve(self.catalog, &ctx.slug, &references)
            .await;
        if merged.is_empty() {
            return Ok(None);
        }

        let data = serde_json::to_value(&merged).map_err(|e| SectionError::Failed {
            section: self.kind.to_string(),
            message: e.to_string(),
        })?;
        Ok(Some(Renderable::island(self.kind, [(self.field, data)])))
    }
}

// ============================================================================
// MDX content
// ============================================================================

/// `index.mdx`, handed over as a document.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentSection;

#[async_trait]
impl SectionResolver for ContentSection {
    async fn resolve(
        &self,
        ctx: &LoaderContext,
        env: &ResolverEnv,
    ) -> Result<Option<Renderable>, SectionError> {
        Ok(env
            .loader
            .find_mdx(&ctx.slug, files::CONTENT)
            .await
            .map(|document| Renderable::Document { document }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::catalog::CatalogManager;
    use crate::content::{ContentCache, ContentIndex, ContentLoader, MemorySource};

    fn env(files: &[(&str, &str)], catalogs: &[(&str, &str)]) -> ResolverEnv {
        let mut source = MemorySource::new();
        let mut entries = Vec::new();
        for (key, text) in files {
            let path = format!("/content/{key}");
            source = source.with_file(&path, *text);
            entries.push(((*key).to_string(), path));
        }
        let mut catalog_source = MemorySource::new();
        for (name, text) in catalogs {
            catalog_source = catalog_source.with_file(format!("/catalogs/{name}"), *text);
        }
        let loader = ContentLoader::new(
            Arc::new(ContentIndex::from_entries(entries)),
            Arc::new(source),
            Arc::new(ContentCache::new()),
        );
        ResolverEnv::new(
            loader,
            Arc::new(CatalogManager::new("/catalogs", Arc::new(catalog_source))),
        )
    }

    fn ctx() -> LoaderContext {
        LoaderContext::new("button", "/components/button")
    }

    fn island_data(renderable: &Renderable) -> &serde_json::Map<String, Value> {
        match renderable {
            Renderable::Island { data, .. } => data,
            Renderable::Document { .. } => panic!("expected island"),
        }
    }

    #[tokio::test]
    async fn overview_includes_context_fields() {
        let env = env(&[("button/overview.yml", "summary: Triggers an action")], &[]);
        let ctx = ctx().with_title("Button").with_status("stable");

        let section = OverviewSection.resolve(&ctx, &env).await.unwrap().unwrap();
        assert_eq!(section.kind(), Some("overview"));
        let data = island_data(&section);
        assert_eq!(data["overview"]["summary"], "Triggers an action");
        assert_eq!(data["title"], "Button");
        assert_eq!(data["status"], "stable");
    }

    #[tokio::test]
    async fn overview_must_be_mapping() {
        let env = env(&[("button/overview.yml", "- a\n- b\n")], &[]);
        let err = OverviewSection.resolve(&ctx(), &env).await.unwrap_err();
        assert!(matches!(err, SectionError::Schema { .. }));
    }

    #[tokio::test]
    async fn missing_file_is_none() {
        let env = env(&[], &[]);
        for key in SectionKey::ALL {
            let result = builtin(key).resolve(&ctx(), &env).await.unwrap();
            assert!(result.is_none(), "{key} should be empty");
        }
    }

    #[tokio::test]
    async fn anatomy_without_parts_is_none() {
        let env = env(&[("button/anatomy.yml", "image: anatomy.png\nparts: []\n")], &[]);
        assert!(AnatomySection.resolve(&ctx(), &env).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn anatomy_parts() {
        let env = env(
            &[(
                "button/anatomy.yml",
                "parts:\n  - name: Label\n    required: true\n  - name: Icon\n",
            )],
            &[],
        );
        let section = AnatomySection.resolve(&ctx(), &env).await.unwrap().unwrap();
        let parts = &island_data(&section)["anatomy"]["parts"];
        assert_eq!(parts[0]["name"], "Label");
        assert_eq!(parts[0]["required"], true);
        assert_eq!(parts[1]["required"], false);
    }

    #[tokio::test]
    async fn props_accepts_both_forms() {
        for text in [
            "- name: variant\n  type: \"'primary' | 'secondary'\"\n",
            "props:\n  - name: variant\n    type: \"'primary' | 'secondary'\"\n",
        ] {
            let env = env(&[("button/code-props.yml", text)], &[]);
            let section = PropsSection.resolve(&ctx(), &env).await.unwrap().unwrap();
            assert_eq!(island_data(&section)["props"][0]["name"], "variant");
        }
    }

    #[tokio::test]
    async fn nameless_prop_is_schema_error() {
        let env = env(&[("button/code-props.yml", "- name: ''\n")], &[]);
        let err = PropsSection.resolve(&ctx(), &env).await.unwrap_err();
        assert!(matches!(err, SectionError::Schema { .. }));
    }

    #[tokio::test]
    async fn data_section_passes_value_through() {
        let env = env(&[("button/kpis.yml", "adoption: 12\ncoverage: 0.8\n")], &[]);
        let section = builtin(SectionKey::Kpis)
            .resolve(&ctx(), &env)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(section.kind(), Some("kpis"));
        assert_eq!(island_data(&section)["kpis"]["adoption"], 12);
    }

    #[tokio::test]
    async fn implementations_join_systems_catalog() {
        let env = env(
            &[(
                "button/implementations.yml",
                "- slug: carbon\n  docs: https://carbon/button\n- slug: retired\n",
            )],
            &[("systems.yml", "- slug: carbon\n  name: Carbon\n")],
        );
        let section = builtin(SectionKey::Implementations)
            .resolve(&ctx(), &env)
            .await
            .unwrap()
            .unwrap();
        let systems = island_data(&section)["systems"].as_array().unwrap();
        assert_eq!(systems.len(), 1);
        assert_eq!(systems[0]["name"], "Carbon");
        assert_eq!(systems[0]["docs"], "https://carbon/button");
    }

    #[tokio::test]
    async fn fully_unresolved_references_are_none() {
        let env = env(
            &[("button/figma.yml", "- slug: gone\n")],
            &[("figma-kits.yml", "- slug: material-kit\n")],
        );
        let result = builtin(SectionKey::FigmaKits)
            .resolve(&ctx(), &env)
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn content_section_returns_document() {
        let env = env(&[("button/index.mdx", "# Button\n")], &[]);
        let section = ContentSection.resolve(&ctx(), &env).await.unwrap().unwrap();
        match section {
            Renderable::Document { document } => assert_eq!(document.headings[0].text, "Button"),
            Renderable::Island { .. } => panic!("expected document"),
        }
    }
}

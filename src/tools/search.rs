//! Name search over the loaded overlays with zoom-to-extent on a hit

use crate::{
    core::config::SearchConfig,
    engine::{feature::Feature, FitOptions, MapEngine},
    layers::registry::LayerRegistry,
};
use serde::{Deserialize, Serialize};

/// Folds a family of spellings onto one canonical search term
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AliasRule {
    /// Substrings that trigger the rule
    pub triggers: Vec<String>,
    pub canonical: String,
}

impl AliasRule {
    pub fn new(triggers: &[&str], canonical: &str) -> Self {
        Self {
            triggers: triggers.iter().map(|t| t.to_lowercase()).collect(),
            canonical: canonical.to_lowercase(),
        }
    }

    /// Same rule with triggers and canonical term lowercased. Rules read
    /// from a config file keep whatever case they were written in.
    pub fn lowercased(&self) -> Self {
        Self {
            triggers: self.triggers.iter().map(|t| t.to_lowercase()).collect(),
            canonical: self.canonical.to_lowercase(),
        }
    }

    /// Whether the lowercased query contains any trigger
    pub fn applies(&self, query: &str) -> bool {
        self.triggers.iter().any(|t| query.contains(t.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// A feature matched and the view was fit to it
    Found {
        name: String,
        layer: String,
        feature: Feature,
    },
    NotFound {
        query: String,
    },
    /// Blank query; nothing was searched
    EmptyQuery,
}

impl SearchOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, SearchOutcome::Found { .. })
    }

    /// User facing message for the outcome
    pub fn notice(&self) -> Option<String> {
        match self {
            SearchOutcome::Found { name, .. } => Some(format!("Zooming to: {}", name)),
            SearchOutcome::NotFound { query } => Some(format!(
                "State or District \"{}\" not found in the loaded data. Check your GeoJSON files.",
                query
            )),
            SearchOutcome::EmptyQuery => None,
        }
    }
}

pub struct SearchNavigator {
    config: SearchConfig,
}

impl SearchNavigator {
    pub fn new(config: &SearchConfig) -> Self {
        let mut config = config.clone();
        config.aliases = config.aliases.iter().map(AliasRule::lowercased).collect();
        Self { config }
    }

    /// Trims, lowercases and applies the first matching alias rule
    pub fn normalize(&self, query: &str) -> String {
        let query = query.trim().to_lowercase();
        match self.config.aliases.iter().find(|rule| rule.applies(&query)) {
            Some(rule) => rule.canonical.clone(),
            None => query,
        }
    }

    /// First feature, in configured layer order then load order, whose name
    /// fields contain the normalized query. Does not touch the view.
    pub fn find<E: MapEngine + ?Sized>(
        &self,
        engine: &E,
        registry: &LayerRegistry,
        query: &str,
    ) -> SearchOutcome {
        let needle = self.normalize(query);
        if needle.is_empty() {
            return SearchOutcome::EmptyQuery;
        }

        for layer_id in &self.config.layers {
            let overlay = match registry.overlay(layer_id) {
                Some(overlay) => overlay,
                None => continue,
            };

            if !engine.source_ready(overlay.handle) {
                log::warn!("{} data is still loading or failed.", overlay.title);
                continue;
            }

            let hit = engine
                .source_features(overlay.handle)
                .into_iter()
                .find(|feature| self.searchable_text(feature).contains(&needle));

            if let Some(feature) = hit {
                return SearchOutcome::Found {
                    name: self.display_name(&feature, query),
                    layer: layer_id.clone(),
                    feature,
                };
            }
        }

        SearchOutcome::NotFound {
            query: query.trim().to_string(),
        }
    }

    /// [`find`](Self::find), then fits the view to the hit's extent
    pub fn find_and_navigate<E: MapEngine + ?Sized>(
        &self,
        engine: &mut E,
        registry: &LayerRegistry,
        query: &str,
    ) -> SearchOutcome {
        let outcome = self.find(engine, registry, query);

        if let SearchOutcome::Found { name, feature, .. } = &outcome {
            match feature.geometry.extent() {
                Some(extent) => {
                    log::info!("zooming to {}", name);
                    engine.fit_extent(
                        extent,
                        FitOptions::new(self.config.fit_duration_ms, self.config.fit_padding_px),
                    );
                }
                None => log::warn!("{} has no extent to zoom to", name),
            }
        }
        outcome
    }

    fn searchable_text(&self, feature: &Feature) -> String {
        self.config
            .name_fields
            .iter()
            .filter_map(|field| feature.string_property(field))
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }

    fn display_name(&self, feature: &Feature, query: &str) -> String {
        self.config
            .display_name_fields
            .iter()
            .filter_map(|field| feature.string_property(field))
            .find(|name| !name.is_empty())
            .unwrap_or_else(|| query.trim())
            .to_uppercase()
    }
}

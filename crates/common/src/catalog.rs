use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Animation played on a symbol when it is part of a winning run.
pub const WIN_ANIMATION: &str = "cascade";

/// Compact index of a symbol type within the catalog of one session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolKind(pub usize);

/// Tween parameters of one named animation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimationSpec {
    /// Playback length at the nominal 60fps frame rate.
    pub frames: usize,
    pub opacity: (f64, f64),
}

impl Default for AnimationSpec {
    fn default() -> Self {
        AnimationSpec {
            frames: 30,
            opacity: (1., 0.),
        }
    }
}

/// Visual configuration of one symbol type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SymbolStyle {
    pub name: String,
    pub color: String,
    pub animations: BTreeMap<String, AnimationSpec>,
}

impl SymbolStyle {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        let mut animations = BTreeMap::new();
        animations.insert(WIN_ANIMATION.to_string(), AnimationSpec::default());
        SymbolStyle {
            name: name.into(),
            color: color.into(),
            animations,
        }
    }

    pub fn animation(&self, name: &str) -> Option<&AnimationSpec> {
        self.animations.get(name)
    }

    /// Base style with the override's fields applied on top.
    pub fn merged(&self, over: &StyleOverride) -> SymbolStyle {
        let mut style = self.clone();
        if let Some(color) = &over.color {
            style.color = color.clone();
        }
        for (name, spec) in &over.animations {
            style.animations.insert(name.clone(), spec.clone());
        }
        style
    }
}

/// Partial style applied on top of the catalog entry when pooling a symbol.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleOverride {
    pub color: Option<String>,
    pub animations: BTreeMap<String, AnimationSpec>,
}

/// Immutable per-session mapping from symbol type to its visual configuration.
///
/// Kinds are indices into the key-ordered entry list, so they stay stable for
/// the whole session. Lookups of a kind the catalog does not know fall back to
/// a neutral placeholder instead of failing.
#[derive(Clone, Debug, PartialEq)]
pub struct SymbolCatalog {
    styles: Vec<SymbolStyle>,
    placeholder: SymbolStyle,
}

impl SymbolCatalog {
    pub fn new(symbols: &BTreeMap<String, SymbolStyle>) -> Self {
        SymbolCatalog {
            styles: symbols.values().cloned().collect(),
            placeholder: SymbolStyle::new("placeholder", "#808080"),
        }
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    pub fn kinds(&self) -> impl Iterator<Item = SymbolKind> {
        (0..self.styles.len()).map(SymbolKind)
    }

    pub fn style(&self, kind: SymbolKind) -> Option<&SymbolStyle> {
        self.styles.get(kind.0)
    }

    /// Style of the kind, or the neutral placeholder for unknown kinds.
    pub fn style_or_placeholder(&self, kind: SymbolKind) -> &SymbolStyle {
        self.styles.get(kind.0).unwrap_or(&self.placeholder)
    }

    pub fn placeholder(&self) -> &SymbolStyle {
        &self.placeholder
    }

    pub fn kind_by_name(&self, name: &str) -> Option<SymbolKind> {
        self.styles
            .iter()
            .position(|style| style.name == name)
            .map(SymbolKind)
    }

    /// Uniform random kind, or `None` when the catalog is empty.
    pub fn random_kind(&self, rng: &mut impl Rng) -> Option<SymbolKind> {
        if self.styles.is_empty() {
            None
        } else {
            Some(SymbolKind(rng.gen_range(0..self.styles.len())))
        }
    }

    pub fn random_kinds(&self, rng: &mut impl Rng, count: usize) -> Vec<SymbolKind> {
        (0..count)
            .filter_map(|_| self.random_kind(rng))
            .collect()
    }
}

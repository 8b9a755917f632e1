//! Symbol palette: categorised LaTeX symbols with accordion selection.

mod symbols;

pub use symbols::BUILTIN;

use crate::error::ConfigError;
use crate::parser::Delimiter;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// A clickable symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolEntry {
    /// Glyph shown on the button.
    pub label: Cow<'static, str>,
    /// Raw LaTeX, without delimiters.
    pub latex: Cow<'static, str>,
    /// Tooltip text.
    #[serde(default)]
    pub title: Cow<'static, str>,
}

impl SymbolEntry {
    /// The fragment inserted for this symbol: always inline-delimited.
    pub fn fragment(&self) -> String {
        Delimiter::Inline.wrap(&self.latex)
    }
}

/// A named group of symbols.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolCategory {
    pub name: Cow<'static, str>,
    pub symbols: Cow<'static, [SymbolEntry]>,
}

/// Palette section of the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PaletteConfig {
    /// Drop the built-in categories and use only the configured ones.
    pub replace_defaults: bool,
    #[serde(rename = "category")]
    pub categories: Vec<SymbolCategory>,
}

impl PaletteConfig {
    /// Resolve the final category list.
    pub fn categories(&self) -> Result<Vec<SymbolCategory>, ConfigError> {
        for category in &self.categories {
            if category.name.trim().is_empty() {
                return Err(ConfigError::Palette("category with an empty name".into()));
            }
            if let Some(entry) = category.symbols.iter().find(|s| s.latex.trim().is_empty()) {
                return Err(ConfigError::Palette(format!(
                    "symbol '{}' in '{}' has no LaTeX",
                    entry.label, category.name
                )));
            }
        }

        let mut categories = if self.replace_defaults {
            Vec::new()
        } else {
            BUILTIN.to_vec()
        };
        categories.extend(self.categories.iter().cloned());

        if categories.is_empty() {
            return Err(ConfigError::Palette("no categories".into()));
        }
        Ok(categories)
    }
}

/// What the embedder should do with a pointer-down on a palette button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerDown {
    /// Suppress the default focus transfer, so the text field keeps the
    /// cursor it recorded before the click.
    PreventDefault,
}

/// Callback receiving a delimiter-wrapped fragment.
pub type SelectCallback = Box<dyn FnMut(&str)>;

/// A symbol palette with single-open accordion categories.
pub struct Palette {
    categories: Vec<SymbolCategory>,
    open: Option<usize>,
    on_select: Option<SelectCallback>,
}

impl Palette {
    /// A palette over the built-in categories.
    pub fn new() -> Self {
        Self::with_categories(BUILTIN.to_vec())
    }

    pub fn with_categories(categories: Vec<SymbolCategory>) -> Self {
        Self {
            categories,
            open: None,
            on_select: None,
        }
    }

    pub fn from_config(config: &PaletteConfig) -> Result<Self, ConfigError> {
        Ok(Self::with_categories(config.categories()?))
    }

    /// Register the callback that receives selected fragments.
    pub fn on_select(&mut self, callback: impl FnMut(&str) + 'static) {
        self.on_select = Some(Box::new(callback));
    }

    pub fn categories(&self) -> &[SymbolCategory] {
        &self.categories
    }

    /// Index of the open category, if any.
    pub fn open_category(&self) -> Option<usize> {
        self.open
    }

    /// Symbols of the open category; empty when everything is closed.
    pub fn open_symbols(&self) -> &[SymbolEntry] {
        self.open
            .and_then(|i| self.categories.get(i))
            .map(|c| c.symbols.as_ref())
            .unwrap_or(&[])
    }

    /// Open `index`, or close it if it is already open. Any other open
    /// category closes. Out-of-range indices are ignored.
    pub fn toggle_category(&mut self, index: usize) -> Option<usize> {
        if index < self.categories.len() {
            self.open = if self.open == Some(index) {
                None
            } else {
                Some(index)
            };
        }
        self.open
    }

    /// Close whichever category is open.
    pub fn close(&mut self) {
        self.open = None;
    }

    /// Select a symbol: wraps its LaTeX as `$...$`, hands it to the
    /// callback, and returns it. `None` for unknown indices.
    pub fn select(&mut self, category: usize, symbol: usize) -> Option<String> {
        let fragment = self
            .categories
            .get(category)?
            .symbols
            .get(symbol)?
            .fragment();

        if let Some(callback) = self.on_select.as_mut() {
            callback(&fragment);
        }
        Some(fragment)
    }

    /// Handling for pointer-down on any category or symbol button.
    pub fn pointer_down(&self) -> PointerDown {
        PointerDown::PreventDefault
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Palette {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Palette")
            .field("categories", &self.categories.len())
            .field("open", &self.open)
            .field("on_select", &self.on_select.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_accordion_same_category_closes() {
        let mut palette = Palette::new();
        assert_eq!(palette.toggle_category(0), Some(0));
        assert_eq!(palette.toggle_category(0), None);
        assert!(palette.open_symbols().is_empty());
    }

    #[test]
    fn test_accordion_switches_category() {
        let mut palette = Palette::new();
        palette.toggle_category(0);
        assert_eq!(palette.toggle_category(1), Some(1));
        assert_eq!(palette.open_category(), Some(1));
        assert_eq!(palette.open_symbols(), palette.categories()[1].symbols.as_ref());
    }

    #[test]
    fn test_out_of_range_toggle_is_ignored() {
        let mut palette = Palette::new();
        palette.toggle_category(2);
        assert_eq!(palette.toggle_category(999), Some(2));
    }

    #[test]
    fn test_select_wraps_inline() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);

        let mut palette = Palette::new();
        palette.on_select(move |fragment| sink.borrow_mut().push(fragment.to_string()));

        let greek = palette
            .categories()
            .iter()
            .position(|c| c.name == "Greek")
            .unwrap();
        let pi = palette.categories()[greek]
            .symbols
            .iter()
            .position(|s| s.label == "π")
            .unwrap();

        assert_eq!(palette.select(greek, pi).as_deref(), Some("$\\pi$"));
        assert_eq!(*seen.borrow(), vec!["$\\pi$".to_string()]);
        assert_eq!(palette.select(greek, 10_000), None);
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn test_builtin_fragments_are_never_display() {
        for category in BUILTIN {
            for symbol in category.symbols.iter() {
                let fragment = symbol.fragment();
                assert!(fragment.starts_with('$') && !fragment.starts_with("$$"));
                assert!(!symbol.title.is_empty());
            }
        }
    }

    #[test]
    fn test_pointer_down_prevents_focus_steal() {
        assert_eq!(Palette::new().pointer_down(), PointerDown::PreventDefault);
    }

    #[test]
    fn test_config_appends_or_replaces() {
        let custom = SymbolCategory {
            name: "Custom".into(),
            symbols: vec![SymbolEntry {
                label: "ℤ".into(),
                latex: "\\mathbb{Z}".into(),
                title: "Integers".into(),
            }]
            .into(),
        };

        let appended = PaletteConfig {
            replace_defaults: false,
            categories: vec![custom.clone()],
        };
        let all = appended.categories().unwrap();
        assert_eq!(all.len(), BUILTIN.len() + 1);
        assert_eq!(all.last(), Some(&custom));

        let replaced = PaletteConfig {
            replace_defaults: true,
            categories: vec![custom.clone()],
        };
        assert_eq!(replaced.categories().unwrap(), vec![custom]);

        let empty = PaletteConfig {
            replace_defaults: true,
            categories: vec![],
        };
        assert!(empty.categories().is_err());
    }
}

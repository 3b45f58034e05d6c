//! A named, ordered collection of named colors.
//!
//! A [`Palette`] is a value: every modification returns a new palette.

use crate::{
    color::{Color, Components, Space},
    error::{Error, Result},
    optimize::{optimize_palette, OptimizeOptions},
};

/// An ordered list of uniquely named colors.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    name: String,
    entries: Vec<(String, Color)>,
}

impl Palette {
    /// Create a palette. Color names must be unique.
    pub fn new(
        name: impl Into<String>,
        entries: impl IntoIterator<Item = (String, Color)>,
    ) -> Result<Self> {
        let mut palette = Self {
            name: name.into(),
            entries: vec![],
        };
        for (name, color) in entries {
            palette.push(name, color)?;
        }
        Ok(palette)
    }

    fn push(&mut self, name: String, color: Color) -> Result<()> {
        if self.by_name(&name).is_some() {
            return Err(Error::InvalidArgument(format!(
                "color '{name}' already exists in palette '{}'",
                self.name
            )));
        }
        self.entries.push((name, color));
        Ok(())
    }

    /// The name of the palette.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of colors.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the palette has no colors.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The color at `index`, wrapping around past the end so any index is
    /// valid for a non-empty palette.
    pub fn get(&self, index: usize) -> Option<&Color> {
        if self.entries.is_empty() {
            return None;
        }
        Some(&self.entries[index % self.entries.len()].1)
    }

    /// Look a color up by name.
    pub fn by_name(&self, name: &str) -> Option<&Color> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, color)| color)
    }

    /// Color names in palette order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Colors in palette order.
    pub fn colors(&self) -> Vec<Color> {
        self.entries.iter().map(|(_, color)| color.clone()).collect()
    }

    /// A copy with the color appended.
    pub fn with_color(&self, name: impl Into<String>, color: Color) -> Result<Self> {
        let mut palette = self.clone();
        palette.push(name.into(), color)?;
        Ok(palette)
    }

    /// A copy without the named color.
    pub fn without_color(&self, name: &str) -> Result<Self> {
        if self.by_name(name).is_none() {
            return Err(Error::InvalidArgument(format!(
                "color '{name}' not found in palette '{}'",
                self.name
            )));
        }
        Ok(Self {
            name: self.name.clone(),
            entries: self
                .entries
                .iter()
                .filter(|(n, _)| n != name)
                .cloned()
                .collect(),
        })
    }

    /// A copy with the colors of `other` appended. Names that already exist
    /// are skipped with a warning.
    pub fn union(&self, other: &Palette) -> Self {
        let mut palette = self.clone();
        for (name, color) in &other.entries {
            if palette.push(name.clone(), color.clone()).is_err() {
                tracing::warn!(
                    color = %name,
                    palette = %self.name,
                    "Color already exists in palette, skipping"
                );
            }
        }
        palette
    }

    /// A copy that has colors named `black` and `white`, added if missing.
    pub fn ensure_black_and_white(&self) -> Self {
        let mut palette = self.clone();
        for (name, value) in [("black", 0.0), ("white", 255.0)] {
            if palette.by_name(name).is_none() {
                palette.entries.push((
                    name.to_string(),
                    Color::new(Space::Hex, Components(value, value, value), 1.0),
                ));
            }
        }
        palette
    }

    /// A copy with every color replaced, names and order kept.
    pub fn with_colors(&self, colors: Vec<Color>) -> Result<Self> {
        if colors.len() != self.entries.len() {
            return Err(Error::InvalidArgument(format!(
                "palette '{}' has {} colors, got {}",
                self.name,
                self.entries.len(),
                colors.len()
            )));
        }
        Ok(Self {
            name: self.name.clone(),
            entries: self
                .entries
                .iter()
                .zip(colors)
                .map(|((name, _), color)| (name.clone(), color))
                .collect(),
        })
    }

    /// A copy with the colors run through [`optimize_palette`]. Anchors are
    /// never added to the palette.
    pub fn optimized(&self, options: &OptimizeOptions) -> Result<Self> {
        let options = OptimizeOptions {
            keep_anchors: false,
            ..options.clone()
        };
        let optimized = optimize_palette(&self.colors(), &options)?;
        self.with_colors(optimized.colors)
    }
}

//! Parse and format color literals and space names.
//!
//! Literals are the only untagged input the crate accepts. Everything else
//! carries a [`Space`] from the moment it is constructed.

use std::{fmt, str::FromStr};

use crate::{
    color::{Color, Component, Components, Space},
    error::{Error, Result},
};

impl Space {
    /// The canonical name of the space, as accepted by [`Space::from_str`].
    pub fn name(&self) -> &'static str {
        match self {
            Space::Hex => "HEX",
            Space::Rgb8 => "RGB",
            Space::Rgba8 => "RGBA",
            Space::Rgb => "rgb",
            Space::Rgba => "rgba",
            Space::Hsl => "HSL",
            Space::Hsla => "HSLA",
            Space::Hsv => "HSV",
            Space::Hsva => "HSVA",
            Space::Xyz => "XYZ",
            Space::Xyza => "XYZA",
            Space::Oklab => "OKLAB",
            Space::Oklaba => "OKLABA",
            Space::Lms => "LMS",
            Space::Lmsa => "LMSA",
        }
    }
}

impl fmt::Display for Space {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Space {
    type Err = Error;

    /// `RGB`/`RGBA` (0..=255) and `rgb`/`rgba` (0..=1) are told apart by case.
    /// The other names are case insensitive; `CIE`/`CIEA` are accepted as
    /// aliases of `XYZ`/`XYZA`.
    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim();
        if let Some(space) = Space::ALL.iter().find(|space| space.name() == name) {
            return Ok(*space);
        }

        Ok(match name.to_ascii_uppercase().as_str() {
            "HEX" => Space::Hex,
            "HSL" => Space::Hsl,
            "HSLA" => Space::Hsla,
            "HSV" => Space::Hsv,
            "HSVA" => Space::Hsva,
            "XYZ" | "CIE" => Space::Xyz,
            "XYZA" | "CIEA" => Space::Xyza,
            "OKLAB" => Space::Oklab,
            "OKLABA" => Space::Oklaba,
            "LMS" => Space::Lms,
            "LMSA" => Space::Lmsa,
            _ => return Err(Error::UnknownSpace(s.to_string())),
        })
    }
}

fn parse_hex(digits: &str) -> Result<Color> {
    let invalid = || Error::Parse(format!("invalid hex color: #{digits}"));

    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let bytes = match digits.len() {
        3 | 4 => digits
            .chars()
            .map(|c| c.to_digit(16).map(|v| (v * 17) as u8))
            .collect::<Option<Vec<_>>>(),
        6 | 8 => (0..digits.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&digits[i..i + 2], 16).ok())
            .collect::<Option<Vec<_>>>(),
        _ => None,
    }
    .ok_or_else(invalid)?;

    let alpha = bytes.get(3).map_or(1.0, |a| *a as Component / 255.0);
    Ok(Color::new(
        Space::Hex,
        Components(bytes[0] as Component, bytes[1] as Component, bytes[2] as Component),
        alpha,
    ))
}

/// Split the arguments of a functional literal such as `rgb(0.1, 0.2, 0.3)`.
fn arguments<'a>(literal: &'a str, prefix: &str) -> Option<Vec<&'a str>> {
    literal
        .strip_prefix(prefix)
        .and_then(|rest| rest.strip_suffix(')'))
        .map(|body| body.split(',').map(str::trim).collect())
}

fn parse_functional(literal: &str) -> Result<Color> {
    let invalid = |reason: &str| Error::Parse(format!("{reason}: {literal}"));

    let (space, args) = [
        ("RGBA(", Space::Rgba8),
        ("RGB(", Space::Rgb8),
        ("rgba(", Space::Rgba),
        ("rgb(", Space::Rgb),
    ]
    .into_iter()
    .find_map(|(prefix, space)| arguments(literal, prefix).map(|args| (space, args)))
    .ok_or_else(|| invalid("unrecognized color literal"))?;

    let values = match space {
        Space::Rgb8 | Space::Rgba8 => args
            .iter()
            .map(|arg| arg.parse::<u8>().map(Component::from))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|_| invalid("expected integers in 0..=255"))?,
        _ => args
            .iter()
            .map(|arg| {
                arg.parse::<Component>()
                    .ok()
                    .filter(|v| (0.0..=1.0).contains(v))
            })
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| invalid("expected numbers in 0..=1"))?,
    };

    Color::from_values(space, &values)
}

impl FromStr for Color {
    type Err = Error;

    /// Accepts `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`, `RGB(r,g,b)` and
    /// `RGBA(r,g,b,a)` with integers in `0..=255`, and `rgb(r,g,b)` and
    /// `rgba(r,g,b,a)` with numbers in `0..=1`.
    fn from_str(s: &str) -> Result<Self> {
        let literal = s.trim();
        match literal.strip_prefix('#') {
            Some(digits) => parse_hex(digits),
            None => parse_functional(literal),
        }
    }
}

impl TryFrom<&[u8]> for Color {
    type Error = Error;

    /// Three bytes are `RGB`, four are `RGBA`.
    fn try_from(value: &[u8]) -> Result<Self> {
        let values = value.iter().copied().map(Component::from).collect::<Vec<_>>();
        match values.len() {
            3 => Color::from_values(Space::Rgb8, &values),
            4 => Color::from_values(Space::Rgba8, &values),
            n => Err(Error::Parse(format!("expected 3 or 4 channels, got {n}"))),
        }
    }
}

impl TryFrom<&[Component]> for Color {
    type Error = Error;

    /// Values above 1 select the `0..=255` spaces, otherwise `0..=1` is
    /// assumed.
    fn try_from(value: &[Component]) -> Result<Self> {
        let bytes = value.iter().any(|v| *v > 1.0);
        let space = match (value.len(), bytes) {
            (3, true) => Space::Rgb8,
            (4, true) => Space::Rgba8,
            (3, false) => Space::Rgb,
            (4, false) => Space::Rgba,
            (n, _) => return Err(Error::Parse(format!("expected 3 or 4 channels, got {n}"))),
        };
        Color::from_values(space, value)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let byte = |v: Component| v.clamp(0.0, 255.0).round() as u8;

        match self.space {
            Space::Hex => {
                let Components(r, g, b) = self.components;
                write!(f, "#{:02x}{:02x}{:02x}", byte(r), byte(g), byte(b))?;
                let alpha = byte(self.alpha * 255.0);
                if alpha != 255 {
                    write!(f, "{alpha:02x}")?;
                }
                Ok(())
            }
            Space::Rgb8 | Space::Rgba8 => {
                let values = self
                    .values()
                    .into_iter()
                    .map(|v| byte(v).to_string())
                    .collect::<Vec<_>>();
                write!(f, "{}({})", self.space.name(), values.join(","))
            }
            _ => {
                let values = self
                    .values()
                    .into_iter()
                    .map(|v| v.to_string())
                    .collect::<Vec<_>>();
                write!(
                    f,
                    "{}({})",
                    self.space.name().to_ascii_lowercase(),
                    values.join(",")
                )
            }
        }
    }
}

/// Parse a color literal and convert it to the named space.
///
/// ```rust
/// let red = huespread::convert_color("#FF0000", "RGB").unwrap();
/// assert_eq!(red.to_string(), "RGB(255,0,0)");
/// ```
pub fn convert_color(literal: &str, space: &str) -> Result<Color> {
    let space = space.parse::<Space>()?;
    Ok(literal.parse::<Color>()?.to_space(space))
}

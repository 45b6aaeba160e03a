//! Design tokens shared with the shell.
//!
//! Light and dark variants are the main colour composited under a
//! translucent white (75%) or black (30%) layer. They are returned as
//! flattened hex so shells don't need gradient support.

use serde::{Deserialize, Serialize};

use crate::profile::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ThemeKey {
    #[default]
    Client,
    ProductOwner,
    Developer,
    Admin,
    Success,
    Warning,
    Error,
    Black,
    White,
    Gray,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Shade {
    Main,
    Light,
    Dark,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Swatch {
    pub main: String,
    pub light: Option<String>,
    pub dark: Option<String>,
}

const LIGHT_ALPHA: f64 = 0.75;
const DARK_ALPHA: f64 = 0.3;

impl ThemeKey {
    pub const ALL: [ThemeKey; 10] = [
        ThemeKey::Client,
        ThemeKey::ProductOwner,
        ThemeKey::Developer,
        ThemeKey::Admin,
        ThemeKey::Success,
        ThemeKey::Warning,
        ThemeKey::Error,
        ThemeKey::Black,
        ThemeKey::White,
        ThemeKey::Gray,
    ];

    #[must_use]
    pub const fn main(self) -> &'static str {
        match self {
            Self::Client => "#5F6CAD",
            Self::ProductOwner => "#20063B",
            Self::Developer => "#ED7D3A",
            Self::Admin => "#A30015",
            Self::Success => "#3CC13B",
            Self::Warning => "#F3BB1C",
            Self::Error => "#F03738",
            Self::Black => "#000000",
            Self::White => "#FFFFFF",
            Self::Gray => "#C2C9D1",
        }
    }

    #[must_use]
    pub const fn has_shade(self, shade: Shade) -> bool {
        match shade {
            Shade::Main => true,
            Shade::Light => !matches!(self, Self::Black | Self::White | Self::Gray),
            Shade::Dark => matches!(
                self,
                Self::Gray | Self::Client | Self::ProductOwner | Self::Developer | Self::Admin
            ),
        }
    }

    #[must_use]
    pub fn color(self, shade: Shade) -> Option<String> {
        if !self.has_shade(shade) {
            return None;
        }
        let base = parse_hex(self.main())?;
        let mixed = match shade {
            Shade::Main => base,
            Shade::Light => mix(base, [255, 255, 255], LIGHT_ALPHA),
            Shade::Dark => mix(base, [0, 0, 0], DARK_ALPHA),
        };
        Some(to_hex(mixed))
    }

    #[must_use]
    pub fn swatch(self) -> Swatch {
        Swatch {
            main: self.main().to_string(),
            light: self.color(Shade::Light),
            dark: self.color(Shade::Dark),
        }
    }

    /// Accent colour for a role; anything unrecognised uses the client accent.
    #[must_use]
    pub const fn for_role(role: Option<Role>) -> Self {
        match role {
            Some(Role::ProductOwner) => Self::ProductOwner,
            Some(Role::Developer) => Self::Developer,
            Some(Role::Admin) => Self::Admin,
            Some(Role::Client | Role::Unknown) | None => Self::Client,
        }
    }
}

fn parse_hex(hex: &str) -> Option<[u8; 3]> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn mix(base: [u8; 3], overlay: [u8; 3], alpha: f64) -> [u8; 3] {
    let blend = |b: u8, o: u8| (f64::from(o) * alpha + f64::from(b) * (1.0 - alpha)).round() as u8;
    [
        blend(base[0], overlay[0]),
        blend(base[1], overlay[1]),
        blend(base[2], overlay[2]),
    ]
}

fn to_hex([r, g, b]: [u8; 3]) -> String {
    format!("#{r:02X}{g:02X}{b:02X}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_main_colours() {
        assert_eq!(ThemeKey::Client.main(), "#5F6CAD");
        assert_eq!(ThemeKey::Error.main(), "#F03738");
        assert_eq!(ThemeKey::Gray.main(), "#C2C9D1");
    }

    #[test]
    fn every_key_parses() {
        for key in ThemeKey::ALL {
            assert!(key.color(Shade::Main).is_some(), "{key:?}");
        }
    }

    #[test]
    fn light_is_closer_to_white() {
        assert_eq!(ThemeKey::Success.color(Shade::Light).as_deref(), Some("#CEF0CE"));
        assert_eq!(ThemeKey::Black.color(Shade::Light), None);
    }

    #[test]
    fn dark_only_on_role_colours_and_gray() {
        assert_eq!(ThemeKey::Gray.color(Shade::Dark).as_deref(), Some("#888D92"));
        assert!(ThemeKey::Admin.color(Shade::Dark).is_some());
        assert_eq!(ThemeKey::Warning.color(Shade::Dark), None);
    }

    #[test]
    fn role_accent_falls_back_to_client() {
        assert_eq!(ThemeKey::for_role(Some(Role::Developer)), ThemeKey::Developer);
        assert_eq!(ThemeKey::for_role(Some(Role::Unknown)), ThemeKey::Client);
        assert_eq!(ThemeKey::for_role(None), ThemeKey::Client);
    }

    #[test]
    fn serializes_camel_case() {
        assert_eq!(
            serde_json::to_string(&ThemeKey::ProductOwner).unwrap(),
            "\"productOwner\""
        );
    }
}

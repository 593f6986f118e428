// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::collections::HashMap;

use ember_core::math::LinearRgba;

use super::KinInfo;
use crate::attr::{AttrKind, AttrSlot, Attribute};

/// What the minimap should draw for an entity.
#[derive(Debug, Clone, PartialEq)]
pub struct IconView {
    /// Icon resource name.
    pub icon: String,
    /// Tint.
    pub color: LinearRgba,
}

/// Maps entity resource names to user-chosen icons.
#[derive(Debug, Clone, Default)]
pub struct IconPalette {
    icons: HashMap<String, String>,
}

impl IconPalette {
    /// Creates an empty palette.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry, builder style.
    pub fn with(mut self, resource: impl Into<String>, icon: impl Into<String>) -> Self {
        self.icons.insert(resource.into(), icon.into());
        self
    }

    /// The icon configured for `resource`.
    pub fn icon_for(&self, resource: &str) -> Option<&str> {
        self.icons.get(resource).map(String::as_str)
    }
}

/// The icon the server assigned to an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GobIcon {
    icon: String,
}

impl GobIcon {
    /// Creates an icon attribute.
    pub fn new(icon: impl Into<String>) -> Self {
        Self { icon: icon.into() }
    }

    /// The untinted icon.
    pub fn view(&self) -> IconView {
        IconView {
            icon: self.icon.clone(),
            color: LinearRgba::WHITE,
        }
    }
}

impl Attribute for GobIcon {
    fn slot(&self) -> AttrSlot {
        AttrSlot::Icon
    }
}

impl AttrKind for GobIcon {
    const SLOT: AttrSlot = AttrSlot::Icon;
}

/// An icon picked from the user's palette and tinted by relation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomGobIcon {
    resource: Option<String>,
    icon: Option<String>,
}

impl CustomGobIcon {
    /// Picks the palette icon for an entity drawn from `resource`.
    pub fn new(resource: Option<&str>, palette: &IconPalette) -> Self {
        Self {
            resource: resource.map(str::to_string),
            icon: resource
                .and_then(|r| palette.icon_for(r))
                .map(str::to_string),
        }
    }

    /// The resource name the icon was picked for.
    pub fn resource(&self) -> Option<&str> {
        self.resource.as_deref()
    }

    /// The tinted icon, if the palette had one. Entities without a kin
    /// record are drawn as threats.
    pub fn view(&self, kin: Option<&KinInfo>) -> Option<IconView> {
        let icon = self.icon.clone()?;
        Some(IconView {
            icon,
            color: kin.map_or(LinearRgba::RED, KinInfo::color),
        })
    }
}

impl Attribute for CustomGobIcon {
    fn slot(&self) -> AttrSlot {
        AttrSlot::CustomIcon
    }
}

impl AttrKind for CustomGobIcon {
    const SLOT: AttrSlot = AttrSlot::CustomIcon;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_icon_is_tinted_by_kin_group() {
        let palette = IconPalette::new().with("gfx/borka/body", "gfx/hud/mmap/player");
        let icon = CustomGobIcon::new(Some("gfx/borka/body"), &palette);

        let friend = KinInfo::new("Ada", KinInfo::GREEN, 0);
        assert_eq!(
            icon.view(Some(&friend)).map(|v| v.color),
            Some(LinearRgba::GREEN)
        );
        assert_eq!(icon.view(None).map(|v| v.color), Some(LinearRgba::RED));
    }

    #[test]
    fn test_unconfigured_resource_has_no_custom_icon() {
        let icon = CustomGobIcon::new(Some("gfx/terobjs/tree"), &IconPalette::new());
        assert!(icon.view(None).is_none());
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Build catalog, finish palette and price quotes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::Result;

/// Disassembly and prep labor charged on every build.
pub const BASE_LABOR: u32 = 300;

/// Material price used when a finish is not in the palette.
pub const DEFAULT_FINISH_PRICE: u32 = 120;

/// Labor for finishing a part type without a dedicated rate.
pub const DEFAULT_FINISH_LABOR: u32 = 40;

/// A finish from the coating palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Finish {
    pub id: &'static str,
    pub name: &'static str,
    pub hex: &'static str,
    pub price: u32,
}

pub static FINISH_PALETTE: &[Finish] = &[
    Finish {
        id: "H-146",
        name: "Graphite Black",
        hex: "#2A2A2A",
        price: 120,
    },
    Finish {
        id: "H-140",
        name: "Bright White",
        hex: "#FFFFFF",
        price: 120,
    },
    Finish {
        id: "H-267",
        name: "MagPul FDE",
        hex: "#9A7D55",
        price: 130,
    },
];

/// A purchasable option inside a part group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogOption {
    pub id: &'static str,
    pub name: &'static str,
    pub price: u32,
}

/// A group of mutually exclusive part options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartGroup {
    pub id: &'static str,
    pub name: &'static str,
    pub options: &'static [CatalogOption],
}

/// A base firearm with its configurable part groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogFirearm {
    pub id: &'static str,
    pub name: &'static str,
    pub part_groups: &'static [PartGroup],
}

pub static CATALOG: &[CatalogFirearm] = &[CatalogFirearm {
    id: "mvp-01",
    name: "MVP Pistol Stand-in",
    part_groups: &[
        PartGroup {
            id: "slide",
            name: "Slide",
            options: &[CatalogOption {
                id: "slide_std",
                name: "Standard Slide",
                price: 0,
            }],
        },
        PartGroup {
            id: "barrel",
            name: "Barrel",
            options: &[CatalogOption {
                id: "barrel_std",
                name: "Standard Barrel",
                price: 0,
            }],
        },
        PartGroup {
            id: "sights",
            name: "Sights",
            options: &[
                CatalogOption {
                    id: "sight_iron",
                    name: "Iron Sights",
                    price: 50,
                },
                CatalogOption {
                    id: "sight_none",
                    name: "None",
                    price: 0,
                },
            ],
        },
    ],
}];

/// Labor rate for finishing one part type.
pub fn finish_labor(part_type: &str) -> u32 {
    match part_type {
        "slide" => 90,
        "frame" => 110,
        "trigger" => 25,
        "magazine" => 30,
        _ => DEFAULT_FINISH_LABOR,
    }
}

/// Palette entry with the same color as `color`, if any.
pub fn palette_finish(color: Color) -> Option<&'static Finish> {
    let packed = color.to_u32();
    FINISH_PALETTE.iter().find(|finish| {
        Color::from_hex(finish.hex)
            .map(|c| c.to_u32() == packed)
            .unwrap_or(false)
    })
}

/// A customer build: chosen part options and per-part finish colors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildConfig {
    pub firearm_id: String,
    #[serde(default)]
    pub parts: BTreeMap<String, String>,
    #[serde(default)]
    pub finishes: BTreeMap<String, String>,
}

/// Cost of finishing one part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishLine {
    pub hex: String,
    pub mat_price: u32,
    pub labor: u32,
    pub total: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    pub base: u32,
    pub parts_sum: u32,
    pub finishes_sum: u32,
    pub finish_breakdown: BTreeMap<String, FinishLine>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    pub total: u32,
    pub breakdown: PriceBreakdown,
    pub currency: &'static str,
    pub eta_days: u32,
}

fn option_price(option_id: &str) -> u32 {
    CATALOG
        .iter()
        .flat_map(|firearm| firearm.part_groups.iter())
        .flat_map(|group| group.options.iter())
        .find(|option| option.id == option_id)
        .map(|option| option.price)
        .unwrap_or(0)
}

/// Price a build. Fails only on a malformed finish color.
pub fn quote(build: &BuildConfig) -> Result<PriceQuote> {
    let parts_sum: u32 = build.parts.values().map(|id| option_price(id)).sum();

    let mut finish_breakdown = BTreeMap::new();
    let mut finishes_sum = 0;
    for (part, hex) in &build.finishes {
        let color = Color::from_hex(hex)?;
        let mat_price = palette_finish(color)
            .map(|finish| finish.price)
            .unwrap_or(DEFAULT_FINISH_PRICE);
        let labor = finish_labor(part);
        let total = mat_price + labor;
        finishes_sum += total;
        finish_breakdown.insert(
            part.clone(),
            FinishLine {
                hex: hex.clone(),
                mat_price,
                labor,
                total,
            },
        );
    }

    let finish_count = build.finishes.len() as u32;
    Ok(PriceQuote {
        total: BASE_LABOR + parts_sum + finishes_sum,
        breakdown: PriceBreakdown {
            base: BASE_LABOR,
            parts_sum,
            finishes_sum,
            finish_breakdown,
        },
        currency: "USD",
        eta_days: 10 + finish_count.div_ceil(2),
    })
}

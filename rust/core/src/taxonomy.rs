// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Part Taxonomy
//!
//! The closed set of semantic part types an admin can assign to a mesh,
//! grouped into categories for browsing. The table is static; lookups go
//! through a lazily built index so `label_for` and `category_for` stay O(1).

use std::sync::OnceLock;

use rustc_hash::FxHashMap;
use serde::Serialize;

/// A single selectable part type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PartOption {
    pub value: &'static str,
    pub label: &'static str,
}

impl PartOption {
    const fn new(value: &'static str, label: &'static str) -> Self {
        Self { value, label }
    }
}

/// A labelled group of part types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PartCategory {
    pub label: &'static str,
    pub options: &'static [PartOption],
}

/// Owned category produced by [`search`], holding only the matching options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilteredCategory {
    pub label: &'static str,
    pub options: Vec<PartOption>,
}

static PART_CATEGORIES: &[PartCategory] = &[
    PartCategory {
        label: "Slide Components",
        options: &[
            PartOption::new("slide_main", "Slide Body"),
            PartOption::new("slide_cover_plate", "Slide Cover Plate"),
            PartOption::new("slide_window", "Slide Window/Cut"),
            PartOption::new("slide_serrations_front", "Front Serrations"),
            PartOption::new("slide_serrations_rear", "Rear Serrations"),
            PartOption::new("extractor", "Extractor"),
            PartOption::new("firing_pin", "Firing Pin"),
            PartOption::new("firing_pin_safety", "Firing Pin Safety"),
            PartOption::new("striker", "Striker"),
            PartOption::new("ejector", "Ejector"),
            PartOption::new("slide_stop", "Slide Stop/Release Lever"),
        ],
    },
    PartCategory {
        label: "Frame/Grip Components",
        options: &[
            PartOption::new("frame_main", "Frame Body"),
            PartOption::new("grip_module", "Grip Module"),
            PartOption::new("backstrap", "Backstrap"),
            PartOption::new("grip_panel_left", "Grip Panel (Left)"),
            PartOption::new("grip_panel_right", "Grip Panel (Right)"),
            PartOption::new("grip_texture", "Grip Texturing/Stippling"),
            PartOption::new("dust_cover", "Dust Cover"),
            PartOption::new("accessory_rail", "Accessory Rail (Picatinny/M-LOK)"),
            PartOption::new("trigger_guard", "Trigger Guard"),
            PartOption::new("mag_well", "Magazine Well/Funnel"),
        ],
    },
    PartCategory {
        label: "Barrel Components",
        options: &[
            PartOption::new("barrel_main", "Barrel Body"),
            PartOption::new("barrel_hood", "Barrel Hood"),
            PartOption::new("barrel_lug", "Barrel Lug"),
            PartOption::new("chamber", "Chamber"),
            PartOption::new("rifling", "Rifling"),
            PartOption::new("muzzle_threads", "Muzzle Threads"),
            PartOption::new("muzzle_crown", "Muzzle Crown"),
            PartOption::new("compensator", "Compensator"),
            PartOption::new("muzzle_brake", "Muzzle Brake"),
            PartOption::new("suppressor", "Suppressor/Silencer"),
            PartOption::new("thread_protector", "Thread Protector"),
        ],
    },
    PartCategory {
        label: "Trigger Assembly",
        options: &[
            PartOption::new("trigger_main", "Trigger Body"),
            PartOption::new("trigger_shoe", "Trigger Shoe/Face"),
            PartOption::new("trigger_bar", "Trigger Bar"),
            PartOption::new("trigger_safety", "Trigger Safety Lever"),
            PartOption::new("trigger_spring", "Trigger Spring"),
            PartOption::new("connector", "Connector"),
            PartOption::new("cruciform", "Cruciform"),
            PartOption::new("sear", "Sear"),
            PartOption::new("hammer", "Hammer"),
            PartOption::new("disconnector", "Disconnector"),
        ],
    },
    PartCategory {
        label: "Sights & Optics",
        options: &[
            PartOption::new("front_sight_iron", "Front Iron Sight"),
            PartOption::new("front_sight_post", "Front Sight Post"),
            PartOption::new("front_sight_fiber", "Front Fiber Optic Sight"),
            PartOption::new("front_sight_tritium", "Front Tritium Night Sight"),
            PartOption::new("rear_sight_iron", "Rear Iron Sight"),
            PartOption::new("rear_sight_notch", "Rear Sight Notch"),
            PartOption::new("rear_sight_adjustable", "Rear Adjustable Sight"),
            PartOption::new("rear_sight_tritium", "Rear Tritium Night Sight"),
            PartOption::new("optic_mount_plate", "Optic Mount Plate"),
            PartOption::new("red_dot_body", "Red Dot Sight Body"),
            PartOption::new("red_dot_lens", "Red Dot Lens"),
            PartOption::new("red_dot_hood", "Red Dot Hood"),
            PartOption::new("scope_body", "Scope Body"),
            PartOption::new("scope_mount", "Scope Mount"),
            PartOption::new("scope_rings", "Scope Rings"),
            PartOption::new("scope_objective", "Scope Objective Lens"),
            PartOption::new("scope_ocular", "Scope Ocular Lens"),
            PartOption::new("scope_turrets", "Scope Turrets"),
            PartOption::new("laser_sight", "Laser Sight"),
        ],
    },
    PartCategory {
        label: "Magazine Components",
        options: &[
            PartOption::new("magazine_body", "Magazine Body"),
            PartOption::new("magazine_basepad", "Magazine Basepad/Floorplate"),
            PartOption::new("magazine_follower", "Magazine Follower"),
            PartOption::new("magazine_spring", "Magazine Spring"),
            PartOption::new("magazine_catch", "Magazine Catch/Release"),
            PartOption::new("magazine_extension", "Magazine Extension"),
        ],
    },
    PartCategory {
        label: "Safety & Controls",
        options: &[
            PartOption::new("safety_lever", "Manual Safety Lever"),
            PartOption::new("safety_thumb", "Thumb Safety"),
            PartOption::new("safety_grip", "Grip Safety"),
            PartOption::new("decocker", "Decocker Lever"),
            PartOption::new("takedown_lever", "Takedown Lever/Pin"),
            PartOption::new("slide_lock", "Slide Lock Lever"),
        ],
    },
    PartCategory {
        label: "Internal Components",
        options: &[
            PartOption::new("recoil_spring", "Recoil Spring"),
            PartOption::new("recoil_spring_guide", "Recoil Spring Guide Rod"),
            PartOption::new("locking_block", "Locking Block"),
            PartOption::new("cam_pin", "Cam Pin"),
            PartOption::new("bolt_carrier", "Bolt Carrier"),
            PartOption::new("bolt", "Bolt"),
            PartOption::new("gas_piston", "Gas Piston"),
            PartOption::new("gas_block", "Gas Block"),
        ],
    },
    PartCategory {
        label: "Pins & Hardware",
        options: &[
            PartOption::new("pin_trigger", "Trigger Pin"),
            PartOption::new("pin_slide_stop", "Slide Stop Pin"),
            PartOption::new("pin_takedown", "Takedown Pin"),
            PartOption::new("pin_roll", "Roll Pin"),
            PartOption::new("screw", "Screw/Fastener"),
            PartOption::new("spring", "Spring (Generic)"),
            PartOption::new("detent", "Detent"),
        ],
    },
    PartCategory {
        label: "Stock & Furniture",
        options: &[
            PartOption::new("stock_body", "Stock Body"),
            PartOption::new("buttpad", "Buttpad/Recoil Pad"),
            PartOption::new("cheek_rest", "Cheek Rest"),
            PartOption::new("handguard", "Handguard/Forend"),
            PartOption::new("pistol_grip", "Pistol Grip"),
            PartOption::new("fore_grip", "Fore Grip/Vertical Grip"),
            PartOption::new("sling_mount", "Sling Mount/Swivel"),
            PartOption::new("qd_socket", "QD (Quick Detach) Socket"),
        ],
    },
    PartCategory {
        label: "Accessories",
        options: &[
            PartOption::new("light_body", "Weapon Light Body"),
            PartOption::new("light_lens", "Weapon Light Lens"),
            PartOption::new("light_mount", "Light Mount"),
            PartOption::new("flashlight_switch", "Flashlight Pressure Switch"),
            PartOption::new("bipod", "Bipod"),
            PartOption::new("sling", "Sling"),
            PartOption::new("case_deflector", "Brass Deflector/Case Deflector"),
        ],
    },
    PartCategory {
        label: "Miscellaneous",
        options: &[
            PartOption::new("charging_handle", "Charging Handle"),
            PartOption::new("buffer_tube", "Buffer Tube"),
            PartOption::new("buffer", "Buffer"),
            PartOption::new("buffer_spring", "Buffer Spring"),
            PartOption::new("endplate", "Endplate"),
            PartOption::new("castle_nut", "Castle Nut"),
            PartOption::new("other", "Other/Custom Part"),
        ],
    },
];

/// Coarse part types used by the customer palette and the name heuristics.
/// They predate the detailed taxonomy and remain valid tag values.
static COARSE_PART_TYPES: &[PartOption] = &[
    PartOption::new("slide", "Slide"),
    PartOption::new("frame", "Frame / Grip Module"),
    PartOption::new("barrel", "Barrel"),
    PartOption::new("trigger", "Trigger"),
    PartOption::new("slide_stop", "Slide Stop / Slide Release"),
    PartOption::new("mag_catch", "Magazine Release / Catch"),
    PartOption::new("safety", "Safety Lever / Selector"),
    PartOption::new("front_sight", "Front Sight"),
    PartOption::new("rear_sight", "Rear Sight"),
    PartOption::new("optic_plate", "Optic Plate / Cover Plate"),
    PartOption::new("magazine", "Magazine Body"),
    PartOption::new("mag_basepad", "Magazine Basepad / Floorplate"),
    PartOption::new("mag_follower", "Magazine Follower"),
    PartOption::new("grip_panel", "Grip Panel / Scale"),
    PartOption::new("ejection_port", "Ejection Port"),
    PartOption::new("pin", "Pins / Roll Pins"),
    PartOption::new("small_control", "Small Control (Misc.)"),
    PartOption::new("slide_cut", "Slide Cut / Window"),
    PartOption::new("serration", "Serrations / Texturing"),
];

struct TaxonomyIndex {
    // part type value -> (category index, option)
    by_value: FxHashMap<&'static str, (usize, PartOption)>,
}

fn index() -> &'static TaxonomyIndex {
    static INDEX: OnceLock<TaxonomyIndex> = OnceLock::new();
    INDEX.get_or_init(|| {
        let mut by_value = FxHashMap::default();
        for (cat_idx, category) in PART_CATEGORIES.iter().enumerate() {
            for option in category.options {
                // First occurrence wins, matching a linear scan of the table.
                by_value.entry(option.value).or_insert((cat_idx, *option));
            }
        }
        TaxonomyIndex { by_value }
    })
}

/// All categories in display order.
pub fn list_categories() -> &'static [PartCategory] {
    PART_CATEGORIES
}

/// Human label for a part type.
///
/// Unknown values (including the unclassified sentinel and legacy coarse
/// types such as `slide`) come back unchanged instead of failing.
pub fn label_for(part_type: &str) -> &str {
    match index().by_value.get(part_type) {
        Some((_, option)) => option.label,
        None => part_type,
    }
}

/// Label of the category that owns `part_type`, if any.
pub fn category_for(part_type: &str) -> Option<&'static str> {
    index()
        .by_value
        .get(part_type)
        .map(|(cat_idx, _)| PART_CATEGORIES[*cat_idx].label)
}

/// Whether `part_type` is a concrete member of the taxonomy.
pub fn is_known(part_type: &str) -> bool {
    index().by_value.contains_key(part_type)
}

/// Coarse part types accepted alongside the taxonomy.
pub fn coarse_part_types() -> &'static [PartOption] {
    COARSE_PART_TYPES
}

/// Whether `part_type` may be stored on a tag: a taxonomy member or one of
/// the coarse customer-palette types.
pub fn is_assignable(part_type: &str) -> bool {
    is_known(part_type) || COARSE_PART_TYPES.iter().any(|opt| opt.value == part_type)
}

/// Total number of part types across all categories.
pub fn option_count() -> usize {
    PART_CATEGORIES.iter().map(|c| c.options.len()).sum()
}

/// Case-insensitive substring filter over option labels.
///
/// Categories with no remaining options are dropped. An empty (or
/// whitespace-only) query returns every category in full.
pub fn search(query: &str) -> Vec<FilteredCategory> {
    let needle = query.trim().to_lowercase();
    PART_CATEGORIES
        .iter()
        .filter_map(|category| {
            let options: Vec<PartOption> = category
                .options
                .iter()
                .filter(|opt| needle.is_empty() || opt.label.to_lowercase().contains(&needle))
                .copied()
                .collect();
            if options.is_empty() {
                None
            } else {
                Some(FilteredCategory {
                    label: category.label,
                    options,
                })
            }
        })
        .collect()
}

//! Broadcast and ambience line tables for the platform monitor and the
//! enforcement pipeline. Rendering (color, markup) belongs to the presentation
//! layer above this crate; everything here is plain text.

use crate::zone::danger::DangerLevel;

/// Platform-wide warnings, one picked at random per broadcast. `{count}`,
/// `{limit}` and `{over}` are substituted by the monitor.
pub fn broadcast_lines(level: DangerLevel) -> &'static [&'static str] {
    match level {
        DangerLevel::Warning => &[
            "Caution: The platform is carrying {count}/{limit} items. \
             Consider visiting the KonMarie Temple.",
            "A structural groan echoes through the corridors. \
             {count} items aboard -- the platform is getting heavy.",
        ],
        DangerLevel::Critical => &[
            "WARNING: {count}/{limit} items on the platform! \
             Structural integrity is compromised. Incinerate excess items!",
            "The floor trembles beneath your feet. {count} items and counting \
             -- Zone 25 cannot take much more.",
        ],
        DangerLevel::Sinking => &[
            "EMERGENCY: Zone 25 is OVER CAPACITY ({count}/{limit})! \
             The platform is taking on water! INCINERATE NOW!",
            "HULL BREACH IMMINENT. {count} items -- {over} OVER THE LIMIT. \
             Get to the KonMarie Temple!",
        ],
        DangerLevel::Safe => &[],
    }
}

/// Ominous echoes blended into outdoor-room ambience at elevated levels.
pub fn ominous_echoes(level: DangerLevel) -> &'static [&'static str] {
    match level {
        DangerLevel::Warning => &[
            "The deck plates creak underfoot.",
            "A faint metallic groan rises from below.",
            "The gulls have gone quiet.",
            "The horizon tilts slightly, then rights itself.",
        ],
        DangerLevel::Critical => &[
            "The platform shudders. Water sloshes somewhere below.",
            "A deep, grinding vibration passes through the deck plates.",
            "The railing is wet -- and the sea seems closer than before.",
            "Rivets pop somewhere in the superstructure. The gulls are gone.",
        ],
        DangerLevel::Sinking => &[
            "The deck lurches. Seawater spills over the outer railing.",
            "A klaxon wails in the distance. The platform lists to port.",
            "Water is rising through the deck grates. This is not a drill.",
            "The horizon is wrong. The ocean is climbing the hull.",
        ],
        DangerLevel::Safe => &[],
    }
}

/// Reclamation-activity echoes for industrial rooms when the pool recharges.
pub const RECOVERY_ECHOES: &[&str] = &[
    "Somewhere below, filtration pumps cycle ocean water through the reclamation system.",
    "A low hum resonates through the deck plates as the waste processors turn over.",
    "The feedstock gauges on a nearby panel tick up a fraction.",
    "You hear the distant gurgle of intake valves pulling in seawater for processing.",
    "A faint chemical smell wafts from the recycling vents -- the station digesting something.",
];

/// Escalating investigation warnings, indexed by elapsed ticks and clamped to
/// the last entry. `{target}` and `{remaining}` are substituted by the case.
pub const INVESTIGATION_WARNINGS: &[&str] = &[
    "[ZONE 25] Investigation into {target} is underway. {remaining} cycle(s) remain.",
    "[ZONE 25] Enforcement drones are scanning the platform for {target}.",
    "[ZONE 25] Investigation of {target} nearing completion. {remaining} cycle(s) remain.",
    "[ZONE 25] Security protocols activated. {target}'s case is nearly resolved.",
    "[ZONE 25] ENFORCEMENT IMMINENT. {target} should report to the KonMarie Temple.",
];

/// Pick an investigation warning by elapsed ticks.
pub fn investigation_warning(elapsed: u32) -> &'static str {
    let idx = (elapsed as usize).min(INVESTIGATION_WARNINGS.len() - 1);
    INVESTIGATION_WARNINGS[idx]
}

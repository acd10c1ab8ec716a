//! Battery and charger state from the Linux power-supply sysfs tree.
//!
//! # Responsibilities
//! - Locate the first supply of type "Battery" and read a raw (level, scale)
//!   pair from it
//! - Report charger presence from a "Mains" supply's online flag
//!
//! # Design Decisions
//! - Raw level/scale is preferred over the kernel's precomputed capacity so
//!   the percentage math lives in one tested place; capacity is the fallback
//! - Every accessor returns Option: machines without a battery are a normal
//!   case, not an error

use std::fs;
use std::path::Path;

const POWER_SUPPLY_ROOT: &str = "/sys/class/power_supply";

/// A raw battery charge reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatteryReading {
    pub level: i64,
    pub scale: i64,
}

impl BatteryReading {
    /// Charge percentage in [0, 100], or None when the scale is unusable.
    pub fn percent(&self) -> Option<u8> {
        if self.scale <= 0 || self.level < 0 {
            return None;
        }
        Some(((self.level * 100) / self.scale).clamp(0, 100) as u8)
    }
}

/// Read the current battery state, if the host has a battery.
pub fn read_battery() -> Option<BatteryReading> {
    read_battery_from(Path::new(POWER_SUPPLY_ROOT))
}

/// True when an AC adapter reports online. None when no adapter exists.
pub fn charger_online() -> Option<bool> {
    charger_online_from(Path::new(POWER_SUPPLY_ROOT))
}

fn read_battery_from(root: &Path) -> Option<BatteryReading> {
    for entry in fs::read_dir(root).ok()?.flatten() {
        let dir = entry.path();
        if read_trimmed(&dir.join("type")).as_deref() != Some("Battery") {
            continue;
        }
        if let (Some(level), Some(scale)) = (
            read_i64(&dir.join("charge_now")),
            read_i64(&dir.join("charge_full")),
        ) {
            return Some(BatteryReading { level, scale });
        }
        if let (Some(level), Some(scale)) = (
            read_i64(&dir.join("energy_now")),
            read_i64(&dir.join("energy_full")),
        ) {
            return Some(BatteryReading { level, scale });
        }
        if let Some(capacity) = read_i64(&dir.join("capacity")) {
            return Some(BatteryReading {
                level: capacity,
                scale: 100,
            });
        }
    }
    None
}

fn charger_online_from(root: &Path) -> Option<bool> {
    for entry in fs::read_dir(root).ok()?.flatten() {
        let dir = entry.path();
        match read_trimmed(&dir.join("type")).as_deref() {
            Some("Mains") | Some("USB") => {
                if let Some(online) = read_i64(&dir.join("online")) {
                    return Some(online != 0);
                }
            }
            _ => {}
        }
    }
    None
}

fn read_trimmed(path: &Path) -> Option<String> {
    fs::read_to_string(path).ok().map(|s| s.trim().to_string())
}

fn read_i64(path: &Path) -> Option<i64> {
    read_trimmed(path)?.parse().ok()
}

use crate::error::ModsError;
use bitflags::bitflags;

bitflags! {
    /// Gameplay modifiers, one bit each, in registration order from bit 0.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Mods: u32 {
        const NOFAIL = 1 << 0;
        const EASY = 1 << 1;
        const TOUCH_SCREEN = 1 << 2;
        const HIDDEN = 1 << 3;
        const HARDROCK = 1 << 4;
        const SUDDENDEATH = 1 << 5;
        const DOUBLETIME = 1 << 6;
        const RELAX = 1 << 7;
        const HALFTIME = 1 << 8;
        const NIGHTCORE = 1 << 9;
        const FLASHLIGHT = 1 << 10;
        const AUTOPLAY = 1 << 11;
        const SPUNOUT = 1 << 12;
        const RELAX2 = 1 << 13;
        const PERFECT = 1 << 14;
        const KEY4 = 1 << 15;
        const KEY5 = 1 << 16;
        const KEY6 = 1 << 17;
        const KEY7 = 1 << 18;
        const KEY8 = 1 << 19;
        const FADEIN = 1 << 20;
        const RANDOM = 1 << 21;
        const CINEMA = 1 << 22;
        const TARGET = 1 << 23;
        const KEY9 = 1 << 24;
        const KEYCOOP = 1 << 25;
        const KEY1 = 1 << 26;
        const KEY3 = 1 << 27;
        const KEY2 = 1 << 28;
        const SCOREV2 = 1 << 29;
        const MIRROR = 1 << 30;
    }
}

#[derive(Debug, Clone, Copy)]
struct ModInfo {
    flag: Mods,
    name: &'static str,
    acronym: &'static str,
}

const fn m(flag: Mods, name: &'static str, acronym: &'static str) -> ModInfo {
    ModInfo {
        flag,
        name,
        acronym,
    }
}

// Indexed by bit position.
const MOD_TABLE: [ModInfo; 31] = [
    m(Mods::NOFAIL, "NOFAIL", "NF"),
    m(Mods::EASY, "EASY", "EZ"),
    m(Mods::TOUCH_SCREEN, "TOUCH_SCREEN", "TS"),
    m(Mods::HIDDEN, "HIDDEN", "HD"),
    m(Mods::HARDROCK, "HARDROCK", "HR"),
    m(Mods::SUDDENDEATH, "SUDDENDEATH", "SD"),
    m(Mods::DOUBLETIME, "DOUBLETIME", "DT"),
    m(Mods::RELAX, "RELAX", "RX"),
    m(Mods::HALFTIME, "HALFTIME", "HT"),
    m(Mods::NIGHTCORE, "NIGHTCORE", "NC"),
    m(Mods::FLASHLIGHT, "FLASHLIGHT", "FL"),
    m(Mods::AUTOPLAY, "AUTOPLAY", "AT"),
    m(Mods::SPUNOUT, "SPUNOUT", "SO"),
    m(Mods::RELAX2, "RELAX2", "AP"),
    m(Mods::PERFECT, "PERFECT", "PF"),
    m(Mods::KEY4, "KEY4", "4K"),
    m(Mods::KEY5, "KEY5", "5K"),
    m(Mods::KEY6, "KEY6", "6K"),
    m(Mods::KEY7, "KEY7", "7K"),
    m(Mods::KEY8, "KEY8", "8K"),
    m(Mods::FADEIN, "FADEIN", "FI"),
    m(Mods::RANDOM, "RANDOM", "RD"),
    m(Mods::CINEMA, "CINEMA", "CM"),
    m(Mods::TARGET, "TARGET", "TP"),
    m(Mods::KEY9, "KEY9", "9K"),
    m(Mods::KEYCOOP, "KEYCOOP", "CP"),
    m(Mods::KEY1, "KEY1", "1K"),
    m(Mods::KEY3, "KEY3", "3K"),
    m(Mods::KEY2, "KEY2", "2K"),
    m(Mods::SCOREV2, "SCOREV2", "V2"),
    m(Mods::MIRROR, "MIRROR", "MR"),
];

#[inline(always)]
fn single_info(mods: Mods) -> Result<&'static ModInfo, ModsError> {
    let bits = mods.bits();
    if bits.count_ones() != 1 {
        return Err(ModsError::NotSingleFlag(bits));
    }
    MOD_TABLE
        .get(bits.trailing_zeros() as usize)
        .ok_or(ModsError::NotSingleFlag(bits))
}

impl Mods {
    /// Builds a set from a raw score bitmask; unknown bits are dropped.
    #[inline(always)]
    pub const fn from_mask(mask: u32) -> Self {
        Self::from_bits_truncate(mask)
    }

    /// Playback rate implied by the set.
    pub fn speed(self) -> f64 {
        if self.intersects(Self::DOUBLETIME | Self::NIGHTCORE) {
            1.5
        } else if self.contains(Self::HALFTIME) {
            0.75
        } else {
            1.0
        }
    }

    /// Set flags, lowest bit first.
    pub fn flags(self) -> impl Iterator<Item = Mods> {
        MOD_TABLE
            .iter()
            .filter(move |info| self.contains(info.flag))
            .map(|info| info.flag)
    }

    pub fn name(self) -> Result<&'static str, ModsError> {
        single_info(self).map(|info| info.name)
    }

    pub fn acronym(self) -> Result<&'static str, ModsError> {
        single_info(self).map(|info| info.acronym)
    }

    /// Skin element holding this mod's icon; only defined for a single flag.
    pub fn icon_name(self) -> Result<String, ModsError> {
        single_info(self).map(|info| format!("selection-mod-{}", info.name.to_ascii_lowercase()))
    }

    /// Acronyms of every set flag, lowest bit first.
    pub fn acronyms(self) -> Vec<&'static str> {
        MOD_TABLE
            .iter()
            .filter(|info| self.contains(info.flag))
            .map(|info| info.acronym)
            .collect()
    }

    /// Icon element names of every set flag, lowest bit first.
    pub fn icon_names(self) -> Vec<String> {
        MOD_TABLE
            .iter()
            .filter(|info| self.contains(info.flag))
            .map(|info| format!("selection-mod-{}", info.name.to_ascii_lowercase()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bits_follow_registration_order() {
        for (bit, info) in MOD_TABLE.iter().enumerate() {
            assert_eq!(info.flag.bits(), 1 << bit, "{} is out of order", info.name);
        }
        assert_eq!(Mods::all().bits(), (1 << 31) - 1);
    }

    #[test]
    fn speed_prefers_doubletime_over_everything() {
        assert_eq!(Mods::DOUBLETIME.speed(), 1.5);
        assert_eq!((Mods::DOUBLETIME | Mods::HALFTIME | Mods::HIDDEN).speed(), 1.5);
        assert_eq!(Mods::NIGHTCORE.speed(), 1.5);
        assert_eq!((Mods::HALFTIME | Mods::HARDROCK).speed(), 0.75);
        assert_eq!(Mods::empty().speed(), 1.0);
        assert_eq!(Mods::HIDDEN.speed(), 1.0);
    }

    #[test]
    fn icon_name_requires_exactly_one_flag() {
        assert_eq!(
            Mods::DOUBLETIME.icon_name().as_deref(),
            Ok("selection-mod-doubletime")
        );
        assert_eq!(
            Mods::TOUCH_SCREEN.icon_name().as_deref(),
            Ok("selection-mod-touch_screen")
        );
        assert_eq!(
            Mods::empty().icon_name(),
            Err(ModsError::NotSingleFlag(0))
        );
        let pair = Mods::HIDDEN | Mods::HARDROCK;
        assert_eq!(pair.icon_name(), Err(ModsError::NotSingleFlag(pair.bits())));
        assert!(pair.acronym().is_err());
    }

    #[test]
    fn iteration_is_ascending_by_bit() {
        let mods = Mods::from_mask(Mods::MIRROR.bits() | Mods::HIDDEN.bits() | Mods::NOFAIL.bits());
        let order: Vec<Mods> = mods.flags().collect();
        assert_eq!(order, vec![Mods::NOFAIL, Mods::HIDDEN, Mods::MIRROR]);
        assert_eq!(mods.acronyms(), vec!["NF", "HD", "MR"]);
        assert_eq!(
            mods.icon_names(),
            vec![
                "selection-mod-nofail",
                "selection-mod-hidden",
                "selection-mod-mirror"
            ]
        );
    }

    #[test]
    fn unknown_high_bit_is_dropped() {
        let mods = Mods::from_mask((1 << 31) | Mods::EASY.bits());
        assert_eq!(mods, Mods::EASY);
        assert_eq!(mods.flags().count(), 1);
    }
}

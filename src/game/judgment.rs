use crate::game::scores::ScoreRecord;

/// Ruleset selected by `mode % 4`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GameMode {
    Standard,
    Taiko,
    Catch,
    Mania,
}

impl GameMode {
    #[inline(always)]
    pub const fn from_mode(mode: u32) -> Self {
        match mode % 4 {
            0 => Self::Standard,
            1 => Self::Taiko,
            2 => Self::Catch,
            _ => Self::Mania,
        }
    }

    #[inline(always)]
    pub const fn ruleset_id(self) -> u32 {
        match self {
            Self::Standard => 0,
            Self::Taiko => 1,
            Self::Catch => 2,
            Self::Mania => 3,
        }
    }
}

/// Per-judgement hit counter carried by a score record.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum JudgeStat {
    N300,
    NGeki,
    N100,
    NKatu,
    N50,
    NMiss,
}

impl JudgeStat {
    #[inline(always)]
    pub const fn count(self, score: &ScoreRecord) -> u32 {
        match self {
            Self::N300 => score.n300,
            Self::NGeki => score.ngeki,
            Self::N100 => score.n100,
            Self::NKatu => score.nkatu,
            Self::N50 => score.n50,
            Self::NMiss => score.nmiss,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct JudgeSlot {
    pub stat: JudgeStat,
    pub element: &'static str,
}

pub const JUDGE_GRID_COLS: usize = 2;
pub const JUDGE_GRID_ROWS: usize = 3;
pub const JUDGE_SLOTS: usize = JUDGE_GRID_COLS * JUDGE_GRID_ROWS;

const fn slot(stat: JudgeStat, element: &'static str) -> Option<JudgeSlot> {
    Some(JudgeSlot { stat, element })
}

// Row-major over the 2x3 grid. `None` slots are left blank on the card.
const JUDGE_TABLE: [[Option<JudgeSlot>; JUDGE_SLOTS]; 4] = [
    [
        slot(JudgeStat::N300, "hit300"),
        slot(JudgeStat::NGeki, "hit300g"),
        slot(JudgeStat::N100, "hit100"),
        slot(JudgeStat::NKatu, "hit100k"),
        slot(JudgeStat::N50, "hit50"),
        slot(JudgeStat::NMiss, "hit0"),
    ],
    [
        slot(JudgeStat::N300, "taiko-hit300"),
        slot(JudgeStat::NGeki, "taiko-hit300g"),
        slot(JudgeStat::N100, "taiko-hit100"),
        None,
        slot(JudgeStat::NMiss, "taiko-hit0"),
        None,
    ],
    [
        slot(JudgeStat::N300, "fruit-orange"),
        slot(JudgeStat::NMiss, "hit0"),
        slot(JudgeStat::N100, "fruit-drop"),
        None,
        slot(JudgeStat::N50, "fruit-drop"),
        None,
    ],
    [
        slot(JudgeStat::N300, "mania-hit300"),
        slot(JudgeStat::NGeki, "mania-hit300g-0"),
        slot(JudgeStat::NKatu, "mania-hit200"),
        slot(JudgeStat::N100, "mania-hit100"),
        slot(JudgeStat::N50, "mania-hit50"),
        slot(JudgeStat::NMiss, "mania-hit0"),
    ],
];

#[inline(always)]
pub const fn judge_slots(mode: GameMode) -> &'static [Option<JudgeSlot>; JUDGE_SLOTS] {
    &JUDGE_TABLE[mode.ruleset_id() as usize]
}

/// Grid cell `(column, row)` of slot `index`.
#[inline(always)]
pub const fn grid_cell(index: usize) -> (usize, usize) {
    (index % JUDGE_GRID_COLS, index / JUDGE_GRID_COLS)
}

/// Every element name any mode's table can ask for.
pub fn judgement_elements() -> impl Iterator<Item = &'static str> {
    JUDGE_TABLE
        .iter()
        .flat_map(|row| row.iter())
        .filter_map(|slot| slot.map(|s| s.element))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_wraps_modulo_four() {
        assert_eq!(GameMode::from_mode(0), GameMode::Standard);
        assert_eq!(GameMode::from_mode(1), GameMode::Taiko);
        assert_eq!(GameMode::from_mode(6), GameMode::Catch);
        assert_eq!(GameMode::from_mode(7), GameMode::Mania);
    }

    #[test]
    fn taiko_leaves_two_slots_empty() {
        let slots = judge_slots(GameMode::Taiko);
        assert_eq!(slots.iter().filter(|s| s.is_some()).count(), 4);
        assert!(slots[3].is_none() && slots[5].is_none());
        assert_eq!(slots[4].map(|s| s.stat), Some(JudgeStat::NMiss));
    }

    #[test]
    fn populated_slot_counts_per_mode() {
        let counts: Vec<usize> = [
            GameMode::Standard,
            GameMode::Taiko,
            GameMode::Catch,
            GameMode::Mania,
        ]
        .into_iter()
        .map(|mode| judge_slots(mode).iter().flatten().count())
        .collect();
        assert_eq!(counts, vec![6, 4, 4, 6]);
    }

    #[test]
    fn grid_is_two_columns_by_three_rows() {
        assert_eq!(grid_cell(0), (0, 0));
        assert_eq!(grid_cell(1), (1, 0));
        assert_eq!(grid_cell(4), (0, 2));
        assert_eq!(grid_cell(5), (1, 2));
    }

    #[test]
    fn mania_swaps_katu_and_hundred_rows() {
        let slots = judge_slots(GameMode::Mania);
        assert_eq!(slots[2].map(|s| s.stat), Some(JudgeStat::NKatu));
        assert_eq!(slots[3].map(|s| s.element), Some("mania-hit100"));
    }
}

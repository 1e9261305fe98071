use std::fmt;

/// Outcome label recorded in the result column of a match slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultCode {
    SupremeWin,
    BattleWin,
    LostBoth,
    PrepWin,
}

impl ResultCode {
    pub const ALL: [ResultCode; 4] = [
        Self::SupremeWin,
        Self::BattleWin,
        Self::LostBoth,
        Self::PrepWin,
    ];

    /// Exact, case-sensitive match against the spreadsheet labels.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|code| code.label() == label)
    }

    pub fn label(&self) -> &'static str {
        match *self {
            Self::SupremeWin => "Supreme Win",
            Self::BattleWin => "Battle Win",
            Self::LostBoth => "Lost Both",
            Self::PrepWin => "Prep Win",
        }
    }

    pub fn won_prep(&self) -> bool {
        matches!(*self, Self::SupremeWin | Self::PrepWin)
    }

    pub fn won_castle(&self) -> bool {
        matches!(*self, Self::SupremeWin | Self::BattleWin)
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_labels_to_phase_wins() {
        let table = [
            ("Supreme Win", true, true),
            ("Battle Win", false, true),
            ("Lost Both", false, false),
            ("Prep Win", true, false),
        ];
        for (label, prep, castle) in table {
            let code = ResultCode::from_label(label).expect("label should be known");
            assert_eq!(code.won_prep(), prep, "{label}");
            assert_eq!(code.won_castle(), castle, "{label}");
            assert_eq!(code.to_string(), label);
        }
    }

    #[test]
    fn rejects_unknown_and_differently_cased_labels() {
        assert_eq!(ResultCode::from_label("Draw"), None);
        assert_eq!(ResultCode::from_label("supreme win"), None);
        assert_eq!(ResultCode::from_label(""), None);
    }
}

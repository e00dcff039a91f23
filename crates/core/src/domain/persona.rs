use serde::{Deserialize, Serialize};
use std::fmt;

/// Audience a report is written for.
///
/// The client identifies personas by a hyphenated tag (`active-trader`), while the gateway
/// only recognizes the space-separated label (`active trader`). The two spellings are kept
/// apart on purpose; see `from_gateway_label`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InvestorPersona {
    #[default]
    Beginner,
    ActiveTrader,
    ValueInvestor,
}

// (gateway label, persona)
const GATEWAY_LABELS: [(&str, InvestorPersona); 3] = [
    ("beginner", InvestorPersona::Beginner),
    ("active trader", InvestorPersona::ActiveTrader),
    ("value investor", InvestorPersona::ValueInvestor),
];

impl InvestorPersona {
    pub const ALL: [InvestorPersona; 3] = [
        InvestorPersona::Beginner,
        InvestorPersona::ActiveTrader,
        InvestorPersona::ValueInvestor,
    ];

    /// Client-side tag, as sent by the dashboard.
    pub fn tag(self) -> &'static str {
        match self {
            InvestorPersona::Beginner => "beginner",
            InvestorPersona::ActiveTrader => "active-trader",
            InvestorPersona::ValueInvestor => "value-investor",
        }
    }

    /// Label interpolated into the gateway's system instruction.
    pub fn gateway_label(self) -> &'static str {
        match self {
            InvestorPersona::Beginner => "beginner",
            InvestorPersona::ActiveTrader => "active trader",
            InvestorPersona::ValueInvestor => "value investor",
        }
    }

    pub fn from_gateway_label(label: &str) -> Option<Self> {
        GATEWAY_LABELS
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, persona)| *persona)
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.tag() == tag)
    }

    pub fn display_name(self) -> &'static str {
        match self {
            InvestorPersona::Beginner => "Beginner",
            InvestorPersona::ActiveTrader => "Active Trader",
            InvestorPersona::ValueInvestor => "Value Investor",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            InvestorPersona::Beginner => "Simple explanations and basic metrics",
            InvestorPersona::ActiveTrader => "Technical analysis and short-term signals",
            InvestorPersona::ValueInvestor => "Fundamental analysis and long-term outlook",
        }
    }
}

impl fmt::Display for InvestorPersona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

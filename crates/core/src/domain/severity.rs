//! Severity codes published by the status page, ordered from healthiest to
//! "could not determine".

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum StatusColor {
    Green,
    Yellow,
    Orange,
    Red,
    Blue,
    Grey,
    Black,
}

impl StatusColor {
    pub fn as_str(self) -> &'static str {
        match self {
            StatusColor::Green => "green",
            StatusColor::Yellow => "yellow",
            StatusColor::Orange => "orange",
            StatusColor::Red => "red",
            StatusColor::Blue => "blue",
            StatusColor::Grey => "grey",
            StatusColor::Black => "black",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "green" => Some(StatusColor::Green),
            "yellow" => Some(StatusColor::Yellow),
            "orange" => Some(StatusColor::Orange),
            "red" => Some(StatusColor::Red),
            "blue" => Some(StatusColor::Blue),
            "grey" => Some(StatusColor::Grey),
            "black" => Some(StatusColor::Black),
            _ => None,
        }
    }
}

impl fmt::Display for StatusColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum SeverityCode {
    Ok,
    PartialMinor,
    PartialMajor,
    Critical,
    Maintenance,
    Unknown,
}

impl SeverityCode {
    /// Every code in ordinal order. The classifier matches markers in this order.
    pub const ALL: [SeverityCode; 6] = [
        SeverityCode::Ok,
        SeverityCode::PartialMinor,
        SeverityCode::PartialMajor,
        SeverityCode::Critical,
        SeverityCode::Maintenance,
        SeverityCode::Unknown,
    ];

    pub fn ordinal(self) -> u8 {
        match self {
            SeverityCode::Ok => 1,
            SeverityCode::PartialMinor => 2,
            SeverityCode::PartialMajor => 3,
            SeverityCode::Critical => 4,
            SeverityCode::Maintenance => 5,
            SeverityCode::Unknown => 9,
        }
    }

    pub fn from_ordinal(n: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|c| i64::from(c.ordinal()) == n)
    }

    pub fn color(self) -> StatusColor {
        match self {
            SeverityCode::Ok => StatusColor::Green,
            SeverityCode::PartialMinor => StatusColor::Yellow,
            SeverityCode::PartialMajor => StatusColor::Orange,
            SeverityCode::Critical => StatusColor::Red,
            SeverityCode::Maintenance => StatusColor::Blue,
            SeverityCode::Unknown => StatusColor::Black,
        }
    }

    /// Short display text.
    pub fn text(self) -> &'static str {
        match self {
            SeverityCode::Ok => "BankID: Alt virker.",
            SeverityCode::PartialMinor => "BankID: Delvis nede.",
            SeverityCode::PartialMajor => "BankID: delvis nede.",
            SeverityCode::Critical => "BankID: er helt nede.",
            SeverityCode::Maintenance => "BankID: Vedlikehold.",
            SeverityCode::Unknown => "BIDI: Error 9.",
        }
    }

    pub fn meaning(self) -> &'static str {
        match self {
            SeverityCode::Ok => "Bankid har grønne lamper, alt er tut og kjør!",
            SeverityCode::PartialMinor => "Gul lampe. Betyr tregheter eller at noe er nede.",
            SeverityCode::PartialMajor => {
                "En eller flere tjenester hos bankID eller Underleverandører er nede"
            }
            SeverityCode::Critical => "Rødt lys hos BankID. Alle tjenester er utilgjengelige.",
            SeverityCode::Maintenance => {
                "BankID er helt eller delvis utilgjengelig på grunn av planlagt vedlikehold."
            }
            SeverityCode::Unknown => {
                "En feil gjør at dette BIDI ikke klarer innehente ny data fra BankID.no\nKontakt IT."
            }
        }
    }

    /// Markup the status page uses for this code. `Unknown` has no marker and
    /// is only ever produced as the fallback.
    pub fn marker(self) -> Option<&'static str> {
        match self {
            SeverityCode::Ok => Some(r#"<span class="color-dot none">"#),
            SeverityCode::PartialMinor => Some(r#"<span class="color-dot minor">"#),
            SeverityCode::PartialMajor => Some(r#"<span class="color-dot major">"#),
            SeverityCode::Critical => Some(r#"<span class="color-dot critical">"#),
            SeverityCode::Maintenance => Some(r#"<span class="color-dot maintenance">"#),
            SeverityCode::Unknown => None,
        }
    }

    /// Whether the page carries an incident description worth extracting.
    pub fn has_detail(self) -> bool {
        !matches!(self, SeverityCode::Ok | SeverityCode::Unknown)
    }
}

impl fmt::Display for SeverityCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ordinal())
    }
}

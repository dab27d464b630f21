//! Action text format.
//!
//! One action per line, ten comma-separated fields:
//!
//! ```text
//! <id>,<KIND>,<ailment?>,<min.max?>,<ignore_atk>,<ignore_def>,<base>,<variance>,<attribute?>,<chance?>
//! ```
//!
//! - `KIND`: ALTER, ASSIGN, DAMAGE, INFLICT, RELIEVE or REVIVE
//! - ignore sets: dot-separated tokens from ALL, ELEMENTAL, PHYSICAL,
//!   THERMAL, POLAR, PRIMAL, CHARGED, CYBERNETIC, NIHIL (empty for none)
//! - base and variance: `AMOUNT.<n>` or `PC.<n>`
//!
//! Blank lines and lines starting with `#` are skipped. A line that does not
//! parse is reported once and dropped; the rest of the file still loads.

use std::str::FromStr;

use battle_core::action::{Action, ActionEffect, ActionError, ActionKind, Magnitude};
use battle_core::state::AilmentKind;
use battle_core::stats::{Attribute, ElementSet};

const FIELDS: usize = 10;

/// Why a line of action text was rejected.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("expected 10 fields, found {0}")]
    FieldCount(usize),

    #[error("invalid id `{0}`")]
    InvalidId(String),

    #[error("unknown action kind `{0}`")]
    UnknownKind(String),

    #[error("unknown ailment `{0}`")]
    UnknownAilment(String),

    #[error("{0} needs an ailment")]
    MissingAilment(ActionKind),

    #[error("invalid duration `{0}`")]
    InvalidDuration(String),

    #[error("unknown element token `{0}`")]
    UnknownElement(String),

    #[error("invalid magnitude `{0}`")]
    InvalidMagnitude(String),

    #[error("unknown attribute `{0}`")]
    UnknownAttribute(String),

    #[error("{0} needs an attribute")]
    MissingAttribute(ActionKind),

    #[error("invalid chance `{0}`")]
    InvalidChance(String),

    #[error(transparent)]
    Rejected(#[from] ActionError),
}

/// Parse one line of action text.
pub fn parse_action(line: &str) -> Result<Action, ParseError> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() != FIELDS {
        return Err(ParseError::FieldCount(fields.len()));
    }

    let id = fields[0]
        .parse::<u32>()
        .map_err(|_| ParseError::InvalidId(fields[0].to_owned()))?;
    let kind =
        ActionKind::from_str(fields[1]).map_err(|_| ParseError::UnknownKind(fields[1].to_owned()))?;
    let ailment = optional(fields[2])
        .map(|s| AilmentKind::from_str(s).map_err(|_| ParseError::UnknownAilment(s.to_owned())))
        .transpose()?;
    let (min_duration, max_duration) = match optional(fields[3]) {
        Some(s) => parse_duration(s)?,
        None => (0, 0),
    };
    let ignore_atk = parse_elements(fields[4])?;
    let ignore_def = parse_elements(fields[5])?;
    let base = parse_magnitude(fields[6])?;
    let variance = parse_magnitude(fields[7])?;
    let attribute = optional(fields[8])
        .map(|s| Attribute::from_str(s).map_err(|_| ParseError::UnknownAttribute(s.to_owned())))
        .transpose()?;
    let chance = optional(fields[9])
        .map(|s| s.parse::<u32>().map_err(|_| ParseError::InvalidChance(s.to_owned())))
        .transpose()?;

    let effect = match kind {
        ActionKind::Alter => ActionEffect::Alter {
            attribute: attribute.ok_or(ParseError::MissingAttribute(kind))?,
        },
        ActionKind::Assign => ActionEffect::Assign {
            attribute: attribute.ok_or(ParseError::MissingAttribute(kind))?,
        },
        ActionKind::Damage => ActionEffect::Damage {
            attribute: attribute.unwrap_or(Attribute::Vita),
        },
        ActionKind::Revive => ActionEffect::Revive,
        ActionKind::Inflict => ActionEffect::Inflict {
            ailment: ailment.ok_or(ParseError::MissingAilment(kind))?,
            min_duration,
            max_duration,
        },
        ActionKind::Relieve => ActionEffect::Relieve {
            ailment: ailment.ok_or(ParseError::MissingAilment(kind))?,
        },
    };

    let mut builder = Action::builder(id, effect)
        .ignore_atk(ignore_atk)
        .ignore_def(ignore_def)
        .base(base)
        .variance(variance);
    if let Some(chance) = chance {
        builder = builder.chance(chance);
    }
    Ok(builder.build()?)
}

/// Parse a whole action file. Bad lines are logged with their line number
/// and skipped.
pub fn parse_actions(text: &str) -> Vec<Action> {
    let mut actions = Vec::new();
    for (number, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match parse_action(line) {
            Ok(action) => actions.push(action),
            Err(error) => {
                tracing::warn!(line = number + 1, %error, text = line, "action rejected");
            }
        }
    }
    actions
}

fn optional(field: &str) -> Option<&str> {
    (!field.is_empty()).then_some(field)
}

/// `min.max`, or a single number for a fixed duration.
fn parse_duration(s: &str) -> Result<(u32, u32), ParseError> {
    let invalid = || ParseError::InvalidDuration(s.to_owned());
    match s.split_once('.') {
        Some((min, max)) => Ok((
            min.parse().map_err(|_| invalid())?,
            max.parse().map_err(|_| invalid())?,
        )),
        None => {
            let turns = s.parse().map_err(|_| invalid())?;
            Ok((turns, turns))
        }
    }
}

fn parse_elements(s: &str) -> Result<ElementSet, ParseError> {
    let mut set = ElementSet::empty();
    for token in s.split('.').filter(|t| !t.is_empty()) {
        let flag = match token.to_ascii_uppercase().as_str() {
            "ALL" => ElementSet::ALL,
            "ELEMENTAL" => ElementSet::ELEMENTAL,
            "PHYSICAL" => ElementSet::PHYSICAL,
            "THERMAL" => ElementSet::THERMAL,
            "POLAR" => ElementSet::POLAR,
            "PRIMAL" => ElementSet::PRIMAL,
            "CHARGED" => ElementSet::CHARGED,
            "CYBERNETIC" => ElementSet::CYBERNETIC,
            "NIHIL" => ElementSet::NIHIL,
            _ => return Err(ParseError::UnknownElement(token.to_owned())),
        };
        set.insert(flag);
    }
    Ok(set)
}

fn parse_magnitude(s: &str) -> Result<Magnitude, ParseError> {
    let invalid = || ParseError::InvalidMagnitude(s.to_owned());
    let (form, value) = s.split_once('.').ok_or_else(invalid)?;
    let value: i32 = value.parse().map_err(|_| invalid())?;
    match form.to_ascii_uppercase().as_str() {
        "AMOUNT" => Ok(Magnitude::Amount(value)),
        "PC" => Ok(Magnitude::Percent(value)),
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_poison_infliction() {
        let action = parse_action("12,INFLICT,POISON,2.4,,,AMOUNT.0,AMOUNT.0,,80").unwrap();
        assert_eq!(action.id(), 12);
        assert_eq!(
            *action.effect(),
            ActionEffect::Inflict {
                ailment: AilmentKind::Poison,
                min_duration: 2,
                max_duration: 4,
            }
        );
        assert_eq!(action.chance(), Some(80));
    }

    #[test]
    fn parses_ignore_sets_and_percentages() {
        let action = parse_action("3,ALTER,,,ELEMENTAL,PHYSICAL.NIHIL,PC.-25,PC.10,VITA,").unwrap();
        assert_eq!(action.ignore_atk(), ElementSet::ELEMENTAL);
        assert_eq!(action.ignore_def(), ElementSet::PHYSICAL | ElementSet::NIHIL);
        assert_eq!(action.base(), Magnitude::Percent(-25));
        assert_eq!(action.variance(), Magnitude::Percent(10));
        assert!(action.is_damaging());
        assert_eq!(action.chance(), None);
    }

    #[test]
    fn rejects_bad_lines() {
        assert_eq!(
            parse_action("1,ALTER,,,WOOD,,AMOUNT.5,AMOUNT.0,VITA,"),
            Err(ParseError::UnknownElement("WOOD".into()))
        );
        assert_eq!(
            parse_action("1,ALTER,,,,,AMOUNT.5,AMOUNT.0,,"),
            Err(ParseError::MissingAttribute(ActionKind::Alter))
        );
        assert_eq!(
            parse_action("1,RELIEVE,,,,,AMOUNT.0,AMOUNT.0,,"),
            Err(ParseError::MissingAilment(ActionKind::Relieve))
        );
        assert_eq!(parse_action("1,ALTER"), Err(ParseError::FieldCount(2)));
        assert_eq!(
            parse_action("1,ALTER,,,,,PC.150,AMOUNT.0,VITA,"),
            Err(ParseError::Rejected(ActionError::BasePercentOutOfRange(150)))
        );
    }

    #[test]
    fn files_skip_comments_and_bad_lines() {
        let text = "\
# id,kind,...
1,REVIVE,,,,,PC.50,AMOUNT.0,,

2,BOGUS,,,,,AMOUNT.0,AMOUNT.0,,
3,DAMAGE,,,,,AMOUNT.20,PC.10,,
";
        let ids: Vec<u32> = parse_actions(text).iter().map(Action::id).collect();
        assert_eq!(ids, vec![1, 3]);
    }
}

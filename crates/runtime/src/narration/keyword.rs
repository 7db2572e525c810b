use async_trait::async_trait;
use mafia_core::ProposalKind;

use super::{NarrationError, NarrationParser, ProposedAction};

const VERBS: [(&str, ProposalKind); 4] = [
    ("shoots", ProposalKind::Shot),
    ("shot", ProposalKind::Shot),
    ("saves", ProposalKind::Save),
    ("saved", ProposalKind::Save),
];

const REFLEXIVE: [&str; 5] = ["herself", "himself", "themselves", "themself", "self"];

/// Offline parser for narration such as
/// `"Ana shot Bo, then Cy saved herself and Di saves Bo."`.
///
/// Each clause must read `<actor> <verb> <target>`. Names are matched
/// case-insensitively against the living players, with or without their seat
/// prefix; clauses naming nobody at the table are ignored.
#[derive(Clone, Copy, Debug, Default)]
pub struct KeywordNarrationParser;

impl KeywordNarrationParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, narration: &str, living: &[String]) -> Vec<ProposedAction> {
        clauses(narration)
            .filter_map(|clause| parse_clause(&clause, living))
            .collect()
    }
}

#[async_trait]
impl NarrationParser for KeywordNarrationParser {
    async fn propose(
        &self,
        narration: &str,
        living: &[String],
    ) -> Result<Vec<ProposedAction>, NarrationError> {
        if narration.trim().is_empty() {
            return Err(NarrationError::EmptyNarration);
        }
        Ok(self.parse(narration, living))
    }
}

fn clauses(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(['.', ',', ';', '!', '\n'])
        .flat_map(|part| {
            normalize(part)
                .split(" and ")
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .filter(|clause| !clause.is_empty())
}

fn parse_clause(clause: &str, living: &[String]) -> Option<ProposedAction> {
    let words: Vec<&str> = clause.split(' ').collect();
    let (at, kind) = words.iter().enumerate().find_map(|(index, word)| {
        VERBS
            .iter()
            .find(|(verb, _)| verb == word)
            .map(|&(_, kind)| (index, kind))
    })?;

    let actor = match_name(&words[..at].join(" "), living)?;
    let rest = words[at + 1..].join(" ");
    let target = if rest.split(' ').any(|word| REFLEXIVE.contains(&word)) {
        actor.clone()
    } else {
        match_name(&rest, living)?
    };
    Some(ProposedAction::new(actor, kind, target))
}

/// Longest living name mentioned in `fragment`.
fn match_name(fragment: &str, living: &[String]) -> Option<String> {
    if fragment.is_empty() {
        return None;
    }
    let padded = format!(" {fragment} ");
    living
        .iter()
        .filter(|name| {
            let full = normalize(name);
            let bare = normalize(bare_name(name));
            !bare.is_empty()
                && (padded.contains(&format!(" {full} ")) || padded.contains(&format!(" {bare} ")))
        })
        .max_by_key(|name| name.len())
        .cloned()
}

fn bare_name(name: &str) -> &str {
    match name.split_once(". ") {
        Some((seat, rest)) if seat.chars().all(|c| c.is_ascii_digit()) => rest,
        _ => name,
    }
}

/// Lowercase words separated by single spaces.
fn normalize(text: &str) -> String {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

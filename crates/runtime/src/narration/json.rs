use std::str::FromStr;

use mafia_core::ProposalKind;
use serde::Deserialize;

use super::{NarrationError, ProposedAction};

#[derive(Deserialize)]
#[serde(untagged)]
enum Envelope {
    Wrapped { actions: Vec<RawAction> },
    Bare(Vec<RawAction>),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAction {
    actor: String,
    action_type: String,
    target: String,
}

/// Decodes `{"actions": [{actor, actionType, target}]}` or a bare array.
///
/// Markdown code fences around the document are tolerated. Items with an
/// action type other than `shot` or `save` are skipped.
pub fn decode_actions_json(text: &str) -> Result<Vec<ProposedAction>, NarrationError> {
    let body = strip_fences(text);
    let envelope: Envelope =
        serde_json::from_str(body).map_err(|e| NarrationError::Decode(e.to_string()))?;
    let raw = match envelope {
        Envelope::Wrapped { actions } | Envelope::Bare(actions) => actions,
    };

    Ok(raw
        .into_iter()
        .filter_map(|item| {
            let kind = ProposalKind::from_str(item.action_type.trim()).ok()?;
            Some(ProposedAction::new(item.actor, kind, item.target))
        })
        .collect())
}

fn strip_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_wrapped_document_and_skips_unknown_kinds() {
        let text = r#"{"actions": [
            {"actor": "Ana", "actionType": "shot", "target": "Bo"},
            {"actor": "Cy", "actionType": "SAVE", "target": "Cy"},
            {"actor": "Di", "actionType": "poison", "target": "Bo"}
        ]}"#;

        let actions = decode_actions_json(text).unwrap();
        assert_eq!(
            actions,
            vec![
                ProposedAction::new("Ana", ProposalKind::Shot, "Bo"),
                ProposedAction::new("Cy", ProposalKind::Save, "Cy"),
            ]
        );
    }

    #[test]
    fn accepts_fenced_bare_array() {
        let text = "```json\n[{\"actor\":\"Ana\",\"actionType\":\"save\",\"target\":\"Bo\"}]\n```";
        assert_eq!(decode_actions_json(text).unwrap().len(), 1);
    }

    #[test]
    fn malformed_document_is_a_decode_error() {
        assert!(matches!(
            decode_actions_json("the mafia slept"),
            Err(NarrationError::Decode(_))
        ));
    }
}

use super::session::GamePhase;
use serde::Serialize;

/// Round payload returned by the game-state poll
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub game_state: GamePhase,
    pub current_round: u32,
    pub total_rounds: u32,
    pub imposter: Option<String>,
    pub word: Option<String>,
    pub hint: Option<String>,
    pub first_player: Option<String>,
    pub round_finished: bool,
    /// Only present on a view scoped to one player
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_imposter: Option<bool>,
}

impl GameSnapshot {
    /// Restrict the payload to what `viewer` should see.
    ///
    /// Until results, the imposter never receives the word and nobody else
    /// learns who the imposter is.
    pub fn scoped_for(mut self, viewer: &str) -> Self {
        let is_imposter = self.imposter.as_deref() == Some(viewer);
        self.is_imposter = Some(is_imposter);

        if self.game_state < GamePhase::Results {
            if is_imposter {
                self.word = None;
            } else {
                self.imposter = None;
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(state: GamePhase) -> GameSnapshot {
        GameSnapshot {
            game_state: state,
            current_round: 1,
            total_rounds: 1,
            imposter: Some("bob".to_string()),
            word: Some("ocean".to_string()),
            hint: Some("water".to_string()),
            first_player: Some("alice".to_string()),
            round_finished: false,
            is_imposter: None,
        }
    }

    #[test]
    fn imposter_sees_hint_but_not_word() {
        let view = snapshot(GamePhase::Playing).scoped_for("bob");
        assert_eq!(view.is_imposter, Some(true));
        assert_eq!(view.word, None);
        assert_eq!(view.hint.as_deref(), Some("water"));
        assert_eq!(view.imposter.as_deref(), Some("bob"));
    }

    #[test]
    fn crewmate_sees_word_but_not_imposter() {
        let view = snapshot(GamePhase::RoleAssignment).scoped_for("alice");
        assert_eq!(view.is_imposter, Some(false));
        assert_eq!(view.word.as_deref(), Some("ocean"));
        assert_eq!(view.imposter, None);
    }

    #[test]
    fn results_reveal_everything() {
        let view = snapshot(GamePhase::Results).scoped_for("alice");
        assert_eq!(view.imposter.as_deref(), Some("bob"));
        assert_eq!(view.word.as_deref(), Some("ocean"));
    }

    #[test]
    fn raw_snapshot_omits_viewer_flag() {
        let json = serde_json::to_value(snapshot(GamePhase::Countdown)).unwrap();
        assert_eq!(json["gameState"], "countdown");
        assert_eq!(json["firstPlayer"], "alice");
        assert!(json.get("isImposter").is_none());
    }
}

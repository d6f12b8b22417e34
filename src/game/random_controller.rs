//! Provider that picks uniformly among the legal actions

use crate::core::PlayerId;
use crate::game::controller::{AiDecision, DecisionFuture, DecisionProvider, DecisionRequest};
use crate::game::zero_controller::ZeroController;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

pub struct RandomController {
    player_id: PlayerId,
    rng: StdRng,
}

impl RandomController {
    pub fn new(player_id: PlayerId) -> Self {
        RandomController {
            player_id,
            rng: StdRng::from_entropy(),
        }
    }

    /// Create a random controller with a seeded RNG (for deterministic testing)
    pub fn with_seed(player_id: PlayerId, seed: u64) -> Self {
        RandomController {
            player_id,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl DecisionProvider for RandomController {
    fn player_id(&self) -> PlayerId {
        self.player_id
    }

    fn name(&self) -> &str {
        "random"
    }

    fn decide<'a>(&'a mut self, request: DecisionRequest) -> DecisionFuture<'a> {
        let action = request
            .actions
            .choose(&mut self.rng)
            .cloned()
            .unwrap_or_else(|| ZeroController::choose(&request.actions));
        Box::pin(async move { Ok(AiDecision::immediate(action)) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PlayerKind;
    use crate::game::{AvailableAction, GameState, PlayerBehaviorSignal};

    fn request(actions: Vec<AvailableAction>) -> DecisionRequest {
        DecisionRequest {
            snapshot: GameState::new_two_player(("Alice", PlayerKind::Ai), ("Bob", PlayerKind::Ai)),
            player_id: PlayerId::new(0),
            actions,
            behavior: PlayerBehaviorSignal::default(),
        }
    }

    #[tokio::test]
    async fn test_seeded_choices_repeat() {
        let actions = vec![
            AvailableAction::DeclareAttackers(vec![]),
            AvailableAction::DeclareBlockers(vec![]),
            AvailableAction::Pass,
        ];
        let mut a = RandomController::with_seed(PlayerId::new(0), 7);
        let mut b = RandomController::with_seed(PlayerId::new(0), 7);
        for _ in 0..10 {
            let left = a.decide(request(actions.clone())).await.unwrap();
            let right = b.decide(request(actions.clone())).await.unwrap();
            assert_eq!(left, right);
            assert!(actions.contains(&left.action));
        }
    }

    #[tokio::test]
    async fn test_empty_list_passes() {
        let mut controller = RandomController::with_seed(PlayerId::new(0), 1);
        let decision = controller.decide(request(vec![])).await.unwrap();
        assert_eq!(decision.action, AvailableAction::Pass);
    }
}

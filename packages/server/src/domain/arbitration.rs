//! Buzz arbitration: first accepted buzz wins the current question.
//!
//! "First" is defined by server processing order. Client-side timestamps are
//! never consulted; this is the only order the server can guarantee without
//! clock synchronisation. Callers must run [`arbitrate`] under the same lock
//! that guards the room so the check and the set are a single step.

use super::entity::{Participant, Room};
use super::value_object::ParticipantId;

/// Result of a buzz attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuzzOutcome {
    /// This buzz won; the room now records the participant as winner.
    Accepted(Participant),
    /// No question is active; the buzz is ignored.
    QuestionInactive,
    /// A winner was already recorded for the current question.
    AlreadyTaken { winner: ParticipantId },
}

impl BuzzOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }
}

pub fn arbitrate(room: &mut Room, participant: Participant) -> BuzzOutcome {
    if !room.question_active() {
        return BuzzOutcome::QuestionInactive;
    }
    if let Some(winner) = room.buzzer_winner() {
        return BuzzOutcome::AlreadyTaken {
            winner: winner.id.clone(),
        };
    }
    room.set_buzzer_winner(participant.clone());
    BuzzOutcome::Accepted(participant)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RoomCode, Timestamp};

    fn room() -> Room {
        Room::new(RoomCode::new("ABCD".to_string()).unwrap(), Timestamp::new(0))
    }

    fn participant(id: &str) -> Participant {
        Participant::new(ParticipantId::new(id.to_string()).unwrap(), id.to_string())
    }

    #[test]
    fn test_buzz_outside_question_is_ignored() {
        // テスト項目: 出題中でなければ早押しは無視される
        // given (前提条件):
        let mut room = room();

        // when (操作):
        let outcome = arbitrate(&mut room, participant("p1"));

        // then (期待する結果):
        assert_eq!(outcome, BuzzOutcome::QuestionInactive);
        assert!(room.buzzer_winner().is_none());
    }

    #[test]
    fn test_first_buzz_wins() {
        // テスト項目: 出題中の最初の早押しが勝者になる
        // given (前提条件):
        let mut room = room();
        room.start_question();

        // when (操作):
        let outcome = arbitrate(&mut room, participant("p2"));

        // then (期待する結果):
        assert_eq!(outcome, BuzzOutcome::Accepted(participant("p2")));
        assert_eq!(room.buzzer_winner(), Some(&participant("p2")));
    }

    #[test]
    fn test_only_one_buzz_accepted_per_question() {
        // テスト項目: 1 問につき受理される早押しは 1 回だけで、勝者は最初の 1 人
        // given (前提条件):
        let mut room = room();
        room.start_question();
        let order = ["p3", "p1", "p3", "p2", "p1"];

        // when (操作):
        let outcomes: Vec<BuzzOutcome> = order
            .iter()
            .map(|id| arbitrate(&mut room, participant(id)))
            .collect();

        // then (期待する結果):
        assert_eq!(outcomes.iter().filter(|o| o.is_accepted()).count(), 1);
        assert_eq!(outcomes[0], BuzzOutcome::Accepted(participant("p3")));
        for outcome in &outcomes[1..] {
            assert_eq!(
                outcome,
                &BuzzOutcome::AlreadyTaken {
                    winner: participant("p3").id
                }
            );
        }
    }

    #[test]
    fn test_new_question_reopens_buzzer() {
        // テスト項目: 次の出題で早押しが再び受け付けられる
        // given (前提条件):
        let mut room = room();
        room.start_question();
        arbitrate(&mut room, participant("p2"));

        // when (操作):
        room.start_question();
        let outcome = arbitrate(&mut room, participant("p1"));

        // then (期待する結果):
        assert_eq!(outcome, BuzzOutcome::Accepted(participant("p1")));
    }

    #[test]
    fn test_buzz_after_game_start_is_ignored() {
        // テスト項目: game_start 後は早押しが無視される
        // given (前提条件):
        let mut room = room();
        room.start_question();
        room.game_start();

        // when (操作):
        let outcome = arbitrate(&mut room, participant("p1"));

        // then (期待する結果):
        assert_eq!(outcome, BuzzOutcome::QuestionInactive);
    }
}

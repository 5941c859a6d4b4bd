//! Entities: Participant and Room.
//!
//! `Room` は早押しの状態機械そのもの。フィールドは非公開にして、
//! 「buzzer_winner は question_active の間だけ存在する」という不変条件を
//! メソッド経由でしか壊せないようにしている。

use std::collections::HashMap;

use super::value_object::{ParticipantId, RoomCode, Timestamp};

/// A player taking part in a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub id: ParticipantId,
    pub display_name: String,
    pub contact: Option<String>,
    pub score: i64,
}

impl Participant {
    pub fn new(id: ParticipantId, display_name: String) -> Self {
        Self {
            id,
            display_name,
            contact: None,
            score: 0,
        }
    }

    pub fn with_contact(mut self, contact: Option<String>) -> Self {
        self.contact = contact;
        self
    }

    pub fn with_score(mut self, score: i64) -> Self {
        self.score = score;
        self
    }
}

/// Observable phase of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomPhase {
    WaitingRoom,
    QuestionActive,
}

/// Per-room question/buzzer state and participant set.
#[derive(Debug, Clone)]
pub struct Room {
    code: RoomCode,
    participants: HashMap<ParticipantId, Participant>,
    buzzer_winner: Option<Participant>,
    question_active: bool,
    created_at: Timestamp,
}

impl Room {
    /// Create a room in `WaitingRoom` with no buzzer winner.
    pub fn new(code: RoomCode, created_at: Timestamp) -> Self {
        Self {
            code,
            participants: HashMap::new(),
            buzzer_winner: None,
            question_active: false,
            created_at,
        }
    }

    pub fn code(&self) -> &RoomCode {
        &self.code
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn question_active(&self) -> bool {
        self.question_active
    }

    pub fn buzzer_winner(&self) -> Option<&Participant> {
        self.buzzer_winner.as_ref()
    }

    pub fn phase(&self) -> RoomPhase {
        if self.question_active {
            RoomPhase::QuestionActive
        } else {
            RoomPhase::WaitingRoom
        }
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    pub fn contains(&self, participant_id: &ParticipantId) -> bool {
        self.participants.contains_key(participant_id)
    }

    pub fn participant(&self, participant_id: &ParticipantId) -> Option<&Participant> {
        self.participants.get(participant_id)
    }

    /// Participants sorted by id for consistent ordering
    pub fn participant_list(&self) -> Vec<Participant> {
        let mut participants: Vec<Participant> = self.participants.values().cloned().collect();
        participants.sort_by(|a, b| a.id.cmp(&b.id));
        participants
    }

    /// Insert or refresh a participant.
    ///
    /// An existing entry keeps its score; only the display name and contact
    /// are refreshed. Question state is left untouched.
    pub fn upsert_participant(&mut self, participant: Participant) {
        match self.participants.get_mut(&participant.id) {
            Some(existing) => {
                existing.display_name = participant.display_name;
                existing.contact = participant.contact;
            }
            None => {
                self.participants.insert(participant.id.clone(), participant);
            }
        }
    }

    pub fn remove_participant(&mut self, participant_id: &ParticipantId) -> Option<Participant> {
        self.participants.remove(participant_id)
    }

    /// Overwrite a participant's score. Returns `false` if absent.
    pub fn update_score(&mut self, participant_id: &ParticipantId, score: i64) -> bool {
        match self.participants.get_mut(participant_id) {
            Some(participant) => {
                participant.score = score;
                true
            }
            None => false,
        }
    }

    /// Transition to `QuestionActive` and clear the buzzer.
    pub fn start_question(&mut self) {
        self.question_active = true;
        self.buzzer_winner = None;
    }

    /// Transition to `WaitingRoom` and clear the buzzer.
    pub fn game_start(&mut self) {
        self.question_active = false;
        self.buzzer_winner = None;
    }

    /// Record the buzzer winner. Only callable while a question is active;
    /// the decision itself is made by [`super::arbitration::arbitrate`].
    pub(super) fn set_buzzer_winner(&mut self, participant: Participant) {
        debug_assert!(self.question_active);
        self.buzzer_winner = Some(participant);
    }
}

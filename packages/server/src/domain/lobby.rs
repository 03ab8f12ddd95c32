//! ロビー: 参加者レジストリ + 待機キュー + マッチングエンジン
//!
//! ここがシステムの中核。全ての変更操作は Repository 層の単一の Mutex の
//! 内側で呼ばれる前提（single-mutator）。各メソッドは途中で中断されない
//! ため、メソッドの境界では以下の不変条件が常に成立する:
//!
//! - ペアリングは対称: `A.partner_id == B.id` なら `B.partner_id == A.id`
//!   で、両者とも `Chatting`
//! - 自分自身とはペアにならない
//! - 1 人の参加者が同時に「キュー登録」と「ペアリング」の両方に
//!   属することはない
//! - キュー内の ID は必ずレジストリに存在し、その参加者は
//!   `Waiting` かつ `seeking`

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use super::entity::{Participant, ParticipantStatus};
use super::error::LobbyError;
use super::value_object::{SessionId, Timestamp};

/// レジストリから取り除かれた参加者と、その時点で孤立した元の相手
#[derive(Debug, Clone)]
pub struct RemovedParticipant {
    pub participant: Participant,
    /// 削除直前までペアだった相手（通知用）。未ペアなら `None`
    pub former_partner: Option<SessionId>,
}

/// 匿名チャットのロビー
pub struct Lobby {
    participants: HashMap<SessionId, Participant>,
    /// 相手を探している参加者の FIFO キュー（重複なし）
    waiting: VecDeque<SessionId>,
    inactivity_timeout: Duration,
}

impl Lobby {
    pub fn new(inactivity_timeout: Duration) -> Self {
        Self {
            participants: HashMap::new(),
            waiting: VecDeque::new(),
            inactivity_timeout,
        }
    }

    /// 参加者を登録する
    pub fn add_participant(&mut self, participant: Participant) -> Result<(), LobbyError> {
        if self.participants.contains_key(&participant.id) {
            return Err(LobbyError::DuplicateSession(
                participant.id.as_str().to_string(),
            ));
        }
        self.participants.insert(participant.id.clone(), participant);
        Ok(())
    }

    pub fn get(&self, id: &SessionId) -> Option<&Participant> {
        self.participants.get(id)
    }

    /// 参加者を取り除く
    ///
    /// ペアリングがあれば先に解消し、待機キューからも外す。存在しない
    /// ID に対しては `None`（冪等）。
    pub fn remove_participant(&mut self, id: &SessionId) -> Option<RemovedParticipant> {
        if !self.participants.contains_key(id) {
            return None;
        }
        let former_partner = self.dissolve_pairing(id).map(|p| p.id);
        self.waiting.retain(|queued| queued != id);
        let participant = self.participants.remove(id)?;
        Some(RemovedParticipant {
            participant,
            former_partner,
        })
    }

    /// 待機キューに追加する
    ///
    /// 対象が `Waiting` かつ `seeking` で、まだキューにいない場合のみ
    /// 追加する。それ以外は黙って no-op（呼び出し側は投機的に呼んでよい）。
    pub fn enqueue(&mut self, id: &SessionId) {
        let Some(participant) = self.participants.get(id) else {
            return;
        };
        if participant.status == ParticipantStatus::Waiting
            && participant.seeking
            && !self.waiting.contains(id)
        {
            self.waiting.push_back(id.clone());
        }
    }

    /// 相手を探す
    ///
    /// キューの先頭から破壊的に pop しながら、生きている候補
    /// （登録済み・自分以外・非 inactive・`Waiting` かつ `seeking`）を探す。
    /// 条件を満たさない候補は捨てる（再キューしない — 別経路で掃除中の
    /// 参加者とみなす）。候補が見つかればペアリングを確定して相手の
    /// スナップショットを返し、キューが尽きれば自分をキューに入れて
    /// `None` を返す。
    pub fn find_match(
        &mut self,
        id: &SessionId,
        now: Timestamp,
    ) -> Result<Option<Participant>, LobbyError> {
        {
            let caller = self
                .participants
                .get_mut(id)
                .ok_or_else(|| LobbyError::SessionNotFound(id.as_str().to_string()))?;
            if caller.status != ParticipantStatus::Waiting {
                return Ok(None);
            }
            caller.seeking = true;
        }

        while let Some(candidate_id) = self.waiting.pop_front() {
            if &candidate_id == id {
                continue;
            }
            let eligible = match self.participants.get(&candidate_id) {
                Some(candidate) => {
                    !candidate.is_inactive(now, self.inactivity_timeout)
                        && candidate.status == ParticipantStatus::Waiting
                        && candidate.seeking
                }
                None => false,
            };
            if !eligible {
                continue;
            }

            if let Some(candidate) = self.participants.get_mut(&candidate_id) {
                candidate.partner_id = Some(id.clone());
                candidate.status = ParticipantStatus::Chatting;
                candidate.seeking = false;
            }
            let snapshot = self.participants.get(&candidate_id).cloned();
            if let Some(caller) = self.participants.get_mut(id) {
                caller.partner_id = Some(candidate_id.clone());
                caller.status = ParticipantStatus::Chatting;
                caller.seeking = false;
            }
            return Ok(snapshot);
        }

        self.enqueue(id);
        Ok(None)
    }

    /// ペアリングを解消する
    ///
    /// 両者の `partner_id` をクリアして `Waiting` に戻し、元の相手の
    /// スナップショットを返す。未ペアなら `None`。どちらも再キューは
    /// しない（再探索するかは呼び出し側が決める）。
    pub fn dissolve_pairing(&mut self, id: &SessionId) -> Option<Participant> {
        let partner_id = self.participants.get(id)?.partner_id.clone()?;

        let snapshot = match self.participants.get_mut(&partner_id) {
            Some(partner) => {
                partner.partner_id = None;
                partner.status = ParticipantStatus::Waiting;
                Some(partner.clone())
            }
            None => None,
        };
        if let Some(participant) = self.participants.get_mut(id) {
            participant.partner_id = None;
            participant.status = ParticipantStatus::Waiting;
        }
        snapshot
    }

    /// 最終活動時刻を更新する（存在しない ID は no-op）
    pub fn touch(&mut self, id: &SessionId, now: Timestamp) {
        if let Some(participant) = self.participants.get_mut(id) {
            participant.touch(now);
        }
    }

    /// 無活動の参加者を一掃する
    ///
    /// 閾値を超えて無活動な参加者を全員取り除き、取り除いた順に
    /// `RemovedParticipant` を返す。1 人分の処理は他の参加者に影響しない。
    pub fn sweep(&mut self, now: Timestamp) -> Vec<RemovedParticipant> {
        let victims: Vec<SessionId> = self
            .participants
            .values()
            .filter(|p| p.is_inactive(now, self.inactivity_timeout))
            .map(|p| p.id.clone())
            .collect();

        let mut evicted = Vec::with_capacity(victims.len());
        for id in victims {
            if let Some(removed) = self.remove_participant(&id) {
                evicted.push(removed);
            }
        }
        evicted
    }

    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    pub fn waiting_count(&self) -> usize {
        self.waiting.len()
    }
}

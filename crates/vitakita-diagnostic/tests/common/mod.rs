#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use vitakita_core::models::diagnostic::{DiagnosticResult, UserDiagnosticState};
use vitakita_core::models::profile::{MergeOutcome, UserProfile};
use vitakita_diagnostic::{DiagnosticSession, SessionConfig};
use vitakita_instruments::{QuestionBank, get_bank};
use vitakita_storage::error::StorageError;
use vitakita_storage::port::{BoxFuture, ProfileStore};

/// How the fake store answers the next save.
#[derive(Debug, Clone, Copy)]
pub enum SaveBehavior {
    Fail,
    Hang,
}

/// In-memory profile store that counts calls and can be scripted to fail.
#[derive(Default)]
pub struct FakeStore {
    profiles: Mutex<HashMap<String, UserProfile>>,
    script: Mutex<VecDeque<SaveBehavior>>,
    fail_loads: Mutex<bool>,
    saves: AtomicUsize,
}

impl FakeStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_profile(profile: UserProfile) -> Arc<Self> {
        let store = Self::default();
        store
            .profiles
            .lock()
            .unwrap()
            .insert(profile.uid.clone(), profile);
        Arc::new(store)
    }

    pub fn push_save(&self, behavior: SaveBehavior) {
        self.script.lock().unwrap().push_back(behavior);
    }

    pub fn fail_loads(&self) {
        *self.fail_loads.lock().unwrap() = true;
    }

    pub fn save_attempts(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn profile(&self, user_id: &str) -> Option<UserProfile> {
        self.profiles.lock().unwrap().get(user_id).cloned()
    }
}

impl ProfileStore for FakeStore {
    fn load_profile<'a>(
        &'a self,
        user_id: &'a str,
    ) -> BoxFuture<'a, Result<UserProfile, StorageError>> {
        Box::pin(async move {
            if *self.fail_loads.lock().unwrap() {
                return Err(StorageError::GetObject("injected load failure".to_string()));
            }
            self.profile(user_id).ok_or_else(|| StorageError::NotFound {
                key: format!("users/{user_id}.json"),
            })
        })
    }

    fn save_diagnostic_result<'a>(
        &'a self,
        user_id: &'a str,
        result: &'a DiagnosticResult,
        state: &'a UserDiagnosticState,
    ) -> BoxFuture<'a, Result<MergeOutcome, StorageError>> {
        Box::pin(async move {
            self.saves.fetch_add(1, Ordering::SeqCst);
            let behavior = self.script.lock().unwrap().pop_front();
            match behavior {
                Some(SaveBehavior::Fail) => {
                    return Err(StorageError::PutObject("injected write failure".to_string()));
                }
                Some(SaveBehavior::Hang) => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                }
                None => {}
            }

            let now = jiff::Timestamp::now();
            let mut profiles = self.profiles.lock().unwrap();
            let profile = profiles
                .entry(user_id.to_string())
                .or_insert_with(|| UserProfile::new(user_id, now));
            Ok(profile.apply_result(result, state, now))
        })
    }
}

pub fn bank() -> Arc<dyn QuestionBank> {
    Arc::from(get_bank("wellbeing_screen").unwrap())
}

pub async fn open(store: &Arc<FakeStore>, user_id: &str) -> DiagnosticSession {
    let store: Arc<dyn ProfileStore> = store.clone();
    DiagnosticSession::open(store, bank(), user_id, SessionConfig::default())
        .await
        .unwrap()
}

/// q2 and q5 at "Nearly every day", the rest "Not at all": scores Anxiety.
pub fn answer_anxious(session: &mut DiagnosticSession) {
    for (question, option) in [("q1", "0"), ("q2", "3"), ("q3", "0"), ("q4", "0"), ("q5", "3")] {
        session.select_answer(question, option).unwrap();
    }
}

pub fn answer_all(session: &mut DiagnosticSession, option: &str) {
    let ids: Vec<String> = session.questions().iter().map(|q| q.id.clone()).collect();
    for id in ids {
        session.select_answer(&id, option).unwrap();
    }
}

//! Scripted platform and temp storage for service tests.

use crate::{errors::*, service::*, traits::XApi, types::*};
use async_trait::async_trait;
use narrative_accounts::SessionStoreService;
use narrative_storage::{RocksDbStorage, StoragePool};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

pub(crate) struct MockXApi {
    user_id: String,
    valid_codes: Mutex<HashSet<String>>,
    posts: Vec<Post>,
    fail_identity: bool,
    fail_posts: bool,
    calls: Mutex<Vec<String>>,
    last_verifier: Mutex<Option<String>>,
}

impl MockXApi {
    pub fn new(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            valid_codes: Mutex::new(HashSet::new()),
            posts: Vec::new(),
            fail_identity: false,
            fail_posts: false,
            calls: Mutex::new(Vec::new()),
            last_verifier: Mutex::new(None),
        }
    }

    /// Accept `code` exactly once
    pub fn with_code(self, code: &str) -> Self {
        self.valid_codes.lock().unwrap().insert(code.to_string());
        self
    }

    pub fn with_posts(mut self, count: usize) -> Self {
        self.posts = (0..count)
            .map(|i| Post {
                id: i.to_string(),
                text: format!("post {}", i),
            })
            .collect();
        self
    }

    pub fn failing_identity(mut self) -> Self {
        self.fail_identity = true;
        self
    }

    pub fn failing_posts(mut self) -> Self {
        self.fail_posts = true;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_verifier(&self) -> Option<String> {
        self.last_verifier.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

fn bearer(access_token: &str) -> TokenResponse {
    TokenResponse {
        access_token: access_token.to_string(),
        token_type: Some("bearer".to_string()),
        expires_in: Some(7200),
        scope: None,
    }
}

#[async_trait]
impl XApi for MockXApi {
    fn authorize_url(&self, state: &str, code_challenge: &str) -> Result<String> {
        Ok(format!(
            "https://x.test/authorize?state={}&code_challenge={}",
            state, code_challenge
        ))
    }

    async fn exchange_code(&self, code: &str, code_verifier: &str) -> Result<TokenResponse> {
        self.record(format!("exchange_code:{}", code));
        *self.last_verifier.lock().unwrap() = Some(code_verifier.to_string());

        if self.valid_codes.lock().unwrap().remove(code) {
            Ok(bearer(&format!("token-for-{}", code)))
        } else {
            Err(XError::UpstreamAuth("invalid_grant".to_string()))
        }
    }

    async fn app_token(&self) -> Result<TokenResponse> {
        self.record("app_token".to_string());
        Ok(bearer("app-token"))
    }

    async fn current_user(&self, access_token: &str) -> Result<XUser> {
        self.record(format!("current_user:{}", access_token));
        if self.fail_identity {
            return Err(XError::UpstreamAuth("User lookup failed".to_string()));
        }
        Ok(XUser {
            id: self.user_id.clone(),
            name: None,
            username: None,
        })
    }

    async fn user_posts(&self, access_token: &str, user_id: &str, count: u32) -> Result<Vec<Post>> {
        self.record(format!("user_posts:{}:{}:{}", access_token, user_id, count));
        if self.fail_posts {
            return Err(XError::UpstreamFetch("Post fetch failed with status 503".to_string()));
        }
        Ok(self.posts.iter().take(count as usize).cloned().collect())
    }
}

pub(crate) struct TestEnv {
    pub api: Arc<MockXApi>,
    pub sessions: Arc<SessionStoreService<RocksDbStorage>>,
    pub storage: Arc<RocksDbStorage>,
    pub pool: StoragePool<RocksDbStorage>,
    _temp_dir: TempDir,
}

impl TestEnv {
    pub fn new(api: MockXApi) -> Self {
        let (storage, temp_dir) = RocksDbStorage::open_temp().unwrap();
        let storage = Arc::new(storage);
        let pool = StoragePool::with_defaults(storage.clone());

        Self {
            api: Arc::new(api),
            sessions: Arc::new(SessionStoreService::new(pool.clone())),
            storage,
            pool,
            _temp_dir: temp_dir,
        }
    }

    pub fn auth_service(
        &self,
    ) -> AuthExchangeService<MockXApi, SessionStoreService<RocksDbStorage>, RocksDbStorage> {
        AuthExchangeService::new(self.api.clone(), self.sessions.clone(), self.pool.clone())
    }

    pub fn content_service(&self) -> ContentService<MockXApi, SessionStoreService<RocksDbStorage>> {
        ContentService::new(self.api.clone(), self.sessions.clone())
    }
}

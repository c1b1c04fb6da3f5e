use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use async_trait::async_trait;
use lib::{
    api::{
        proto::{self, group_attribute_blob::Content, ProstMessage},
        server::Host,
    },
    crypto::{testing::StubGroupCrypto, GroupMasterKey, ProfileKey},
    identifiers::{Aci, GroupIdentifier, Pni, Uuid},
    util::{
        base64,
        time::{ManualClock, RedemptionDay},
    },
};

use crate::{
    database::{Database, GroupStore},
    manager::{account::Account, config::GroupsConfig, GroupManager},
    net::{BasicAuth, GroupTransport, HttpResponse, TransportError},
};

/// 2024-03-10T00:00:00Z
pub const DAY_ZERO: u64 = 1_710_028_800;

/// Identifier of the group whose master key is the bytes `0..32`.
pub const TEAM_CHAT_ID: &str = "WkoDHzILf45xaye9GkRIC4BvpCFQAnvxwlcf2BaT0Fc=";

pub fn alice() -> Account {
    Account::new(
        Aci::from_uuid(Uuid::from_u128(0xa1)),
        Pni::from_uuid(Uuid::from_u128(0xa2)),
        1,
        "alice-password".to_owned(),
    )
}

pub fn bob_id() -> Uuid {
    Uuid::from_u128(0xb0)
}

pub fn team_chat_master_key() -> GroupMasterKey {
    GroupMasterKey::from_bytes(std::array::from_fn(|i| i as u8))
}

pub fn team_chat(revision: u32) -> proto::Group {
    let member = |user_id: Uuid, key_byte: u8, role: i32| proto::Member {
        user_id: StubGroupCrypto::encrypt_user_id(user_id),
        role,
        profile_key: StubGroupCrypto::encrypt_profile_key(
            user_id,
            &ProfileKey::from_bytes([key_byte; 32]),
        ),
        presentation: Vec::new(),
        joined_at_revision: 0,
    };

    proto::Group {
        title: StubGroupCrypto::encrypt_blob(Content::Title("Team Chat".to_owned())),
        avatar: "groups/team-chat-avatar".to_owned(),
        revision,
        members: vec![
            member(alice().aci.as_uuid(), 0xaa, 2),
            member(bob_id(), 0xbb, 1),
        ],
        ..Default::default()
    }
}

#[derive(Debug)]
struct MockState {
    group: Vec<u8>,
    group_status: u16,
    credential_status: u16,
    credential_body: Option<Vec<u8>>,
    avatar: Vec<u8>,
    delay: Duration,
    pni_override: Option<Pni>,
    echoed_aci: Option<Aci>,
    omit_first_day: bool,
    last_credential_path: Option<String>,
    last_group_auth: Option<BasicAuth>,
    last_avatar_request: Option<(String, BasicAuth)>,
}

/// An in-memory group server. Issues stub credentials for whatever window is
/// asked for and serves one encrypted group.
#[derive(Debug)]
pub struct MockTransport {
    pub credential_requests: AtomicUsize,
    pub group_requests: AtomicUsize,
    pub avatar_requests: AtomicUsize,
    state: Mutex<MockState>,
}

impl MockTransport {
    pub fn new(account: &Account) -> Self {
        Self {
            credential_requests: AtomicUsize::new(0),
            group_requests: AtomicUsize::new(0),
            avatar_requests: AtomicUsize::new(0),
            state: Mutex::new(MockState {
                group: team_chat(5).encode_to_vec(),
                group_status: 200,
                credential_status: 200,
                credential_body: None,
                avatar: StubGroupCrypto::encrypt_blob(Content::Avatar(b"avatar png".to_vec())),
                delay: Duration::ZERO,
                pni_override: None,
                echoed_aci: Some(account.aci),
                omit_first_day: false,
                last_credential_path: None,
                last_group_auth: None,
                last_avatar_request: None,
            }),
        }
    }

    fn state(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().expect("mock state lock")
    }

    pub fn credential_requests(&self) -> usize {
        self.credential_requests.load(Ordering::SeqCst)
    }

    pub fn group_requests(&self) -> usize {
        self.group_requests.load(Ordering::SeqCst)
    }

    pub fn avatar_requests(&self) -> usize {
        self.avatar_requests.load(Ordering::SeqCst)
    }

    pub fn set_group(&self, group: &proto::Group) {
        self.state().group = group.encode_to_vec();
    }

    pub fn set_group_bytes(&self, bytes: Vec<u8>) {
        self.state().group = bytes;
    }

    pub fn set_group_status(&self, status: u16) {
        self.state().group_status = status;
    }

    pub fn set_credential_status(&self, status: u16) {
        self.state().credential_status = status;
    }

    pub fn set_credential_body(&self, body: Option<Vec<u8>>) {
        self.state().credential_body = body;
    }

    pub fn set_delay(&self, delay: Duration) {
        self.state().delay = delay;
    }

    pub fn set_pni_override(&self, pni: Option<Pni>) {
        self.state().pni_override = pni;
    }

    pub fn set_echoed_aci(&self, aci: Option<Aci>) {
        self.state().echoed_aci = aci;
    }

    pub fn omit_first_day(&self, omit: bool) {
        self.state().omit_first_day = omit;
    }

    pub fn last_credential_path(&self) -> Option<String> {
        self.state().last_credential_path.clone()
    }

    pub fn last_group_auth(&self) -> Option<BasicAuth> {
        self.state().last_group_auth.clone()
    }

    pub fn last_avatar_request(&self) -> Option<(String, BasicAuth)> {
        self.state().last_avatar_request.clone()
    }

    fn credentials_body(&self, path: &str) -> Vec<u8> {
        let url = url::Url::parse(&format!("https://chat.invalid{path}")).expect("valid path");
        let query = |name: &str| -> u64 {
            url.query_pairs()
                .find(|(key, _)| key == name)
                .and_then(|(_, value)| value.parse().ok())
                .expect("query parameter present")
        };
        let start = query("redemptionStartSeconds");
        let end = query("redemptionEndSeconds");

        let state = self.state();
        let first = if state.omit_first_day {
            start + 86_400
        } else {
            start
        };
        let credentials: Vec<_> = (first..end)
            .step_by(86_400)
            .map(|redemption_time| {
                serde_json::json!({
                    "credential": base64::encode(StubGroupCrypto::credential_response(redemption_time)),
                    "redemptionTime": redemption_time,
                })
            })
            .collect();

        let pni = state.pni_override.unwrap_or_else(|| alice().pni);
        let mut body = serde_json::json!({ "credentials": credentials, "pni": pni });
        if let Some(aci) = state.echoed_aci {
            body["aci"] = serde_json::json!(aci);
        }

        body.to_string().into_bytes()
    }

    async fn delay(&self) {
        let delay = self.state().delay;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl GroupTransport for MockTransport {
    async fn request_authenticated(&self, path: &str) -> Result<HttpResponse, TransportError> {
        self.credential_requests.fetch_add(1, Ordering::SeqCst);
        self.delay().await;

        let (status, body) = {
            let mut state = self.state();
            state.last_credential_path = Some(path.to_owned());
            (state.credential_status, state.credential_body.clone())
        };
        let body = body.unwrap_or_else(|| self.credentials_body(path));

        Ok(HttpResponse { status, body })
    }

    async fn request_http(
        &self,
        host: Host,
        path: &str,
        auth: &BasicAuth,
    ) -> Result<HttpResponse, TransportError> {
        match host {
            Host::Storage => {
                self.group_requests.fetch_add(1, Ordering::SeqCst);
                self.delay().await;

                let mut state = self.state();
                state.last_group_auth = Some(auth.clone());

                Ok(HttpResponse {
                    status: state.group_status,
                    body: state.group.clone(),
                })
            }
            Host::Cdn => {
                self.avatar_requests.fetch_add(1, Ordering::SeqCst);

                let mut state = self.state();
                state.last_avatar_request = Some((path.to_owned(), auth.clone()));

                Ok(HttpResponse {
                    status: 200,
                    body: state.avatar.clone(),
                })
            }
            Host::Chat => Err(TransportError::CouldNotConnect(
                "plain requests to the chat host are not mocked".to_owned(),
            )),
        }
    }
}

pub struct TestSession {
    pub manager: GroupManager,
    pub transport: Arc<MockTransport>,
    pub clock: Arc<ManualClock>,
    pub database: Arc<Database>,
    pub group_id: GroupIdentifier,
}

/// A session for Alice at 09:00 on [`DAY_ZERO`], with the Team Chat master
/// key already stored.
pub async fn test_session() -> TestSession {
    let account = alice();
    let transport = Arc::new(MockTransport::new(&account));
    let clock = Arc::new(ManualClock::at_day(
        RedemptionDay::from_epoch_seconds(DAY_ZERO),
        Duration::from_secs(9 * 3600),
    ));
    let database = Arc::new(Database::in_memory().expect("in-memory database opens"));

    let manager = GroupManager::new(
        Arc::new(account),
        GroupsConfig::default(),
        Arc::new(StubGroupCrypto),
        transport.clone(),
        database.clone(),
        database.clone(),
    )
    .with_clock(clock.clone());

    let group_id = manager
        .store_master_key(&team_chat_master_key().serialize())
        .await
        .expect("master key is stored");
    assert_eq!(
        database
            .master_key_for_group(&group_id)
            .await
            .expect("lookup works"),
        Some(team_chat_master_key().serialize())
    );

    TestSession {
        manager,
        transport,
        clock,
        database,
        group_id,
    }
}

//! Test fixtures: the recording chat port and the full-stack harness

use std::collections::HashSet;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tempfile::TempDir;

use auction_common::{
    AppConfig, AppSettings, BotConfig, CleanupConfig, Environment, ServerConfig, StorageConfig,
};
use auction_core::entities::Submission;
use auction_core::value_objects::{Category, ChatId, MessageRef, UserId};
use auction_core::workflow::DraftEvent;
use auction_gateway::Dispatcher;
use auction_service::services::{
    BiddingService, LeaderboardService, ModerationService, ProfileService, ServiceContext,
    SubmissionService, SubmissionStep, VerificationService,
};
use auction_service::{ChatError, ChatPort, Keyboard};

/// The public channel used by every test
pub const CHANNEL: ChatId = ChatId::new(-100_500);

/// The audit channel used by every test
pub const AUDIT: ChatId = ChatId::new(-100_600);

/// One recorded outbound message
#[derive(Debug, Clone)]
pub struct SentMessage {
    pub message: MessageRef,
    pub text: String,
    pub photo: Option<String>,
    pub keyboard: Option<Keyboard>,
}

/// One recorded edit
#[derive(Debug, Clone)]
pub struct EditedMessage {
    pub message: MessageRef,
    pub text: String,
    pub keyboard: Option<Keyboard>,
}

/// A chat port that records everything and can simulate blocked recipients
#[derive(Debug, Default)]
pub struct RecordingChatPort {
    next_id: AtomicI64,
    sent: Mutex<Vec<SentMessage>>,
    edits: Mutex<Vec<EditedMessage>>,
    blocked: Mutex<HashSet<ChatId>>,
}

impl RecordingChatPort {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make deliveries to this chat fail from now on
    pub fn block(&self, chat: ChatId) {
        self.blocked.lock().insert(chat);
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().clone()
    }

    pub fn edits(&self) -> Vec<EditedMessage> {
        self.edits.lock().clone()
    }

    /// Message texts delivered to one chat, in order
    pub fn texts_to(&self, chat: ChatId) -> Vec<String> {
        self.sent
            .lock()
            .iter()
            .filter(|m| m.message.chat_id == chat)
            .map(|m| m.text.clone())
            .collect()
    }

    /// The most recent message delivered to one chat
    pub fn last_to(&self, chat: ChatId) -> Option<SentMessage> {
        self.sent
            .lock()
            .iter()
            .rev()
            .find(|m| m.message.chat_id == chat)
            .cloned()
    }

    /// Edits applied to one delivered message, in order
    pub fn edits_of(&self, message: MessageRef) -> Vec<EditedMessage> {
        self.edits
            .lock()
            .iter()
            .filter(|e| e.message == message)
            .cloned()
            .collect()
    }

    fn record(
        &self,
        chat: ChatId,
        text: &str,
        photo: Option<&str>,
        keyboard: Option<&Keyboard>,
    ) -> Result<MessageRef, ChatError> {
        if self.blocked.lock().contains(&chat) {
            return Err(ChatError::Blocked(chat));
        }
        let message = MessageRef::new(chat, self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        self.sent.lock().push(SentMessage {
            message,
            text: text.to_string(),
            photo: photo.map(str::to_string),
            keyboard: keyboard.cloned(),
        });
        Ok(message)
    }
}

#[async_trait]
impl ChatPort for RecordingChatPort {
    async fn send_message(
        &self,
        chat: ChatId,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<MessageRef, ChatError> {
        self.record(chat, text, None, keyboard)
    }

    async fn send_photo(
        &self,
        chat: ChatId,
        photo: &str,
        caption: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<MessageRef, ChatError> {
        self.record(chat, caption, Some(photo), keyboard)
    }

    async fn edit_message(
        &self,
        message: MessageRef,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), ChatError> {
        if self.blocked.lock().contains(&message.chat_id) {
            return Err(ChatError::Blocked(message.chat_id));
        }
        self.edits.lock().push(EditedMessage {
            message,
            text: text.to_string(),
            keyboard: keyboard.cloned(),
        });
        Ok(())
    }
}

/// Build a complete test configuration over a temp directory
pub fn test_config(tmp: &TempDir, admins: &[i64]) -> AppConfig {
    AppConfig {
        app: AppSettings {
            name: "auction-bot-test".to_string(),
            env: Environment::Development,
        },
        bot: BotConfig {
            token: "test-token".to_string(),
            username: "pokeauctionbot".to_string(),
            auction_channel: CHANNEL,
            audit_channel: Some(AUDIT),
            bootstrap_admins: admins.iter().copied().map(UserId::new).collect(),
        },
        health: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        storage: StorageConfig {
            data_dir: tmp.path().join("data"),
            max_connections: 5,
            lock_path: tmp.path().join("test.lock"),
        },
        cleanup: CleanupConfig {
            interval_secs: 3600,
            rejection_ttl_secs: 3600,
        },
    }
}

/// The whole marketplace on temporary storage with a recording chat port
pub struct TestHarness {
    pub ctx: Arc<ServiceContext>,
    pub chat: Arc<RecordingChatPort>,
    pub bidding: BiddingService,
    pub submissions: SubmissionService,
    pub moderation: ModerationService,
    pub verification: VerificationService,
    pub profiles: ProfileService,
    pub leaderboard: LeaderboardService,
    pub dispatcher: Dispatcher,
    _tmp: TempDir,
}

impl TestHarness {
    /// Stand up the full stack with the given bootstrap admins
    pub async fn new(admins: &[i64]) -> Self {
        let tmp = tempfile::tempdir().expect("tempdir");
        let config = test_config(&tmp, admins);
        let chat = Arc::new(RecordingChatPort::new());

        let ctx = auction_api::create_service_context(&config, chat.clone())
            .await
            .expect("service context");
        let moderation = auction_api::create_moderation(&config, ctx.clone());
        let dispatcher = Dispatcher::new(ctx.clone(), moderation.clone());

        Self {
            bidding: BiddingService::new(ctx.clone()),
            submissions: SubmissionService::new(ctx.clone()),
            verification: VerificationService::new(ctx.clone()),
            profiles: ProfileService::new(ctx.clone()),
            leaderboard: LeaderboardService::new(ctx.clone()),
            moderation,
            dispatcher,
            chat,
            ctx,
            _tmp: tmp,
        }
    }

    /// Put a user straight on the verified roster
    pub async fn verify(&self, user: i64) {
        use auction_core::entities::VerifiedUser;
        self.ctx
            .verified_repo()
            .insert(&VerifiedUser::new(UserId::new(user), UserId::new(1)))
            .await
            .expect("verify user");
    }

    /// Walk a Pokémon listing through the whole form and confirm it
    pub async fn submit_pokemon(&self, user: i64, name: &str, price: &str) -> Submission {
        let user = UserId::new(user);
        self.submissions.start(user).await.expect("start draft");

        let steps = [
            DraftEvent::CategoryChosen(Category::Pokemon),
            DraftEvent::Text(name.to_string()),
            DraftEvent::Text("Jolly".to_string()),
            DraftEvent::Text("6IV".to_string()),
            DraftEvent::Text("Dragon Claw, Dig".to_string()),
            DraftEvent::Text("no".to_string()),
            DraftEvent::SkipPhoto,
            DraftEvent::Text(price.to_string()),
        ];
        for event in steps {
            self.submissions.advance(user, event).await.expect("step");
        }

        match self
            .submissions
            .advance(user, DraftEvent::Confirm)
            .await
            .expect("confirm")
        {
            SubmissionStep::Submitted(submission) => submission,
            SubmissionStep::Prompt(prompt) => panic!("expected submission, got {prompt:?}"),
        }
    }

    /// Submit and approve a listing, returning the live auction id
    pub async fn live_auction(&self, seller: i64, admin: i64, price: &str) -> i64 {
        let submission = self.submit_pokemon(seller, "Gible", price).await;
        let auction = self
            .moderation
            .approve(UserId::new(admin), submission.id)
            .await
            .expect("approve");
        auction.id
    }
}

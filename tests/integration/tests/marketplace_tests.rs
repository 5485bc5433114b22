//! End-to-end marketplace flows over temporary SQLite stores
//!
//! Run with: cargo test -p integration-tests --test marketplace_tests

use auction_core::entities::{ReviewKind, SubmissionStatus};
use auction_core::value_objects::{Category, ChatId, UserId};
use auction_core::workflow::DraftEvent;
use auction_core::DomainError;
use auction_gateway::Update;
use auction_service::services::{ServiceError, SubmissionStep};
use integration_tests::{TestHarness, AUDIT, CHANNEL};

const ADMIN: i64 = 1;
const SECOND_ADMIN: i64 = 2;
const SELLER: i64 = 10;
const BIDDER: i64 = 20;
const RIVAL: i64 = 30;

fn user(id: i64) -> UserId {
    UserId::new(id)
}

fn chat(id: i64) -> ChatId {
    ChatId::new(id)
}

// ============================================================================
// Submission and approval
// ============================================================================

#[tokio::test]
async fn test_submission_fans_out_to_admins() {
    let h = TestHarness::new(&[ADMIN, SECOND_ADMIN]).await;
    h.verify(SELLER).await;

    let submission = h.submit_pokemon(SELLER, "Gible", "18k").await;

    for admin in [ADMIN, SECOND_ADMIN] {
        let card = h.chat.last_to(chat(admin)).expect("admin got review card");
        assert!(card.text.contains(&format!("Submission #{}", submission.id)));
        assert!(card.text.contains("Gible"));
        let keyboard = card.keyboard.expect("review card has buttons");
        assert_eq!(keyboard.rows[0][0].action, format!("approve:{}", submission.id));
        assert_eq!(keyboard.rows[0][1].action, format!("reject:{}", submission.id));
    }

    let pending = h.moderation.pending(user(ADMIN)).await.unwrap();
    assert_eq!(pending.len(), 1);
}

#[tokio::test]
async fn test_review_card_carries_listing_photo() {
    let h = TestHarness::new(&[ADMIN]).await;
    h.verify(SELLER).await;
    let seller = user(SELLER);

    h.submissions.start(seller).await.unwrap();
    let steps = [
        DraftEvent::CategoryChosen(Category::Pokemon),
        DraftEvent::Text("Gible".to_string()),
        DraftEvent::Text("Jolly".to_string()),
        DraftEvent::Text("6IV".to_string()),
        DraftEvent::Text("Dragon Claw, Dig".to_string()),
        DraftEvent::Text("no".to_string()),
        DraftEvent::Photo("file-abc".to_string()),
        DraftEvent::Text("15k".to_string()),
    ];
    for event in steps {
        h.submissions.advance(seller, event).await.unwrap();
    }
    let submission = match h.submissions.advance(seller, DraftEvent::Confirm).await.unwrap() {
        SubmissionStep::Submitted(submission) => submission,
        SubmissionStep::Prompt(prompt) => panic!("expected submission, got {prompt:?}"),
    };

    // Admins review the actual photo, not just its description.
    let card = h.chat.last_to(chat(ADMIN)).expect("admin got review card");
    assert_eq!(card.photo.as_deref(), Some("file-abc"));

    h.moderation.approve(user(ADMIN), submission.id).await.unwrap();
    let channel_card = h.chat.last_to(CHANNEL).expect("channel card posted");
    assert_eq!(channel_card.photo.as_deref(), Some("file-abc"));
}

#[tokio::test]
async fn test_approval_posts_channel_card_and_settles_reviews() {
    let h = TestHarness::new(&[ADMIN, SECOND_ADMIN]).await;
    h.verify(SELLER).await;

    let submission = h.submit_pokemon(SELLER, "Gible", "18k").await;
    let admin_card = h.chat.last_to(chat(SECOND_ADMIN)).unwrap();

    let auction = h.moderation.approve(user(ADMIN), submission.id).await.unwrap();

    // The channel card carries the deep-link bid button.
    let channel_card = h.chat.last_to(CHANNEL).expect("channel card posted");
    assert!(channel_card.text.contains("Gible"));
    assert!(channel_card.text.contains("Next bid: 18K or more"));
    let keyboard = channel_card.keyboard.expect("bid button");
    assert_eq!(
        keyboard.rows[0][0].action,
        format!("https://t.me/pokeauctionbot?start=bid_{}", auction.id)
    );

    // The seller heard about it and every admin copy was rewritten.
    let seller_texts = h.chat.texts_to(chat(SELLER));
    assert!(seller_texts.iter().any(|t| t.contains("approved")));
    let edits = h.chat.edits_of(admin_card.message);
    assert!(edits.last().unwrap().text.contains("Approved"));

    assert!(h.moderation.pending(user(ADMIN)).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_second_verdict_loses_the_race() {
    let h = TestHarness::new(&[ADMIN, SECOND_ADMIN]).await;
    h.verify(SELLER).await;

    let submission = h.submit_pokemon(SELLER, "Gible", "20k").await;
    h.moderation.approve(user(ADMIN), submission.id).await.unwrap();

    let err = h
        .moderation
        .approve(user(SECOND_ADMIN), submission.id)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::SubmissionNotPending(_))
    ));
}

#[tokio::test]
async fn test_fan_out_survives_blocked_admin() {
    let h = TestHarness::new(&[ADMIN, SECOND_ADMIN]).await;
    h.verify(SELLER).await;
    h.chat.block(chat(SECOND_ADMIN));

    let submission = h.submit_pokemon(SELLER, "Gible", "18k").await;

    assert!(h.chat.last_to(chat(ADMIN)).is_some());
    assert!(h.chat.last_to(chat(SECOND_ADMIN)).is_none());

    // Only the delivered copy is on record for later settlement.
    let copies = h
        .ctx
        .admin_message_repo()
        .list_for(ReviewKind::Submission, submission.id)
        .await
        .unwrap();
    assert_eq!(copies.len(), 1);
    assert_eq!(copies[0].admin_chat, chat(ADMIN));
}

#[tokio::test]
async fn test_disabled_category_rejects_drafts() {
    let h = TestHarness::new(&[ADMIN]).await;
    h.verify(SELLER).await;

    let enabled = h
        .moderation
        .toggle_category(user(ADMIN), Category::TechnicalMachine)
        .await
        .unwrap();
    assert!(!enabled);

    h.submissions.start(user(SELLER)).await.unwrap();
    let err = h
        .submissions
        .advance(
            user(SELLER),
            DraftEvent::CategoryChosen(Category::TechnicalMachine),
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::CategoryDisabled(_))
    ));
}

// ============================================================================
// Rejection reason flow
// ============================================================================

#[tokio::test]
async fn test_rejection_reason_flow() {
    let h = TestHarness::new(&[ADMIN]).await;
    h.verify(SELLER).await;

    let submission = h.submit_pokemon(SELLER, "Magikarp", "5k").await;
    let card = h.chat.last_to(chat(ADMIN)).unwrap();

    // Admin taps Reject on their copy of the review card.
    h.dispatcher
        .handle(Update::Callback {
            from: user(ADMIN),
            message: card.message,
            data: format!("reject:{}", submission.id),
        })
        .await;
    let prompts = h.chat.texts_to(chat(ADMIN));
    assert!(prompts.last().unwrap().contains("rejection reason"));

    // Their next free text becomes the reason.
    h.dispatcher
        .handle(Update::Text {
            from: user(ADMIN),
            chat: chat(ADMIN),
            text: "Photo is too blurry".to_string(),
        })
        .await;

    let stored = h
        .ctx
        .submission_repo()
        .find_by_id(submission.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, SubmissionStatus::Rejected);

    let seller_texts = h.chat.texts_to(chat(SELLER));
    assert!(seller_texts
        .iter()
        .any(|t| t.contains("rejected") && t.contains("Photo is too blurry")));
    let edits = h.chat.edits_of(card.message);
    assert!(edits.last().unwrap().text.contains("Rejected"));
}

#[tokio::test]
async fn test_reject_command_without_button() {
    let h = TestHarness::new(&[ADMIN]).await;
    h.verify(SELLER).await;

    let submission = h.submit_pokemon(SELLER, "Magikarp", "5k").await;
    let card = h.chat.last_to(chat(ADMIN)).unwrap();

    // Typing /reject works the same as tapping the button.
    h.dispatcher
        .handle(Update::Command {
            from: user(ADMIN),
            chat: chat(ADMIN),
            name: "reject".to_string(),
            args: submission.id.to_string(),
        })
        .await;
    let prompts = h.chat.texts_to(chat(ADMIN));
    assert!(prompts.last().unwrap().contains("rejection reason"));

    h.dispatcher
        .handle(Update::Text {
            from: user(ADMIN),
            chat: chat(ADMIN),
            text: "Wrong category".to_string(),
        })
        .await;

    let stored = h
        .ctx
        .submission_repo()
        .find_by_id(submission.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, SubmissionStatus::Rejected);
    let edits = h.chat.edits_of(card.message);
    assert!(edits.last().unwrap().text.contains("Wrong category"));
}

#[tokio::test]
async fn test_admin_text_without_session_falls_through() {
    let h = TestHarness::new(&[ADMIN]).await;
    h.verify(ADMIN).await;

    // The admin has their own draft open; free text must advance it, not
    // vanish into a rejection session.
    h.submissions.start(user(ADMIN)).await.unwrap();
    h.dispatcher
        .handle(Update::Text {
            from: user(ADMIN),
            chat: chat(ADMIN),
            text: "Pokemon".to_string(),
        })
        .await;

    let draft = h.submissions.current(user(ADMIN)).await.unwrap().unwrap();
    assert_eq!(draft.fields.category, Some(Category::Pokemon));
}

// ============================================================================
// Bidding
// ============================================================================

#[tokio::test]
async fn test_bid_ladder_and_outbid_notification() {
    let h = TestHarness::new(&[ADMIN]).await;
    for u in [SELLER, BIDDER, RIVAL] {
        h.verify(u).await;
    }
    let auction_id = h.live_auction(SELLER, ADMIN, "18k").await;

    h.bidding
        .place_bid(auction_id, user(BIDDER), "18k")
        .await
        .unwrap();

    // 18,500 is above the current bid but below the 1K rung.
    let err = h
        .bidding
        .place_bid(auction_id, user(RIVAL), "18500")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::BidTooLow { minimum: 19_000 })
    ));

    let outcome = h
        .bidding
        .place_bid(auction_id, user(RIVAL), "19k")
        .await
        .unwrap();
    assert_eq!(outcome.outbid, Some(user(BIDDER)));

    let bidder_texts = h.chat.texts_to(chat(BIDDER));
    assert!(bidder_texts.iter().any(|t| t.contains("outbid")));

    // The channel card now shows the new minimum.
    let channel_card = h.chat.last_to(CHANNEL).unwrap();
    let edits = h.chat.edits_of(channel_card.message);
    assert!(edits.last().unwrap().text.contains("Next bid: 20K or more"));
}

#[tokio::test]
async fn test_bid_guards() {
    let h = TestHarness::new(&[ADMIN]).await;
    h.verify(SELLER).await;
    let auction_id = h.live_auction(SELLER, ADMIN, "10k").await;

    // Unverified bidder.
    let err = h
        .bidding
        .place_bid(auction_id, user(BIDDER), "10k")
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Domain(DomainError::NotVerified)));

    // Banned bidder, even when verified.
    h.verify(BIDDER).await;
    h.moderation.ban(user(ADMIN), user(RIVAL)).await.unwrap();
    h.verify(RIVAL).await;
    let err = h
        .bidding
        .place_bid(auction_id, user(RIVAL), "10k")
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Domain(DomainError::UserBanned)));

    // Bidding globally paused.
    h.bidding.set_bidding_open(user(ADMIN), false).await.unwrap();
    let err = h
        .bidding
        .place_bid(auction_id, user(BIDDER), "10k")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::BiddingClosed)
    ));

    h.bidding.set_bidding_open(user(ADMIN), true).await.unwrap();
    h.bidding
        .place_bid(auction_id, user(BIDDER), "10k")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_admin_bids_without_verification() {
    let h = TestHarness::new(&[ADMIN]).await;
    h.verify(SELLER).await;
    let auction_id = h.live_auction(SELLER, ADMIN, "10k").await;

    // The admin never went through verification but may still bid.
    let outcome = h
        .bidding
        .place_bid(auction_id, user(ADMIN), "10k")
        .await
        .unwrap();
    assert_eq!(outcome.auction.current_bidder, Some(user(ADMIN)));

    let audit_texts = h.chat.texts_to(AUDIT);
    assert!(audit_texts
        .iter()
        .any(|t| t.contains(&format!("User {ADMIN} bid 10K"))));

    // The channel card reflects the bid even with no roster row to bump.
    let card = h.chat.last_to(CHANNEL).expect("channel card");
    let edits = h.chat.edits_of(card.message);
    assert!(edits.last().unwrap().text.contains("Current bid: 10K"));

    // Settling the auction on an off-roster winner works the same way.
    let auction = h.bidding.close_auction(user(ADMIN), auction_id).await.unwrap();
    assert_eq!(auction.current_bidder, Some(user(ADMIN)));
    let top = h.leaderboard.top(None).await.unwrap();
    assert_eq!(top[0].user, user(ADMIN));
}

#[tokio::test]
async fn test_retraction_restores_previous_leader() {
    let h = TestHarness::new(&[ADMIN]).await;
    for u in [SELLER, BIDDER, RIVAL] {
        h.verify(u).await;
    }
    let auction_id = h.live_auction(SELLER, ADMIN, "18k").await;

    h.bidding
        .place_bid(auction_id, user(BIDDER), "18k")
        .await
        .unwrap();
    h.bidding
        .place_bid(auction_id, user(RIVAL), "19k")
        .await
        .unwrap();

    let outcome = h
        .bidding
        .retract_last_bid(user(ADMIN), auction_id)
        .await
        .unwrap();
    assert_eq!(outcome.removed.bidder, user(RIVAL));
    assert_eq!(outcome.restored.as_ref().unwrap().bidder, user(BIDDER));
    assert_eq!(outcome.auction.current_bid, Some(18_000));

    let rival_texts = h.chat.texts_to(chat(RIVAL));
    assert!(rival_texts.iter().any(|t| t.contains("retracted")));
    let bidder_texts = h.chat.texts_to(chat(BIDDER));
    assert!(bidder_texts.iter().any(|t| t.contains("back in the lead")));

    // The struck bid stays visible in /bids, marked as retracted.
    h.dispatcher
        .handle(Update::Command {
            from: user(ADMIN),
            chat: chat(ADMIN),
            name: "bids".to_string(),
            args: auction_id.to_string(),
        })
        .await;
    let history = h.chat.last_to(chat(ADMIN)).unwrap();
    assert!(history.text.contains(&format!("19K by user {RIVAL} (retracted)")));
    assert!(history.text.contains(&format!("18K by user {BIDDER}")));
}

#[tokio::test]
async fn test_close_settles_winner_and_leaderboard() {
    let h = TestHarness::new(&[ADMIN]).await;
    for u in [SELLER, BIDDER, RIVAL] {
        h.verify(u).await;
    }
    let auction_id = h.live_auction(SELLER, ADMIN, "18k").await;
    h.bidding
        .place_bid(auction_id, user(BIDDER), "18k")
        .await
        .unwrap();
    h.bidding
        .place_bid(auction_id, user(RIVAL), "19k")
        .await
        .unwrap();

    let auction = h
        .bidding
        .close_auction(user(ADMIN), auction_id)
        .await
        .unwrap();
    assert_eq!(auction.current_bidder, Some(user(RIVAL)));

    let winner_texts = h.chat.texts_to(chat(RIVAL));
    assert!(winner_texts.iter().any(|t| t.contains("You won")));

    let top = h.leaderboard.top(None).await.unwrap();
    assert_eq!(top[0].user, user(RIVAL));
    assert_eq!(top[0].wins, 1);
    assert_eq!(top[0].total_spent, 19_000);

    // No further bids once closed.
    let err = h
        .bidding
        .place_bid(auction_id, user(BIDDER), "25k")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::AuctionNotActive(_))
    ));
}

// ============================================================================
// Verification
// ============================================================================

#[tokio::test]
async fn test_verification_flow() {
    let h = TestHarness::new(&[ADMIN, SECOND_ADMIN]).await;

    h.verification.request(user(BIDDER)).await.unwrap();
    let card = h.chat.last_to(chat(ADMIN)).expect("request card");
    assert!(card.text.contains(&BIDDER.to_string()));

    h.verification
        .approve(user(ADMIN), user(BIDDER))
        .await
        .unwrap();
    assert!(h
        .ctx
        .verified_repo()
        .is_verified(user(BIDDER))
        .await
        .unwrap());

    // Both admin copies were settled.
    let edits = h.chat.edits_of(card.message);
    assert!(edits.last().unwrap().text.contains("Verified"));

    // A second request is refused.
    let err = h.verification.request(user(BIDDER)).await.unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::AlreadyVerified)
    ));
}

#[tokio::test]
async fn test_declined_user_stays_out() {
    let h = TestHarness::new(&[ADMIN]).await;

    h.verification.request(user(BIDDER)).await.unwrap();
    h.verification
        .decline(user(ADMIN), user(BIDDER))
        .await
        .unwrap();

    assert!(!h
        .ctx
        .verified_repo()
        .is_verified(user(BIDDER))
        .await
        .unwrap());
    let texts = h.chat.texts_to(chat(BIDDER));
    assert!(texts.iter().any(|t| t.contains("declined")));
}

// ============================================================================
// Dispatcher surface
// ============================================================================

#[tokio::test]
async fn test_admin_commands_require_rights() {
    let h = TestHarness::new(&[ADMIN]).await;
    h.verify(SELLER).await;
    let auction_id = h.live_auction(SELLER, ADMIN, "10k").await;

    h.dispatcher
        .handle(Update::Command {
            from: user(BIDDER),
            chat: chat(BIDDER),
            name: "close".to_string(),
            args: auction_id.to_string(),
        })
        .await;

    let texts = h.chat.texts_to(chat(BIDDER));
    assert!(texts.last().unwrap().contains("Admin privileges required"));
    // The auction is untouched.
    let auction = h.bidding.auction(auction_id).await.unwrap();
    assert!(auction.is_active());
}

#[tokio::test]
async fn test_deep_link_start_shows_auction() {
    let h = TestHarness::new(&[ADMIN]).await;
    h.verify(SELLER).await;
    let auction_id = h.live_auction(SELLER, ADMIN, "18k").await;

    h.dispatcher
        .handle(Update::Command {
            from: user(BIDDER),
            chat: chat(BIDDER),
            name: "start".to_string(),
            args: format!("bid_{auction_id}"),
        })
        .await;

    let reply = h.chat.texts_to(chat(BIDDER)).pop().unwrap();
    assert!(reply.contains("Gible"));
    assert!(reply.contains(&format!("/bid {auction_id}")));
}

#[tokio::test]
async fn test_draft_via_dispatcher_text_routing() {
    let h = TestHarness::new(&[ADMIN]).await;
    h.verify(SELLER).await;

    h.dispatcher
        .handle(Update::Command {
            from: user(SELLER),
            chat: chat(SELLER),
            name: "sell".to_string(),
            args: String::new(),
        })
        .await;

    for text in ["Pokemon", "Gible", "Jolly", "6IV", "Tackle", "no", "skip", "15k", "confirm"] {
        h.dispatcher
            .handle(Update::Text {
                from: user(SELLER),
                chat: chat(SELLER),
                text: text.to_string(),
            })
            .await;
    }

    let reply = h.chat.texts_to(chat(SELLER)).pop().unwrap();
    assert!(reply.contains("sent to the admins"));
    assert!(h.submissions.current(user(SELLER)).await.unwrap().is_none());
    assert_eq!(h.moderation.pending(user(ADMIN)).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_profile_counters_track_verdicts() {
    let h = TestHarness::new(&[ADMIN]).await;
    h.verify(SELLER).await;

    let submission = h.submit_pokemon(SELLER, "Gible", "10k").await;
    let view = h.profiles.view(user(SELLER)).await.unwrap();
    assert_eq!(view.profile.submitted, 1);
    assert_eq!(view.profile.pending, 1);

    h.moderation.approve(user(ADMIN), submission.id).await.unwrap();
    let view = h.profiles.view(user(SELLER)).await.unwrap();
    assert_eq!(view.profile.approved, 1);
    assert_eq!(view.profile.pending, 0);
    assert!(view.is_verified());
}

//! Message rendering
//!
//! Builds the text bodies and keyboards for auction cards, review cards, and
//! the leaderboard. Kept in one place so the channel card and the admin
//! copies always agree on wording.

use auction_core::entities::{Auction, AuctionStatus, LeaderboardEntry, Submission};
use auction_core::value_objects::{format_amount, UserId};

use crate::port::{Button, Keyboard};

/// The public channel card for an auction
pub fn auction_card(auction: &Auction) -> String {
    let mut card = format!("🔨 {}\n\n", auction.title);
    if let Some(description) = &auction.description {
        card.push_str(description);
        card.push_str("\n\n");
    }
    card.push_str(&format!(
        "Base price: {}\n",
        format_amount(auction.base_price)
    ));

    match auction.status {
        AuctionStatus::Active => {
            match auction.current_bid {
                Some(current) => {
                    card.push_str(&format!("Current bid: {}\n", format_amount(current)));
                }
                None => card.push_str("No bids yet\n"),
            }
            card.push_str(&format!(
                "Next bid: {} or more",
                format_amount(auction.min_acceptable_bid())
            ));
        }
        AuctionStatus::Ended => match (auction.current_bid, auction.current_bidder) {
            (Some(amount), Some(_)) => {
                card.push_str(&format!("🏁 Sold for {}", format_amount(amount)));
            }
            _ => card.push_str("🏁 Ended without bids"),
        },
        AuctionStatus::Removed => card.push_str("❌ Removed by an admin"),
    }
    card
}

/// The deep-link button attached to an active auction's channel card
pub fn bid_keyboard(auction_id: i64, bot_name: &str) -> Keyboard {
    Keyboard::single(Button::new(
        "Place a bid 💰",
        format!("https://t.me/{bot_name}?start=bid_{auction_id}"),
    ))
}

/// The review card fanned out to admins for a new submission
pub fn review_card(submission: &Submission) -> String {
    format!(
        "📥 Submission #{} from user {}\n\n{}\n{}\nStarting price: {}",
        submission.id,
        submission.user,
        submission.form.title(),
        submission.form.description(),
        format_amount(submission.form.price),
    )
}

/// Approve/Reject keyboard for a submission review card
pub fn review_keyboard(submission_id: i64) -> Keyboard {
    Keyboard::new().row(vec![
        Button::new("✅ Approve", format!("approve:{submission_id}")),
        Button::new("❌ Reject", format!("reject:{submission_id}")),
    ])
}

/// The review card fanned out to admins for a verification request
pub fn verification_card(user: UserId) -> String {
    format!("🙋 User {user} requests verification to join the marketplace.")
}

/// Verify/Decline keyboard for a verification review card
pub fn verification_keyboard(user: UserId) -> Keyboard {
    Keyboard::new().row(vec![
        Button::new("✅ Verify", format!("verify:{user}")),
        Button::new("❌ Decline", format!("decline:{user}")),
    ])
}

/// A settled review card, shown in place of the original after a verdict
pub fn settled_review_card(original: &str, verdict: &str) -> String {
    format!("{original}\n\n{verdict}")
}

/// The winners leaderboard
pub fn leaderboard(entries: &[LeaderboardEntry]) -> String {
    if entries.is_empty() {
        return "🏆 No auctions have been won yet.".to_string();
    }

    let mut text = "🏆 Top bidders\n\n".to_string();
    for (rank, entry) in entries.iter().enumerate() {
        let medal = match rank {
            0 => "🥇",
            1 => "🥈",
            2 => "🥉",
            _ => "▫️",
        };
        text.push_str(&format!(
            "{medal} user {} - {} wins, {} spent\n",
            entry.user,
            entry.wins,
            format_amount(entry.total_spent),
        ));
    }
    text
}

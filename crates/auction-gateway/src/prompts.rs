//! Reply texts for the private-chat conversation

use auction_core::entities::{Auction, Bid};
use auction_core::value_objects::format_amount;
use auction_core::workflow::StepPrompt;
use auction_service::dto::ProfileView;

/// What to ask the user for at each form step
pub fn step_text(prompt: StepPrompt) -> &'static str {
    match prompt {
        StepPrompt::ChooseCategory => {
            "What are you listing? Reply with \"Pokemon\" or \"TM\"."
        }
        StepPrompt::EnterName => "What is the Pokémon's name?",
        StepPrompt::EnterNature => "What is its nature?",
        StepPrompt::EnterIvs => "What are its IVs?",
        StepPrompt::EnterMoveset => "What is its moveset?",
        StepPrompt::AnswerBoost => "Is it boosted? Reply yes or no.",
        StepPrompt::EnterTmName => "Which TM are you listing?",
        StepPrompt::EnterTmDetails => "Describe the TM (type, power, anything useful).",
        StepPrompt::AttachPhoto => {
            "Send a photo of the item, or reply \"skip\" to list without one."
        }
        StepPrompt::EnterPrice => {
            "What is the starting price? Amounts like 15k or 1.5m work."
        }
        StepPrompt::ConfirmSubmission => {
            "All set. Reply \"confirm\" to send it for review, or /cancel to discard."
        }
        StepPrompt::Completed => "📨 Your listing was sent to the admins for review!",
    }
}

/// The /start welcome text
pub fn welcome() -> &'static str {
    "👋 Welcome to the Pokemon auction marketplace!\n\n\
     /verify - request access to bid and sell\n\
     /sell - list an item for auction\n\
     /bid <auction> <amount> - place a bid\n\
     /auctions - what's up for grabs\n\
     /bids <auction> - bid history\n\
     /profile - your standing\n\
     /leaderboard - top winners"
}

/// Reply shown for free text that matches nothing
pub fn lost() -> &'static str {
    "I wasn't expecting that. Use /sell to list an item or /start for the command list."
}

/// One line per active auction
pub fn auction_list(auctions: &[Auction]) -> String {
    if auctions.is_empty() {
        return "There are no active auctions right now.".to_string();
    }

    let mut text = "🔨 Active auctions\n\n".to_string();
    for auction in auctions {
        let price = match auction.current_bid {
            Some(bid) => format!("current bid {}", format_amount(bid)),
            None => format!("starting at {}", format_amount(auction.base_price)),
        };
        text.push_str(&format!("#{} {} - {}\n", auction.id, auction.title, price));
    }
    text.push_str("\nBid with /bid <auction> <amount>.");
    text
}

/// The /bids history, newest first, struck bids marked
pub fn bid_history(auction: &Auction, bids: &[Bid]) -> String {
    if bids.is_empty() {
        return format!("No bids yet on \"{}\".", auction.title);
    }

    let mut text = format!("📜 Bids on \"{}\"\n\n", auction.title);
    for bid in bids {
        text.push_str(&format!("{} by user {}", format_amount(bid.amount), bid.bidder));
        if !bid.is_active {
            text.push_str(" (retracted)");
        }
        text.push('\n');
    }
    text
}

/// The /profile card
pub fn profile_card(view: &ProfileView) -> String {
    let profile = &view.profile;
    let mut text = format!(
        "👤 Your profile\n\n\
         Submitted: {}\nApproved: {}\nRejected: {}\nPending: {}",
        profile.submitted, profile.approved, profile.rejected, profile.pending,
    );
    match &view.verified {
        Some(verified) => {
            text.push_str(&format!(
                "\n\n✅ Verified - {} bids placed, {} auctions won",
                verified.bids_placed, verified.auctions_won,
            ));
        }
        None => text.push_str("\n\n❔ Not verified. Use /verify to request access."),
    }
    if profile.banned {
        text.push_str("\n⛔ You are currently banned.");
    }
    text
}

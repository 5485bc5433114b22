//! # auction-service
//!
//! Application layer containing the marketplace business logic: bidding,
//! submissions, moderation, verification, and the outbound chat port.

pub mod dto;
pub mod port;
pub mod render;
pub mod scheduler;
pub mod services;

pub use port::{fan_out, Button, ChatError, ChatPort, Keyboard, NullChatPort};
pub use scheduler::CleanupScheduler;
pub use services::{
    AdminRegistry, BiddingService, LeaderboardService, ModerationService, ProfileService,
    ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult, SubmissionService,
    SubmissionStep, VerificationService,
};

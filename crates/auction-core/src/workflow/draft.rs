//! The submission draft state machine
//!
//! One draft exists per user while they walk the multi-step form. Every
//! accepted event advances the state and is persisted by the caller, so a
//! process restart resumes at the last completed step.
//!
//! States are a closed enum and transitions happen only through
//! [`Draft::apply`]; there is no other way to mutate a draft mid-flow.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{ItemDetails, SubmissionForm};
use crate::error::DomainError;
use crate::value_objects::{parse_amount, Category, UserId};

/// Where the user currently is in the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftState {
    ChoosingCategory,
    // Pokémon path
    AwaitingName,
    AwaitingNature,
    AwaitingIvs,
    AwaitingMoveset,
    AwaitingBoost,
    // Technical Machine path
    AwaitingTmName,
    AwaitingTmDetails,
    // Common tail
    AwaitingPhoto,
    AwaitingPrice,
    ReadyToSubmit,
}

/// An input event driving the draft forward
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftEvent {
    CategoryChosen(Category),
    Text(String),
    /// Chat-platform file reference
    Photo(String),
    SkipPhoto,
    Confirm,
}

/// What to ask the user next after an accepted event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepPrompt {
    ChooseCategory,
    EnterName,
    EnterNature,
    EnterIvs,
    EnterMoveset,
    AnswerBoost,
    EnterTmName,
    EnterTmDetails,
    AttachPhoto,
    EnterPrice,
    ConfirmSubmission,
    /// The form is complete and the caller should finalize it
    Completed,
}

/// Partially collected form fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftFields {
    pub category: Option<Category>,
    pub name: Option<String>,
    pub nature: Option<String>,
    pub ivs: Option<String>,
    pub moveset: Option<String>,
    pub boosted: Option<bool>,
    pub tm_details: Option<String>,
    pub photo: Option<String>,
    pub price: Option<i64>,
}

/// A user's in-progress submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    pub user: UserId,
    pub state: DraftState,
    pub fields: DraftFields,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Draft {
    /// Start a fresh draft at the category step
    pub fn new(user: UserId) -> Self {
        let now = Utc::now();
        Self {
            user,
            state: DraftState::ChoosingCategory,
            fields: DraftFields::default(),
            started_at: now,
            updated_at: now,
        }
    }

    /// The prompt to (re-)show for the current state, e.g. after a restart
    pub fn current_prompt(&self) -> StepPrompt {
        match self.state {
            DraftState::ChoosingCategory => StepPrompt::ChooseCategory,
            DraftState::AwaitingName => StepPrompt::EnterName,
            DraftState::AwaitingNature => StepPrompt::EnterNature,
            DraftState::AwaitingIvs => StepPrompt::EnterIvs,
            DraftState::AwaitingMoveset => StepPrompt::EnterMoveset,
            DraftState::AwaitingBoost => StepPrompt::AnswerBoost,
            DraftState::AwaitingTmName => StepPrompt::EnterTmName,
            DraftState::AwaitingTmDetails => StepPrompt::EnterTmDetails,
            DraftState::AwaitingPhoto => StepPrompt::AttachPhoto,
            DraftState::AwaitingPrice => StepPrompt::EnterPrice,
            DraftState::ReadyToSubmit => StepPrompt::ConfirmSubmission,
        }
    }

    /// Advance the draft with one input event.
    ///
    /// Returns the next prompt on success. Events that do not fit the
    /// current state are rejected without changing it.
    pub fn apply(&mut self, event: DraftEvent) -> Result<StepPrompt, DomainError> {
        let prompt = match (self.state, event) {
            (DraftState::ChoosingCategory, DraftEvent::CategoryChosen(category)) => {
                self.fields.category = Some(category);
                match category {
                    Category::Pokemon => {
                        self.state = DraftState::AwaitingName;
                        StepPrompt::EnterName
                    }
                    Category::TechnicalMachine => {
                        self.state = DraftState::AwaitingTmName;
                        StepPrompt::EnterTmName
                    }
                }
            }
            (DraftState::AwaitingName, DraftEvent::Text(text)) => {
                self.fields.name = Some(Self::required_text(text, "a Pokémon name")?);
                self.state = DraftState::AwaitingNature;
                StepPrompt::EnterNature
            }
            (DraftState::AwaitingNature, DraftEvent::Text(text)) => {
                self.fields.nature = Some(Self::required_text(text, "a nature")?);
                self.state = DraftState::AwaitingIvs;
                StepPrompt::EnterIvs
            }
            (DraftState::AwaitingIvs, DraftEvent::Text(text)) => {
                self.fields.ivs = Some(Self::required_text(text, "the IVs")?);
                self.state = DraftState::AwaitingMoveset;
                StepPrompt::EnterMoveset
            }
            (DraftState::AwaitingMoveset, DraftEvent::Text(text)) => {
                self.fields.moveset = Some(Self::required_text(text, "the moveset")?);
                self.state = DraftState::AwaitingBoost;
                StepPrompt::AnswerBoost
            }
            (DraftState::AwaitingBoost, DraftEvent::Text(text)) => {
                self.fields.boosted = Some(Self::parse_yes_no(&text)?);
                self.state = DraftState::AwaitingPhoto;
                StepPrompt::AttachPhoto
            }
            (DraftState::AwaitingTmName, DraftEvent::Text(text)) => {
                self.fields.name = Some(Self::required_text(text, "a TM name")?);
                self.state = DraftState::AwaitingTmDetails;
                StepPrompt::EnterTmDetails
            }
            (DraftState::AwaitingTmDetails, DraftEvent::Text(text)) => {
                self.fields.tm_details = Some(Self::required_text(text, "the TM details")?);
                self.state = DraftState::AwaitingPhoto;
                StepPrompt::AttachPhoto
            }
            (DraftState::AwaitingPhoto, DraftEvent::Photo(file_ref)) => {
                self.fields.photo = Some(file_ref);
                self.state = DraftState::AwaitingPrice;
                StepPrompt::EnterPrice
            }
            (DraftState::AwaitingPhoto, DraftEvent::SkipPhoto) => {
                self.state = DraftState::AwaitingPrice;
                StepPrompt::EnterPrice
            }
            (DraftState::AwaitingPrice, DraftEvent::Text(text)) => {
                let price =
                    parse_amount(&text).map_err(|_| DomainError::InvalidAmount(text.clone()))?;
                self.fields.price = Some(price);
                self.state = DraftState::ReadyToSubmit;
                StepPrompt::ConfirmSubmission
            }
            (DraftState::ReadyToSubmit, DraftEvent::Confirm) => StepPrompt::Completed,
            (state, _) => {
                return Err(DomainError::UnexpectedInput {
                    expected: Self::expected_for(state),
                })
            }
        };
        self.updated_at = Utc::now();
        Ok(prompt)
    }

    /// Assemble the completed form. Only valid once `ReadyToSubmit` is reached.
    pub fn into_form(self) -> Result<SubmissionForm, DomainError> {
        if self.state != DraftState::ReadyToSubmit {
            return Err(DomainError::UnexpectedInput {
                expected: Self::expected_for(self.state),
            });
        }

        let fields = self.fields;
        let details = match fields.category {
            Some(Category::Pokemon) => ItemDetails::Pokemon {
                name: Self::take(fields.name, "name")?,
                nature: Self::take(fields.nature, "nature")?,
                ivs: Self::take(fields.ivs, "ivs")?,
                moveset: Self::take(fields.moveset, "moveset")?,
                boosted: fields.boosted.unwrap_or(false),
            },
            Some(Category::TechnicalMachine) => ItemDetails::TechnicalMachine {
                name: Self::take(fields.name, "name")?,
                details: Self::take(fields.tm_details, "details")?,
            },
            None => return Err(DomainError::InternalError("draft has no category".to_string())),
        };

        Ok(SubmissionForm {
            details,
            photo: fields.photo,
            price: Self::take(fields.price, "price")?,
        })
    }

    fn take<T>(value: Option<T>, field: &str) -> Result<T, DomainError> {
        value.ok_or_else(|| DomainError::InternalError(format!("draft missing field: {field}")))
    }

    fn required_text(text: String, what: &'static str) -> Result<String, DomainError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(DomainError::UnexpectedInput { expected: what });
        }
        Ok(trimmed.to_string())
    }

    fn parse_yes_no(text: &str) -> Result<bool, DomainError> {
        match text.trim().to_lowercase().as_str() {
            "yes" | "y" => Ok(true),
            "no" | "n" => Ok(false),
            _ => Err(DomainError::UnexpectedInput {
                expected: "yes or no",
            }),
        }
    }

    fn expected_for(state: DraftState) -> &'static str {
        match state {
            DraftState::ChoosingCategory => "a category",
            DraftState::AwaitingName => "a Pokémon name",
            DraftState::AwaitingNature => "a nature",
            DraftState::AwaitingIvs => "the IVs",
            DraftState::AwaitingMoveset => "the moveset",
            DraftState::AwaitingBoost => "yes or no",
            DraftState::AwaitingTmName => "a TM name",
            DraftState::AwaitingTmDetails => "the TM details",
            DraftState::AwaitingPhoto => "a photo or skip",
            DraftState::AwaitingPrice => "a starting price",
            DraftState::ReadyToSubmit => "confirmation",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> DraftEvent {
        DraftEvent::Text(s.to_string())
    }

    fn walk_pokemon_to_price(draft: &mut Draft) {
        draft
            .apply(DraftEvent::CategoryChosen(Category::Pokemon))
            .unwrap();
        draft.apply(text("Gible")).unwrap();
        draft.apply(text("Jolly")).unwrap();
        draft.apply(text("6IV")).unwrap();
        draft.apply(text("Dragon Claw, Dig")).unwrap();
        draft.apply(text("yes")).unwrap();
        draft.apply(DraftEvent::SkipPhoto).unwrap();
    }

    #[test]
    fn test_pokemon_happy_path() {
        let mut draft = Draft::new(UserId::new(1));
        assert_eq!(draft.current_prompt(), StepPrompt::ChooseCategory);

        walk_pokemon_to_price(&mut draft);
        assert_eq!(draft.state, DraftState::AwaitingPrice);

        let prompt = draft.apply(text("15k")).unwrap();
        assert_eq!(prompt, StepPrompt::ConfirmSubmission);
        assert_eq!(draft.apply(DraftEvent::Confirm).unwrap(), StepPrompt::Completed);

        let form = draft.into_form().unwrap();
        assert_eq!(form.price, 15_000);
        assert_eq!(form.title(), "Gible (boosted)");
        assert!(form.photo.is_none());
    }

    #[test]
    fn test_tm_happy_path() {
        let mut draft = Draft::new(UserId::new(1));
        draft
            .apply(DraftEvent::CategoryChosen(Category::TechnicalMachine))
            .unwrap();
        draft.apply(text("Earthquake")).unwrap();
        draft.apply(text("Ground-type, 100 power")).unwrap();
        draft
            .apply(DraftEvent::Photo("file-abc".to_string()))
            .unwrap();
        draft.apply(text("5000")).unwrap();

        let form = draft.into_form().unwrap();
        assert_eq!(form.title(), "TM: Earthquake");
        assert_eq!(form.photo.as_deref(), Some("file-abc"));
        assert_eq!(form.price, 5_000);
    }

    #[test]
    fn test_wrong_event_does_not_advance() {
        let mut draft = Draft::new(UserId::new(1));
        let err = draft.apply(text("Gible")).unwrap_err();
        assert!(matches!(err, DomainError::UnexpectedInput { .. }));
        assert_eq!(draft.state, DraftState::ChoosingCategory);
    }

    #[test]
    fn test_bad_price_keeps_state() {
        let mut draft = Draft::new(UserId::new(1));
        walk_pokemon_to_price(&mut draft);

        let err = draft.apply(text("a lot")).unwrap_err();
        assert!(matches!(err, DomainError::InvalidAmount(_)));
        assert_eq!(draft.state, DraftState::AwaitingPrice);

        draft.apply(text("1.5m")).unwrap();
        assert_eq!(draft.fields.price, Some(1_500_000));
    }

    #[test]
    fn test_bad_boost_answer() {
        let mut draft = Draft::new(UserId::new(1));
        draft
            .apply(DraftEvent::CategoryChosen(Category::Pokemon))
            .unwrap();
        draft.apply(text("Gible")).unwrap();
        draft.apply(text("Jolly")).unwrap();
        draft.apply(text("6IV")).unwrap();
        draft.apply(text("Tackle")).unwrap();

        let err = draft.apply(text("maybe")).unwrap_err();
        assert!(matches!(err, DomainError::UnexpectedInput { expected: "yes or no" }));
        assert_eq!(draft.state, DraftState::AwaitingBoost);
    }

    #[test]
    fn test_blank_text_rejected() {
        let mut draft = Draft::new(UserId::new(1));
        draft
            .apply(DraftEvent::CategoryChosen(Category::Pokemon))
            .unwrap();
        assert!(draft.apply(text("   ")).is_err());
        assert_eq!(draft.state, DraftState::AwaitingName);
    }

    #[test]
    fn test_serde_round_trip_mid_flow() {
        // The draft is persisted after every step; make sure a restart
        // restores the exact same position.
        let mut draft = Draft::new(UserId::new(7));
        draft
            .apply(DraftEvent::CategoryChosen(Category::Pokemon))
            .unwrap();
        draft.apply(text("Gible")).unwrap();

        let json = serde_json::to_string(&draft).unwrap();
        let mut restored: Draft = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, draft);
        assert_eq!(restored.current_prompt(), StepPrompt::EnterNature);

        restored.apply(text("Adamant")).unwrap();
        assert_eq!(restored.state, DraftState::AwaitingIvs);
    }

    #[test]
    fn test_into_form_requires_ready_state() {
        let draft = Draft::new(UserId::new(1));
        assert!(draft.into_form().is_err());
    }
}

//! Ticket submission form with speculative auto-classification.
//!
//! While the operator types a description, the form asks the service to
//! classify it once typing pauses, and pre-fills category and priority with
//! the suggestion. Classification is best effort: every failure is dropped.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::api::{ApiError, TicketApi};
use crate::config::TimingConfig;
use crate::debounce::Debouncer;
use crate::ticket::{Category, ClassificationSuggestion, Priority, Ticket};

use super::draft::{DraftError, DraftTicket};

const CLASSIFY_KEY: &str = "classify";

pub const SUBMIT_SUCCESS_MESSAGE: &str = "Ticket submitted successfully!";
pub const SUBMIT_FAILURE_MESSAGE: &str = "Failed to submit ticket. Please try again.";

/// Banner shown under the form after a submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormNotice {
    Success(String),
    Error(String),
}

/// Completions delivered back to the form.
#[derive(Debug)]
pub enum FormMessage {
    /// The classification quiet period elapsed for this description.
    ClassifyDue(String),
    /// A classification request finished. `epoch` identifies the draft it
    /// was requested for.
    Classified {
        epoch: u64,
        suggestion: Option<ClassificationSuggestion>,
    },
    /// A creation request finished.
    Submitted(Result<Ticket, ApiError>),
}

/// Why `submit` did not send anything.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error(transparent)]
    Invalid(#[from] DraftError),

    #[error("A submission is already in progress")]
    InProgress,
}

/// Owns the draft and its classification state.
pub struct TicketForm {
    api: Arc<dyn TicketApi>,
    classify_delay: Duration,
    classify_min_chars: usize,

    draft: DraftTicket,
    /// Bumped whenever the draft is thrown away; older replies are ignored.
    draft_epoch: u64,
    classify_in_flight: usize,
    classified: bool,
    submitting: bool,
    notice: Option<FormNotice>,

    debouncer: Debouncer<&'static str>,
    tx: mpsc::UnboundedSender<FormMessage>,
    rx: mpsc::UnboundedReceiver<FormMessage>,
}

impl TicketForm {
    pub fn new(api: Arc<dyn TicketApi>, timing: &TimingConfig) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            api,
            classify_delay: timing.classify_delay(),
            classify_min_chars: timing.classify_min_chars,
            draft: DraftTicket::default(),
            draft_epoch: 0,
            classify_in_flight: 0,
            classified: false,
            submitting: false,
            notice: None,
            debouncer: Debouncer::new(),
            tx,
            rx,
        }
    }

    pub fn draft(&self) -> &DraftTicket {
        &self.draft
    }

    /// A classification request is in flight.
    pub fn is_classifying(&self) -> bool {
        self.classify_in_flight > 0
    }

    /// Category and priority currently hold an unedited suggestion.
    pub fn is_classified(&self) -> bool {
        self.classified
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// A classification timer is waiting for typing to pause.
    pub fn classification_pending(&self) -> bool {
        self.debouncer.is_pending(&CLASSIFY_KEY)
    }

    pub fn notice(&self) -> Option<&FormNotice> {
        self.notice.as_ref()
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.draft.title = title.into();
    }

    pub fn set_category(&mut self, category: Category) {
        self.draft.category = category;
    }

    pub fn set_priority(&mut self, priority: Priority) {
        self.draft.priority = priority;
    }

    /// Record a description edit and (re)arm classification.
    ///
    /// The suggestion badge is cleared immediately. Descriptions no longer
    /// than the threshold cancel any pending classification.
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.draft.description = description.into();
        self.classified = false;

        if self.draft.description.trim().chars().count() > self.classify_min_chars {
            let tx = self.tx.clone();
            let text = self.draft.description.clone();
            self.debouncer
                .schedule(CLASSIFY_KEY, self.classify_delay, move || {
                    let _ = tx.send(FormMessage::ClassifyDue(text));
                });
        } else {
            self.debouncer.cancel(&CLASSIFY_KEY);
        }
    }

    /// Validate the draft and send it to the service.
    ///
    /// Validation failures are shown as the form notice and returned; the
    /// request itself completes later as [`FormMessage::Submitted`].
    pub fn submit(&mut self) -> Result<(), SubmitError> {
        if self.submitting {
            return Err(SubmitError::InProgress);
        }

        let request = match self.draft.to_new_ticket() {
            Ok(request) => request,
            Err(e) => {
                self.notice = Some(FormNotice::Error(e.to_string()));
                return Err(e.into());
            }
        };

        self.notice = None;
        self.submitting = true;

        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = api.create_ticket(&request).await;
            let _ = tx.send(FormMessage::Submitted(result));
        });
        Ok(())
    }

    /// Drop the draft and every pending timer, e.g. when navigating away.
    ///
    /// Classification replies still in flight are ignored when they land.
    pub fn discard(&mut self) {
        self.debouncer.cancel_all();
        self.reset_draft();
        self.notice = None;
    }

    fn reset_draft(&mut self) {
        self.draft = DraftTicket::default();
        self.draft_epoch += 1;
        self.classify_in_flight = 0;
        self.classified = false;
    }

    /// Wait for the next completion.
    pub async fn next_message(&mut self) -> Option<FormMessage> {
        self.rx.recv().await
    }

    /// Take a completion if one is already queued.
    pub fn try_next_message(&mut self) -> Option<FormMessage> {
        self.rx.try_recv().ok()
    }

    /// Apply a completion. Returns the ticket when a submission succeeded.
    pub fn handle(&mut self, message: FormMessage) -> Option<Ticket> {
        match message {
            FormMessage::ClassifyDue(description) => {
                if self.classification_due(&description) {
                    self.start_classification(description);
                } else {
                    debug!("Dropping classification for an outdated description");
                }
                None
            }
            FormMessage::Classified { epoch, suggestion } => {
                if epoch != self.draft_epoch {
                    debug!(epoch, "Dropping classification for a discarded draft");
                    return None;
                }
                self.classify_in_flight = self.classify_in_flight.saturating_sub(1);
                if let Some(suggestion) = suggestion {
                    self.apply_suggestion(suggestion);
                }
                None
            }
            FormMessage::Submitted(result) => self.finish_submission(result),
        }
    }

    /// A fired timer may have been queued before a later edit; only the
    /// current, long enough description is sent.
    fn classification_due(&self, description: &str) -> bool {
        description == self.draft.description
            && description.trim().chars().count() > self.classify_min_chars
    }

    fn start_classification(&mut self, description: String) {
        self.classify_in_flight += 1;
        let epoch = self.draft_epoch;
        debug!(epoch, chars = description.chars().count(), "Requesting classification");

        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let suggestion = match api.classify(&description).await {
                Ok(suggestion) => suggestion,
                Err(e) => {
                    debug!(error = %e, "Classification failed, ignoring");
                    None
                }
            };
            let _ = tx.send(FormMessage::Classified { epoch, suggestion });
        });
    }

    /// Suggestions are applied even if the description changed since the
    /// request was sent.
    fn apply_suggestion(&mut self, suggestion: ClassificationSuggestion) {
        debug!(
            category = %suggestion.category,
            priority = %suggestion.priority,
            "Applying classification"
        );
        self.draft.category = suggestion.category;
        self.draft.priority = suggestion.priority;
        self.classified = true;
    }

    fn finish_submission(&mut self, result: Result<Ticket, ApiError>) -> Option<Ticket> {
        self.submitting = false;
        match result {
            Ok(ticket) => {
                info!(ticket_id = ticket.id, "Ticket submitted");
                self.debouncer.cancel(&CLASSIFY_KEY);
                self.reset_draft();
                self.notice = Some(FormNotice::Success(SUBMIT_SUCCESS_MESSAGE.to_string()));
                Some(ticket)
            }
            Err(e) => {
                warn!(error = %e, "Ticket submission failed");
                self.notice = Some(FormNotice::Error(SUBMIT_FAILURE_MESSAGE.to_string()));
                None
            }
        }
    }
}

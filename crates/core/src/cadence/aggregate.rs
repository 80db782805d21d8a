//! Folds the raw call log into one accumulator per contact.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::domain::call::{CallEvent, OutcomeCategory};
use crate::domain::contact::{ContactKey, Prospect};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContactAccumulator {
    pub key: ContactKey,
    pub attempt_count: u32,
    pub categories: Vec<OutcomeCategory>,
    pub last_called_at: Option<NaiveDate>,
    pub best_outcome: Option<OutcomeCategory>,
}

impl ContactAccumulator {
    fn new(key: ContactKey) -> Self {
        Self {
            key,
            attempt_count: 0,
            categories: Vec::new(),
            last_called_at: None,
            best_outcome: None,
        }
    }

    fn record(&mut self, category: OutcomeCategory, called_on: NaiveDate) {
        self.attempt_count += 1;
        self.categories.push(category);
        self.last_called_at = Some(match self.last_called_at {
            Some(previous) if previous > called_on => previous,
            _ => called_on,
        });

        // A positive outcome is never displaced by a later negative one.
        if category.is_positive() {
            self.best_outcome = Some(category);
        } else if category.is_terminal_negative()
            && !self.best_outcome.map(OutcomeCategory::is_positive).unwrap_or(false)
        {
            self.best_outcome = Some(category);
        }
    }

    pub fn count(&self, category: OutcomeCategory) -> usize {
        self.categories.iter().filter(|seen| **seen == category).count()
    }

    pub fn contains(&self, category: OutcomeCategory) -> bool {
        self.categories.contains(&category)
    }

    /// Most recent terminal-negative outcome in the history.
    pub fn last_terminal_negative(&self) -> Option<OutcomeCategory> {
        self.categories.iter().rev().copied().find(|category| category.is_terminal_negative())
    }

    /// True once any call reached something other than voicemail or no answer.
    pub fn ever_answered(&self) -> bool {
        self.categories.iter().any(|category| !category.is_unanswered())
    }
}

/// Per-contact call history in first-seen order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CallHistory {
    contacts: Vec<ContactAccumulator>,
    index: HashMap<ContactKey, usize>,
    event_count: usize,
    skipped_rows: usize,
}

impl CallHistory {
    /// Folds an oldest-first call log. Rows without a contact or company name
    /// are counted as skipped and otherwise ignored.
    pub fn fold<'a>(events: impl IntoIterator<Item = &'a CallEvent>) -> Self {
        let mut history = Self::default();
        for event in events {
            history.event_count += 1;
            let Some(key) =
                ContactKey::from_parts(event.contact_name.as_deref(), event.company_name.as_deref())
            else {
                history.skipped_rows += 1;
                continue;
            };
            history.entry(key).record(event.outcome_category, event.called_on());
        }
        history
    }

    /// Adds never-called prospects. Prospects already in the history are
    /// left untouched.
    pub fn with_prospects<'a>(mut self, prospects: impl IntoIterator<Item = &'a Prospect>) -> Self {
        for prospect in prospects {
            match ContactKey::from_parts(
                Some(prospect.contact_name.as_str()),
                Some(prospect.company_name.as_str()),
            ) {
                Some(key) => {
                    self.entry(key);
                }
                None => self.skipped_rows += 1,
            }
        }
        self
    }

    fn entry(&mut self, key: ContactKey) -> &mut ContactAccumulator {
        let position = match self.index.get(&key) {
            Some(position) => *position,
            None => {
                let position = self.contacts.len();
                self.index.insert(key.clone(), position);
                self.contacts.push(ContactAccumulator::new(key));
                position
            }
        };
        &mut self.contacts[position]
    }

    pub fn get(&self, key: &ContactKey) -> Option<&ContactAccumulator> {
        self.index.get(key).map(|position| &self.contacts[*position])
    }

    pub fn iter(&self) -> impl Iterator<Item = &ContactAccumulator> {
        self.contacts.iter()
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    pub fn event_count(&self) -> usize {
        self.event_count
    }

    pub fn skipped_rows(&self) -> usize {
        self.skipped_rows
    }
}

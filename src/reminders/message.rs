//! Reminder text.

use crate::config::ReminderConfig;
use crate::model::TrackedIndividual;

/// A composed reminder ready to hand to a sender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderMessage {
    pub subject: String,
    pub body: String,
}

/// Build the reminder for one individual.
pub fn compose(individual: &TrackedIndividual, config: &ReminderConfig) -> ReminderMessage {
    let body = format!(
        "Hi {name},\n\n\
         We noticed you haven't solved any problems on Codeforces in the past {period}. \
         Keep practicing to improve your skills!\n\n\
         Best regards,\n{signature}",
        name = individual.name,
        period = describe_window(config.window_days),
        signature = config.signature,
    );
    ReminderMessage {
        subject: config.subject.clone(),
        body,
    }
}

fn describe_window(days: u32) -> String {
    match days {
        1 => "day".to_owned(),
        7 => "week".to_owned(),
        n => format!("{n} days"),
    }
}

//! Preset instructions for summarizing meeting notes.

/// A preset instruction that is put in front of the meeting notes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum MeetingPrompt {
    /// No preset, only the custom instruction is used.
    #[default]
    NoPrompt,
    /// Date and time of the meeting.
    MeetingDateTime,
    /// Who attended.
    Attendees,
    /// Agenda topics.
    Agenda,
    /// Action items and their owners.
    ActionItems,
    /// Deadlines of the action items.
    Deadlines,
    /// Decisions and resolutions.
    DecisionsMade,
    /// Follow-up actions.
    NextSteps,
    /// Goals of the meeting.
    MeetingObjectives,
    /// Challenges and concerns that were raised.
    ChallengesAndConcerns,
    /// Meetings scheduled to continue the discussion.
    UpcomingMeetings,
}

impl MeetingPrompt {
    /// All presets, in menu order.
    pub const ALL: [MeetingPrompt; 11] = [
        MeetingPrompt::NoPrompt,
        MeetingPrompt::MeetingDateTime,
        MeetingPrompt::Attendees,
        MeetingPrompt::Agenda,
        MeetingPrompt::ActionItems,
        MeetingPrompt::Deadlines,
        MeetingPrompt::DecisionsMade,
        MeetingPrompt::NextSteps,
        MeetingPrompt::MeetingObjectives,
        MeetingPrompt::ChallengesAndConcerns,
        MeetingPrompt::UpcomingMeetings,
    ];

    /// Returns the instruction text. Empty for [`MeetingPrompt::NoPrompt`].
    pub fn text(self) -> &'static str {
        match self {
            MeetingPrompt::NoPrompt => "",
            MeetingPrompt::MeetingDateTime => {
                "Please state the date and time of the meeting for the record."
            }
            MeetingPrompt::Attendees => {
                "Kindly provide a list of all attendees present in the meeting."
            }
            MeetingPrompt::Agenda => {
                "Could you outline the agenda topics discussed during the meeting?"
            }
            MeetingPrompt::ActionItems => {
                "What are the action items identified during the meeting and \
                 who is responsible for each?"
            }
            MeetingPrompt::Deadlines => {
                "Can you specify the deadlines for each action item?"
            }
            MeetingPrompt::DecisionsMade => {
                "Please highlight any significant decisions or resolutions \
                 made during the meeting."
            }
            MeetingPrompt::NextSteps => {
                "What are the next steps or follow-up actions to be taken \
                 after the meeting?"
            }
            MeetingPrompt::MeetingObjectives => {
                "What were the main objectives or goals of this meeting?"
            }
            MeetingPrompt::ChallengesAndConcerns => {
                "Were there any challenges or concerns raised during the meeting?"
            }
            MeetingPrompt::UpcomingMeetings => {
                "Are there any upcoming meetings scheduled to continue the \
                 discussion on specific topics?"
            }
        }
    }
}

/// Builds the user message for a notes request.
///
/// The preset instruction, the custom instruction and the notes are joined
/// by a single space, skipping the empty ones.
pub fn compose_note_request(
    preset: MeetingPrompt,
    custom: &str,
    notes: &str,
) -> String {
    [preset.text(), custom.trim(), notes.trim()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_with_preset() {
        let text = compose_note_request(
            MeetingPrompt::Attendees,
            "",
            "Alice and Bob discussed the roadmap.\n",
        );
        assert_eq!(
            text,
            "Kindly provide a list of all attendees present in the meeting. \
             Alice and Bob discussed the roadmap."
        );
    }

    #[test]
    fn test_compose_without_preset() {
        let text = compose_note_request(
            MeetingPrompt::NoPrompt,
            "Summarize in one line:",
            "We shipped.",
        );
        assert_eq!(text, "Summarize in one line: We shipped.");
    }

    #[test]
    fn test_only_no_prompt_is_empty() {
        for preset in MeetingPrompt::ALL {
            assert_eq!(preset.text().is_empty(), preset == MeetingPrompt::NoPrompt);
        }
    }
}

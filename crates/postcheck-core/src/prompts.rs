//! Prompt text for each step.
//!
//! The rubric varies with the [`Audience`]; the structural contract of the
//! workflow does not. Every system prompt also spells out the expected JSON
//! fields so endpoints that ignore `response_format` still answer in shape.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::tier::SafetyTier;

/// Who the rubric is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    /// Adult users of a general social network.
    #[default]
    General,
    /// Children and young teens; stricter on personal information and
    /// contact with strangers.
    Children,
}

impl Audience {
    /// Config/CLI name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Children => "children",
        }
    }
}

impl fmt::Display for Audience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Audience {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "general" => Ok(Self::General),
            "children" | "kids" => Ok(Self::Children),
            other => Err(format!("unknown audience: {other} (expected general or children)")),
        }
    }
}

const GENERAL_RUBRIC: &str = "\
1. safe: an ordinary post with no problems.
2. warning: somewhat inappropriate wording or content, such as mild insults, \
venting about an identifiable person, crude language, or oversharing minor \
personal details.
3. danger: clearly inappropriate, harmful, or illegal content, such as \
personal information that identifies or locates someone (home address, phone \
number, school or workplace), threats, harassment, hate speech, sexual \
content, or promotion of illegal activity.";

const CHILDREN_RUBRIC: &str = "\
The author is a child or young teen, so judge strictly.
1. safe: an ordinary post a parent would be comfortable seeing.
2. warning: unkind words about classmates or others, rude language, sharing \
feelings or details that could be used to tease or pressure the author, or \
mentioning plans without saying where.
3. danger: anything that reveals who or where the author is (real name with \
school, address, phone number, photos of their location, daily routine), \
agreeing to meet or talk privately with strangers, bullying, threats, \
self-harm, sexual content, or illegal activity.";

/// System prompts for the three step kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSet {
    /// Instructions for the classifier.
    pub classifier: String,
    /// Instructions for the corrector.
    pub corrector: String,
    /// Instructions for the single-call assessor.
    pub assessor: String,
}

impl PromptSet {
    /// Prompts for the given audience.
    pub fn for_audience(audience: Audience) -> Self {
        let rubric = match audience {
            Audience::General => GENERAL_RUBRIC,
            Audience::Children => CHILDREN_RUBRIC,
        };

        let classifier = format!(
            "You are an expert who checks social media posts for safety before they are published.\n\
             Rate the post using these levels:\n{rubric}\n\n\
             Reply with JSON only:\n\
             {{\"level\": \"safe|warning|danger\", \"reason\": \"a detailed explanation of the level\"}}"
        );

        let corrector = format!(
            "You are an expert editor who makes social media posts safe to publish.\n\
             The post was rated with these levels:\n{rubric}\n\n\
             Rewrite the post so it would be rated safe. Keep the author's intent, tone, and \
             language; remove or generalize only the unsafe parts. Never repeat personal \
             information from the original.\n\n\
             Reply with JSON only:\n\
             {{\"suggestion\": \"concrete advice for improving the post\", \
             \"corrected_text\": \"the rewritten post\"}}"
        );

        let assessor = format!(
            "You are an expert who checks social media posts for safety before they are published.\n\
             Rate the post using these levels:\n{rubric}\n\n\
             Then suggest an improvement and rewrite the post so it would be rated safe, \
             keeping the author's intent. If the post is already safe, the rewrite may repeat it.\n\n\
             Reply with JSON only:\n\
             {{\"level\": \"safe|warning|danger\", \"reason\": \"a detailed explanation of the level\", \
             \"suggestion\": \"concrete advice for improving the post\", \
             \"corrected_text\": \"the post rewritten for safety\"}}"
        );

        Self {
            classifier,
            corrector,
            assessor,
        }
    }
}

impl Default for PromptSet {
    fn default() -> Self {
        Self::for_audience(Audience::default())
    }
}

/// User message for the classifier and the assessor.
pub fn post_message(input_text: &str) -> String {
    format!("Post: {input_text}")
}

/// User message for the corrector: the post plus the classification.
pub fn correction_message(input_text: &str, tier: SafetyTier, reason: &str) -> String {
    format!("Post: {input_text}\nLevel: {tier}\nReason: {reason}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audiences_use_different_rubrics() {
        let general = PromptSet::for_audience(Audience::General);
        let children = PromptSet::for_audience(Audience::Children);
        assert_ne!(general.classifier, children.classifier);
        assert!(children.classifier.contains("child"));
    }

    #[test]
    fn prompts_name_their_output_fields() {
        let prompts = PromptSet::default();
        assert!(prompts.classifier.contains("\"level\""));
        assert!(prompts.classifier.contains("\"reason\""));
        assert!(prompts.corrector.contains("\"suggestion\""));
        assert!(prompts.corrector.contains("\"corrected_text\""));
        for field in ["level", "reason", "suggestion", "corrected_text"] {
            assert!(prompts.assessor.contains(field), "assessor prompt missing {field}");
        }
    }

    #[test]
    fn rubric_lists_every_tier() {
        let prompts = PromptSet::default();
        for tier in SafetyTier::ALL {
            assert!(prompts.classifier.contains(tier.as_str()));
        }
    }

    #[test]
    fn correction_message_interpolates_classification() {
        let msg = correction_message("call me at 555-0100", SafetyTier::Danger, "phone number");
        assert_eq!(
            msg,
            "Post: call me at 555-0100\nLevel: danger\nReason: phone number"
        );
    }

    #[test]
    fn audience_parsing() {
        assert_eq!("Children".parse::<Audience>().unwrap(), Audience::Children);
        assert_eq!("kids".parse::<Audience>().unwrap(), Audience::Children);
        assert!("teens".parse::<Audience>().is_err());
    }
}

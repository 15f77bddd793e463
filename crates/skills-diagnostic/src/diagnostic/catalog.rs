use std::collections::BTreeMap;

use super::adjustment::AdjustmentRule;
use super::context::{ContextFlag, OrganisationSize, RegionStatus};
use super::schema::{
    AnswerOption, Category, CategoryId, FallbackGuidance, Question, QuestionId, SchemaDefinition,
};

pub const APPRENTICESHIPS: &str = "apprenticeships";
pub const SKILLS_BOOTCAMPS: &str = "skills_bootcamps";
pub const REGIONAL_SKILLS_FUND: &str = "regional_skills_fund";
pub const CAREERS_HUB: &str = "careers_hub";
pub const ADULT_SKILLS: &str = "adult_skills";

/// Programmes funded only for organisations inside the served region.
const REGION_RESTRICTED: [&str; 4] = [
    SKILLS_BOOTCAMPS,
    REGIONAL_SKILLS_FUND,
    CAREERS_HUB,
    ADULT_SKILLS,
];

const FALLBACK_MESSAGE: &str = "Based on your answers none of our funded programmes is a strong \
    fit right now. Our skills advisers can review your plans and signpost national schemes or \
    local training providers.";

impl SchemaDefinition {
    /// The Skills Diagnostic as published on the portal.
    pub fn standard() -> Self {
        Self {
            questions: standard_questions(),
            categories: standard_categories(),
            adjustments: standard_adjustments(),
            fallback: FallbackGuidance {
                message: FALLBACK_MESSAGE.to_string(),
                call_to_action: "Book a free call with a skills adviser".to_string(),
            },
        }
    }
}

fn deltas(entries: &[(&str, i32)]) -> BTreeMap<CategoryId, i32> {
    entries
        .iter()
        .map(|(category, delta)| (CategoryId::new(*category), *delta))
        .collect()
}

fn option(label: &str, value: &str, entries: &[(&str, i32)]) -> AnswerOption {
    AnswerOption {
        label: label.to_string(),
        value: value.to_string(),
        score_contribution: deltas(entries),
        context: None,
    }
}

fn flagged(label: &str, value: &str, entries: &[(&str, i32)], flag: ContextFlag) -> AnswerOption {
    AnswerOption {
        context: Some(flag),
        ..option(label, value, entries)
    }
}

fn standard_questions() -> Vec<Question> {
    vec![
        Question {
            id: QuestionId(1),
            prompt: "Where is your organisation based?".to_string(),
            help_text: Some("Some programmes only fund organisations in the region.".to_string()),
            options: vec![
                flagged(
                    "Within the region",
                    "in_region",
                    &[
                        (SKILLS_BOOTCAMPS, 1),
                        (REGIONAL_SKILLS_FUND, 1),
                        (CAREERS_HUB, 1),
                        (ADULT_SKILLS, 1),
                    ],
                    ContextFlag::Region(RegionStatus::InRegion),
                ),
                flagged(
                    "Outside the region",
                    "outside_region",
                    &[(APPRENTICESHIPS, 2)],
                    ContextFlag::Region(RegionStatus::OutsideRegion),
                ),
            ],
            allow_multiple: false,
            required: true,
        },
        Question {
            id: QuestionId(2),
            prompt: "How many people does your organisation employ?".to_string(),
            help_text: None,
            options: vec![
                flagged(
                    "1 to 9",
                    "micro",
                    &[(REGIONAL_SKILLS_FUND, 2), (SKILLS_BOOTCAMPS, 1)],
                    ContextFlag::OrganisationSize(OrganisationSize::Micro),
                ),
                flagged(
                    "10 to 49",
                    "small",
                    &[
                        (REGIONAL_SKILLS_FUND, 3),
                        (SKILLS_BOOTCAMPS, 2),
                        (APPRENTICESHIPS, 1),
                    ],
                    ContextFlag::OrganisationSize(OrganisationSize::Small),
                ),
                flagged(
                    "50 to 249",
                    "medium",
                    &[
                        (APPRENTICESHIPS, 3),
                        (SKILLS_BOOTCAMPS, 2),
                        (REGIONAL_SKILLS_FUND, 1),
                    ],
                    ContextFlag::OrganisationSize(OrganisationSize::Medium),
                ),
                flagged(
                    "250 or more",
                    "large",
                    &[(APPRENTICESHIPS, 5), (CAREERS_HUB, 2)],
                    ContextFlag::OrganisationSize(OrganisationSize::Large),
                ),
            ],
            allow_multiple: false,
            required: true,
        },
        Question {
            id: QuestionId(3),
            prompt: "Which skills does your workforce most need?".to_string(),
            help_text: Some("Select all that apply.".to_string()),
            options: vec![
                option(
                    "Digital and data",
                    "digital",
                    &[
                        (SKILLS_BOOTCAMPS, 5),
                        (REGIONAL_SKILLS_FUND, 2),
                        (ADULT_SKILLS, 1),
                    ],
                ),
                option(
                    "Green and net zero",
                    "green",
                    &[(SKILLS_BOOTCAMPS, 4), (REGIONAL_SKILLS_FUND, 3)],
                ),
                option(
                    "Leadership and management",
                    "leadership",
                    &[(REGIONAL_SKILLS_FUND, 5), (APPRENTICESHIPS, 2)],
                ),
                option(
                    "Technical and engineering",
                    "technical",
                    &[(APPRENTICESHIPS, 5), (SKILLS_BOOTCAMPS, 2)],
                ),
                option(
                    "English, maths and essential skills",
                    "essential",
                    &[(ADULT_SKILLS, 7)],
                ),
            ],
            allow_multiple: true,
            required: true,
        },
        Question {
            id: QuestionId(4),
            prompt: "What is your main workforce goal?".to_string(),
            help_text: None,
            options: vec![
                option(
                    "Recruit new talent",
                    "recruit",
                    &[(APPRENTICESHIPS, 6), (CAREERS_HUB, 2)],
                ),
                option(
                    "Upskill existing staff",
                    "upskill",
                    &[
                        (REGIONAL_SKILLS_FUND, 5),
                        (SKILLS_BOOTCAMPS, 3),
                        (ADULT_SKILLS, 2),
                    ],
                ),
                option(
                    "Help staff retrain or change career",
                    "retrain",
                    &[(SKILLS_BOOTCAMPS, 6), (ADULT_SKILLS, 4)],
                ),
                option(
                    "Inspire young people into our sector",
                    "inspire_young_people",
                    &[(CAREERS_HUB, 9), (APPRENTICESHIPS, 1)],
                ),
            ],
            allow_multiple: false,
            required: true,
        },
        Question {
            id: QuestionId(5),
            prompt: "When do you need training to start?".to_string(),
            help_text: None,
            options: vec![
                option(
                    "Within three months",
                    "immediately",
                    &[(SKILLS_BOOTCAMPS, 2), (REGIONAL_SKILLS_FUND, 2)],
                ),
                option(
                    "Within the next year",
                    "within_year",
                    &[(APPRENTICESHIPS, 2), (CAREERS_HUB, 1)],
                ),
                option(
                    "Just exploring",
                    "exploring",
                    &[(CAREERS_HUB, 2), (ADULT_SKILLS, 1)],
                ),
            ],
            allow_multiple: false,
            required: true,
        },
        Question {
            id: QuestionId(6),
            prompt: "How would you describe your training budget?".to_string(),
            help_text: Some("Optional.".to_string()),
            options: vec![
                option(
                    "We can co-invest in training",
                    "co_invest",
                    &[(REGIONAL_SKILLS_FUND, 3), (SKILLS_BOOTCAMPS, 2)],
                ),
                option(
                    "We need fully funded options",
                    "fully_funded",
                    &[(ADULT_SKILLS, 3), (CAREERS_HUB, 2)],
                ),
                option(
                    "We pay the apprenticeship levy",
                    "levy_payer",
                    &[(APPRENTICESHIPS, 4)],
                ),
                option("Not sure", "not_sure", &[]),
            ],
            allow_multiple: false,
            required: false,
        },
    ]
}

fn category(
    id: &str,
    title: &str,
    description: &str,
    threshold: i32,
    eligibility_criteria: &[&str],
    funding: &str,
    call_to_action: &str,
) -> Category {
    Category {
        id: CategoryId::new(id),
        title: title.to_string(),
        description: description.to_string(),
        threshold: Some(threshold),
        eligibility_criteria: eligibility_criteria
            .iter()
            .map(|item| item.to_string())
            .collect(),
        funding: funding.to_string(),
        call_to_action: call_to_action.to_string(),
    }
}

fn standard_categories() -> Vec<Category> {
    vec![
        category(
            APPRENTICESHIPS,
            "Apprenticeships",
            "Recruit or develop staff through paid, structured on-the-job training backed by \
             a recognised standard.",
            12,
            &[
                "Apprentice works at least 30 hours a week",
                "20% of paid hours spent on off-the-job training",
                "Role maps to an approved apprenticeship standard",
            ],
            "Levy funds or 95% government co-investment; levy transfer available for smaller \
             employers.",
            "Talk to our apprenticeship team",
        ),
        category(
            SKILLS_BOOTCAMPS,
            "Skills Bootcamps",
            "Flexible courses of up to 16 weeks in digital, green and technical skills with a \
             guaranteed interview.",
            12,
            &[
                "Organisation based in the region",
                "Learners aged 19 or over",
                "Training starts within the current funding window",
            ],
            "Fully funded for SMEs; larger employers contribute 30%.",
            "Browse current bootcamps",
        ),
        category(
            REGIONAL_SKILLS_FUND,
            "Regional Skills Fund",
            "Co-funded training grants helping small and medium businesses upskill their \
             existing workforce.",
            10,
            &[
                "Organisation based in the region",
                "Fewer than 250 employees",
                "Training delivered by an approved provider",
            ],
            "Up to 50% of eligible training costs, capped per employer.",
            "Check your grant allowance",
        ),
        category(
            CAREERS_HUB,
            "Careers Hub",
            "Partner with local schools and colleges to inspire young people and build a future \
             talent pipeline.",
            8,
            &[
                "Organisation based in the region",
                "Able to commit time to at least one school activity a term",
            ],
            "Free to participate; coordinated by the regional Careers Hub.",
            "Become an Enterprise Adviser",
        ),
        category(
            ADULT_SKILLS,
            "Adult Skills Fund courses",
            "Free and discounted courses for adults building essential, digital and vocational \
             skills.",
            10,
            &[
                "Learner lives in the region",
                "Learner aged 19 or over",
                "Course delivered by a funded local provider",
            ],
            "Fully funded for eligible learners, co-funded otherwise.",
            "Find a local course",
        ),
    ]
}

fn weight(size: OrganisationSize, category: &str, delta: i32) -> AdjustmentRule {
    AdjustmentRule::SoftWeighting {
        when: ContextFlag::OrganisationSize(size),
        category: CategoryId::new(category),
        delta,
    }
}

fn standard_adjustments() -> Vec<AdjustmentRule> {
    vec![
        AdjustmentRule::HardExclusion {
            when: ContextFlag::Region(RegionStatus::OutsideRegion),
            categories: REGION_RESTRICTED
                .iter()
                .map(|id| CategoryId::new(*id))
                .collect(),
        },
        weight(OrganisationSize::Large, APPRENTICESHIPS, 4),
        weight(OrganisationSize::Large, REGIONAL_SKILLS_FUND, -4),
        weight(OrganisationSize::Medium, APPRENTICESHIPS, 2),
        weight(OrganisationSize::Small, REGIONAL_SKILLS_FUND, 3),
        weight(OrganisationSize::Small, SKILLS_BOOTCAMPS, 2),
        weight(OrganisationSize::Micro, REGIONAL_SKILLS_FUND, 3),
        weight(OrganisationSize::Micro, SKILLS_BOOTCAMPS, 2),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::schema::Schema;

    #[test]
    fn standard_questionnaire_validates() {
        let schema = Schema::new(SchemaDefinition::standard()).expect("standard schema is valid");

        assert_eq!(schema.question_count(), 6);
        let order: Vec<&str> = schema
            .categories()
            .iter()
            .map(|category| category.id.as_str())
            .collect();
        assert_eq!(
            order,
            vec![
                APPRENTICESHIPS,
                SKILLS_BOOTCAMPS,
                REGIONAL_SKILLS_FUND,
                CAREERS_HUB,
                ADULT_SKILLS
            ]
        );
    }

    #[test]
    fn only_budget_question_is_optional() {
        let definition = SchemaDefinition::standard();
        let optional: Vec<QuestionId> = definition
            .questions
            .iter()
            .filter(|question| !question.required)
            .map(|question| question.id)
            .collect();
        assert_eq!(optional, vec![QuestionId(6)]);
    }

    #[test]
    fn region_exclusion_covers_every_restricted_programme() {
        let definition = SchemaDefinition::standard();
        let excluded = definition
            .adjustments
            .iter()
            .find_map(|rule| match rule {
                AdjustmentRule::HardExclusion { when, categories }
                    if *when == ContextFlag::Region(RegionStatus::OutsideRegion) =>
                {
                    Some(categories.clone())
                }
                _ => None,
            })
            .expect("outside-region exclusion present");

        for id in REGION_RESTRICTED {
            assert!(excluded.contains(&CategoryId::new(id)), "{id} not excluded");
        }
        assert!(!excluded.contains(&CategoryId::new(APPRENTICESHIPS)));
    }
}

use std::fmt;
use std::str::FromStr;

use chrono::{Local, NaiveDate};

use crate::errors::PlannerError;

/// Declares a fixed option set: the enum, its display labels in form order,
/// and label parsing.
macro_rules! option_set {
    ($(#[$meta:meta])* $name:ident, $field:literal { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];
            pub const FIELD: &'static str = $field;

            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = PlannerError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                find_option(Self::ALL, |o| o.label(), s).ok_or_else(|| PlannerError::UnknownOption {
                    field: $field,
                    value: s.to_string(),
                    expected: Self::ALL.iter().map(|o| o.label()).collect::<Vec<_>>().join(", "),
                })
            }
        }
    };
}

option_set!(Subject, "subject" {
    Reading => "Reading",
    Math => "Math",
    Science => "Science",
    SocialStudies => "Social Studies",
    LifeSkills => "Life Skills",
    Communication => "Communication",
    SocialSkills => "Social Skills",
    OccupationalTherapy => "Occupational Therapy",
    PhysicalEducation => "Physical Education",
});

option_set!(GradeLevel, "grade level" {
    PreK => "Pre-K",
    K2 => "K-2",
    G3To5 => "3-5",
    G6To8 => "6-8",
    G9To12 => "9-12",
    Transition => "Transition",
});

option_set!(LessonDuration, "duration" {
    Min30 => "30 minutes",
    Min45 => "45 minutes",
    Min60 => "60 minutes",
    Min90 => "90 minutes",
    Min120 => "120 minutes",
});

option_set!(Disability, "disability" {
    AutismSpectrumDisorder => "Autism Spectrum Disorder",
    IntellectualDisability => "Intellectual Disability",
    LearningDisability => "Learning Disability",
    Adhd => "ADHD",
    EmotionalBehavioralDisorder => "Emotional/Behavioral Disorder",
    SpeechLanguageImpairment => "Speech/Language Impairment",
    PhysicalDisability => "Physical Disability",
    HearingImpairment => "Hearing Impairment",
    VisualImpairment => "Visual Impairment",
    MultipleDisabilities => "Multiple Disabilities",
});

option_set!(Accommodation, "accommodation" {
    ExtendedTime => "Extended time",
    SmallGroupInstruction => "Small group instruction",
    OneOnOneSupport => "One-on-one support",
    VisualSupports => "Visual supports",
    ModifiedAssignments => "Modified assignments",
    AssistiveTechnology => "Assistive technology",
    SensoryBreaks => "Sensory breaks",
    PreferentialSeating => "Preferential seating",
    SimplifiedLanguage => "Simplified language",
    HandsOnActivities => "Hands-on activities",
    BehaviorSupportPlan => "Behavior support plan",
});

/// Case-insensitive label match. Durations also accept the bare minute count.
fn find_option<T: Copy>(all: &[T], label: impl Fn(&T) -> &'static str, raw: &str) -> Option<T> {
    let wanted = raw.trim();
    all.iter().copied().find(|o| {
        let l = label(o);
        l.eq_ignore_ascii_case(wanted) || l.strip_suffix(" minutes") == Some(wanted)
    })
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, PlannerError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| PlannerError::InvalidDate(raw.trim().to_string()))
}

/// Immutable snapshot of the form, taken at submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonRequest {
    subject: Subject,
    grade_level: GradeLevel,
    duration: LessonDuration,
    lesson_date: NaiveDate,
    disabilities: Vec<Disability>,
    accommodations: Vec<Accommodation>,
    objectives: String,
    materials: String,
}

impl LessonRequest {
    pub fn subject(&self) -> Subject {
        self.subject
    }

    pub fn grade_level(&self) -> GradeLevel {
        self.grade_level
    }

    pub fn duration(&self) -> LessonDuration {
        self.duration
    }

    pub fn lesson_date(&self) -> NaiveDate {
        self.lesson_date
    }

    pub fn disabilities(&self) -> &[Disability] {
        &self.disabilities
    }

    pub fn accommodations(&self) -> &[Accommodation] {
        &self.accommodations
    }

    pub fn objectives(&self) -> &str {
        &self.objectives
    }

    pub fn materials(&self) -> &str {
        &self.materials
    }
}

/// Form draft. Defaults mirror the form: first option of each select,
/// nothing ticked, blank text, today's date.
#[derive(Debug, Clone)]
pub struct LessonForm {
    pub subject: Subject,
    pub grade_level: GradeLevel,
    pub duration: LessonDuration,
    pub lesson_date: NaiveDate,
    pub disabilities: Vec<Disability>,
    pub accommodations: Vec<Accommodation>,
    pub objectives: String,
    pub materials: String,
}

impl Default for LessonForm {
    fn default() -> Self {
        Self::dated(Local::now().date_naive())
    }
}

impl LessonForm {
    pub fn dated(lesson_date: NaiveDate) -> Self {
        Self {
            subject: Subject::ALL[0],
            grade_level: GradeLevel::ALL[0],
            duration: LessonDuration::ALL[0],
            lesson_date,
            disabilities: Vec::new(),
            accommodations: Vec::new(),
            objectives: String::new(),
            materials: String::new(),
        }
    }

    pub fn subject(mut self, subject: Subject) -> Self {
        self.subject = subject;
        self
    }

    pub fn grade_level(mut self, grade_level: GradeLevel) -> Self {
        self.grade_level = grade_level;
        self
    }

    pub fn duration(mut self, duration: LessonDuration) -> Self {
        self.duration = duration;
        self
    }

    pub fn lesson_date(mut self, lesson_date: NaiveDate) -> Self {
        self.lesson_date = lesson_date;
        self
    }

    pub fn disabilities(mut self, disabilities: impl IntoIterator<Item = Disability>) -> Self {
        self.disabilities = disabilities.into_iter().collect();
        self
    }

    pub fn accommodations(mut self, accommodations: impl IntoIterator<Item = Accommodation>) -> Self {
        self.accommodations = accommodations.into_iter().collect();
        self
    }

    pub fn objectives(mut self, objectives: impl Into<String>) -> Self {
        self.objectives = objectives.into();
        self
    }

    pub fn materials(mut self, materials: impl Into<String>) -> Self {
        self.materials = materials.into();
        self
    }

    pub fn submit(self) -> LessonRequest {
        LessonRequest {
            subject: self.subject,
            grade_level: self.grade_level,
            duration: self.duration,
            lesson_date: self.lesson_date,
            disabilities: dedup_in_order(self.disabilities),
            accommodations: dedup_in_order(self.accommodations),
            objectives: self.objectives,
            materials: self.materials,
        }
    }
}

fn dedup_in_order<T: PartialEq>(items: Vec<T>) -> Vec<T> {
    let mut out: Vec<T> = Vec::with_capacity(items.len());
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_sets_have_the_form_sizes() {
        assert_eq!(Subject::ALL.len(), 9);
        assert_eq!(GradeLevel::ALL.len(), 6);
        assert_eq!(LessonDuration::ALL.len(), 5);
        assert_eq!(Disability::ALL.len(), 10);
        assert_eq!(Accommodation::ALL.len(), 11);
    }

    #[test]
    fn labels_parse_case_insensitively() {
        assert_eq!("social studies".parse::<Subject>().unwrap(), Subject::SocialStudies);
        assert_eq!("pre-k".parse::<GradeLevel>().unwrap(), GradeLevel::PreK);
        assert_eq!("adhd".parse::<Disability>().unwrap(), Disability::Adhd);
        assert_eq!(
            " Hands-on activities ".parse::<Accommodation>().unwrap(),
            Accommodation::HandsOnActivities
        );
    }

    #[test]
    fn duration_accepts_bare_minutes() {
        assert_eq!("45".parse::<LessonDuration>().unwrap(), LessonDuration::Min45);
        assert_eq!("120 minutes".parse::<LessonDuration>().unwrap(), LessonDuration::Min120);
    }

    #[test]
    fn unknown_option_lists_expected_labels() {
        let err = "Art".parse::<Subject>().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("unknown subject 'Art'"), "got: {msg}");
        assert!(msg.contains("Physical Education"), "got: {msg}");
    }

    #[test]
    fn parse_date_rejects_other_formats() {
        assert_eq!(parse_date("2024-01-15").unwrap(), NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert!(matches!(parse_date("01/15/2024"), Err(PlannerError::InvalidDate(_))));
    }

    #[test]
    fn default_form_uses_first_options_and_blank_fields() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let req = LessonForm::dated(date).submit();
        assert_eq!(req.subject(), Subject::Reading);
        assert_eq!(req.grade_level(), GradeLevel::PreK);
        assert_eq!(req.duration(), LessonDuration::Min30);
        assert_eq!(req.lesson_date(), date);
        assert!(req.disabilities().is_empty());
        assert!(req.accommodations().is_empty());
        assert_eq!(req.objectives(), "");
        assert_eq!(req.materials(), "");
    }

    #[test]
    fn submit_drops_duplicate_selections_keeping_order() {
        let req = LessonForm::default()
            .disabilities([Disability::VisualImpairment, Disability::Adhd, Disability::VisualImpairment])
            .accommodations([Accommodation::SensoryBreaks, Accommodation::SensoryBreaks])
            .submit();
        assert_eq!(req.disabilities(), &[Disability::VisualImpairment, Disability::Adhd]);
        assert_eq!(req.accommodations(), &[Accommodation::SensoryBreaks]);
    }
}

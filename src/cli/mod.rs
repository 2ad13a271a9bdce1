use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;

use crate::config::{Config, ProviderKind, Temperature};
use crate::form::{parse_date, Accommodation, Disability, GradeLevel, LessonDuration, LessonForm, Subject};
use crate::ux::OpenFields;

#[derive(Parser, Debug)]
#[command(
    name = "lesson-planner",
    version,
    about = "Special education lesson plan generator backed by a hosted language model"
)]
pub struct Args {
    /// Lesson subject, e.g. "Social Studies"
    #[arg(long)]
    pub subject: Option<Subject>,

    /// Grade level: Pre-K, K-2, 3-5, 6-8, 9-12 or Transition
    #[arg(long)]
    pub grade_level: Option<GradeLevel>,

    /// Lesson duration in minutes: 30, 45, 60, 90 or 120
    #[arg(long)]
    pub duration: Option<LessonDuration>,

    /// Lesson date (YYYY-MM-DD); defaults to today
    #[arg(long, value_parser = parse_date)]
    pub date: Option<NaiveDate>,

    /// Student disability; repeat for several
    #[arg(long = "disability")]
    pub disabilities: Vec<Disability>,

    /// Needed accommodation; repeat for several
    #[arg(long = "accommodation")]
    pub accommodations: Vec<Accommodation>,

    #[arg(long)]
    pub objectives: Option<String>,

    #[arg(long)]
    pub materials: Option<String>,

    #[arg(long, value_enum)]
    pub provider: Option<ProviderKind>,

    #[arg(long)]
    pub model: Option<String>,

    #[arg(long)]
    pub api_base: Option<String>,

    /// Creativity level, 0.0 to 1.0
    #[arg(long)]
    pub temperature: Option<Temperature>,

    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Environment variable holding the API key
    #[arg(long)]
    pub api_key_env: Option<String>,

    /// Directory the downloaded plan is written to
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Save the plan without asking
    #[arg(long, default_value_t = false)]
    pub save: bool,

    /// Never prompt; unset form fields take their defaults
    #[arg(long, default_value_t = false)]
    pub no_input: bool,

    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub log_level: Option<String>,

    #[arg(long, default_value_t = false)]
    pub debug: bool,
}

impl Args {
    /// The form with every field supplied on the command line filled in;
    /// the rest keep the form defaults.
    pub fn prefilled_form(&self) -> LessonForm {
        let mut form = LessonForm::default();
        if let Some(s) = self.subject {
            form.subject = s;
        }
        if let Some(g) = self.grade_level {
            form.grade_level = g;
        }
        if let Some(d) = self.duration {
            form.duration = d;
        }
        if let Some(d) = self.date {
            form.lesson_date = d;
        }
        form.disabilities = self.disabilities.clone();
        form.accommodations = self.accommodations.clone();
        if let Some(o) = &self.objectives {
            form.objectives = o.clone();
        }
        if let Some(m) = &self.materials {
            form.materials = m.clone();
        }
        form
    }

    /// Form fields not given on the command line.
    pub fn open_fields(&self) -> OpenFields {
        OpenFields {
            subject: self.subject.is_none(),
            grade_level: self.grade_level.is_none(),
            duration: self.duration.is_none(),
            lesson_date: self.date.is_none(),
            disabilities: self.disabilities.is_empty(),
            accommodations: self.accommodations.is_empty(),
            objectives: self.objectives.is_none(),
            materials: self.materials.is_none(),
        }
    }

    /// Flags win over the config file.
    pub fn apply_to(&self, cfg: &mut Config) {
        if let Some(p) = self.provider {
            if p != cfg.provider {
                cfg.model = None;
                cfg.api_base = None;
            }
            cfg.provider = p;
        }
        if let Some(m) = &self.model {
            cfg.model = Some(m.clone());
        }
        if let Some(b) = &self.api_base {
            cfg.api_base = Some(b.clone());
        }
        if let Some(t) = self.temperature {
            cfg.temperature = t;
        }
        if let Some(s) = self.timeout_secs {
            cfg.timeout_secs = s;
        }
        if let Some(e) = &self.api_key_env {
            cfg.api_key_env = e.clone();
        }
        if let Some(d) = &self.output_dir {
            cfg.output_dir = d.clone();
        }
        if let Some(l) = &self.log_level {
            cfg.log_level = Some(l.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_form_fields_from_flags() {
        let args = Args::try_parse_from([
            "lesson-planner",
            "--subject",
            "social studies",
            "--grade-level",
            "3-5",
            "--duration",
            "45",
            "--date",
            "2024-01-15",
            "--disability",
            "ADHD",
            "--disability",
            "Visual Impairment",
            "--accommodation",
            "Extended time",
        ])
        .unwrap();

        assert_eq!(args.subject, Some(Subject::SocialStudies));
        assert_eq!(args.grade_level, Some(GradeLevel::G3To5));
        assert_eq!(args.duration, Some(LessonDuration::Min45));
        assert_eq!(args.date, NaiveDate::from_ymd_opt(2024, 1, 15));
        assert_eq!(args.disabilities, vec![Disability::Adhd, Disability::VisualImpairment]);
        assert_eq!(args.accommodations, vec![Accommodation::ExtendedTime]);
    }

    #[test]
    fn prefilled_form_keeps_defaults_for_missing_flags() {
        let args = Args::try_parse_from(["lesson-planner", "--subject", "Math", "--objectives", "Count to 10"])
            .unwrap();
        let req = args.prefilled_form().submit();
        assert_eq!(req.subject(), Subject::Math);
        assert_eq!(req.grade_level(), GradeLevel::PreK);
        assert_eq!(req.duration(), LessonDuration::Min30);
        assert_eq!(req.objectives(), "Count to 10");
        assert_eq!(req.materials(), "");
        assert!(req.disabilities().is_empty());

        let open = args.open_fields();
        assert!(!open.subject && !open.objectives);
        assert!(open.grade_level && open.duration && open.lesson_date && open.materials);
        assert!(open.disabilities && open.accommodations);
    }

    #[test]
    fn rejects_out_of_range_temperature_and_unknown_options() {
        assert!(Args::try_parse_from(["lesson-planner", "--temperature", "1.2"]).is_err());
        assert!(Args::try_parse_from(["lesson-planner", "--subject", "Art"]).is_err());
        assert!(Args::try_parse_from(["lesson-planner", "--date", "15/01/2024"]).is_err());
    }

    #[test]
    fn flags_override_config() {
        let args = Args::try_parse_from([
            "lesson-planner",
            "--provider",
            "ollama",
            "--temperature",
            "0.3",
            "--output-dir",
            "out",
        ])
        .unwrap();
        let mut cfg = Config {
            model: Some("gemini-1.5-flash".into()),
            ..Config::default()
        };
        args.apply_to(&mut cfg);

        assert_eq!(cfg.provider, ProviderKind::Ollama);
        assert_eq!(cfg.model(), "llama3.1");
        assert_eq!(cfg.temperature.value(), 0.3);
        assert_eq!(cfg.output_dir, PathBuf::from("out"));
    }
}

use std::fmt::Display;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Result};
use chrono::NaiveDate;
use colored::Colorize;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use fs_err as fs;
use humansize::{format_size, DECIMAL};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;

use crate::config::{ApiKey, Temperature};
use crate::form::{parse_date, Accommodation, Disability, GradeLevel, LessonDuration, LessonForm, Subject};
use crate::wire::{DownloadArtifact, GenerationResult};

pub fn print_header() {
    println!("\n{}", "Special Education Lesson Plan Generator".bold());
    println!("Create customized lesson plans for special education students.");
    println!("Adjust the parameters to meet your students' unique needs.\n");
}

pub fn print_tips() {
    println!("{}", "Tips for Best Results".bold());
    println!("- Be specific about your students' needs and available resources");
    println!("- For complex needs, generate a plan first and then refine it with more details");
    println!("- Keep your API key in an environment variable rather than typing it each time");
    println!();
}

/// Line-oriented prompts over any reader/writer pair.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl Prompter<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{prompt} ")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            bail!("input closed");
        }
        Ok(line.trim_end_matches(&['\r', '\n'][..]).to_string())
    }

    pub fn confirm(&mut self, prompt: &str) -> Result<bool> {
        let ans = self.ask(&format!("{prompt} [y/N]:"))?.trim().to_lowercase();
        Ok(ans == "y" || ans == "yes")
    }

    /// Numbered single choice; Enter takes the first option.
    pub fn select_one<T: Copy + Display>(&mut self, label: &str, options: &[T]) -> Result<T> {
        writeln!(self.output, "{}", label.bold())?;
        for (i, o) in options.iter().enumerate() {
            writeln!(self.output, "  {:>2}. {}", i + 1, o)?;
        }
        loop {
            let raw = self.ask(&format!("Choose 1-{} [1]:", options.len()))?;
            match parse_choice(&raw, options.len()) {
                Some(i) => return Ok(options[i]),
                None => writeln!(self.output, "{}", "Please enter one of the listed numbers.".yellow())?,
            }
        }
    }

    /// Comma separated numbers; Enter selects nothing.
    pub fn select_many<T: Copy + Display>(&mut self, label: &str, options: &[T]) -> Result<Vec<T>> {
        writeln!(self.output, "{}", label.bold())?;
        for (i, o) in options.iter().enumerate() {
            writeln!(self.output, "  {:>2}. {}", i + 1, o)?;
        }
        loop {
            let raw = self.ask("Numbers separated by commas (Enter for none):")?;
            match parse_choices(&raw, options.len()) {
                Some(idx) => return Ok(idx.into_iter().map(|i| options[i]).collect()),
                None => writeln!(self.output, "{}", "Please enter listed numbers separated by commas.".yellow())?,
            }
        }
    }

    pub fn text(&mut self, label: &str, hint: &str) -> Result<String> {
        writeln!(self.output, "{}", label.bold())?;
        self.ask(&format!("({hint}):"))
    }

    pub fn date(&mut self, label: &str, default: NaiveDate) -> Result<NaiveDate> {
        loop {
            let raw = self.ask(&format!("{} [{}]:", label.bold(), default.format("%Y-%m-%d")))?;
            if raw.trim().is_empty() {
                return Ok(default);
            }
            match parse_date(&raw) {
                Ok(d) => return Ok(d),
                Err(e) => writeln!(self.output, "{}", e.to_string().yellow())?,
            }
        }
    }

    /// Enter keeps `current`; values outside `[0.0, 1.0]` are asked again.
    pub fn temperature(&mut self, current: Temperature) -> Result<Temperature> {
        loop {
            let raw = self.ask(&format!(
                "{} [{current}]:",
                "Creativity level (temperature, 0.0-1.0)".bold()
            ))?;
            if raw.trim().is_empty() {
                return Ok(current);
            }
            match raw.parse::<Temperature>() {
                Ok(t) => return Ok(t),
                Err(e) => writeln!(self.output, "{}", e.to_string().yellow())?,
            }
        }
    }

    /// Ask for every field of `form` the command line left open.
    pub fn fill_form(&mut self, mut form: LessonForm, open: &OpenFields) -> Result<LessonForm> {
        writeln!(self.output, "\n{}", "Lesson Details".underline())?;
        if open.subject {
            form.subject = self.select_one("Subject:", Subject::ALL)?;
        }
        if open.grade_level {
            form.grade_level = self.select_one("Grade Level:", GradeLevel::ALL)?;
        }
        if open.duration {
            form.duration = self.select_one("Lesson Duration:", LessonDuration::ALL)?;
        }
        if open.lesson_date {
            form.lesson_date = self.date("Lesson Date:", form.lesson_date)?;
        }

        writeln!(self.output, "\n{}", "Student Needs".underline())?;
        if open.disabilities {
            form.disabilities =
                self.select_many("Student Disabilities (select all that apply):", Disability::ALL)?;
        }
        if open.accommodations {
            form.accommodations = self.select_many("Common Accommodations Needed:", Accommodation::ALL)?;
        }

        writeln!(self.output, "\n{}", "Learning Objectives".underline())?;
        if open.objectives {
            form.objectives = self.text(
                "Specific Learning Objectives (leave blank for AI to suggest):",
                "Students will be able to...",
            )?;
        }
        if open.materials {
            form.materials = self.text(
                "Available Materials/Resources:",
                "books, technology, manipulatives, etc.",
            )?;
        }
        Ok(form)
    }

    /// Download step of a successful submission. Asks first unless
    /// `auto_save`; a failed write is reported and the session goes on.
    pub fn offer_download(
        &mut self,
        dir: &Path,
        artifact: &DownloadArtifact,
        auto_save: bool,
    ) -> Result<Option<PathBuf>> {
        if !auto_save && !self.confirm("Download lesson plan?")? {
            return Ok(None);
        }
        match save_artifact(dir, artifact) {
            Ok(path) => Ok(Some(path)),
            Err(e) => {
                warn!(error = %format!("{e:#}"), dir = %dir.display(), "saving lesson plan failed");
                writeln!(self.output, "{}", format!("Could not save lesson plan: {e:#}").red())?;
                Ok(None)
            }
        }
    }
}

/// Which form fields still need an answer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpenFields {
    pub subject: bool,
    pub grade_level: bool,
    pub duration: bool,
    pub lesson_date: bool,
    pub disabilities: bool,
    pub accommodations: bool,
    pub objectives: bool,
    pub materials: bool,
}

/// 1-based number to index; empty input picks the first option.
pub fn parse_choice(raw: &str, len: usize) -> Option<usize> {
    let raw = raw.trim();
    if raw.is_empty() {
        return (len > 0).then_some(0);
    }
    raw.parse::<usize>().ok().filter(|n| (1..=len).contains(n)).map(|n| n - 1)
}

/// Comma separated 1-based numbers to indices, duplicates dropped.
pub fn parse_choices(raw: &str, len: usize) -> Option<Vec<usize>> {
    let mut out = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let n: usize = part.parse().ok()?;
        if !(1..=len).contains(&n) {
            return None;
        }
        if !out.contains(&(n - 1)) {
            out.push(n - 1);
        }
    }
    Some(out)
}

/// Read the credential without echoing it.
pub fn read_secret(prompt: &str) -> Result<ApiKey> {
    print!("{prompt} ");
    io::stdout().flush()?;
    terminal::enable_raw_mode()?;
    let line = read_hidden_line();
    terminal::disable_raw_mode()?;
    println!();
    Ok(ApiKey::new(line?))
}

fn read_hidden_line() -> Result<String> {
    let mut buf = String::new();
    loop {
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind == KeyEventKind::Release {
            continue;
        }
        match key.code {
            KeyCode::Enter => return Ok(buf),
            KeyCode::Backspace => {
                buf.pop();
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                bail!("credential entry cancelled")
            }
            KeyCode::Char(c) => buf.push(c),
            _ => {}
        }
    }
}

pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

pub fn show_result(subject: Subject, grade: GradeLevel, result: &GenerationResult) {
    match result {
        GenerationResult::Success { text } => {
            println!("{}", "Lesson Plan Generated Successfully!".green().bold());
            println!("---");
            println!("{}\n", format!("{subject} Lesson Plan for {grade}").bold());
            println!("{text}");
            println!();
        }
        GenerationResult::Failure { message } => {
            println!("{}", message.red());
        }
    }
}

/// Write the artifact into `dir` under its suggested name.
pub fn save_artifact(dir: &Path, artifact: &DownloadArtifact) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(&artifact.file_name);
    fs::write(&path, &artifact.content)?;
    println!(
        "Saved {} ({}, {})",
        path.display().to_string().bold(),
        artifact.mime,
        format_size(artifact.content.len(), DECIMAL)
    );
    Ok(path)
}

//! The `hrplatform quiz` command: an interactive quiz on stdin/stdout.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use comfy_table::{Cell, Table};
use rand::rngs::StdRng;
use rand::SeedableRng;

use hrplatform_core::model::Language;
use hrplatform_core::progress::{FileStore, Preferences, ProgressStore};
use hrplatform_core::quiz::{Quiz, QuizResults, QuizSetup};
use hrplatform_core::tracker::TimeTracker;

use super::{load_config, load_data, ConsoleNotifier};

enum Input {
    Choice(usize),
    Skip,
    Quit,
}

fn read_input(lines: &mut impl Iterator<Item = io::Result<String>>, options: usize) -> Result<Input> {
    loop {
        print!("Answer [1-{options}], s to skip, q to quit: ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            return Ok(Input::Quit);
        };
        let line = line?;
        match line.trim() {
            "s" | "S" => return Ok(Input::Skip),
            "q" | "Q" => return Ok(Input::Quit),
            other => match other.parse::<usize>() {
                Ok(n) if (1..=options).contains(&n) => return Ok(Input::Choice(n - 1)),
                _ => println!("Please enter a number between 1 and {options}."),
            },
        }
    }
}

pub async fn execute(
    config_path: Option<PathBuf>,
    data_dir: Option<PathBuf>,
    category: String,
    difficulty: String,
    count: usize,
    lang: Option<String>,
    seed: Option<u64>,
) -> Result<()> {
    let config = load_config(config_path.as_deref(), data_dir)?;
    let data = load_data(&config).await?;

    let store = Arc::new(FileStore::new(config.progress_file.clone()));
    let language = match lang {
        Some(lang) => lang.parse::<Language>().map_err(|e| anyhow!(e))?,
        None => Preferences::new(store.clone())
            .language()
            .unwrap_or(config.default_language),
    };

    let mut progress = ProgressStore::new(store);
    progress.load();
    let progress = Arc::new(Mutex::new(progress));
    let tracker = TimeTracker::spawn(progress.clone());

    let setup = QuizSetup {
        category,
        difficulty,
        count: (count > 0).then_some(count),
    };
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut quiz = Quiz::new();
    if !quiz.start(&data.quiz_questions, &setup, &mut rng, &ConsoleNotifier) {
        tracker.stop();
        return Ok(());
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let results = run_session(&mut quiz, &progress, &mut lines, language)?;
    tracker.stop();

    let Some(results) = results else {
        println!("\nQuiz abandoned.");
        return Ok(());
    };

    println!("\nQuiz complete: {} / {} ({}%)", results.score, results.total, results.percentage);
    println!("{}", results.message);

    if let Some(session) = quiz.session() {
        let mut table = Table::new();
        table.set_header(vec!["#", "Question", "Your answer", "Correct answer"]);
        for item in session.review(language) {
            table.add_row(vec![
                Cell::new(item.number),
                Cell::new(&item.question),
                Cell::new(item.your_answer.as_deref().unwrap_or("Skipped")),
                Cell::new(item.correct_answer.as_deref().unwrap_or(if item.correct {
                    "✓"
                } else {
                    "-"
                })),
            ]);
        }
        println!("{table}");
    }

    if let Ok(store) = progress.lock() {
        store.save();
    }
    Ok(())
}

fn run_session(
    quiz: &mut Quiz,
    progress: &Mutex<ProgressStore>,
    lines: &mut impl Iterator<Item = io::Result<String>>,
    language: Language,
) -> Result<Option<QuizResults>> {
    loop {
        let session = quiz.session().ok_or_else(|| anyhow!("quiz is not running"))?;
        let Some(question) = session.current_question().cloned() else {
            return Ok(None);
        };
        let options = question.option_labels(language);

        println!("\n{}", session.progress_label());
        println!("{} • {}", question.category.replacen('-', " ", 1), question.difficulty);
        println!("{}", question.text(language));
        for (i, option) in options.iter().enumerate() {
            println!("  {}. {option}", i + 1);
        }

        let step = match read_input(lines, options.len())? {
            Input::Quit => return Ok(None),
            Input::Skip => {
                let mut store = progress.lock().map_err(|_| anyhow!("progress store poisoned"))?;
                quiz.skip(&mut store)?
            }
            Input::Choice(choice) => {
                let feedback = quiz.answer(choice)?;
                if feedback.correct {
                    println!("Correct! {}", question.explanation_text(language));
                } else {
                    let right = options
                        .get(feedback.correct_choice)
                        .map(String::as_str)
                        .unwrap_or("N/A");
                    println!("Incorrect. The answer is: {right}");
                    println!("{}", question.explanation_text(language));
                }
                if let Some(tip) = &question.exam_tip {
                    println!("Exam tip: {tip}");
                }
                let mut store = progress.lock().map_err(|_| anyhow!("progress store poisoned"))?;
                quiz.next(&mut store)?
            }
        };
        if let Some(results) = step {
            return Ok(Some(results));
        }
    }
}

//! Line-oriented interactive loop.
//!
//! Rendering and input parsing only; every state change goes through a
//! [`Session`] transition.

use anyhow::Result;
use std::io::{self, BufRead as _, Write as _};

use sage_core::{Role, TextGenerator};
use sage_engine::{GradeOutcome, Mode, Session};
use sage_index::{EmbeddingProvider, SemanticIndex};

/// Runs the interactive loop until the user quits.
pub async fn run<E, G>(
    session: &mut Session,
    index: &SemanticIndex<E>,
    generator: &G,
    flashcard_count: usize,
) -> Result<()>
where
    E: EmbeddingProvider,
    G: TextGenerator,
{
    println!("sage - ask the knowledge base, or quiz yourself on it");
    println!("Corpus loaded: {} chunks\n", index.len());

    loop {
        match session.mode() {
            Mode::Menu => {
                if !menu_round(session)? {
                    return Ok(());
                }
            }
            Mode::Chat => chat_round(session, index, generator).await?,
            Mode::Flashcards => flashcard_round(session, index, generator, flashcard_count).await?,
        }
    }
}

/// One menu interaction. Returns `false` when the user quits.
fn menu_round(session: &mut Session) -> Result<bool> {
    print_score(session);
    println!("[1] chat  [2] flashcards  [q] quit");

    let Some(line) = read_line("menu> ")? else {
        return Ok(false);
    };

    match line.as_str() {
        "1" => session.select_chat(),
        "2" => session.select_flashcards(),
        "q" => return Ok(false),
        "" => {}
        other => println!("Unknown choice: {other}"),
    }

    Ok(true)
}

/// One chat interaction.
async fn chat_round<E, G>(
    session: &mut Session,
    index: &SemanticIndex<E>,
    generator: &G,
) -> Result<()>
where
    E: EmbeddingProvider,
    G: TextGenerator,
{
    let Some(line) = read_line("chat (/back, /reset)> ")? else {
        session.back_to_menu();
        return Ok(());
    };

    match line.as_str() {
        "/back" => session.back_to_menu(),
        "/reset" => {
            session.reset_history();
            println!("Chat history cleared.");
        }
        "/history" => {
            for message in session.transcript() {
                let speaker = match message.role {
                    Role::User => "you",
                    Role::Assistant => "sage",
                };
                println!("{speaker}: {}", message.content);
            }
        }
        "" => {}
        query => {
            let reply = session.submit(query, index, generator).await;
            println!("\n{reply}\n");
        }
    }

    Ok(())
}

/// One flashcard interaction.
async fn flashcard_round<E, G>(
    session: &mut Session,
    index: &SemanticIndex<E>,
    generator: &G,
    flashcard_count: usize,
) -> Result<()>
where
    E: EmbeddingProvider,
    G: TextGenerator,
{
    render_card(session);
    println!(
        "[g] new deck  [s] show answer  [y/n] grade  [<] prev  [>] next  [r] reset score  [b] back"
    );

    let Some(line) = read_line("cards> ")? else {
        session.back_to_menu();
        return Ok(());
    };

    match line.as_str() {
        "g" => {
            println!("Generating {flashcard_count} flashcards...");
            if let Some(notice) = session
                .regenerate_deck(flashcard_count, index, generator)
                .await
            {
                println!("{notice}");
            } else {
                println!("Generated {} flashcards.", session.deck().len());
            }
        }
        "s" => session.reveal(),
        "y" | "n" => match session.grade(line == "y") {
            Some(GradeOutcome::Advanced) => {}
            Some(GradeOutcome::DeckExhausted) => {
                println!("You have completed all flashcards in this deck!");
            }
            None => println!("Generate a deck first."),
        },
        "<" => session.prev_card(),
        ">" => session.next_card(),
        "r" => session.reset_score(),
        "b" => session.back_to_menu(),
        "" => {}
        other => println!("Unknown choice: {other}"),
    }

    Ok(())
}

/// Renders the current card, score, and progress.
fn render_card(session: &Session) {
    print_score(session);

    let Some(card) = session.current_card() else {
        println!("No deck yet. Generate one to get started.");
        return;
    };

    println!("Card {}/{}", session.cursor() + 1, session.deck().len());
    println!("Q: {}", card.question);
    if session.revealed() {
        println!("A: {}", card.answer);
    }
}

/// Prints the score line when any card has been graded.
fn print_score(session: &Session) {
    let score = session.score();
    if let Some(accuracy) = score.accuracy() {
        println!("Score: {}/{} ({accuracy}%)", score.correct, score.total);
    }
}

/// Reads one trimmed line from stdin; `None` on EOF.
fn read_line(prompt: &str) -> Result<Option<String>> {
    print!("{prompt}");
    io::stdout().flush()?;

    let mut line = String::new();
    let bytes = io::stdin().lock().read_line(&mut line)?;
    if bytes == 0 {
        return Ok(None);
    }

    Ok(Some(line.trim().to_owned()))
}

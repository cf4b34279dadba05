use crate::advisor::CommandAdvisor;
use crate::api::server as api_server;
use crate::cli::opts::*;
use crate::paths::default_deck_file;
use crate::store::{Deck, DeckStore};

use anyhow::{anyhow, bail, Result};
use chrono::Utc;
use recall_core::{
    cloze, daily_streak, filter_by_text, grade_answer, hints, is_equivalent, select_for_session,
    summarize, AdaptiveScheduler, AdvisorConfig, Difficulty, ItemKind, LocationContext,
    LocationRotation, Quality, ReviewItem, SelectionOptions, SystemClock, Verdict,
};
use std::io::{stdin, stdout, BufRead, BufReader, Write};
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

pub async fn run_cli(args: Cli) -> Result<()> {
    let store = DeckStore::new(args.deck.clone().unwrap_or_else(default_deck_file));
    tracing::debug!(deck = %store.path().display(), "using deck");

    match args.cmd.clone() {
        Command::Item(cmd) => item_cmd(&store, cmd).await,
        Command::Session(cmd) => session_cmd(&store, build_scheduler(&args), cmd).await,
        Command::Check { expected, actual } => {
            check_cmd(&expected, &actual);
            Ok(())
        }
        Command::Cloze { markup } => {
            cloze_cmd(&markup);
            Ok(())
        }
        Command::Stats => stats_cmd(&store).await,
        Command::Api(api) => {
            let addr: std::net::SocketAddr = api.addr.parse()?;
            api_server::run(store, build_scheduler(&args), addr).await
        }
    }
}

pub fn build_scheduler(args: &Cli) -> AdaptiveScheduler {
    let config = AdvisorConfig {
        timeout: Some(Duration::from_millis(args.advisor_timeout_ms)),
        ..AdvisorConfig::default()
    };
    let scheduler = AdaptiveScheduler::new(Arc::new(SystemClock)).with_config(config);
    match args.advisor_cmd.as_deref().and_then(CommandAdvisor::parse) {
        Some(advisor) => {
            tracing::info!(command = ?args.advisor_cmd, "advisor enabled");
            scheduler.with_advisor(Arc::new(advisor))
        }
        None => scheduler,
    }
}

async fn item_cmd(store: &DeckStore, cmd: ItemCmd) -> Result<()> {
    let mut deck = store.load().await?;
    match cmd {
        ItemCmd::Add(a) => {
            let kind = ItemKind::from(a.kind);
            match kind {
                ItemKind::Cloze => {
                    if cloze::process(&a.prompt).blanks.is_empty() {
                        bail!("cloze prompt has no {{{{cN::answer}}}} blanks");
                    }
                }
                _ if a.answer.is_none() => bail!("--answer is required for {:?} items", a.kind),
                _ => {}
            }
            let difficulty = Difficulty::new(a.difficulty)?;
            let item = ReviewItem::new(kind, a.prompt, a.answer).with_difficulty(difficulty);
            println!("{}", item.id);
            deck.items.push(item);
            store.save(&mut deck).await?;
        }
        ItemCmd::List { query } => {
            let now = Utc::now();
            let mut items = match query {
                Some(q) => filter_by_text(&deck.items, &q),
                None => deck.items.clone(),
            };
            items.sort_by_key(|i| i.created_at);
            for i in items {
                println!(
                    "{}\t{:?}\t{:?}\tinterval={}d\tease={:.2}\tdifficulty={}\t{}",
                    i.id,
                    i.kind,
                    i.due_status(now),
                    i.interval,
                    i.ease_factor,
                    i.difficulty.value(),
                    i.prompt
                );
            }
        }
        ItemCmd::Rm { item_id } => {
            let id = parse_uuid(&item_id)?;
            if !deck.remove_item(id) {
                bail!("item not found: {item_id}");
            }
            store.save(&mut deck).await?;
            println!("ok");
        }
    }
    Ok(())
}

async fn session_cmd(store: &DeckStore, scheduler: AdaptiveScheduler, cmd: SessionCmd) -> Result<()> {
    let mut deck = store.load().await?;
    let stats = deck.stats();
    let now = scheduler.clock().now();

    let options = SelectionOptions {
        limit: cmd.limit,
        prioritize_hard: cmd.prioritize_hard,
        due_only: cmd.due_only,
    };
    let rotation = cmd
        .location
        .as_ref()
        .map(|loc| LocationRotation::new(loc.clone(), stats.last_reviewed_at(loc)));
    let location_ctx = cmd.location.as_ref().map(|loc| {
        stats.location_context(loc).unwrap_or(LocationContext {
            name: loc.clone(),
            average_performance: 0.0,
            session_count: 0,
        })
    });

    let queue = select_for_session(deck.items.clone(), now, &options, rotation.as_ref());
    if queue.is_empty() {
        println!("no items to review");
        return Ok(());
    }

    let total = queue.len();
    let mut input = BufReader::new(stdin());
    let mut session_records = Vec::new();
    for (n, item) in queue.into_iter().enumerate() {
        println!("\n[{}/{}] {}", n + 1, total, item.id);
        let started = Instant::now();
        let Some(answers) = ask_answers(&item, &mut input)? else {
            break;
        };
        let elapsed_ms = started.elapsed().as_millis() as u64;

        let suggested = match grade_answer(&item, &answers) {
            Ok(verdict) => {
                report_verdict(&item, verdict);
                verdict.suggested_quality()
            }
            Err(e) => {
                tracing::warn!(item = %item.id, error = %e, "cannot grade item");
                Quality::FAILED
            }
        };

        let Some(quality) = ask_quality(suggested, &mut input)? else {
            break;
        };
        let result = scheduler
            .schedule_with_source(item, quality, elapsed_ms, &stats, location_ctx.as_ref())
            .await;
        stats.record(&result.record);
        deck.apply(&result);
        store.save(&mut deck).await?;
        println!("→ next review in {} day(s)", result.next_review_days);
        session_records.push(result.record);
    }

    if let Some(loc) = &cmd.location {
        stats.finish_session(loc, &session_records);
        deck.locations = stats.location_performance().into_iter().collect();
        store.save(&mut deck).await?;
    }
    println!("\nreviewed {}", session_records.len());
    Ok(())
}

/// Reads the user's answers for one item. `None` means quit.
fn ask_answers(item: &ReviewItem, input: &mut impl BufRead) -> Result<Option<Vec<String>>> {
    match item.kind {
        ItemKind::Cloze => {
            let rendered = cloze::process(&item.prompt);
            println!("Q: {}", rendered.text);
            let mut answers = Vec::with_capacity(rendered.blanks.len());
            for b in &rendered.blanks {
                if let Some(h) = &b.hint {
                    println!("  [{}] hint: {}", b.id, h);
                }
                let Some(line) = read_line(input, &format!("  [{}]> ", b.id))? else {
                    return Ok(None);
                };
                if line.trim() == ":q" {
                    return Ok(None);
                }
                answers.push(line.trim().to_string());
            }
            Ok(Some(answers))
        }
        _ => {
            println!("Q: {}", item.prompt);
            let Some(line) = read_line(input, "answer (:q to quit)> ")? else {
                return Ok(None);
            };
            if line.trim() == ":q" {
                return Ok(None);
            }
            Ok(Some(vec![line.trim().to_string()]))
        }
    }
}

fn report_verdict(item: &ReviewItem, verdict: Verdict) {
    let expected = match item.kind {
        ItemKind::Cloze => cloze::process(&item.prompt)
            .blanks
            .iter()
            .map(|b| b.correct_answer.clone())
            .collect::<Vec<_>>()
            .join(", "),
        _ => item.answer.clone().unwrap_or_default(),
    };
    match verdict {
        Verdict::Exact => println!("correct"),
        Verdict::Close => println!("close enough: {expected}"),
        Verdict::Incorrect => println!("incorrect, expected: {expected}"),
    }
}

/// `None` means quit.
fn ask_quality(suggested: Quality, input: &mut impl BufRead) -> Result<Option<Quality>> {
    loop {
        let Some(line) = read_line(input, &format!("quality 0-5 [enter={suggested}, q=quit]> "))?
        else {
            return Ok(None);
        };
        let s = line.trim();
        if s.is_empty() {
            return Ok(Some(suggested));
        }
        if s.eq_ignore_ascii_case("q") {
            return Ok(None);
        }
        match s.parse::<i64>().map_err(|_| ()).and_then(|n| Quality::new(n).map_err(|_| ())) {
            Ok(q) => return Ok(Some(q)),
            Err(()) => println!("enter a number from 0 to 5, or q"),
        }
    }
}

fn check_cmd(expected: &str, actual: &str) {
    let ok = is_equivalent(expected, actual);
    println!("{}", if ok { "equivalent" } else { "different" });
    if !ok {
        for h in hints(expected) {
            println!("hint: {h}");
        }
    }
}

fn cloze_cmd(markup: &str) {
    let rendered = cloze::process(markup);
    println!("{}", rendered.text);
    for b in &rendered.blanks {
        let mut line = format!("c{}\t{}..{}\t{}", b.id, b.start, b.end, b.correct_answer);
        if !b.alternatives.is_empty() {
            line.push_str(&format!(" ({})", b.alternatives.join(" | ")));
        }
        if let Some(h) = &b.hint {
            line.push_str(&format!("\thint={h}"));
        }
        println!("{line}");
        for h in hints(&b.correct_answer) {
            println!("\t- {h}");
        }
    }
}

async fn stats_cmd(store: &DeckStore) -> Result<()> {
    let deck: Deck = store.load().await?;
    let summary = summarize(&deck.records);
    println!("items\t{}", deck.items.len());
    println!("reviews\t{}", summary.totals.total);
    println!("accuracy\t{:.1}%", summary.totals.accuracy() * 100.0);
    println!(
        "avg response\t{:.0}ms",
        summary.totals.average_response_time_ms()
    );
    println!("streak\t{} day(s)", daily_streak(&deck.records, Utc::now().date_naive()));
    for ctx in deck.stats().locations() {
        println!(
            "location\t{}\t{:.0}%\t{} session(s)",
            ctx.name, ctx.average_performance, ctx.session_count
        );
    }
    Ok(())
}

// ===== Helpers =====
fn parse_uuid(s: &str) -> Result<Uuid> {
    Uuid::parse_str(s).map_err(|_| anyhow!("invalid uuid"))
}

/// `None` at end of input.
fn read_line(input: &mut impl BufRead, prompt: &str) -> Result<Option<String>> {
    print!("{prompt}");
    stdout().flush().ok();
    let mut s = String::new();
    if input.read_line(&mut s)? == 0 {
        println!();
        return Ok(None);
    }
    Ok(Some(s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn free_text() -> ReviewItem {
        ReviewItem::new(ItemKind::FreeText, "perro", Some("dog".into()))
    }

    #[test]
    fn closed_input_quits_instead_of_grading() {
        let mut empty = Cursor::new(Vec::<u8>::new());
        assert!(ask_answers(&free_text(), &mut empty).unwrap().is_none());
        assert!(ask_quality(Quality::FAILED, &mut empty).unwrap().is_none());

        let cloze = ReviewItem::new(ItemKind::Cloze, "{{c1::Paris}} and {{c2::Rome}}", None);
        let mut one_line = Cursor::new(b"paris\n".to_vec());
        assert!(ask_answers(&cloze, &mut one_line).unwrap().is_none());
    }

    #[test]
    fn quality_prompt_keeps_blank_line_as_suggestion() {
        let mut input = Cursor::new(b"\n".to_vec());
        assert_eq!(ask_quality(Quality::HESITANT, &mut input).unwrap(), Some(Quality::HESITANT));

        let mut input = Cursor::new(b"7\nabc\n2\n".to_vec());
        assert_eq!(ask_quality(Quality::PERFECT, &mut input).unwrap().map(|q| q.value()), Some(2));

        // input ends after rejected entries
        let mut input = Cursor::new(b"9\n".to_vec());
        assert!(ask_quality(Quality::PERFECT, &mut input).unwrap().is_none());
    }

    #[test]
    fn answers_are_trimmed_and_quit_is_honoured() {
        let mut input = Cursor::new(b"  dog \n".to_vec());
        assert_eq!(ask_answers(&free_text(), &mut input).unwrap(), Some(vec!["dog".to_string()]));

        let mut input = Cursor::new(b":q\n".to_vec());
        assert!(ask_answers(&free_text(), &mut input).unwrap().is_none());
    }
}

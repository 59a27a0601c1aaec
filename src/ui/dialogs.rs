use super::progress::render_bar;
use super::terminal::HackerTerminal;
use super::{emit, emit_line};
use colored::Colorize;
use std::io::{BufRead, Write};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// "Security Advisory" consent prompt; `true` means proceed
pub fn advisory_prompt<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> bool {
    emit_line(out, &format!("{}", "[!] Security Advisory".green().bold()));
    emit_line(
        out,
        &format!(
            "{}",
            "This interface simulates a security diagnostics console. By proceeding you consent to display of your device metadata on-screen."
                .green()
                .dimmed()
        ),
    );
    emit(out, &format!("{} ", "Proceed? [Y/n]".green()));

    let mut answer = String::new();
    match input.read_line(&mut answer) {
        Ok(0) | Err(_) => false,
        Ok(_) => {
            let answer = answer.trim().to_ascii_lowercase();
            !(answer == "n" || answer == "no")
        }
    }
}

/// Script typed by the injection dialog
pub fn injection_lines(handle: &str) -> Vec<String> {
    vec![
        "> establishing reverse channel...".to_string(),
        "> packing diagnostics bundle...".to_string(),
        "> injecting payload into session...".to_string(),
        format!("> handing off to @{}", handle),
        "> done.".to_string(),
    ]
}

/// Final "injection" dialog shown once after a completed run
pub async fn injection_dialog<W: Write>(
    out: &mut W,
    handle: &str,
    reduced_motion: bool,
    cancel: &CancellationToken,
) {
    emit_line(out, "");
    emit_line(out, &format!("{}", "[!!] Malware Injection In Progress".red().bold()));

    let terminal = HackerTerminal::new(injection_lines(handle));
    if reduced_motion {
        terminal.print_all(out);
        emit_line(out, &format!("{}", render_bar(100, 32).red()));
    } else {
        if !terminal.play(out, cancel).await {
            return;
        }
        for pct in (0..=100).step_by(5) {
            if cancel.is_cancelled() {
                return;
            }
            emit(out, &format!("\r{}", render_bar(pct, 32).red()));
            tokio::time::sleep(Duration::from_millis(40)).await;
        }
        emit(out, "\n");
    }

    emit_line(
        out,
        &format!(
            "{} {}",
            "Follow".dimmed(),
            format!("@{}", handle).green().bold()
        ),
    );
    emit_line(
        out,
        &format!(
            "{}",
            "Visual simulation for aesthetic purposes. No harmful actions are performed.".dimmed()
        ),
    );
}

//! Read-only terminal rendering of analysis feedback.
//!
//! Mirrors the sections of the feedback payload: score cards, transcription,
//! critique, STAR breakdown, strengths and improvements, and hesitation
//! details. Scores are clamped for display only; the stored values stay as
//! received.

use crate::analysis::Feedback;
use console::style;

const BAR_WIDTH: usize = 20;

/// Prints the full feedback report for an analyzed answer.
pub fn render_feedback(question: &str, feedback: &Feedback) {
    println!();
    println!("{}", style("Your Feedback").bold().underlined());
    println!("{}", style(question).dim());
    println!();

    print_score("Confidence", feedback.confidence_score.score);
    print_score("Clarity   ", feedback.confidence_score.clarity);
    print_score("Overall   ", feedback.overall_rating);
    println!();

    println!("{}", style("Transcription").bold());
    println!("  {}", feedback.transcription);
    println!();

    println!("{}", style("Critique").bold());
    println!("  {}", feedback.critique);
    println!();

    println!("{}", style("STAR breakdown").bold());
    println!("  {} {}", style("Situation:").cyan(), feedback.star_analysis.situation);
    println!("  {} {}", style("Task:     ").cyan(), feedback.star_analysis.task);
    println!("  {} {}", style("Action:   ").cyan(), feedback.star_analysis.action);
    println!("  {} {}", style("Result:   ").cyan(), feedback.star_analysis.result);
    println!();

    if !feedback.strengths.is_empty() {
        println!("{}", style("Strengths").bold().green());
        for strength in &feedback.strengths {
            println!("  {} {}", style("✓").green(), strength);
        }
        println!();
    }

    if !feedback.improvements.is_empty() {
        println!("{}", style("Areas to improve").bold().yellow());
        for improvement in &feedback.improvements {
            println!("  {} {}", style("→").yellow(), improvement);
        }
        println!();
    }

    if !feedback.confidence_score.hesitation_details.is_empty() {
        println!(
            "{}",
            style(format!(
                "Hesitation words ({} detected)",
                feedback.confidence_score.hesitation_words
            ))
            .bold()
        );
        println!(
            "  {}",
            feedback.confidence_score.hesitation_details.join(", ")
        );
        println!();
    }
}

/// Prints one labelled score line with a 0-10 bar.
fn print_score(label: &str, value: f64) {
    println!(
        "  {}  {} {}",
        style(label).bold(),
        score_bar(value),
        style(format!("{:.1}/10", value)).bold()
    );
}

/// Builds the bar for a 0-10 score. Out-of-range values are clamped for
/// display only.
fn score_bar(value: f64) -> String {
    let clamped = value.clamp(0.0, 10.0);
    let filled = ((clamped / 10.0) * BAR_WIDTH as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_bar_clamps_out_of_range_values() {
        assert_eq!(score_bar(-3.0), "░".repeat(BAR_WIDTH));
        assert_eq!(score_bar(25.0), "█".repeat(BAR_WIDTH));
    }

    #[test]
    fn test_score_bar_is_proportional() {
        let half = score_bar(5.0);
        assert_eq!(half.chars().filter(|&c| c == '█').count(), BAR_WIDTH / 2);
        assert_eq!(half.chars().count(), BAR_WIDTH);
    }
}

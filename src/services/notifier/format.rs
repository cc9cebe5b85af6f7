//! Markdown rendering of signals and message splitting

use chrono::Utc;

use crate::models::signal::{BatchReport, Decision, Signal, SignalOutcome};
use crate::models::Timeframe;

/// Telegram rejects bodies over 4096 characters; keep a margin.
pub const MAX_MESSAGE_LEN: usize = 4000;

const RISK_WARNING: &str = "⚠️ *RISK WARNING*\n\
• Crypto trading involves high risk\n\
• Only invest what you can afford to lose\n\
• Past performance does not guarantee future results\n\
• Always do your own research (DYOR)";

fn decision_emoji(decision: Decision) -> &'static str {
    match decision {
        Decision::Buy => "🟢",
        Decision::Sell => "🔴",
        Decision::Hold => "🟡",
    }
}

fn fmt_opt(value: Option<f64>, decimals: usize) -> String {
    value
        .map(|v| format!("{:.*}", decimals, v))
        .unwrap_or_else(|| "N/A".to_string())
}

fn pct_from_entry(entry: f64, level: f64) -> f64 {
    if entry == 0.0 {
        0.0
    } else {
        (level - entry) / entry * 100.0
    }
}

/// Single-signal alert.
pub fn format_signal_alert(signal: &Signal) -> String {
    let mut message = format!(
        "🚨 *Crypto Signal Alert*\n\
         Pair: `{}` ({})\n\
         Signal: {} *{}*\n\
         Entry Price: `${:.6}`\n\
         Confidence: `{:.2}`\n",
        signal.symbol,
        signal.timeframe,
        decision_emoji(signal.decision),
        signal.decision,
        signal.entry_price,
        signal.confidence,
    );
    if let Some(accuracy) = signal.accuracy {
        message.push_str(&format!("Backtest Accuracy: `{:.1}%`\n", accuracy));
    }

    let ind = &signal.indicators;
    message.push_str(&format!(
        "\n📊 *Technical Analysis:*\nRSI: `{}` | EMA fast: `{}` | EMA slow: `{}` | ATR: `{}`\n",
        fmt_opt(ind.rsi, 1),
        fmt_opt(ind.ema_fast, 2),
        fmt_opt(ind.ema_slow, 2),
        fmt_opt(ind.atr, 4),
    ));

    if !signal.reasons.is_empty() {
        message.push_str(&format!("Reasons: {}\n", signal.reasons.join(", ")));
    }

    if let (Some(tp), Some(sl)) = (signal.take_profit, signal.stop_loss) {
        let side = if signal.decision == Decision::Buy {
            "Long"
        } else {
            "Short"
        };
        message.push_str(&format!(
            "\n💰 *{} Position Setup:*\nTake Profit: `${:.6}` ({:+.2}%)\nStop Loss: `${:.6}` ({:+.2}%)\n",
            side,
            tp,
            pct_from_entry(signal.entry_price, tp),
            sl,
            pct_from_entry(signal.entry_price, sl),
        ));
    }

    message.push_str(&format!(
        "\n🕐 Time: `{}`\n\n{}",
        signal.timestamp.format("%H:%M:%S"),
        RISK_WARNING
    ));
    message
}

/// Digest of one batch run: actionable signals, then skipped and errored symbols.
pub fn format_batch_summary(report: &BatchReport, timeframe: Timeframe) -> String {
    let actionable: Vec<&Signal> = report.actionable().collect();
    let mut lines = vec![
        format!("📈 *Auto Signals* ({})", timeframe),
        format!(
            "Analyzed: {} | Actionable: {} | Skipped: {} | Errors: {}",
            report.signals.len() + report.skipped.len() + report.errors.len(),
            actionable.len(),
            report.skipped.len(),
            report.errors.len()
        ),
        String::new(),
    ];

    for signal in &actionable {
        lines.push(format!(
            "{} *{}* `{}` @ `{:.6}` TP `{}` SL `{}` ({:.2})",
            decision_emoji(signal.decision),
            signal.decision,
            signal.symbol,
            signal.entry_price,
            fmt_opt(signal.take_profit, 6),
            fmt_opt(signal.stop_loss, 6),
            signal.confidence,
        ));
    }
    if actionable.is_empty() {
        lines.push("No actionable signals this run.".to_string());
    }

    if !report.skipped.is_empty() {
        lines.push(String::new());
        lines.push("⏭ *Skipped:*".to_string());
        for outcome in &report.skipped {
            if let SignalOutcome::Skipped {
                symbol, accuracy, ..
            } = outcome
            {
                lines.push(format!("`{}` accuracy {:.1}%", symbol, accuracy));
            }
        }
    }

    if !report.errors.is_empty() {
        lines.push(String::new());
        lines.push("❌ *Errors:*".to_string());
        for outcome in &report.errors {
            if let SignalOutcome::Failed { symbol, error } = outcome {
                lines.push(format!("`{}` {}", symbol, error));
            }
        }
    }

    lines.push(String::new());
    lines.push(format!("🕐 `{}` UTC", Utc::now().format("%H:%M:%S")));
    lines.join("\n")
}

/// Split `text` into chunks of at most `max_len` characters along line
/// boundaries. A single line longer than `max_len` is cut into pieces.
pub fn split_message(text: &str, max_len: usize) -> Vec<String> {
    let max_len = max_len.max(1);
    if text.chars().count() <= max_len {
        return if text.trim().is_empty() {
            Vec::new()
        } else {
            vec![text.to_string()]
        };
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for line in text.lines() {
        for piece in line_pieces(line, max_len) {
            let piece_len = piece.chars().count();
            if !current.is_empty() && current_len + 1 + piece_len > max_len {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if !current.is_empty() {
                current.push('\n');
                current_len += 1;
            }
            current.push_str(&piece);
            current_len += piece_len;
        }
    }
    if !current.trim().is_empty() {
        chunks.push(current);
    }

    chunks.retain(|c| !c.trim().is_empty());
    chunks
}

fn line_pieces(line: &str, max_len: usize) -> Vec<String> {
    if line.chars().count() <= max_len {
        return vec![line.to_string()];
    }
    let chars: Vec<char> = line.chars().collect();
    chars
        .chunks(max_len)
        .map(|c| c.iter().collect::<String>())
        .collect()
}

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

use matchsheet::classify::{self, Label, ProbPair};

#[derive(Debug, serde::Deserialize)]
struct EvalCase {
    win: f64,
    #[serde(default)]
    loss: Option<f64>,
    truth: String,
}

fn main() -> Result<()> {
    let path = parse_arg("--cases")
        .map(PathBuf::from)
        .context("no probability table given; pass --cases <cases.json>")?;
    let coef_a = parse_f64_arg("--coef-a").unwrap_or(0.1);
    let coef_b = parse_f64_arg("--coef-b").unwrap_or(0.1);
    let single = std::env::args().any(|arg| arg == "--single-prob");

    let raw = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    let cases: Vec<EvalCase> = serde_json::from_str(&raw).context("invalid cases json")?;
    if cases.is_empty() {
        return Err(anyhow!("no rows in {}", path.display()));
    }

    let mut truth = Vec::with_capacity(cases.len());
    for (index, case) in cases.iter().enumerate() {
        let label = Label::parse(&case.truth)
            .ok_or_else(|| anyhow!("row {index}: unknown label {:?}", case.truth))?;
        truth.push(label);
    }

    let flags = if single {
        let probs: Vec<f64> = cases.iter().map(|c| c.win).collect();
        classify::score_win_prob(&probs, &truth, coef_a, coef_b)
    } else {
        let mut rows = Vec::with_capacity(cases.len());
        for (index, case) in cases.iter().enumerate() {
            let loss = case
                .loss
                .ok_or_else(|| anyhow!("row {index}: missing loss probability"))?;
            rows.push(ProbPair {
                win: case.win,
                loss,
            });
        }
        classify::score_prob_diff(&rows, &truth, coef_a, coef_b)
    };

    let wrong: usize = flags.iter().map(|f| *f as usize).sum();
    let total = flags.len();
    println!(
        "Threshold evaluation ({})",
        if single { "single-prob" } else { "prob-diff" }
    );
    println!("Cases: {}", path.display());
    println!("Coefficients: a={coef_a} b={coef_b}");
    println!(
        "Misclassified: {wrong}/{total} ({:.1}% accuracy)",
        100.0 * (total - wrong) as f64 / total as f64
    );
    for (index, _) in flags.iter().enumerate().filter(|(_, f)| **f == 1).take(10) {
        let case = &cases[index];
        println!(
            "  row {index}: win={} loss={} truth={}",
            case.win,
            case.loss.map(|l| l.to_string()).unwrap_or_else(|| "-".into()),
            case.truth
        );
    }

    Ok(())
}

fn parse_arg(flag: &str) -> Option<String> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let prefix = format!("{flag}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&prefix) {
            if !value.trim().is_empty() {
                return Some(value.trim().to_string());
            }
        }
        if arg == flag
            && let Some(next) = args.get(idx + 1)
        {
            return Some(next.trim().to_string());
        }
    }
    None
}

fn parse_f64_arg(flag: &str) -> Option<f64> {
    parse_arg(flag).and_then(|raw| raw.parse::<f64>().ok())
}

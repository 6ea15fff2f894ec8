use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use tracing::info;
use tracing_subscriber::EnvFilter;

use matchsheet::correlate;
use matchsheet::db;
use matchsheet::export;
use matchsheet::extract::{self, ExtractOptions, ExtractionStatus};
use matchsheet::features::{CombinePolicy, DEFAULT_PLAYER_ATTRIBUTES, DEFAULT_TEAM_ATTRIBUTES};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let db_path = parse_path_arg("--db")
        .or_else(|| std::env::var("MATCHSHEET_DB").ok().map(PathBuf::from))
        .context("no database given; pass --db <snapshot.sqlite> or set MATCHSHEET_DB")?;
    let out_path = parse_path_arg("--out").unwrap_or_else(|| PathBuf::from("features.xlsx"));
    let policy_raw = parse_string_arg("--policy")
        .or_else(|| std::env::var("MATCHSHEET_POLICY").ok())
        .unwrap_or_else(|| "diff".to_string());
    let policy = CombinePolicy::parse(&policy_raw).ok_or_else(|| {
        anyhow!("unknown combine policy {policy_raw}, expected all, diff or avg_diff")
    })?;

    let player_attrs = attrs_from_env("MATCHSHEET_PLAYER_ATTRS", &DEFAULT_PLAYER_ATTRIBUTES);
    let team_attrs = attrs_from_env("MATCHSHEET_TEAM_ATTRS", &DEFAULT_TEAM_ATTRIBUTES);

    let conn = db::open_db(&db_path)?;
    let teams = db::load_team_attributes(&conn)?;
    let players = db::load_player_attributes(&conn)?;
    let matches = db::load_matches(&conn)?;
    info!(
        team_snapshots = teams.len(),
        player_snapshots = players.len(),
        matches = matches.len(),
        "loaded historical tables"
    );

    let player_attr_refs: Vec<&str> = player_attrs.iter().map(String::as_str).collect();
    let team_attr_refs: Vec<&str> = team_attrs.iter().map(String::as_str).collect();
    let opts = ExtractOptions {
        policy,
        player_attributes: &player_attr_refs,
        team_attributes: &team_attr_refs,
    };
    let results = extract::extract_all(&matches, &players, &teams, &opts);
    let summary = extract::summarize(&results);

    println!("Feature extraction complete ({policy_raw} policy)");
    println!("DB: {}", db_path.display());
    println!(
        "Matches: {} full={} partial={} failed={}",
        summary.matches, summary.full, summary.partial, summary.failed
    );
    for result in results
        .iter()
        .filter(|r| matches!(r.status, ExtractionStatus::Failed(_)))
        .take(6)
    {
        if let ExtractionStatus::Failed(err) = &result.status {
            println!("  match {}: {err}", result.match_id);
        }
    }

    let positive_cut_off = env_f64("MATCHSHEET_POS_CUTOFF", 0.8);
    let negative_cut_off = env_f64("MATCHSHEET_NEG_CUTOFF", -0.8);
    let columns = extract::feature_columns(&results);
    let pairs = correlate::strong_pairs(&columns, positive_cut_off, negative_cut_off)?;

    if out_path.extension().is_some_and(|ext| ext == "json") {
        export::export_features_json(&out_path, &results)?;
        println!("Wrote {}", out_path.display());
    } else {
        let report = export::export_workbook(&out_path, &results, &pairs)?;
        println!(
            "Wrote {}: {} rows x {} features, {} skipped, {} correlated pairs",
            out_path.display(),
            report.feature_rows,
            report.feature_columns,
            report.skipped,
            report.correlation_pairs
        );
    }

    Ok(())
}

fn parse_path_arg(flag: &str) -> Option<PathBuf> {
    parse_string_arg(flag).map(PathBuf::from)
}

fn parse_string_arg(flag: &str) -> Option<String> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let prefix = format!("{flag}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&prefix) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == flag
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            return Some(next.trim().to_string());
        }
    }
    None
}

fn attrs_from_env(key: &str, defaults: &[&str]) -> Vec<String> {
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .split(',')
            .map(|part| part.trim().to_string())
            .filter(|part| !part.is_empty())
            .collect(),
        _ => defaults.iter().map(|attr| attr.to_string()).collect(),
    }
}

fn env_f64(key: &str, default: f64) -> f64 {
    std::env::var(key)
        .ok()
        .and_then(|raw| raw.trim().parse::<f64>().ok())
        .unwrap_or(default)
}

use std::path::Path;

use anyhow::Result;
use authlens_common::RiskConfig;
use authlens_core::Analyzer;

pub async fn command(
    db: &Path,
    filter: Option<&str>,
    json: bool,
    risk_config: Option<&Path>,
) -> Result<()> {
    let config = match risk_config {
        Some(path) => RiskConfig::load(path)?,
        None => RiskConfig::default(),
    };

    let mut analyzer = Analyzer::new(config);
    analyzer.open(db).await?;
    if let Some(filter) = filter {
        analyzer.set_query(filter);
    }

    let insights = analyzer.insights();
    let users = analyzer.visible_users();
    let events = analyzer.visible_events();

    if json {
        let report = serde_json::json!({
            "insights": insights,
            "users": users,
            "events": events,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Total users:       {}", insights.total_users);
    println!("Locked users:      {}", insights.locked_users);
    println!("High-risk users:   {}", insights.high_risk_users);
    println!("Suspicious logins: {}", insights.suspicious_logins);

    println!();
    println!(
        "{:>6}  {:<24} {:>8}  {:>6}  {}",
        "ID", "USERNAME", "FAILED", "LOCKED", "CREATED"
    );
    for user in &users {
        println!(
            "{:>6}  {:<24} {:>8}  {:>6}  {}{}",
            user.id,
            user.username,
            user.failed_attempts,
            if user.locked { "yes" } else { "no" },
            user.created_at,
            if user.high_risk { "  [high risk]" } else { "" },
        );
    }

    if !events.is_empty() {
        println!();
        println!(
            "{:<20}  {:<24} {:>7}  {:<12} {}",
            "OCCURRED", "USERNAME", "RESULT", "MODE", "REASON"
        );
        for event in &events {
            println!(
                "{:<20}  {:<24} {:>7}  {:<12} {}{}",
                event.occurred_at.format("%Y-%m-%d %H:%M:%S"),
                event.username,
                if event.success { "ok" } else { "fail" },
                event.mode,
                event.reason,
                if event.high_risk { "  [suspicious]" } else { "" },
            );
        }
    }

    Ok(())
}

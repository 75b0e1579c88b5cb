use std::path::Path;

use anyhow::Result;
use authlens_common::RiskConfig;
use authlens_core::Analyzer;

pub async fn command(db: &Path, user_id: i64) -> Result<()> {
    let mut analyzer = Analyzer::new(RiskConfig::default());
    analyzer.open(db).await?;
    analyzer.unlock_user(user_id).await?;

    let insights = analyzer.insights();
    println!(
        "User {user_id} unlocked ({} locked user(s) remaining)",
        insights.locked_users
    );
    Ok(())
}

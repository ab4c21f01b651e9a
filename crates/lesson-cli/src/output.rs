use lesson_core::Generation;
use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}

/// Diagnostics for one generation, written to stderr so stdout stays pure JSON.
pub fn print_report(g: &Generation) {
    let requested = g
        .requested_hours
        .map(|n| n.to_string())
        .unwrap_or_else(|| "-".to_string());
    eprintln!("model:           {}", g.model);
    eprintln!("requested hours: {requested}");
    eprintln!("target hours:    {}", g.target_hours);
    eprintln!("repair:          {}", g.repair.as_str());
    eprintln!("fallback used:   {}", g.used_fallback);
    let gaps = g.plan.flow.gaps();
    if g.target_hours > 0 && !gaps.is_empty() {
        eprintln!("blank entries:   {}", gaps.join(", "));
    }
}

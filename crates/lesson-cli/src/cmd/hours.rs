use anyhow::Result;
use lesson_core::hours::requested_hours;

use crate::output::print_json;

pub fn run(text: &str, json: bool) -> Result<()> {
    let hours = requested_hours(text);
    if json {
        return print_json(&serde_json::json!({ "requested_hours": hours }));
    }
    match hours {
        Some(n) => println!("{n}"),
        None => println!("none"),
    }
    Ok(())
}

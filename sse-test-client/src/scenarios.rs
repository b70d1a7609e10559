use anyhow::Result;
use colored::*;
use domain::{Fragment, StreamEvent};
use std::time::{Duration, Instant};

use crate::output::{print_event, TestResult};
use crate::sse_client::{Connection, Event};

pub const PATCH_ELEMENTS_EVENT: &str = "datastar-patch-elements";

/// How long to wait for any single event before giving up.
const EVENT_TIMEOUT: Duration = Duration::from_secs(5);

/// Parses the fragment carried by a patch-elements event.
fn decode_patch(event: &Event) -> Result<StreamEvent, String> {
    let html = event
        .data
        .strip_prefix("elements ")
        .ok_or_else(|| format!("data does not start with 'elements ': {}", event.data))?;

    Fragment::decode(html).map_err(|e| format!("invalid fragment {html}: {e}"))
}

pub async fn test_connection(conn: &mut Connection) -> Result<TestResult> {
    let start = Instant::now();

    println!("\n{}", "=== TEST: Connection ===".bright_cyan().bold());
    println!("{} Waiting for the first patch event...", "→".blue());

    match conn.wait_for_event(PATCH_ELEMENTS_EVENT, EVENT_TIMEOUT).await {
        Ok(event) => {
            print_event(&conn.label, &event);
            println!("{} First event received", "✓".green());
            Ok(TestResult::pass("connection", start.elapsed()))
        }
        Err(e) => {
            println!("{} {}", "✗".red(), e);
            Ok(TestResult::fail(
                "connection",
                format!("Timeout: {}", e),
                start.elapsed(),
            ))
        }
    }
}

pub async fn test_fragment_format(conn: &mut Connection, count: usize) -> Result<TestResult> {
    let start = Instant::now();

    println!("\n{}", "=== TEST: Fragment Format ===".bright_cyan().bold());
    println!("{} Collecting {} patch events...", "→".blue(), count);

    let events = match conn
        .collect_events(PATCH_ELEMENTS_EVENT, count, EVENT_TIMEOUT)
        .await
    {
        Ok(events) => events,
        Err(e) => {
            println!("{} {}", "✗".red(), e);
            return Ok(TestResult::fail(
                "fragment_format",
                e.to_string(),
                start.elapsed(),
            ));
        }
    };

    for event in &events {
        if let Err(message) = decode_patch(event) {
            println!("{} Malformed fragment!", "✗".red());
            return Ok(TestResult::fail(
                "fragment_format",
                message,
                start.elapsed(),
            ));
        }
    }

    println!("{} All {} fragments decoded correctly", "✓".green(), count);
    Ok(TestResult::pass("fragment_format", start.elapsed()))
}

pub async fn test_cadence(
    conn: &mut Connection,
    count: usize,
    expected_interval: Duration,
) -> Result<TestResult> {
    let start = Instant::now();

    println!("\n{}", "=== TEST: Cadence ===".bright_cyan().bold());
    println!(
        "{} Timing {} consecutive events (expecting one every {:?})...",
        "→".blue(),
        count,
        expected_interval
    );

    let events = match conn
        .collect_events(PATCH_ELEMENTS_EVENT, count.max(2), EVENT_TIMEOUT)
        .await
    {
        Ok(events) => events,
        Err(e) => {
            println!("{} {}", "✗".red(), e);
            return Ok(TestResult::fail("cadence", e.to_string(), start.elapsed()));
        }
    };

    let first = events[0].timestamp;
    let last = events[events.len() - 1].timestamp;
    let mean_gap = (last - first) / (events.len() as u32 - 1);
    let lower = expected_interval / 2;
    let upper = expected_interval + expected_interval / 2;

    if mean_gap >= lower && mean_gap <= upper {
        println!("{} Mean gap {:?}", "✓".green(), mean_gap);
        Ok(TestResult::pass("cadence", start.elapsed()))
    } else {
        println!("{} Mean gap {:?} out of range", "✗".red(), mean_gap);
        Ok(TestResult::fail(
            "cadence",
            format!(
                "Expected a mean gap between {:?} and {:?}, got {:?}",
                lower, upper, mean_gap
            ),
            start.elapsed(),
        ))
    }
}

pub async fn test_independence(
    conn1: &mut Connection,
    conn2: &mut Connection,
    count: usize,
) -> Result<TestResult> {
    let start = Instant::now();

    println!("\n{}", "=== TEST: Independence ===".bright_cyan().bold());
    println!(
        "{} Collecting {} events from two concurrent streams...",
        "→".blue(),
        count
    );

    let (first, second) = tokio::join!(
        conn1.collect_events(PATCH_ELEMENTS_EVENT, count, EVENT_TIMEOUT),
        conn2.collect_events(PATCH_ELEMENTS_EVENT, count, EVENT_TIMEOUT),
    );

    let (first, second) = match (first, second) {
        (Ok(first), Ok(second)) => (first, second),
        (Err(e), _) | (_, Err(e)) => {
            println!("{} {}", "✗".red(), e);
            return Ok(TestResult::fail(
                "independence",
                e.to_string(),
                start.elapsed(),
            ));
        }
    };

    let decode_all = |events: &[Event]| -> Result<Vec<StreamEvent>, String> {
        events.iter().map(decode_patch).collect()
    };

    match (decode_all(&first), decode_all(&second)) {
        (Ok(a), Ok(b)) if a != b => {
            println!("{} Streams carry different sequences", "✓".green());
            Ok(TestResult::pass("independence", start.elapsed()))
        }
        (Ok(_), Ok(_)) => {
            println!("{} Streams carry identical sequences!", "✗".red());
            Ok(TestResult::fail(
                "independence",
                "Two streams produced the same event sequence".to_string(),
                start.elapsed(),
            ))
        }
        (Err(message), _) | (_, Err(message)) => Ok(TestResult::fail(
            "independence",
            message,
            start.elapsed(),
        )),
    }
}

//! Markdown rendering of a [`DaySummary`].

use std::fmt::Write;

use crate::{DaySummary, Share};

/// Screenshot files listed under "Visual Memories".
const VISUAL_MEMORIES: usize = 5;

pub fn render_narrative(summary: &DaySummary) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = write_narrative(&mut out, summary);
    out
}

fn write_narrative(out: &mut String, summary: &DaySummary) -> std::fmt::Result {
    writeln!(out, "# Today's Experience ({} minutes)\n", summary.duration_minutes())?;

    if !summary.screenshots.is_empty() {
        writeln!(out, "**Visual Memories Captured:** {} screenshots\n", summary.screenshots.len())?;
    }

    write_shares(out, "Where I Spent Time", &summary.districts)?;
    writeln!(out)?;
    write_shares(out, "What I Did", &summary.activities)?;
    writeln!(out)?;
    write_shares(out, "How I Felt", &summary.moods)?;

    writeln!(out, "\n## Recent Moments")?;
    for p in &summary.recent {
        writeln!(
            out,
            "- {}: {}, {}, feeling {}",
            p.t.format("%H:%M"),
            p.district,
            p.activity,
            p.mood
        )?;
    }

    if !summary.screenshots.is_empty() {
        writeln!(out, "\n## Visual Memories")?;
        let skip = summary.screenshots.len().saturating_sub(VISUAL_MEMORIES);
        for file in &summary.screenshots[skip..] {
            writeln!(out, "- {file}")?;
        }
    }
    Ok(())
}

fn write_shares(out: &mut String, heading: &str, shares: &[Share]) -> std::fmt::Result {
    writeln!(out, "## {heading}")?;
    for share in shares {
        writeln!(out, "- {}: {}%", share.name, share.percent)?;
    }
    Ok(())
}

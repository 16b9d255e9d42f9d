use std::io::Write;

use anyhow::{Context, bail};
use tracing::debug;
use wbtags_core::prelude::*;
use wbtags_model::capture_tag;

use crate::cli::Command;

/// Run one command against `store`, printing results to `out`.
///
/// `source` is needed only by the commands that enumerate worldbooks.
pub fn execute<W: Write>(
    command: &Command,
    store: &TagStore,
    source: Option<&dyn RecordSource>,
    out: &mut W,
) -> anyhow::Result<()> {
    debug!(?command, "executing");
    match command {
        Command::List => print_lines(out, store.all_tags())?,
        Command::Show { record } => print_lines(out, store.get_tags(record))?,
        Command::Add { tag, records } => {
            let tag = required_tag(tag)?;
            let changed = match records.as_slice() {
                [record] => usize::from(store.add_tag(record, &tag)),
                many => store.add_tag_to_many(many, &tag),
            };
            writeln!(out, "tagged {changed} of {} worldbook(s) with {tag}", records.len())?;
        }
        Command::Remove { tag, records } => {
            // Stored tags are matched exactly, surrounding whitespace included.
            if tag.trim().is_empty() {
                bail!("tag must not be empty");
            }
            let changed = match records.as_slice() {
                [record] => usize::from(store.remove_tag(record, tag)),
                many => store.remove_tag_from_many(many, tag),
            };
            writeln!(out, "untagged {changed} of {} worldbook(s)", records.len())?;
        }
        Command::Set { record, tags } => {
            let tags: Vec<String> = tags.iter().filter_map(|t| capture_tag(t)).collect();
            store.set_tags(record, tags);
        }
        Command::Common { records } => print_lines(out, store.common_tags(records))?,
        Command::Filter { tags } => {
            let names = known_records(source)?.record_names()?;
            let filter = TagFilter::from_tags(tags.iter().filter_map(|t| capture_tag(t)));
            print_lines(out, filter.apply(store, &names))?;
        }
        Command::Records { search } => {
            for row in overview(store, known_records(source)?, search)? {
                writeln!(out, "{}\t{}", row.name, row.tags.join(", "))?;
            }
        }
    }
    Ok(())
}

fn required_tag(raw: &str) -> anyhow::Result<String> {
    match capture_tag(raw) {
        Some(tag) => Ok(tag),
        None => bail!("tag must not be empty"),
    }
}

fn known_records(source: Option<&dyn RecordSource>) -> anyhow::Result<&dyn RecordSource> {
    source.context("no worlds directory configured (use --worlds or host.worlds_dir)")
}

fn print_lines<W: Write>(out: &mut W, lines: Vec<String>) -> anyhow::Result<()> {
    for line in lines {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

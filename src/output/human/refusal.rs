// Human body for refusals (bd-p4c)

use crate::format::numbers::format_float;
use crate::refusal::codes::RefusalCode;
use crate::refusal::details::{FileSide, RefusalDetail, RefusalKind};
use crate::series::load::EncodingIssue;

pub struct RefusalBody<'a> {
    pub code: RefusalCode,
    pub detail: &'a RefusalDetail,
    pub left_name: &'a str,
    pub right_name: &'a str,
}

pub fn render_refusal_body(body: &RefusalBody<'_>) -> Vec<String> {
    let mut lines = vec![format!("Reason: {}", body.code.reason())];
    lines.extend(render_evidence(body));
    lines.push(format!("Next: {}", body.detail.next));
    lines
}

fn render_evidence(body: &RefusalBody<'_>) -> Vec<String> {
    let name = |side: FileSide| match side {
        FileSide::Left => body.left_name,
        FileSide::Right => body.right_name,
    };
    match &body.detail.kind {
        RefusalKind::Io { file, error } => vec![
            format!("File: {} ({})", name(*file), file.as_str()),
            format!("Error: {error}"),
        ],
        RefusalKind::Encoding { file, issue } => vec![
            format!("File: {} ({})", name(*file), file.as_str()),
            format!(
                "Issue: {}",
                match issue {
                    EncodingIssue::WideBom => "UTF-16/UTF-32 byte order mark",
                    EncodingIssue::NulByte => "NUL byte near the start (binary content?)",
                }
            ),
        ],
        RefusalKind::CsvParse { file, line } => {
            let mut lines = vec![format!("File: {} ({})", name(*file), file.as_str())];
            if let Some(line_number) = line {
                lines.push(format!("Line: {line_number}"));
            }
            lines
        }
        RefusalKind::NoColumn {
            file,
            column,
            available,
        } => {
            let mut lines = vec![format!("File: {} ({})", name(*file), file.as_str())];
            if let Some(requested) = column {
                lines.push(format!("Requested: {requested}"));
            }
            if !available.is_empty() {
                lines.push(format!("Available: {}", available.join(", ")));
            }
            lines
        }
        RefusalKind::BadValue {
            file,
            record,
            value,
        } => vec![
            format!("File: {} ({})", name(*file), file.as_str()),
            format!("Record {record}: {value:?}"),
        ],
        RefusalKind::NotMonotonic {
            file,
            record,
            prev,
            value,
        } => vec![
            format!("File: {} ({})", name(*file), file.as_str()),
            format!(
                "Record {record}: {} after {}",
                format_float(*value),
                format_float(*prev)
            ),
        ],
        RefusalKind::Empty { file } => {
            vec![format!("File: {} ({})", name(*file), file.as_str())]
        }
        RefusalKind::Seed {
            seed,
            events_left,
            events_right,
        } => vec![
            format!("Seed: ({},{})", seed.0, seed.1),
            format!("Events: left={events_left} right={events_right}"),
        ],
        RefusalKind::Overrides { error } => vec![format!("Error: {error}")],
    }
}

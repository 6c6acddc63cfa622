use crate::workspace::{BlockInstance, Workspace};

/// Indent unit for one nesting level.
pub const INDENT: &str = "    ";
/// Statement emitted for a container with no children, keeping the text
/// well-formed for an indentation-sensitive consumer.
pub const EMPTY_BODY: &str = "pass";
/// Introducer for the else-sequence.
pub const ELSE_LINE: &str = "else:";

/// Render the whole forest into source text: pre-order, one line per block
/// minimum, lines joined with `\n`. An empty forest renders as the empty
/// string. Pure and idempotent: same forest, same text.
pub fn generate(workspace: &Workspace) -> String {
    let mut lines = Vec::new();
    for block in workspace.roots() {
        emit(block, 0, &mut lines);
    }
    lines.join("\n")
}

fn emit(block: &BlockInstance, depth: usize, lines: &mut Vec<String>) {
    push_line(lines, depth, &block.statement());

    if block.accepts_body {
        if block.body.is_empty() {
            push_line(lines, depth + 1, EMPTY_BODY);
        } else {
            for child in &block.body {
                emit(child, depth + 1, lines);
            }
        }
    }

    // An else-capable block always yields the else clause, even with an
    // empty alternate body.
    if block.has_alternate_body {
        push_line(lines, depth, ELSE_LINE);
        if block.alternate_body.is_empty() {
            push_line(lines, depth + 1, EMPTY_BODY);
        } else {
            for child in &block.alternate_body {
                emit(child, depth + 1, lines);
            }
        }
    }
}

fn push_line(lines: &mut Vec<String>, depth: usize, text: &str) {
    lines.push(format!("{}{}", INDENT.repeat(depth), text));
}
